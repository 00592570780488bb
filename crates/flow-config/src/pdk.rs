//! PDK root discovery and the resolved technology layer

use std::path::{Path, PathBuf};

use flow_fs::{NormalizedPath, io};
use flow_tcl::{Env, ScriptEvaluator};

use crate::diagnostic::Diagnostic;
use crate::keys::SpecialKeys;
use crate::map::ConfigMap;
use crate::value::{Mapping, Value};
use crate::{Error, Result};

pub const PDK_ROOT_ENV: &str = "PDK_ROOT";
pub const PACKAGE_HOME_ENV: &str = "VOLARE_HOME";
/// PDK package manager whose presence on `PATH` enables its home directory.
pub const PACKAGE_MANAGER: &str = "volare";
const PACKAGE_HOME_DIR: &str = ".volare";

/// Decides which directory PDKs are looked up under.
///
/// Precedence: the explicit argument, then the environment root, then the
/// package manager home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdkRootLocator {
    env_root: Option<PathBuf>,
    package_home: Option<PathBuf>,
}

impl PdkRootLocator {
    /// Snapshot `PDK_ROOT` and the package manager home from the process
    /// environment.
    pub fn from_env() -> Self {
        let env_root = std::env::var_os(PDK_ROOT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            env_root,
            package_home: detect_package_home(),
        }
    }

    /// A locator that only honors explicit roots.
    pub fn isolated() -> Self {
        Self::default()
    }

    pub fn with_env_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.env_root = Some(root.into());
        self
    }

    pub fn with_package_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.package_home = Some(home.into());
        self
    }

    pub fn locate(&self, explicit: Option<&Path>) -> Result<NormalizedPath> {
        let root = explicit
            .or(self.env_root.as_deref())
            .or(self.package_home.as_deref())
            .ok_or(Error::MissingPdkRoot)?;
        Ok(NormalizedPath::absolute(root)?)
    }
}

fn detect_package_home() -> Option<PathBuf> {
    which::which(PACKAGE_MANAGER).ok()?;
    match std::env::var_os(PACKAGE_HOME_ENV).filter(|v| !v.is_empty()) {
        Some(home) => Some(PathBuf::from(home)),
        None => dirs::home_dir().map(|home| home.join(PACKAGE_HOME_DIR)),
    }
}

/// A validated PDK and standard cell library layer.
#[derive(Debug, Clone)]
pub struct PdkConfig {
    pub values: ConfigMap,
    pub pdk: String,
    pub scl: String,
    pub pdk_root: NormalizedPath,
    /// `<pdk_root>/<pdk>`
    pub pdk_path: NormalizedPath,
    pub warnings: Vec<Diagnostic>,
}

impl PdkConfig {
    /// The special keys as the resolver chose them.
    pub fn special_keys(&self, design_dir: &Path) -> Mapping {
        let mut keys = Mapping::new();
        keys.insert(
            SpecialKeys::DESIGN_DIR.to_string(),
            Value::Path(design_dir.to_path_buf()),
        );
        keys.insert(SpecialKeys::PDK.to_string(), Value::from(self.pdk.as_str()));
        keys.insert(
            SpecialKeys::STD_CELL_LIBRARY.to_string(),
            Value::from(self.scl.as_str()),
        );
        keys.insert(
            SpecialKeys::PDK_ROOT.to_string(),
            Value::Path(self.pdk_root.to_native()),
        );
        keys
    }

    /// Bindings for a legacy design script: the whole layer plus the
    /// special keys, rendered as strings.
    pub fn script_bindings(&self, design_dir: &Path) -> Env {
        let mut env = env_from_map(&self.values);
        for (key, value) in self.special_keys(design_dir) {
            env.insert(key, value.to_tcl_string());
        }
        env
    }
}

pub(crate) fn env_from_map(map: &ConfigMap) -> Env {
    map.iter()
        .map(|(k, v)| (k.clone(), v.to_tcl_string()))
        .collect()
}

pub(crate) fn mapping_from_env(env: &Env) -> Mapping {
    env.iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Evaluate a script with `env` bound, attributing failures to `path`.
pub(crate) fn evaluate_script(
    evaluator: &dyn ScriptEvaluator,
    env: &Env,
    source: &str,
    path: &NormalizedPath,
) -> Result<Env> {
    tracing::debug!(path = %path, bindings = env.len(), "Evaluating configuration script");
    evaluator
        .evaluate(env, source)
        .map_err(|source| Error::Script {
            path: path.to_native(),
            source,
        })
}

pub(crate) fn evaluate_file(evaluator: &dyn ScriptEvaluator, env: &Env, path: &NormalizedPath) -> Result<Env> {
    let source = io::read_text(path)?;
    evaluate_script(evaluator, env, &source, path)
}
