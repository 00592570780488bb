//! Turning a configuration source into a validated [`Config`]
//!
//! Every load resolves three layers: the PDK base configuration, the
//! standard cell library overrides, and the design. The two PDK layers are
//! validated against the technology variables first so that their problems
//! are reported separately from the design's.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use flow_fs::{NormalizedPath, PdkLayout, io};
use flow_tcl::{Env, EnvEvaluator, ScriptEvaluator};

use crate::catalog::{Catalog, RemovedTable};
use crate::config::Config;
use crate::diagnostic::{Diagnostic, DiagnosticKind, log_warnings};
use crate::error::{ConfigLayer, InvalidConfig};
use crate::keys::{META_KEY, SpecialKeys, UnknownKeyPolicy};
use crate::map::ConfigMap;
use crate::meta::Meta;
use crate::pdk::{PdkConfig, PdkRootLocator, evaluate_file, evaluate_script, mapping_from_env};
use crate::resolve::{ResolveContext, extract_process_info, resolve_design_layer};
use crate::source::{ConfigInput, ModernSource, SourceFormat, apply_overrides, parse_modern, split_meta};
use crate::validate::{Processed, process_variable_list};
use crate::value::{Mapping, Value};
use crate::variable::VariableRef;
use crate::{Error, Result};

const TCL_DEPRECATION: &str = "Support for .tcl configuration files is deprecated. Please migrate to a .json file at your earliest convenience.";

/// Per-load arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// `NAME=VALUE` overrides applied over the design layer
    pub overrides: Vec<String>,
    /// PDK used when the configuration names none
    pub pdk: Option<String>,
    /// PDK root taking precedence over every other source
    pub pdk_root: Option<PathBuf>,
    /// Library used when the configuration names none
    pub scl: Option<String>,
    /// Required for mapping inputs, rejected for file inputs
    pub design_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, assignment: impl Into<String>) -> Self {
        self.overrides.push(assignment.into());
        self
    }

    pub fn with_pdk(mut self, pdk: impl Into<String>) -> Self {
        self.pdk = Some(pdk.into());
        self
    }

    pub fn with_pdk_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.pdk_root = Some(root.into());
        self
    }

    pub fn with_scl(mut self, scl: impl Into<String>) -> Self {
        self.scl = Some(scl.into());
        self
    }

    pub fn with_design_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.design_dir = Some(dir.into());
        self
    }
}

/// A successfully loaded design configuration.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    pub design_dir: PathBuf,
    pub warnings: Vec<Diagnostic>,
}

/// Resolves configurations against a variable catalog.
pub struct ConfigLoader {
    catalog: Catalog,
    evaluator: Arc<dyn ScriptEvaluator>,
    locator: PdkRootLocator,
    policy: UnknownKeyPolicy,
    full_pdk_warnings: bool,
}

impl ConfigLoader {
    /// A loader using the built-in script evaluator and the process
    /// environment for PDK root discovery.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            evaluator: Arc::new(EnvEvaluator::new()),
            locator: PdkRootLocator::from_env(),
            policy: UnknownKeyPolicy::default(),
            full_pdk_warnings: false,
        }
    }

    pub fn with_evaluator(mut self, evaluator: impl ScriptEvaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    pub fn with_locator(mut self, locator: PdkRootLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_unknown_key_policy(mut self, policy: UnknownKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log PDK-layer warnings at warn level instead of debug.
    pub fn with_full_pdk_warnings(mut self, enabled: bool) -> Self {
        self.full_pdk_warnings = enabled;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn locator(&self) -> &PdkRootLocator {
        &self.locator
    }

    /// Validate `input` with this loader's unknown-key policy.
    pub fn process(&self, input: &ConfigMap, variables: &[VariableRef], removed: &RemovedTable) -> Result<Processed> {
        process_variable_list(input, variables, removed, &self.policy)
    }

    /// Load a design configuration, validating it against the technology
    /// variables followed by `flow_variables`.
    pub fn load(
        &self,
        input: impl Into<ConfigInput>,
        flow_variables: &[VariableRef],
        options: &LoadOptions,
    ) -> Result<Loaded> {
        match input.into() {
            ConfigInput::Mapping(raw) => {
                let dir = options.design_dir.as_ref().ok_or(Error::DesignDirRequired)?;
                let design_dir = NormalizedPath::absolute(dir)?.to_native();
                self.load_mapping(raw, None, &design_dir, flow_variables, options)
            }
            ConfigInput::File(path) => {
                if options.design_dir.is_some() {
                    return Err(Error::DesignDirUnsupported);
                }
                let path = NormalizedPath::absolute(&path)?;
                let format = SourceFormat::from_path(&path)?;
                let design_dir = path
                    .parent()
                    .map(|p| p.to_native())
                    .ok_or_else(|| Error::Fatal(format!("{path} has no parent directory")))?;
                tracing::debug!(path = %path, format = format.name(), "Loading design configuration");

                if format.is_legacy() {
                    return self.load_tcl(&path, &design_dir, flow_variables, options);
                }
                let text = io::read_text(&path)?;
                let ModernSource { raw, meta } = parse_modern(&text, format, &path)?;
                self.load_mapping(raw, meta, &design_dir, flow_variables, options)
            }
        }
    }

    fn load_mapping(
        &self,
        mut raw: Mapping,
        meta: Option<Value>,
        design_dir: &Path,
        flow_variables: &[VariableRef],
        options: &LoadOptions,
    ) -> Result<Loaded> {
        let meta = meta.or_else(|| split_meta(&mut raw));
        apply_overrides(&mut raw, &options.overrides)?;

        let info = extract_process_info(&raw);
        let pdk = info.pdk.or_else(|| options.pdk.clone()).ok_or(Error::MissingPdk)?;
        let scl = info.scl.or_else(|| options.scl.clone());
        let root = self
            .locator
            .locate(options.pdk_root.as_deref().or(info.pdk_root.as_deref()))?;
        let pdk_config = self.load_pdk_at(&pdk, scl.as_deref(), &root)?;

        let pdk_path = pdk_config.pdk_path.to_native();
        let mut design_layer = resolve_design_layer(
            &raw,
            &ResolveContext {
                design_dir,
                pdk_path: &pdk_path,
            },
        )?;
        design_layer.extend(pdk_config.special_keys(design_dir));

        let mut processed = self.process_design(&pdk_config, design_layer, flow_variables)?;
        let meta = match meta {
            None => Meta::default(),
            Some(raw_meta) => Meta::from_value(&raw_meta).unwrap_or_else(|message| {
                processed.diagnostics.error(Diagnostic::for_key(
                    DiagnosticKind::InvalidMeta,
                    META_KEY,
                    format!("'{META_KEY}' object is invalid: {message}"),
                ));
                Meta::default()
            }),
        };

        self.finish_design(processed, meta, design_dir, Vec::new())
    }

    fn load_tcl(
        &self,
        path: &NormalizedPath,
        design_dir: &Path,
        flow_variables: &[VariableRef],
        options: &LoadOptions,
    ) -> Result<Loaded> {
        let notice = Diagnostic::new(DiagnosticKind::Deprecated, TCL_DEPRECATION);
        tracing::warn!("{notice}");

        let script = io::read_text(path)?;

        // First pass: only enough bindings to discover the PDK.
        let mut minimal = Env::new();
        let early_root = self.locator.locate(options.pdk_root.as_deref()).ok();
        minimal.insert(
            SpecialKeys::PDK_ROOT.to_string(),
            early_root.as_ref().map(|r| r.as_str().to_string()).unwrap_or_default(),
        );
        minimal.insert(SpecialKeys::PDK.to_string(), options.pdk.clone().unwrap_or_default());
        minimal.insert(
            SpecialKeys::STD_CELL_LIBRARY.to_string(),
            options.scl.clone().unwrap_or_default(),
        );
        minimal.insert(
            SpecialKeys::DESIGN_DIR.to_string(),
            design_dir.to_string_lossy().into_owned(),
        );
        let first = evaluate_script(&*self.evaluator, &minimal, &script, path)?;
        let mut first = mapping_from_env(&first);
        apply_overrides(&mut first, &options.overrides)?;

        let info = extract_process_info(&first);
        let pdk = info.pdk.or_else(|| options.pdk.clone()).ok_or(Error::MissingPdk)?;
        let scl = info.scl.or_else(|| options.scl.clone());
        let root = self
            .locator
            .locate(options.pdk_root.as_deref().or(info.pdk_root.as_deref()))?;
        let pdk_config = self.load_pdk_at(&pdk, scl.as_deref(), &root)?;

        // Second pass: the full PDK layer is visible; keep what the script set.
        let bindings = pdk_config.script_bindings(design_dir);
        let second = evaluate_script(&*self.evaluator, &bindings, &script, path)?;
        let mut design_layer: Mapping = second
            .into_iter()
            .filter(|(key, value)| bindings.get(key) != Some(value))
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        apply_overrides(&mut design_layer, &options.overrides)?;
        design_layer.extend(pdk_config.special_keys(design_dir));

        let processed = self.process_design(&pdk_config, design_layer, flow_variables)?;
        self.finish_design(processed, Meta::default(), design_dir, vec![notice])
    }

    fn process_design(&self, pdk_config: &PdkConfig, design_layer: Mapping, flow_variables: &[VariableRef]) -> Result<Processed> {
        let merged = pdk_config.values.with_overrides(design_layer);
        let variables = self.catalog.design_variables(flow_variables);
        self.process(&merged, &variables, &self.catalog.removed)
    }

    fn finish_design(
        &self,
        processed: Processed,
        meta: Meta,
        design_dir: &Path,
        mut warnings: Vec<Diagnostic>,
    ) -> Result<Loaded> {
        let (values, design_warnings) = processed.into_result(ConfigLayer::Design)?;
        log_warnings(
            "Loading the design configuration file has generated the following warnings:",
            &design_warnings,
            true,
        );
        warnings.extend(design_warnings);
        Ok(Loaded {
            config: Config::new(values, meta),
            design_dir: design_dir.to_path_buf(),
            warnings,
        })
    }

    /// Resolve the PDK and library layers alone.
    pub fn load_pdk(&self, pdk: &str, scl: Option<&str>, pdk_root: Option<&Path>) -> Result<PdkConfig> {
        let root = self.locator.locate(pdk_root)?;
        self.load_pdk_at(pdk, scl, &root)
    }

    pub(crate) fn load_pdk_at(&self, pdk: &str, scl: Option<&str>, root: &NormalizedPath) -> Result<PdkConfig> {
        let layout = PdkLayout::new(root.clone(), pdk);
        if !layout.exists() {
            let warnings = layout
                .similar_names()?
                .into_iter()
                .map(|name| {
                    Diagnostic::for_key(
                        DiagnosticKind::SimilarName,
                        SpecialKeys::PDK,
                        format!("A similarly-named PDK was found: {name}"),
                    )
                })
                .collect();
            return Err(InvalidConfig {
                layer: ConfigLayer::Pdk,
                warnings,
                errors: vec![Diagnostic::for_key(
                    DiagnosticKind::NotFound,
                    SpecialKeys::PDK,
                    format!("The PDK {pdk} was not found."),
                )],
            }
            .into());
        }
        tracing::debug!(pdk, root = %root, "Loading PDK configuration");

        let mut env = Env::new();
        env.insert(SpecialKeys::PDK_ROOT.to_string(), root.as_str().to_string());
        env.insert(SpecialKeys::PDK.to_string(), pdk.to_string());
        if let Some(scl) = scl {
            env.insert(SpecialKeys::STD_CELL_LIBRARY.to_string(), scl.to_string());
        }

        let mut pdk_env = evaluate_file(&*self.evaluator, &env, &layout.pdk_config())?;
        if let Some(scl) = scl {
            pdk_env.insert(SpecialKeys::STD_CELL_LIBRARY.to_string(), scl.to_string());
        }
        let scl = pdk_env
            .get(SpecialKeys::STD_CELL_LIBRARY)
            .filter(|s| !s.is_empty())
            .cloned()
            .ok_or_else(|| Error::Fatal("STD_CELL_LIBRARY default value not set by PDK.".to_string()))?;

        tracing::debug!(scl = %scl, "Loading standard cell library configuration");
        let scl_env = evaluate_file(&*self.evaluator, &pdk_env, &layout.scl_config(&scl))?;

        let working = ConfigMap::from_mapping(mapping_from_env(&scl_env));
        let processed = self.process(&working, &self.catalog.technology, &self.catalog.technology_removed)?;
        let (values, warnings) = processed.into_result(ConfigLayer::PdkFiles)?;
        log_warnings(
            "Loading the PDK configuration files has generated the following warnings:",
            &warnings,
            self.full_pdk_warnings,
        );

        Ok(PdkConfig {
            values,
            pdk: pdk.to_string(),
            scl,
            pdk_root: root.clone(),
            pdk_path: layout.pdk_path(),
            warnings,
        })
    }
}
