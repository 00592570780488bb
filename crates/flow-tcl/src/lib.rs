//! Legacy Tcl configuration evaluation
//!
//! Older designs and every PDK describe their configuration as Tcl scripts
//! that assign into the `::env` array:
//!
//! ```tcl
//! set ::env(STD_CELL_LIBRARY) sky130_fd_sc_hd
//! if { ![info exists ::env(CLOCK_PERIOD)] } {
//!     set ::env(CLOCK_PERIOD) 10
//! }
//! set ::env(LIB_DIR) "$::env(PDK_ROOT)/$::env(PDK)/libs.ref"
//! ```
//!
//! The resolver only depends on the [`ScriptEvaluator`] contract: bind an
//! environment, run the script, read the environment back. [`EnvEvaluator`]
//! implements the contract for the command subset configuration files use
//! (`set`, `unset`, `append`, `lappend`, `list`, `info exists`, `if`/`elseif`/`else`,
//! `expr`, `puts`).

pub mod error;
mod interp;
mod list;
mod parser;

pub use error::{Error, Result};
pub use list::split_list;

use indexmap::IndexMap;

/// The `::env` array a script reads from and writes to.
pub type Env = IndexMap<String, String>;

/// Evaluates a legacy configuration script into a flat environment.
pub trait ScriptEvaluator: Send + Sync {
    /// Run `source` with `env` bound as `::env`, returning the environment
    /// after the script completes (bound keys included).
    fn evaluate(&self, env: &Env, source: &str) -> Result<Env>;
}

/// Built-in evaluator for the configuration subset of Tcl.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvEvaluator;

impl EnvEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptEvaluator for EnvEvaluator {
    fn evaluate(&self, env: &Env, source: &str) -> Result<Env> {
        let mut interp = interp::Interp::new(env.clone());
        interp.eval_script(source, 1)?;
        Ok(interp.into_env())
    }
}
