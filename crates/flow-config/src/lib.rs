//! Layered configuration resolution for the design flow
//!
//! A design configuration is resolved on top of the PDK that it targets:
//!
//! 1. the PDK name, library and root are read from the raw input without
//!    validation;
//! 2. the PDK base configuration and the standard cell library overrides
//!    are evaluated and validated against the technology variables;
//! 3. the design layer is merged over them, legacy keys are migrated, and
//!    every variable compiles its final value.
//!
//! All problems of a pass are reported together through
//! [`Error::Invalid`], which carries every warning and error of the layer
//! that failed.
//!
//! Variables are supplied from outside as [`VariableSpec`] implementations;
//! this crate assumes nothing about any particular variable.

pub mod catalog;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod interactive;
pub mod keys;
pub mod loader;
pub mod map;
pub mod meta;
pub mod migrate;
pub mod pdk;
pub mod resolve;
pub mod source;
pub mod validate;
pub mod value;
pub mod variable;

pub use catalog::{Catalog, RemovedTable};
pub use config::Config;
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ConfigLayer, Error, InvalidConfig, Result};
pub use interactive::{InteractiveRequest, current_interactive, set_current_interactive};
pub use keys::{SpecialKeys, UnknownKeyPolicy};
pub use loader::{ConfigLoader, LoadOptions, Loaded};
pub use map::ConfigMap;
pub use meta::{FlowSelection, Meta};
pub use pdk::{PdkConfig, PdkRootLocator};
pub use source::ConfigInput;
pub use validate::{Processed, process_variable_list};
pub use value::{Mapping, Value};
pub use variable::{CompileContext, CompileError, Compiled, VariableRef, VariableSpec};
