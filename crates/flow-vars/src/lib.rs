//! Typed configuration variables
//!
//! [`Variable`] is the concrete implementation of the resolver's
//! [`VariableSpec`](flow_config::VariableSpec) contract. [`catalog`] returns
//! the built-in technology and flow variable lists together with the tables
//! of removed keys, and [`render_reference`] documents any variable list as
//! a markdown table.

pub mod catalog;
pub mod reference;
pub mod types;
pub mod variable;

pub use catalog::{catalog, flow_common_variables, removed, technology_removed, technology_variables};
pub use reference::render_reference;
pub use types::VarType;
pub use variable::Variable;
