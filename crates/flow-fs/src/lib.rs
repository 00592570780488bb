//! Filesystem helpers for the flow configuration resolver
//!
//! Provides normalized path handling, text I/O with path-carrying errors and
//! the fixed on-disk layout of an installed PDK.

pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use constants::PdkPath;
pub use error::{Error, Result};
pub use layout::PdkLayout;
pub use path::NormalizedPath;
