//! Shared test fixtures for the flow configuration workspace.
//!
//! A dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`pdk`]: [`TestPdkRoot`], a temporary PDK root with a ready-made test PDK
//! - [`design`]: [`TestDesign`], a temporary design directory

pub mod design;
pub mod pdk;

pub use design::TestDesign;
pub use pdk::TestPdkRoot;
