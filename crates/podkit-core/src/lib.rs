//! Podkit Core - Shared functionality for podkit tools
//!
//! Standard locations, config loading, and the small process and text
//! helpers every tool needs.

pub mod config;
pub mod format;
pub mod paths;
pub mod process;

pub use paths::Paths;
