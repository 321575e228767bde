//! spec - Create, lint and inspect podspec files
//!
//! `create` stubs a new spec, prefilled from GitHub when given a repository
//! URL. `lint` runs an external validator over local files, directories and
//! URLs. `cat` prints the newest version of a published spec.

pub mod cli;
pub mod config;
pub mod create;
pub mod error;
pub mod github;
pub mod http;
pub mod index;
pub mod lint;
pub mod output;
pub mod spec;
pub mod targets;
pub mod template;
pub mod validate;
pub mod version;

pub use error::{Result, SpecError};
