//! Errors surfaced by the spec commands

use std::path::PathBuf;
use thiserror::Error;

/// Errors specific to spec operations
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("{0}")]
    Usage(String),

    #[error("Unable to find a spec named `{}`.", .0.display())]
    SpecNotFound(PathBuf),

    #[error("No specs found in `{}`.", .0.display())]
    NoSpecsInDirectory(PathBuf),

    #[error("Unable to find a spec named `{0}`.")]
    NoMatch(String),

    #[error("More than one spec found for `{query}`: {}", .candidates.join(", "))]
    AmbiguousMatch {
        query: String,
        candidates: Vec<String>,
    },

    #[error("Unable to find any commits on the `{0}` branch.")]
    NoDefaultBranch(String),

    #[error("{message}")]
    LintFailures {
        failed: usize,
        total: usize,
        message: String,
    },

    #[error("Spec already exists: {}", .0.display())]
    SpecExists(PathBuf),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Rate limited while fetching {url}")]
    RateLimited { url: String },

    #[error("Request to {url} failed with status {status}")]
    Remote { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("`{first}` and `{second}` would both be downloaded as `{file_name}`.")]
    DownloadCollision {
        file_name: String,
        first: String,
        second: String,
    },

    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Map a reqwest failure onto the network error kinds
    pub fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpecError::Timeout {
                url: url.to_string(),
            }
        } else {
            SpecError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SpecError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Result type for spec operations
pub type Result<T> = std::result::Result<T, SpecError>;
