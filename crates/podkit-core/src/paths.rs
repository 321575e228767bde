//! Standard paths used by podkit tools

use std::path::PathBuf;

/// Standard podkit paths
pub struct Paths {
    /// Config directory (~/.config/podkit)
    pub config: PathBuf,
    /// Scratch area for throwaway files (<tmp>/podkit)
    pub scratch: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("podkit");

        let scratch = std::env::temp_dir().join("podkit");

        Self { config, scratch }
    }

    /// Get the config file path for a tool
    pub fn config_file(&self, tool: &str) -> PathBuf {
        self.config.join(format!("{}.yaml", tool))
    }

    /// Where remote lint targets are downloaded
    pub fn lint_downloads(&self) -> PathBuf {
        self.scratch.join("lint-podspecs")
    }

    /// Root of the per-target validation working directories
    pub fn validation_root(&self) -> PathBuf {
        self.scratch.join("lint")
    }

    /// Local spec repositories (~/.cocoapods/repos)
    pub fn spec_repos(&self) -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(".cocoapods")
            .join("repos")
    }
}
