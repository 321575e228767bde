//! YAML config loading shared by podkit tools

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load a YAML config file, falling back to defaults when it does not exist
pub fn load_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;

    // An empty file is a valid "use defaults"
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {:?}", path))
}
