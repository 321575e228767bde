//! Spec file naming and the data rendered into a new spec

use std::path::Path;

use crate::version::RefKind;

/// File extension of spec files
pub const SPEC_EXTENSION: &str = ".podspec";

/// File name for a spec called `name`
pub fn spec_file_name(name: &str) -> String {
    format!("{}{}", name, SPEC_EXTENSION)
}

/// Whether a path names a spec file (`Foo.podspec`)
pub fn is_spec_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(SPEC_EXTENSION))
        .unwrap_or(false)
}

/// Everything needed to render a new spec file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecData {
    /// Package name
    pub name: String,

    /// Version string
    pub version: String,

    /// One-line summary
    pub summary: String,

    /// Project homepage
    pub homepage: String,

    /// License identifier, `None` renders a placeholder
    pub license: Option<String>,

    /// Author display name
    pub author_name: String,

    /// Author email
    pub author_email: String,

    /// Git URL of the source
    pub source_url: String,

    /// Kind of ref the source is pinned to
    pub ref_kind: RefKind,

    /// Tag name or commit sha
    pub ref_value: String,
}
