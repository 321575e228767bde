//! Version and source ref suggestion for new specs
//!
//! Given a repository's tag names and branches, pick the highest semantic
//! version among the tags and point the spec source at that tag. Repositories
//! without any version tags get `0.0.1` pinned to the tip commit of the
//! default branch.

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{Result, SpecError};

/// Version used when no tag carries a semantic version
pub const FALLBACK_VERSION: &str = "0.0.1";

/// Branch assumed when the repository does not report a default branch
pub const DEFAULT_BRANCH: &str = "master";

/// Which kind of source ref a spec points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Tag,
    Commit,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested version plus the ref its source should be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSuggestion {
    pub version: Version,
    pub ref_kind: RefKind,
    pub ref_value: String,
}

impl RefSuggestion {
    /// Whether this is the `0.0.1` placeholder version
    pub fn is_fallback(&self) -> bool {
        self.version == fallback_version()
    }
}

/// A branch and the commit at its tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub commit_sha: String,
}

impl Branch {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// A tag name and the version it carries, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub version: Option<Version>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let version = parse_version(strip_version_marker(&name));
        Self { name, version }
    }
}

pub fn fallback_version() -> Version {
    Version::new(0, 0, 1)
}

fn version_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^v(er)? ?").expect("static regex"))
}

/// Strip a leading `v`, `v `, `ver` or `ver ` from a tag name
pub fn strip_version_marker(tag: &str) -> &str {
    match version_marker().find(tag) {
        Some(m) => &tag[m.end()..],
        None => tag,
    }
}

/// Parse a version, padding `1` and `1.2` out to three components
pub fn parse_version(candidate: &str) -> Option<Version> {
    let candidate = candidate.trim();
    if let Ok(version) = Version::parse(candidate) {
        return Some(version);
    }

    let split = candidate.find(['-', '+']).unwrap_or(candidate.len());
    let (core, suffix) = candidate.split_at(split);
    let parts: Vec<&str> = core.split('.').collect();

    if parts.len() >= 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded).ok()
}

/// Pick the version and source ref for a repository.
///
/// The highest tag by semantic-version precedence wins and its original,
/// unstripped name becomes the ref. Tags that do not parse are ignored.
/// With no usable tag, the tip of `default_branch` (or `master`) is used
/// with version `0.0.1`.
pub fn resolve(
    tags: &[Tag],
    branches: &[Branch],
    default_branch: Option<&str>,
) -> Result<RefSuggestion> {
    let mut best: Option<(&Version, &str)> = None;

    for tag in tags {
        let Some(version) = &tag.version else {
            debug!("ignoring tag without a version: {}", tag.name);
            continue;
        };

        let better = match best {
            Some((current, _)) => version.cmp_precedence(current) == Ordering::Greater,
            None => true,
        };
        if better {
            best = Some((version, tag.name.as_str()));
        }
    }

    if let Some((version, name)) = best {
        debug!("suggesting tag {} ({})", name, version);
        return Ok(RefSuggestion {
            version: version.clone(),
            ref_kind: RefKind::Tag,
            ref_value: name.to_string(),
        });
    }

    let branch_name = default_branch
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BRANCH);
    let branch = branches
        .iter()
        .find(|b| b.name == branch_name)
        .ok_or_else(|| SpecError::NoDefaultBranch(branch_name.to_string()))?;

    debug!(
        "no version tags; using {} at {}",
        branch.name, branch.commit_sha
    );
    Ok(RefSuggestion {
        version: fallback_version(),
        ref_kind: RefKind::Commit,
        ref_value: branch.commit_sha.clone(),
    })
}
