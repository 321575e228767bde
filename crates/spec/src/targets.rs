//! Resolving lint inputs (files, directories, URLs) into spec files

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Result, SpecError};
use crate::spec::{is_spec_file, SPEC_EXTENSION};

/// Where a lint target came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOrigin {
    /// Named directly on the command line
    Local,
    /// Found while scanning a directory
    Discovered,
    /// Downloaded from a URL into the scratch directory
    Downloaded { url: String },
}

/// An existing local spec file to validate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintTarget {
    pub path: PathBuf,
    pub origin: TargetOrigin,
}

impl LintTarget {
    /// File name for messages (`Foo.podspec`)
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Fetches the body of a remote spec
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Whether an input names a remote spec
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Expands lint inputs into a de-duplicated list of spec files
pub struct TargetSetExpander<'a> {
    scratch_dir: PathBuf,
    downloader: &'a dyn Downloader,
}

impl<'a> TargetSetExpander<'a> {
    pub fn new(scratch_dir: impl Into<PathBuf>, downloader: &'a dyn Downloader) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            downloader,
        }
    }

    /// Resolve every input in order. No inputs means the current directory.
    pub async fn expand<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<LintTarget>> {
        let inputs: Vec<&str> = if inputs.is_empty() {
            vec!["."]
        } else {
            inputs.iter().map(|i| i.as_ref()).collect()
        };

        let mut targets = Vec::new();
        let mut downloaded: HashMap<String, &str> = HashMap::new();
        for input in inputs {
            if is_url(input) {
                let file_name = url_file_name(input)?;
                match downloaded.get(&file_name) {
                    Some(first) if *first == input => continue,
                    Some(first) => {
                        return Err(SpecError::DownloadCollision {
                            file_name,
                            first: first.to_string(),
                            second: input.to_string(),
                        })
                    }
                    None => {}
                }
                targets.push(self.download(input, &file_name).await?);
                downloaded.insert(file_name, input);
            } else if Path::new(input).is_dir() {
                targets.extend(find_specs_in(Path::new(input))?);
            } else {
                targets.push(local_target(input)?);
            }
        }

        Ok(dedup_by_canonical_path(targets))
    }

    async fn download(&self, url: &str, file_name: &str) -> Result<LintTarget> {
        let body = self.downloader.download(url).await?;

        std::fs::create_dir_all(&self.scratch_dir)?;
        let path = self.scratch_dir.join(file_name);
        std::fs::write(&path, body)?;
        info!("downloaded {} to {}", url, path.display());

        Ok(LintTarget {
            path,
            origin: TargetOrigin::Downloaded {
                url: url.to_string(),
            },
        })
    }
}

/// Last path segment of a URL, used as the downloaded file name
fn url_file_name(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|e| SpecError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .ok_or_else(|| SpecError::InvalidUrl {
            url: url.to_string(),
            reason: "no file name in path".to_string(),
        })
}

/// Recursively collect spec files beneath a directory, sorted by name
fn find_specs_in(dir: &Path) -> Result<Vec<LintTarget>> {
    let mut specs = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_spec_file(entry.path()) {
            specs.push(LintTarget {
                path: entry.into_path(),
                origin: TargetOrigin::Discovered,
            });
        }
    }

    if specs.is_empty() {
        return Err(SpecError::NoSpecsInDirectory(dir.to_path_buf()));
    }

    debug!("found {} specs in {}", specs.len(), dir.display());
    Ok(specs)
}

fn local_target(input: &str) -> Result<LintTarget> {
    let path = PathBuf::from(input);
    let named_like_spec = path
        .file_name()
        .map(|n| n.to_string_lossy().contains(SPEC_EXTENSION))
        .unwrap_or(false);

    if !path.exists() || !named_like_spec {
        return Err(SpecError::SpecNotFound(path));
    }

    Ok(LintTarget {
        path,
        origin: TargetOrigin::Local,
    })
}

/// Drop targets whose canonical path was already seen, keeping first
fn dedup_by_canonical_path(targets: Vec<LintTarget>) -> Vec<LintTarget> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|t| {
            let key = std::fs::canonicalize(&t.path).unwrap_or_else(|_| t.path.clone());
            let fresh = seen.insert(key);
            if !fresh {
                debug!("skipping duplicate target {}", t.path.display());
            }
            fresh
        })
        .collect()
}
