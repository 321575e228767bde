//! Looking up specs by name in local spec repositories
//!
//! Repositories are laid out as `<repos>/<source>/[Specs/]<Name>/<version>/<Name>.podspec`.

use semver::Version;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SpecError};
use crate::spec::spec_file_name;
use crate::version::parse_version;

/// One published version of a spec in one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEntry {
    pub source: String,
    pub version: Version,
    pub path: PathBuf,
}

/// All known versions of a spec across every source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSet {
    pub name: String,
    pub entries: Vec<SetEntry>,
}

impl SpecSet {
    /// Entry with the greatest version across all sources, first seen on ties
    pub fn best(&self) -> Option<&SetEntry> {
        let mut best: Option<&SetEntry> = None;
        for entry in &self.entries {
            let better = best.map_or(true, |current| {
                entry.version.cmp_precedence(&current.version) == Ordering::Greater
            });
            if better {
                best = Some(entry);
            }
        }
        best
    }
}

/// Search index over spec sets
pub trait SpecIndex {
    /// Sets whose name matches `query`
    fn search_by_name(&self, query: &str) -> Result<Vec<SpecSet>>;
}

/// Pick the single set a query refers to.
///
/// Several matches are accepted only when exactly one name equals the query
/// (ignoring case).
pub fn find_unique_set(index: &dyn SpecIndex, query: &str) -> Result<SpecSet> {
    let mut sets = index.search_by_name(query)?;

    if sets.len() > 1 {
        let exact: Vec<usize> = sets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.name.eq_ignore_ascii_case(query))
            .map(|(i, _)| i)
            .collect();
        if let [only] = exact.as_slice() {
            return Ok(sets.swap_remove(*only));
        }
        return Err(SpecError::AmbiguousMatch {
            query: query.to_string(),
            candidates: sets.into_iter().map(|s| s.name).collect(),
        });
    }

    sets.pop().ok_or_else(|| SpecError::NoMatch(query.to_string()))
}

/// Index over spec repositories checked out on disk
pub struct RepoIndex {
    repos_dir: PathBuf,
}

impl RepoIndex {
    pub fn new(repos_dir: impl Into<PathBuf>) -> Self {
        Self {
            repos_dir: repos_dir.into(),
        }
    }

    fn sources(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.repos_dir.is_dir() {
            debug!("no spec repos at {}", self.repos_dir.display());
            return Ok(Vec::new());
        }

        let mut sources = Vec::new();
        for entry in std::fs::read_dir(&self.repos_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            let specs = entry.path().join("Specs");
            let root = if specs.is_dir() { specs } else { entry.path() };
            sources.push((name, root));
        }
        sources.sort();
        Ok(sources)
    }
}

impl SpecIndex for RepoIndex {
    fn search_by_name(&self, query: &str) -> Result<Vec<SpecSet>> {
        let needle = query.to_lowercase();
        let mut sets: BTreeMap<String, Vec<SetEntry>> = BTreeMap::new();

        for (source, root) in self.sources()? {
            for entry in std::fs::read_dir(&root)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.')
                    || !entry.path().is_dir()
                    || !name.to_lowercase().contains(&needle)
                {
                    continue;
                }

                let versions = versions_of(&entry.path(), &name, &source)?;
                if !versions.is_empty() {
                    sets.entry(name).or_default().extend(versions);
                }
            }
        }

        debug!("{} sets match {}", sets.len(), query);
        Ok(sets
            .into_iter()
            .map(|(name, entries)| SpecSet { name, entries })
            .collect())
    }
}

fn versions_of(dir: &Path, name: &str, source: &str) -> Result<Vec<SetEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Some(version) = parse_version(&entry.file_name().to_string_lossy()) else {
            continue;
        };
        let path = entry.path().join(spec_file_name(name));
        if path.is_file() {
            entries.push(SetEntry {
                source: source.to_string(),
                version,
                path,
            });
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn publish(repos: &Path, source: &str, name: &str, version: &str, body: &str) {
        let dir = repos.join(source).join("Specs").join(name).join(version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(spec_file_name(name)), body).unwrap();
    }

    fn entry(source: &str, version: &str) -> SetEntry {
        SetEntry {
            source: source.to_string(),
            version: Version::parse(version).unwrap(),
            path: PathBuf::from(format!("{}/{}", source, version)),
        }
    }

    #[test]
    fn test_best_is_greatest_across_sources() {
        let set = SpecSet {
            name: "Kiwi".to_string(),
            entries: vec![
                entry("master", "1.0.0"),
                entry("private", "2.1.0"),
                entry("master", "2.0.0"),
                entry("private", "2.1.0-beta"),
            ],
        };
        let best = set.best().unwrap();
        assert_eq!(best.source, "private");
        assert_eq!(best.version, Version::new(2, 1, 0));
    }

    #[test]
    fn test_best_of_empty_set() {
        let set = SpecSet {
            name: "Empty".to_string(),
            entries: Vec::new(),
        };
        assert!(set.best().is_none());
    }

    #[test]
    fn test_repo_index_merges_sources() {
        let dir = tempdir().unwrap();
        publish(dir.path(), "master", "Kiwi", "1.0.0", "old");
        publish(dir.path(), "master", "Kiwi", "2.0.0", "new");
        publish(dir.path(), "private", "Kiwi", "2.5", "newest");
        publish(dir.path(), "master", "Other", "1.0.0", "other");
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();

        let index = RepoIndex::new(dir.path());
        let sets = index.search_by_name("kiwi").unwrap();

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].entries.len(), 3);
        let best = sets[0].best().unwrap();
        assert_eq!(best.source, "private");
        assert_eq!(std::fs::read_to_string(&best.path).unwrap(), "newest");
    }

    #[test]
    fn test_repo_index_without_specs_dir() {
        let dir = tempdir().unwrap();
        let version_dir = dir.path().join("flat").join("Foo").join("0.1.0");
        std::fs::create_dir_all(&version_dir).unwrap();
        std::fs::write(version_dir.join("Foo.podspec"), "flat").unwrap();

        let sets = RepoIndex::new(dir.path()).search_by_name("Foo").unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].entries[0].source, "flat");
    }

    #[test]
    fn test_missing_repos_dir_is_empty() {
        let dir = tempdir().unwrap();
        let sets = RepoIndex::new(dir.path().join("nope")).search_by_name("Foo").unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn test_find_unique_set() {
        let dir = tempdir().unwrap();
        publish(dir.path(), "master", "AFNetworking", "2.0.0", "af");
        publish(dir.path(), "master", "AFOAuth2Client", "1.0.0", "oauth");
        publish(dir.path(), "master", "AFNetworking-RACExtensions", "0.1.0", "rac");
        let index = RepoIndex::new(dir.path());

        let set = find_unique_set(&index, "oauth2").unwrap();
        assert_eq!(set.name, "AFOAuth2Client");

        // Exact name wins among several matches
        let set = find_unique_set(&index, "afnetworking").unwrap();
        assert_eq!(set.name, "AFNetworking");

        match find_unique_set(&index, "AF").unwrap_err() {
            SpecError::AmbiguousMatch { candidates, .. } => assert_eq!(candidates.len(), 3),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            find_unique_set(&index, "Nothing").unwrap_err(),
            SpecError::NoMatch(_)
        ));
    }
}
