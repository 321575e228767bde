//! Repository metadata from the GitHub REST API

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, SpecError};
use crate::http::HttpClient;
use crate::version::{Branch, Tag, DEFAULT_BRANCH};

/// Items requested per page for list endpoints
const PER_PAGE: usize = 100;

/// Upper bound on pages fetched for a single list
const MAX_PAGES: usize = 10;

/// Everything `create` needs to know about a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    pub name: String,
    pub description: String,
    /// Project homepage, or the repository page when none is set
    pub homepage_url: String,
    pub clone_url: String,
    pub default_branch: Option<String>,
    pub owner_display_name: String,
    pub owner_email: Option<String>,
    /// SPDX identifier when the host detected a license
    pub license: Option<String>,
    pub tags: Vec<Tag>,
    /// Default branch tip, fetched only when no tag carries a version
    pub branches: Vec<Branch>,
}

/// Source of repository metadata
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Fetch metadata for `OWNER/REPO`
    async fn fetch_repository(&self, repo_id: &str) -> Result<RepositoryMetadata>;
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    html_url: String,
    clone_url: String,
    #[serde(default)]
    default_branch: Option<String>,
    owner: OwnerResponse,
    #[serde(default)]
    license: Option<LicenseResponse>,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    #[serde(default)]
    spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BranchResponse {
    name: String,
    commit: CommitResponse,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// GitHub REST API client
pub struct GitHubClient {
    http: HttpClient,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: HttpClient, api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        self.http.get_json(&url, self.token.as_deref()).await
    }

    async fn get_paged<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch: Vec<T> = self
                .get_json(&format!("{}?per_page={}&page={}", path, PER_PAGE, page))
                .await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                return Ok(items);
            }
        }
        warn!("{} has more than {} entries, truncating", path, MAX_PAGES * PER_PAGE);
        Ok(items)
    }

    /// Tip of a single branch, `None` when it does not exist
    async fn branch(&self, repo_id: &str, name: &str) -> Result<Option<Branch>> {
        let path = format!("/repos/{}/branches/{}", repo_id, name);
        match self.get_json::<BranchResponse>(&path).await {
            Ok(b) => Ok(Some(Branch::new(b.name, b.commit.sha))),
            Err(SpecError::Remote { status: 404, .. }) => {
                debug!("{} has no branch {}", repo_id, name);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn owner(&self, login: &str) -> (String, Option<String>) {
        match self.get_json::<UserResponse>(&format!("/users/{}", login)).await {
            Ok(user) => {
                let name = user
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(user.login);
                (name, user.email.filter(|e| !e.trim().is_empty()))
            }
            Err(e) => {
                warn!("could not look up owner {}: {}", login, e);
                (login.to_string(), None)
            }
        }
    }
}

#[async_trait]
impl MetadataClient for GitHubClient {
    async fn fetch_repository(&self, repo_id: &str) -> Result<RepositoryMetadata> {
        debug!("fetching repository {}", repo_id);
        let repo: RepoResponse = match self.get_json(&format!("/repos/{}", repo_id)).await {
            Err(SpecError::Remote { status: 404, .. }) => {
                return Err(SpecError::RepositoryNotFound(repo_id.to_string()))
            }
            other => other?,
        };

        let (owner_display_name, owner_email) = self.owner(&repo.owner.login).await;

        let tags: Vec<Tag> = self
            .get_paged::<TagResponse>(&format!("/repos/{}/tags", repo_id))
            .await?
            .into_iter()
            .map(|t| Tag::new(t.name))
            .collect();
        debug!("{}: {} tags", repo_id, tags.len());

        // Only untagged repositories fall back to a branch commit
        let branches = if tags.iter().any(|t| t.version.is_some()) {
            Vec::new()
        } else {
            let name = repo
                .default_branch
                .as_deref()
                .filter(|b| !b.is_empty())
                .unwrap_or(DEFAULT_BRANCH);
            self.branch(repo_id, name).await?.into_iter().collect()
        };

        let homepage_url = repo
            .homepage
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(repo.html_url);
        let license = repo
            .license
            .and_then(|l| l.spdx_id)
            .filter(|id| !id.is_empty() && id != "NOASSERTION");

        Ok(RepositoryMetadata {
            name: repo.name,
            description: repo.description.unwrap_or_default(),
            homepage_url,
            clone_url: repo.clone_url,
            default_branch: repo.default_branch,
            owner_display_name,
            owner_email,
            license,
            tags,
            branches,
        })
    }
}
