//! Deciding what goes into a new spec
//!
//! A GitHub repository URL pulls name, summary, homepage, author and source
//! ref from the repository. Anything else gets local placeholders with the
//! author taken from git config.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::github::{MetadataClient, RepositoryMetadata};
use crate::spec::SpecData;
use crate::template::{new_issue_url, semantic_versioning_notice, NOTICE_ISSUE_TITLE};
use crate::version::{self, RefKind, RefSuggestion, FALLBACK_VERSION};

/// Email used when the repository owner has none public
const PLACEHOLDER_EMAIL: &str = "email@address.com";

/// Who is writing the spec
pub trait AuthorIdentity: Send + Sync {
    fn name(&self) -> String;
    fn email(&self) -> String;
}

/// Author identity from `git config user.name` / `user.email`
pub struct GitIdentity;

impl AuthorIdentity for GitIdentity {
    fn name(&self) -> String {
        podkit_core::process::git_config("user.name")
    }

    fn email(&self) -> String {
        podkit_core::process::git_config("user.email")
    }
}

/// Reminder to show when a repository has no version tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemverNotice {
    pub repo_id: String,
    pub text: String,
    pub issue_title: String,
    pub issue_url: String,
}

/// Result of deciding a new spec's contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub data: SpecData,
    pub notice: Option<SemverNotice>,
}

fn github_repo() -> &'static Regex {
    static REPO: OnceLock<Regex> = OnceLock::new();
    REPO.get_or_init(|| Regex::new(r"github\.com[/:]([^/]+)/([^/?#]+)").expect("static regex"))
}

/// `OWNER/REPO` for a GitHub repository URL
pub fn repository_id(input: &str) -> Option<String> {
    let captures = github_repo().captures(input)?;
    let owner = captures.get(1)?.as_str();
    let repo = captures.get(2)?.as_str().trim_end_matches(['.', '/']);
    let repo = repo.strip_suffix(".git").unwrap_or(repo).trim_end_matches('.');

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, repo))
}

/// Placeholder data for a spec without a known repository
pub fn local_default(name: &str, identity: &dyn AuthorIdentity) -> SpecData {
    SpecData {
        name: name.to_string(),
        version: FALLBACK_VERSION.to_string(),
        summary: format!("A short description of {}.", name),
        homepage: format!("http://EXAMPLE/{}", name),
        license: None,
        author_name: identity.name(),
        author_email: identity.email(),
        source_url: format!("http://EXAMPLE/{}.git", name),
        ref_kind: RefKind::Tag,
        ref_value: FALLBACK_VERSION.to_string(),
    }
}

/// Spec data derived from repository metadata
pub fn remote_data(
    repo: &RepositoryMetadata,
    suggestion: &RefSuggestion,
    name_override: Option<&str>,
) -> SpecData {
    SpecData {
        name: name_override.unwrap_or(&repo.name).to_string(),
        version: suggestion.version.to_string(),
        summary: repo.description.clone(),
        homepage: repo.homepage_url.clone(),
        license: repo.license.clone(),
        author_name: repo.owner_display_name.clone(),
        author_email: repo
            .owner_email
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string()),
        source_url: repo.clone_url.clone(),
        ref_kind: suggestion.ref_kind,
        ref_value: suggestion.ref_value.clone(),
    }
}

/// Decides between repository-backed and placeholder spec data
pub struct SpecCreateOrchestrator<'a> {
    client: &'a dyn MetadataClient,
    identity: &'a dyn AuthorIdentity,
}

impl<'a> SpecCreateOrchestrator<'a> {
    pub fn new(client: &'a dyn MetadataClient, identity: &'a dyn AuthorIdentity) -> Self {
        Self { client, identity }
    }

    /// Plan a new spec from a name, a repository URL, or a name plus URL
    pub async fn create(&self, name_or_url: &str, url: Option<&str>) -> Result<CreatePlan> {
        let identifier = url.unwrap_or(name_or_url);

        let Some(repo_id) = repository_id(identifier) else {
            debug!("{} is not a repository URL, using placeholders", identifier);
            return Ok(CreatePlan {
                data: local_default(name_or_url, self.identity),
                notice: None,
            });
        };

        info!("creating spec from repository {}", repo_id);
        let repo = self.client.fetch_repository(&repo_id).await?;
        let suggestion =
            version::resolve(&repo.tags, &repo.branches, repo.default_branch.as_deref())?;

        let name_override = url.map(|_| name_or_url);
        let data = remote_data(&repo, &suggestion, name_override);

        let notice = suggestion.is_fallback().then(|| SemverNotice {
            text: semantic_versioning_notice(&repo_id, &data.name),
            issue_title: NOTICE_ISSUE_TITLE.to_string(),
            issue_url: new_issue_url(&repo_id),
            repo_id: repo_id.clone(),
        });

        Ok(CreatePlan { data, notice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpecError;
    use crate::version::{Branch, Tag};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedIdentity;

    impl AuthorIdentity for FixedIdentity {
        fn name(&self) -> String {
            "Jane Doe".to_string()
        }

        fn email(&self) -> String {
            "jane@example.com".to_string()
        }
    }

    struct FakeClient {
        repo: Option<RepositoryMetadata>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn with(repo: RepositoryMetadata) -> Self {
            Self {
                repo: Some(repo),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self {
                repo: None,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MetadataClient for FakeClient {
        async fn fetch_repository(&self, repo_id: &str) -> Result<RepositoryMetadata> {
            self.requested.lock().unwrap().push(repo_id.to_string());
            self.repo
                .clone()
                .ok_or_else(|| SpecError::RepositoryNotFound(repo_id.to_string()))
        }
    }

    fn repo(tags: &[&str]) -> RepositoryMetadata {
        RepositoryMetadata {
            name: "Cat".to_string(),
            description: "Purrs".to_string(),
            homepage_url: "https://github.com/octo/Cat".to_string(),
            clone_url: "https://github.com/octo/Cat.git".to_string(),
            default_branch: Some("main".to_string()),
            owner_display_name: "Octo".to_string(),
            owner_email: None,
            license: Some("MIT".to_string()),
            tags: tags.iter().map(|t| Tag::new(*t)).collect(),
            branches: vec![Branch::new("main", "deadbeef")],
        }
    }

    #[test]
    fn test_repository_id() {
        let cases = [
            ("https://github.com/octo/Cat", Some("octo/Cat")),
            ("https://github.com/octo/Cat/", Some("octo/Cat")),
            ("https://github.com/octo/Cat.git", Some("octo/Cat")),
            ("http://github.com/octo/Cat...", Some("octo/Cat")),
            ("git@github.com:octo/Cat.git", Some("octo/Cat")),
            ("https://github.com/octo/socket.io", Some("octo/socket.io")),
            ("https://github.com/octo", None),
            ("https://gitlab.com/octo/Cat", None),
            ("Cat", None),
        ];
        for (input, expected) in cases {
            assert_eq!(repository_id(input).as_deref(), expected, "{}", input);
        }
    }

    #[tokio::test]
    async fn test_plain_name_uses_local_defaults() {
        let client = FakeClient::empty();
        let orchestrator = SpecCreateOrchestrator::new(&client, &FixedIdentity);

        let plan = orchestrator.create("Kiwi", None).await.unwrap();

        assert_eq!(plan.data, local_default("Kiwi", &FixedIdentity));
        assert_eq!(plan.data.version, "0.0.1");
        assert_eq!(plan.data.ref_kind, RefKind::Tag);
        assert_eq!(plan.data.ref_value, "0.0.1");
        assert_eq!(plan.data.author_name, "Jane Doe");
        assert_eq!(plan.data.source_url, "http://EXAMPLE/Kiwi.git");
        assert!(plan.notice.is_none());
        assert!(client.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repository_url_uses_remote_data() {
        let client = FakeClient::with(repo(&["v1.0.0", "v2.0.0", "1.5.0-beta"]));
        let orchestrator = SpecCreateOrchestrator::new(&client, &FixedIdentity);

        let plan = orchestrator
            .create("https://github.com/octo/Cat", None)
            .await
            .unwrap();

        assert_eq!(*client.requested.lock().unwrap(), vec!["octo/Cat".to_string()]);
        assert_eq!(plan.data.name, "Cat");
        assert_eq!(plan.data.version, "2.0.0");
        assert_eq!(plan.data.ref_kind, RefKind::Tag);
        assert_eq!(plan.data.ref_value, "v2.0.0");
        assert_eq!(plan.data.author_name, "Octo");
        assert_eq!(plan.data.author_email, PLACEHOLDER_EMAIL);
        assert_eq!(plan.data.license.as_deref(), Some("MIT"));
        assert!(plan.notice.is_none());
    }

    #[tokio::test]
    async fn test_explicit_url_keeps_given_name() {
        let client = FakeClient::with(repo(&["1.0.0"]));
        let orchestrator = SpecCreateOrchestrator::new(&client, &FixedIdentity);

        let plan = orchestrator
            .create("CatKit", Some("https://github.com/octo/Cat.git"))
            .await
            .unwrap();

        assert_eq!(plan.data.name, "CatKit");
        assert_eq!(plan.data.source_url, "https://github.com/octo/Cat.git");
    }

    #[tokio::test]
    async fn test_untagged_repository_gets_notice() {
        let client = FakeClient::with(repo(&["release-candidate"]));
        let orchestrator = SpecCreateOrchestrator::new(&client, &FixedIdentity);

        let plan = orchestrator
            .create("https://github.com/octo/Cat", None)
            .await
            .unwrap();

        assert_eq!(plan.data.version, "0.0.1");
        assert_eq!(plan.data.ref_kind, RefKind::Commit);
        assert_eq!(plan.data.ref_value, "deadbeef");

        let notice = plan.notice.unwrap();
        assert_eq!(notice.repo_id, "octo/Cat");
        assert_eq!(notice.issue_url, "https://github.com/octo/Cat/issues/new");
        assert_eq!(notice.issue_title, NOTICE_ISSUE_TITLE);
    }

    #[tokio::test]
    async fn test_missing_default_branch_fails() {
        let mut metadata = repo(&[]);
        metadata.default_branch = None;
        let client = FakeClient::with(metadata);
        let orchestrator = SpecCreateOrchestrator::new(&client, &FixedIdentity);

        let err = orchestrator
            .create("https://github.com/octo/Cat", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SpecError::NoDefaultBranch(ref b) if b == "master"));
    }

    #[tokio::test]
    async fn test_fetch_errors_propagate() {
        let client = FakeClient::empty();
        let orchestrator = SpecCreateOrchestrator::new(&client, &FixedIdentity);

        let err = orchestrator
            .create("https://github.com/octo/Gone", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SpecError::RepositoryNotFound(ref id) if id == "octo/Gone"));
    }
}
