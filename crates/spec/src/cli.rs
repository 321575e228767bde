//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::SpecConfig;
use crate::create::{GitIdentity, SpecCreateOrchestrator};
use crate::error::SpecError;
use crate::github::GitHubClient;
use crate::http::HttpClient;
use crate::index::{find_unique_set, RepoIndex};
use crate::lint::LintOrchestrator;
use crate::output::{print_created, print_lint_summary, print_semver_notice, ConsoleReporter};
use crate::spec::{spec_file_name, SpecData};
use crate::targets::TargetSetExpander;
use crate::template::render_spec;
use crate::validate::{CommandValidator, LintOptions};

/// spec - Create, lint and inspect podspec files
#[derive(Parser)]
#[command(name = "spec")]
#[command(version)]
#[command(about = "Create, lint and inspect podspec files")]
#[command(after_help = "\
EXAMPLES:
    spec create Kiwi                                   Stub Kiwi.podspec with placeholders
    spec create https://github.com/kiwi-bdd/Kiwi       Prefill from the GitHub repository
    spec create KiwiKit https://github.com/kiwi-bdd/Kiwi
                                                       Prefill, but name the spec KiwiKit
    spec lint                                          Lint every podspec below .
    spec lint Kiwi.podspec https://example.com/Foo.podspec
    spec lint --quick --only-errors                    Skip build checks, ignore warnings
    spec cat Kiwi                                      Print the newest Kiwi spec

CONFIG:
    ~/.config/podkit/spec.yaml   validator command, timeouts, scratch and repo dirs
    GITHUB_TOKEN                 GitHub API token (raises the rate limit)")]
pub struct Cli {
    /// Config file (default: ~/.config/podkit/spec.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a spec stub
    #[command(about = "Create a spec stub, optionally from a GitHub repository")]
    Create {
        /// Spec name or repository URL
        name_or_url: Option<String>,

        /// Repository URL when a name is given first
        url: Option<String>,
    },

    /// Lint specs
    #[command(about = "Validate spec files, directories or URLs")]
    Lint {
        /// Spec files, directories or URLs (default: current directory)
        targets: Vec<String>,

        /// Skip checks that need to build the spec
        #[arg(long)]
        quick: bool,

        /// Use the local copy of the sources
        #[arg(long)]
        local: bool,

        /// Let warnings pass, fail on errors only
        #[arg(long)]
        only_errors: bool,

        /// Keep downloaded specs and validation projects for inspection
        #[arg(long)]
        no_clean: bool,
    },

    /// Print a spec
    #[command(about = "Print the newest known version of a spec")]
    Cat {
        /// Spec name
        name: Option<String>,
    },
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SpecConfig::load_from(path)?,
        None => SpecConfig::load()?,
    };
    debug!("config: {:?}", config);

    match cli.command {
        Commands::Create { name_or_url, url } => {
            cmd_create(&config, name_or_url.as_deref(), url.as_deref()).await
        }
        Commands::Lint {
            targets,
            quick,
            local,
            only_errors,
            no_clean,
        } => {
            let options = LintOptions {
                quick,
                local,
                only_errors,
                clean: !no_clean,
            };
            cmd_lint(&config, &targets, options).await
        }
        Commands::Cat { name } => cmd_cat(&config, name.as_deref()),
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, SpecError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SpecError::Usage(message.to_string()))
}

/// Create a new spec in the current directory
pub async fn cmd_create(
    config: &SpecConfig,
    name_or_url: Option<&str>,
    url: Option<&str>,
) -> Result<()> {
    let name_or_url = required(name_or_url, "A pod name or repository URL is required.")?;

    let http = HttpClient::new(config.http())?;
    let client = GitHubClient::new(
        http,
        config.network.api_base.clone(),
        config.network.token.clone(),
    );
    let orchestrator = SpecCreateOrchestrator::new(&client, &GitIdentity);
    let plan = orchestrator.create(name_or_url, url).await?;

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let path = write_spec(&cwd, &plan.data)?;

    print_created(&path);
    if let Some(notice) = &plan.notice {
        print_semver_notice(notice);
    }

    Ok(())
}

/// Render `data` to `<dir>/<name>.podspec`, refusing to overwrite
pub fn write_spec(dir: &Path, data: &SpecData) -> Result<PathBuf> {
    let path = dir.join(spec_file_name(&data.name));
    if path.exists() {
        return Err(SpecError::SpecExists(path).into());
    }

    std::fs::write(&path, render_spec(data))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Lint every resolved target
pub async fn cmd_lint(config: &SpecConfig, inputs: &[String], options: LintOptions) -> Result<()> {
    let http = HttpClient::new(config.http())?;
    let scratch_dir = config.scratch_dir();

    let expander = TargetSetExpander::new(&scratch_dir, &http);
    let targets = expander.expand(inputs).await?;

    let validator = CommandValidator::new(
        config.validator.program.clone(),
        config.validator.args.clone(),
        config.validation_root(),
        config.validator_timeout(),
    );
    let orchestrator = LintOrchestrator::new(&validator, &scratch_dir);

    println!();
    let report = orchestrator.run(&targets, &options, &mut ConsoleReporter).await;
    print_lint_summary(&report);

    report.outcome()?;
    Ok(())
}

/// Print the raw contents of the newest version of a spec
pub fn cmd_cat(config: &SpecConfig, name: Option<&str>) -> Result<()> {
    let name = required(name, "A spec name is required.")?;

    let index = RepoIndex::new(config.repos_dir());
    let set = find_unique_set(&index, name)?;
    let best = set.best().ok_or_else(|| SpecError::NoMatch(name.to_string()))?;
    debug!("{} {} from {}", set.name, best.version, best.source);

    let content = std::fs::read_to_string(&best.path)
        .with_context(|| format!("Failed to read spec file: {}", best.path.display()))?;
    print!("{}", content);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::RefKind;
    use tempfile::tempdir;

    fn data(name: &str) -> SpecData {
        SpecData {
            name: name.to_string(),
            version: "0.0.1".to_string(),
            summary: format!("A short description of {}.", name),
            homepage: format!("http://EXAMPLE/{}", name),
            license: None,
            author_name: String::new(),
            author_email: String::new(),
            source_url: format!("http://EXAMPLE/{}.git", name),
            ref_kind: RefKind::Tag,
            ref_value: "0.0.1".to_string(),
        }
    }

    #[test]
    fn test_cli_parses_lint_flags() {
        let cli = Cli::try_parse_from([
            "spec",
            "lint",
            "A.podspec",
            "dir",
            "--quick",
            "--no-clean",
        ])
        .unwrap();
        match cli.command {
            Commands::Lint {
                targets,
                quick,
                local,
                only_errors,
                no_clean,
            } => {
                assert_eq!(targets, vec!["A.podspec", "dir"]);
                assert!(quick && no_clean);
                assert!(!local && !only_errors);
            }
            _ => panic!("expected lint"),
        }
    }

    #[test]
    fn test_cli_parses_create_with_name_and_url() {
        let cli =
            Cli::try_parse_from(["spec", "create", "Kit", "https://github.com/octo/Cat"]).unwrap();
        match cli.command {
            Commands::Create { name_or_url, url } => {
                assert_eq!(name_or_url.as_deref(), Some("Kit"));
                assert_eq!(url.as_deref(), Some("https://github.com/octo/Cat"));
            }
            _ => panic!("expected create"),
        }
    }

    #[tokio::test]
    async fn test_create_without_argument_is_usage_error() {
        let err = cmd_create(&SpecConfig::default(), None, None).await.unwrap_err();
        let spec_err = err.downcast_ref::<SpecError>().unwrap();
        assert!(matches!(spec_err, SpecError::Usage(_)));
        assert_eq!(spec_err.exit_code(), 2);
    }

    #[test]
    fn test_cat_without_argument_is_usage_error() {
        let err = cmd_cat(&SpecConfig::default(), Some("  ")).unwrap_err();
        assert!(matches!(err.downcast_ref::<SpecError>(), Some(SpecError::Usage(_))));
    }

    #[test]
    fn test_write_spec_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = write_spec(dir.path(), &data("Kiwi")).unwrap();
        assert_eq!(path, dir.path().join("Kiwi.podspec"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"Kiwi\""));

        let err = write_spec(dir.path(), &data("Kiwi")).unwrap_err();
        assert!(matches!(err.downcast_ref::<SpecError>(), Some(SpecError::SpecExists(_))));
    }

    #[tokio::test]
    async fn test_lint_reports_failures_through_error() {
        let dir = tempdir().unwrap();
        let spec = dir.path().join("Broken.podspec");
        std::fs::write(&spec, "Pod::Spec.new").unwrap();

        let mut config = SpecConfig::default();
        config.scratch_dir = Some(dir.path().join("scratch"));
        config.validator.program = "podkit-no-such-validator".to_string();
        config.validator.validation_root = Some(dir.path().join("validation"));

        let err = cmd_lint(&config, &[spec.to_string_lossy().to_string()], LintOptions::default())
            .await
            .unwrap_err();
        match err.downcast_ref::<SpecError>() {
            Some(SpecError::LintFailures { failed, total, message }) => {
                assert_eq!((*failed, *total), (1, 1));
                assert_eq!(message, "The spec Broken.podspec did not pass validation.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_cat_prints_newest() {
        let dir = tempdir().unwrap();
        let version_dir = dir.path().join("master/Specs/Kiwi/2.0.0");
        std::fs::create_dir_all(&version_dir).unwrap();
        std::fs::write(version_dir.join("Kiwi.podspec"), "kiwi").unwrap();

        let mut config = SpecConfig::default();
        config.index.repos_dir = Some(dir.path().to_path_buf());

        assert!(cmd_cat(&config, Some("Kiwi")).is_ok());
        let err = cmd_cat(&config, Some("Nope")).unwrap_err();
        assert!(matches!(err.downcast_ref::<SpecError>(), Some(SpecError::NoMatch(_))));
    }
}
