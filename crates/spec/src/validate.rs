//! Spec validation through an external validator command

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::spec::SPEC_EXTENSION;
use crate::targets::LintTarget;

/// Relative location of the generated project kept for inspection
pub const INSPECTION_ARTIFACT: &str = "Pods/Pods.xcodeproj";

/// Flags forwarded to the validator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Skip checks that need to build the spec
    pub quick: bool,
    /// Use the local copy of the sources instead of fetching them
    pub local: bool,
    /// Only errors fail validation, warnings are reported
    pub only_errors: bool,
    /// Remove scratch and validation directories when done
    pub clean: bool,
}

/// Verdict for a single spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub passed: bool,
    /// Validator output, opaque to the caller
    pub diagnostics: String,
    /// Working directory the validator ran in
    pub validation_dir: PathBuf,
}

impl ValidationReport {
    /// Generated project left behind for inspection
    pub fn inspection_path(&self) -> PathBuf {
        self.validation_dir.join(INSPECTION_ARTIFACT)
    }
}

/// Deep validation of a single spec file
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, target: &LintTarget, options: &LintOptions) -> ValidationReport;
}

/// Runs an external program against each spec
pub struct CommandValidator {
    program: String,
    args: Vec<String>,
    validation_root: PathBuf,
    timeout: Duration,
}

impl CommandValidator {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        validation_root: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            validation_root: validation_root.into(),
            timeout,
        }
    }

    /// Per-target working directory (`<root>/<spec stem>`)
    pub fn validation_dir(&self, target: &LintTarget) -> PathBuf {
        let stem = target
            .file_name()
            .split(SPEC_EXTENSION)
            .next()
            .unwrap_or_default()
            .to_string();
        self.validation_root.join(stem)
    }

    fn command_args(&self, spec_path: &Path, options: &LintOptions) -> Vec<String> {
        let mut args = self.args.clone();
        if options.quick {
            args.push("--quick".to_string());
        }
        if options.local {
            args.push("--local".to_string());
        }
        if options.only_errors {
            args.push("--only-errors".to_string());
        }
        if !options.clean {
            args.push("--no-clean".to_string());
        }
        args.push(spec_path.display().to_string());
        args
    }

    async fn run(&self, args: &[String], dir: &Path) -> (bool, String) {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            return (false, format!("Failed to create {}: {}", dir.display(), e));
        }

        let child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) => {
                warn!("could not start validator {}: {}", self.program, e);
                return (false, format!("Failed to run `{}`: {}", self.program, e));
            }
        };

        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                (output.status.success(), format!("{}{}", stdout, stderr))
            }
            Ok(Err(e)) => (false, e.to_string()),
            Err(_) => (false, "Timeout exceeded".to_string()),
        }
    }
}

#[async_trait]
impl Validator for CommandValidator {
    async fn validate(&self, target: &LintTarget, options: &LintOptions) -> ValidationReport {
        let validation_dir = self.validation_dir(target);
        let spec_path = std::fs::canonicalize(&target.path).unwrap_or_else(|_| target.path.clone());
        let args = self.command_args(&spec_path, options);
        debug!("validating {} with {} {:?}", target.file_name(), self.program, args);

        let (passed, diagnostics) = self.run(&args, &validation_dir).await;

        if options.clean {
            if let Err(e) = tokio::fs::remove_dir_all(&validation_dir).await {
                debug!("could not remove {}: {}", validation_dir.display(), e);
            }
        }

        ValidationReport {
            passed,
            diagnostics,
            validation_dir,
        }
    }
}
