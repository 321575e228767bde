//! Linting a set of spec files and aggregating the verdicts

use podkit_core::format::counted;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::SpecError;
use crate::targets::LintTarget;
use crate::validate::{LintOptions, Validator};

/// Outcome for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    pub target: LintTarget,
    pub passed: bool,
    pub diagnostics: String,
    /// Generated project kept for inspection (only without clean)
    pub inspection_path: Option<PathBuf>,
}

/// Counts over a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintSummary {
    pub total: usize,
    pub failed: usize,
}

impl LintSummary {
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

/// Every result of a run plus its summary
#[derive(Debug, Clone)]
pub struct LintReport {
    pub results: Vec<LintResult>,
    pub summary: LintSummary,
}

impl LintReport {
    /// `Analyzed N podspecs.`
    pub fn analyzed_message(&self) -> String {
        format!("Analyzed {}.", counted(self.summary.total, "podspec"))
    }

    /// Message shown when every target passed
    pub fn success_message(&self) -> String {
        match self.results.as_slice() {
            [only] => format!("{} passed validation.", only.target.file_name()),
            _ => "All the specs passed validation.".to_string(),
        }
    }

    /// Message carried by `LintFailures`
    pub fn failure_message(&self) -> String {
        match self.results.as_slice() {
            [only] => format!("The spec {} did not pass validation.", only.target.file_name()),
            _ => format!(
                "{} out of {} failed validation.",
                self.summary.failed,
                counted(self.summary.total, "spec")
            ),
        }
    }

    /// Overall disposition of the run
    pub fn outcome(&self) -> Result<(), SpecError> {
        if self.summary.passed() {
            Ok(())
        } else {
            Err(SpecError::LintFailures {
                failed: self.summary.failed,
                total: self.summary.total,
                message: self.failure_message(),
            })
        }
    }
}

/// Receives per-target progress in processing order
pub trait LintReporter {
    fn target_started(&mut self, _target: &LintTarget) {}
    fn target_finished(&mut self, _result: &LintResult) {}
}

/// Reporter that prints nothing
pub struct SilentReporter;

impl LintReporter for SilentReporter {}

/// Validates targets one after another and aggregates the verdicts
pub struct LintOrchestrator<'a> {
    validator: &'a dyn Validator,
    scratch_dir: PathBuf,
}

impl<'a> LintOrchestrator<'a> {
    pub fn new(validator: &'a dyn Validator, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            validator,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Validate every target. Individual failures end up in the report,
    /// never as an error.
    pub async fn run(
        &self,
        targets: &[LintTarget],
        options: &LintOptions,
        reporter: &mut dyn LintReporter,
    ) -> LintReport {
        let mut results = Vec::with_capacity(targets.len());

        for target in targets {
            reporter.target_started(target);

            let report = self.validator.validate(target, options).await;
            debug!(
                "{}: {}",
                target.file_name(),
                if report.passed { "passed" } else { "failed" }
            );

            let result = LintResult {
                target: target.clone(),
                passed: report.passed,
                inspection_path: (!options.clean).then(|| report.inspection_path()),
                diagnostics: report.diagnostics,
            };
            reporter.target_finished(&result);
            results.push(result);
        }

        if options.clean {
            self.remove_scratch_dir();
        }

        let summary = LintSummary {
            total: results.len(),
            failed: results.iter().filter(|r| !r.passed).count(),
        };
        info!("lint finished: {} of {} failed", summary.failed, summary.total);

        LintReport { results, summary }
    }

    fn remove_scratch_dir(&self) {
        if !self.scratch_dir.exists() {
            return;
        }
        match std::fs::remove_dir_all(&self.scratch_dir) {
            Ok(()) => debug!("removed {}", self.scratch_dir.display()),
            Err(e) => warn!("could not remove {}: {}", self.scratch_dir.display(), e),
        }
    }
}
