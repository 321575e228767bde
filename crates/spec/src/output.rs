//! Terminal output for the spec commands

use colored::*;
use std::path::Path;

use crate::create::SemverNotice;
use crate::lint::{LintReport, LintReporter, LintResult};
use crate::targets::{LintTarget, TargetOrigin};

/// Maximum diagnostic lines shown for a failing spec
const MAX_DIAGNOSTIC_LINES: usize = 20;

/// Prints lint progress as each target finishes
pub struct ConsoleReporter;

impl LintReporter for ConsoleReporter {
    fn target_started(&mut self, target: &LintTarget) {
        match &target.origin {
            TargetOrigin::Downloaded { url } => println!(
                "{} {} {}",
                "->".dimmed(),
                target.file_name(),
                format!("({})", url).dimmed()
            ),
            _ => println!("{} {}", "->".dimmed(), target.path.display()),
        }
    }

    fn target_finished(&mut self, result: &LintResult) {
        if result.passed {
            println!("   {} {}", "OK".green(), result.target.file_name());
        } else {
            println!("   {} {}", "FAIL".red(), result.target.file_name());
            print_diagnostics(&result.diagnostics);
        }

        if let Some(path) = &result.inspection_path {
            println!(
                "   {}",
                format!("Pods project available at `{}` for inspection.", path.display()).dimmed()
            );
        }
        println!();
    }
}

fn print_diagnostics(diagnostics: &str) {
    let total = diagnostics.lines().count();
    for line in diagnostics.lines().take(MAX_DIAGNOSTIC_LINES) {
        println!("     {}", line.dimmed());
    }
    if total > MAX_DIAGNOSTIC_LINES {
        println!(
            "     {}",
            format!("... and {} more lines", total - MAX_DIAGNOSTIC_LINES).dimmed()
        );
    }
}

/// Print the run summary (the failure message goes out with the error)
pub fn print_lint_summary(report: &LintReport) {
    println!("{}", report.analyzed_message().bold());
    println!();
    if report.summary.passed() {
        println!("{}", report.success_message().green());
        println!();
    }
}

/// Report a newly written spec
pub fn print_created(path: &Path) {
    println!("{} {}", "Created:".green(), path.display());
    println!(
        "{}",
        format!(
            "Run `spec lint {}` once the placeholders are filled in",
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        )
        .dimmed()
    );
}

/// Print the missing-version-tags reminder
pub fn print_semver_notice(notice: &SemverNotice) {
    println!();
    println!("{}", notice.text);
    println!();
    println!(
        "{}",
        "[!] This repository does not appear to have semantic version tags.".yellow()
    );
    println!("After committing the spec, consider opening an issue with the template above:");
    println!("  - link:  {}", notice.issue_url);
    println!("  - title: {}", notice.issue_title);
}
