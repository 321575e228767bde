//! Process probing utilities

use std::process::Command;
use tracing::debug;

/// Run a command and return its trimmed stdout when it succeeds
pub fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(e) => {
            debug!("failed to run {}: {}", program, e);
            return None;
        }
    };

    if !output.status.success() {
        debug!("{} {:?} exited with {}", program, args, output.status);
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Read a git config value (e.g. `user.name`), empty when unset
pub fn git_config(key: &str) -> String {
    capture("git", &["config", "--get", key]).unwrap_or_default()
}
