// SPDX-License-Identifier: MIT
//
// Shell hand-off for a submitted prompt line.
//
// Runs after the terminal has been restored: the command gets the real
// cooked-mode terminal, inherits stdio, and its exit status becomes ours.

use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

/// Run `command` with `shell -c` and return the exit code to propagate.
///
/// # Errors
///
/// Fails if the shell can't be spawned.
pub fn run(shell: &str, command: &str) -> Result<i32> {
    tracing::info!(shell, command, "handing off to shell");
    let status = Command::new(shell)
        .arg("-c")
        .arg(command)
        .status()
        .with_context(|| format!("failed to run {shell}"))?;
    Ok(exit_code(status))
}

/// Exit code for a finished child: its own code, or `128 + signal` when a
/// signal ended it.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}
