//! Shell command execution shared by all provisioning helpers.

use std::process::Command;
use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{HealthprobeError, Result};

/// Outcome of a completed shell command: exit status, captured streams,
/// and wall-clock duration. Immutable once produced.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run `command` through `sh -c`, capturing stdout and stderr as text.
///
/// With `check` set, a non-zero exit becomes a
/// [`HealthprobeError::CommandFailed`] carrying the exit status and both
/// captured streams. Otherwise the exit status is only recorded in the
/// returned result, never surfaced as an error.
///
/// There is no timeout: a hung subprocess hangs the caller.
pub fn run_command(command: &str, check: bool) -> Result<CommandResult> {
    info!("running: {command}");
    let start = Instant::now();

    let output = Command::new("sh").arg("-c").arg(command).output()?;

    let result = CommandResult {
        // Killed-by-signal has no exit code; report it as -1.
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
    };
    info!(
        "took: {:.3}s\nout: {}, err: {}",
        result.duration.as_secs_f64(),
        result.stdout,
        result.stderr
    );

    if check && !result.success() {
        return Err(HealthprobeError::CommandFailed {
            status: result.status,
            stdout: result.stdout,
            stderr: result.stderr,
        });
    }
    Ok(result)
}
