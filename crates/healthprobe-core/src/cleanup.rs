//! Deferred reversal of provisioning actions.

use crate::command::{run_command, CommandResult};
use crate::error::Result;

/// A pre-built reversal command returned by a provisioning call.
///
/// The forward action (install, apply) has already run by the time a
/// `CleanupAction` exists; invoking [`run`](Self::run) executes the
/// inverse. Nothing tracks invocation: the convention is at most once,
/// and the caller owns the ordering across multiple actions.
#[derive(Debug, Clone)]
pub struct CleanupAction {
    command: String,
}

impl CleanupAction {
    pub(crate) fn new(command: String) -> Self {
        Self { command }
    }

    /// The shell command this action will run.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Execute the reversal command. A non-zero exit is recorded in the
    /// result, not surfaced as an error.
    pub fn run(&self) -> Result<CommandResult> {
        run_command(&self.command, false)
    }
}
