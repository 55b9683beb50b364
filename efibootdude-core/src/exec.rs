// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Runs planned invocations and reloads the boot configuration afterwards.
//!
//! The invocations run one after another. A failed invocation does not stop the ones after it, since
//! `efibootmgr` has no way to roll anything back. Whatever happened, the boot configuration is loaded again
//! at the end, so that what is shown is what the firmware actually has.

use log::{info, warn};
use thiserror::Error;

use crate::{
    plan::{OperationKind, PlannedCommand},
    repository::{LoadError, Repository, types::BootNum},
    system::runner::BootManager,
};

/// An `Error` from reloading the boot configuration after writing to it.
///
/// After this, what is shown may not match what the firmware has. The results of the commands that were run
/// are kept so they can still be shown.
#[derive(Error, Debug)]
#[error("Could not reload boot configuration after writing it, state may be inconsistent: {source}")]
pub struct ReconcileError {
    /// Why the reload failed.
    pub source: LoadError,

    /// One result per planned command, in the same order.
    pub results: Vec<InvocationResult>,
}

/// The outcome of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationResult {
    /// The command that was run.
    pub command: PlannedCommand,

    /// The full command line, for display.
    pub command_line: String,

    /// The exit code, or [`None`] if the command could not be started or was killed.
    pub status: Option<i32>,

    /// Everything the command printed to standard output.
    pub stdout: String,

    /// Everything the command printed to standard error, or why it could not be started.
    pub stderr: String,
}

impl InvocationResult {
    /// Returns the kind of the command that was run.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn kind(&self) -> OperationKind {
        self.command.kind()
    }

    /// Returns the entry the command was about, if any.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn target(&self) -> Option<BootNum> {
        self.command.target()
    }

    /// Checks if the command exited with status 0.
    #[must_use = "Has no effect if the result is unused"]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Everything that came out of running a plan.
#[derive(Clone, Debug)]
pub struct Execution {
    /// One result per planned command, in the same order.
    pub results: Vec<InvocationResult>,

    /// The boot configuration as it was after the last command.
    pub repository: Repository,
}

/// Runs every command in order, then reloads the boot configuration.
///
/// # Errors
///
/// May return an `Error` only if the reload fails. Failed commands are reported in their
/// [`InvocationResult`]s, which are in the `Error` too if the reload fails.
pub fn execute<M: BootManager + ?Sized>(
    manager: &mut M,
    commands: &[PlannedCommand],
) -> Result<Execution, ReconcileError> {
    let results: Vec<_> = commands
        .iter()
        .map(|command| run(manager, command))
        .collect();

    match Repository::load(manager) {
        Ok(repository) => Ok(Execution {
            results,
            repository,
        }),
        Err(source) => Err(ReconcileError { source, results }),
    }
}

/// Runs one command, turning every outcome into an [`InvocationResult`].
fn run<M: BootManager + ?Sized>(manager: &mut M, command: &PlannedCommand) -> InvocationResult {
    let args = command.args();
    let command_line = manager.command_line(&args);
    info!("{command}: {command_line}");

    let result = match manager.invoke(&args) {
        Ok(output) => InvocationResult {
            command: command.clone(),
            command_line,
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        },
        Err(e) => InvocationResult {
            command: command.clone(),
            command_line,
            status: None,
            stdout: String::new(),
            stderr: e.to_string(),
        },
    };

    if !result.success() {
        warn!(
            "{command} failed with status {:?}: {}",
            result.status,
            result.stderr.trim()
        );
    }
    result
}
