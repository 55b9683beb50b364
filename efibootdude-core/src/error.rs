// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootError`], which encapsulates other errors

use thiserror::Error;

/// An `Error` resulting from the program.
#[derive(Error, Debug)]
pub enum BootError {
    /// The boot configuration could not be read or parsed.
    #[error("Repository Load Error: {0}")]
    Load(#[from] crate::repository::LoadError),

    /// An edit to the draft was rejected.
    #[error("Edit Error: {0}")]
    Edit(#[from] crate::draft::EditError),

    /// The boot configuration could not be reloaded after a commit.
    #[error("Reconciliation Error: {0}")]
    Reconcile(#[from] crate::exec::ReconcileError),

    /// An edit was attempted while the in-memory model is out of sync with the firmware.
    #[error("State may be inconsistent after a failed reload, abandon to retry or restart")]
    Inconsistent,
}
