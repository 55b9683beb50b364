// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Ties the draft, the planner and the executor together for a frontend.
//!
//! A frontend turns its input into [`Action`]s and hands them to [`Controller::dispatch`]. After each one it
//! can read back the entries to show with [`Controller::view`], and the results of the last commit with
//! [`Controller::results`].
//!
//! The controller is either [`ControllerState::Editing`], or [`ControllerState::Committing`] while a commit
//! runs. If reloading the boot configuration after a commit fails, it stays in
//! [`ControllerState::Committing`], since what it holds can no longer be trusted. Edits are refused until an
//! abandon manages to reload.

use log::{debug, info};

use crate::{
    BootResult,
    draft::Draft,
    error::BootError,
    exec::{InvocationResult, execute},
    plan::{PlannedCommand, plan},
    repository::{LoadError, Repository, device::Device, types::BootNum},
    system::runner::BootManager,
};

/// The state of a [`Controller`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    /// Edits may be made.
    #[default]
    Editing,

    /// A commit is running, or the reload after one failed.
    Committing,
}

/// Everything a frontend can ask for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Move an entry one place earlier in the boot order.
    MoveUp(BootNum),

    /// Move an entry one place later in the boot order.
    MoveDown(BootNum),

    /// Remove an entry.
    Remove(BootNum),

    /// Flip whether an entry is active.
    ToggleActive(BootNum),

    /// Change the label of an entry.
    Relabel(BootNum, String),

    /// Boot an entry the next time only.
    SetNextBoot(BootNum),

    /// Remove the next boot entry.
    ClearNextBoot,

    /// Change the boot menu timeout in seconds.
    SetTimeout(i64),

    /// Write every edit.
    Commit,

    /// Drop every edit and reload.
    Abandon,
}

/// One entry as it should be shown, with every edit applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryView {
    /// The boot number.
    pub id: BootNum,

    /// The label.
    pub label: String,

    /// The device the entry boots from.
    pub device: Device,

    /// If the entry is active.
    pub active: bool,

    /// If the entry is the next boot entry.
    pub next_boot: bool,

    /// If the system was booted from this entry.
    pub current: bool,

    /// If the entry has a pending active or label edit.
    pub modified: bool,
}

/// Drives edits and commits of a boot configuration.
pub struct Controller<M: BootManager> {
    /// What runs `efibootmgr`.
    manager: M,

    /// The snapshot and the pending edits.
    draft: Draft,

    /// The current state.
    state: ControllerState,

    /// The results of the last commit, until they are acknowledged.
    results: Vec<InvocationResult>,
}

impl<M: BootManager> Controller<M> {
    /// Creates a new [`Controller`], loading the boot configuration.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the boot configuration could not be loaded.
    pub fn new(mut manager: M) -> Result<Self, LoadError> {
        let repository = Repository::load(&mut manager)?;
        info!("Loaded {} boot entries", repository.len());
        Ok(Self {
            manager,
            draft: Draft::new(repository),
            state: ControllerState::Editing,
            results: Vec::new(),
        })
    }

    /// Carries out an [`Action`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the edit was rejected, if a reload failed, or if the controller is stuck in
    /// [`ControllerState::Committing`] and the action is not [`Action::Abandon`].
    pub fn dispatch(&mut self, action: Action) -> BootResult<()> {
        debug!("Action: {action:?}");
        match action {
            Action::Commit => return self.commit().map(|_| ()),
            Action::Abandon => return self.abandon().map_err(BootError::from),
            _ => (),
        }

        if self.state == ControllerState::Committing {
            return Err(BootError::Inconsistent);
        }

        let draft = &mut self.draft;
        match action {
            Action::MoveUp(id) => draft.move_up(id)?,
            Action::MoveDown(id) => draft.move_down(id)?,
            Action::Remove(id) => draft.remove(id)?,
            Action::ToggleActive(id) => draft.toggle_active(id)?,
            Action::Relabel(id, label) => draft.relabel(id, &label)?,
            Action::SetNextBoot(id) => draft.set_next_boot(id)?,
            Action::ClearNextBoot => draft.clear_next_boot(),
            Action::SetTimeout(seconds) => draft.set_timeout(seconds)?,
            Action::Commit | Action::Abandon => (),
        }
        Ok(())
    }

    /// Writes every edit, then reloads.
    ///
    /// Does nothing if there are no edits. Otherwise returns the result of every command that was run, which
    /// stay available through [`Controller::results`] until [`Controller::acknowledge`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the reload failed, in which case the controller stays in
    /// [`ControllerState::Committing`]. The results are still kept.
    pub fn commit(&mut self) -> BootResult<&[InvocationResult]> {
        if self.state == ControllerState::Committing {
            return Err(BootError::Inconsistent);
        }
        if !self.draft.is_dirty() {
            debug!("Nothing to commit");
            return Ok(&[]);
        }

        self.state = ControllerState::Committing;
        let commands = plan(&self.draft);
        info!("Committing {} commands", commands.len());

        match execute(&mut self.manager, &commands) {
            Ok(execution) => {
                self.results = execution.results;
                self.draft = Draft::new(execution.repository);
                self.state = ControllerState::Editing;
                Ok(&self.results)
            }
            Err(mut e) => {
                self.results = std::mem::take(&mut e.results);
                Err(e.into())
            }
        }
    }

    /// Drops every edit and reloads the boot configuration.
    ///
    /// This is also how a controller stuck in [`ControllerState::Committing`] gets back to editing.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the reload failed. Nothing changes in that case.
    pub fn abandon(&mut self) -> Result<(), LoadError> {
        let repository = Repository::load(&mut self.manager)?;
        self.draft = Draft::new(repository);
        self.state = ControllerState::Editing;
        Ok(())
    }

    /// Returns the entries to show, in boot order with every edit applied.
    #[must_use = "Has no effect if the result is unused"]
    pub fn view(&self) -> Vec<EntryView> {
        let draft = &self.draft;
        let snapshot = draft.snapshot();
        let changes = draft.changes();
        let next_boot = draft.effective_next_boot();

        draft
            .effective_order()
            .into_iter()
            .filter_map(|id| {
                let entry = snapshot.get(id)?;
                Some(EntryView {
                    id,
                    label: draft.effective_label(id)?.to_owned(),
                    device: entry.device.clone(),
                    active: draft.effective_active(id)?,
                    next_boot: next_boot == Some(id),
                    current: snapshot.boot_current() == Some(id),
                    modified: changes.active_override.contains_key(&id)
                        || changes.relabeled.contains_key(&id),
                })
            })
            .collect()
    }

    /// Returns the commands a commit would run right now.
    #[must_use = "Has no effect if the result is unused"]
    pub fn preview(&self) -> Vec<PlannedCommand> {
        plan(&self.draft)
    }

    /// Returns the results of the last commit.
    #[must_use = "Has no effect if the result is unused"]
    pub fn results(&self) -> &[InvocationResult] {
        &self.results
    }

    /// Discards the results of the last commit.
    pub fn acknowledge(&mut self) {
        self.results.clear();
    }

    /// Returns the current state.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Returns the draft.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Checks if there are any pending edits.
    #[must_use = "Has no effect if the result is unused"]
    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty()
    }
}
