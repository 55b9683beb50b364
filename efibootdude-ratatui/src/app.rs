// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The main application logic.
//!
//! This is where the main loop of the whole application is located, and is where the terminal, the
//! controller, and the line editor interact.

use std::io::Stdout;

use efibootdude_core::{
    controller::{Action, Controller, ControllerState},
    error::BootError,
    plan::PlannedCommand,
    repository::types::BootNum,
    system::runner::BootManager,
};
use log::{info, warn};
use ratatui_core::terminal::Terminal;
use ratatui_crossterm::{
    CrosstermBackend,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use thiserror::Error;

use crate::{
    MainError,
    editor::{EditorOutcome, LineEditor},
    restore_terminal, resume_terminal,
    ui::{entry_list::EntryList, theme::Theme},
};

/// The word that has to be typed to reboot.
pub const REBOOT_WORD: &str = "reboot";

/// An `Error` that may result from running or initializing the [`App`].
#[derive(Error, Debug)]
pub enum AppError {
    /// There are no boot entries in the boot list.
    #[error("No boot entries found")]
    NoEntries,
}

/// The current status of the [`App`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// The app is currently running in its main loop.
    Running,

    /// The terminal is handed back while the pending edits are written, so `sudo` can ask for a password.
    Writing,

    /// The app is exiting so the machine can be rebooted.
    Rebooting,

    /// The app is currently exiting.
    Exiting,
}

/// What a prompt is asking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    /// A new label for an entry.
    Relabel(BootNum),

    /// A new timeout.
    Timeout,

    /// The word [`REBOOT_WORD`].
    Reboot,
}

/// What the screen is showing, and so what the keys do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The entry list.
    Browsing,

    /// A line editor prompt.
    Prompt(PromptKind, LineEditor),

    /// The commands a commit would run, asking to confirm.
    ConfirmWrite(Vec<PlannedCommand>),

    /// Asking to confirm dropping the pending edits.
    ConfirmAbandon,

    /// Asking to confirm quitting with pending edits.
    ConfirmQuit,

    /// The results of the last commit.
    Results,
}

/// The main application logic of the editor.
pub struct App<M: BootManager> {
    /// The controller holding the boot configuration and the pending edits.
    pub controller: Controller<M>,

    /// The list of boot entries.
    pub entries: EntryList,

    /// What the screen is showing.
    pub mode: Mode,

    /// The [`Theme`] of the UI.
    pub theme: Theme,

    /// Shows full device paths.
    pub verbose: bool,

    /// A one-line message for the status bar, such as a rejected edit.
    pub status: Option<String>,

    /// The current state of the [`App`].
    pub state: AppState,
}

impl<M: BootManager> App<M> {
    /// Initializes the state of the [`App`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if there are no boot entries.
    pub fn new(controller: Controller<M>, theme: Theme, verbose: bool) -> Result<Self, AppError> {
        let entries = EntryList::new(controller.view());
        if entries.items.is_empty() {
            return Err(AppError::NoEntries);
        }

        Ok(Self {
            controller,
            entries,
            mode: Mode::Browsing,
            theme,
            verbose,
            status: None,
            state: AppState::Running,
        })
    }

    /// Provides the main loop for the [`App`].
    ///
    /// This is where the UI and key handling are centrally managed. It returns once the user quits, or asks
    /// for a reboot.
    ///
    /// # Errors
    ///
    /// May return an `Error` if a frame could not be drawn, or the terminal input could not be read.
    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<AppState, MainError> {
        terminal.clear()?;

        loop {
            match self.state {
                AppState::Running => {
                    self.draw(terminal)?;

                    if let Event::Key(key) = event::read()?
                        && key.kind == KeyEventKind::Press
                    {
                        self.handle_key(key);
                    }
                }
                AppState::Writing => {
                    restore_terminal()?;
                    self.write();
                    resume_terminal(terminal)?;
                }
                state => return Ok(state),
            }
        }
    }

    /// Handle a key that was pressed, depending on what is on screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match std::mem::replace(&mut self.mode, Mode::Browsing) {
            Mode::Browsing => self.handle_browsing_key(key),
            Mode::Prompt(kind, mut editor) => match editor.handle_key(key) {
                EditorOutcome::Editing => self.mode = Mode::Prompt(kind, editor),
                EditorOutcome::Submitted => self.submit_prompt(kind, &editor.value),
                EditorOutcome::Cancelled => self.status = None,
            },
            Mode::ConfirmWrite(commands) => {
                if is_yes(key) {
                    info!("Writing {} commands", commands.len());
                    self.state = AppState::Writing;
                } else {
                    self.status = Some("Write cancelled".to_owned());
                }
            }
            Mode::ConfirmAbandon => {
                if is_yes(key) {
                    self.abandon();
                }
            }
            Mode::ConfirmQuit => {
                if is_yes(key) {
                    self.state = AppState::Exiting;
                }
            }
            Mode::Results => self.controller.acknowledge(),
        }
    }

    /// Handle a key on the entry list.
    ///
    /// This includes arrows and k/j for selection, and a single key for every edit.
    fn handle_browsing_key(&mut self, key: KeyEvent) {
        self.status = None;
        let selected = self.entries.selected().map(|entry| entry.id);

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.entries.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.entries.select_next(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('q' | 'x') => self.quit(),
            KeyCode::Char('u') => self.act_on(selected, Action::MoveUp),
            KeyCode::Char('d') => self.act_on(selected, Action::MoveDown),
            KeyCode::Char('r') => self.act_on(selected, Action::Remove),
            KeyCode::Char('*' | ' ') => self.act_on(selected, Action::ToggleActive),
            KeyCode::Char('n') => self.act_on(selected, Action::SetNextBoot),
            KeyCode::Char('N') => self.dispatch(Action::ClearNextBoot),
            KeyCode::Char('t') => {
                if let Some(entry) = self.entries.selected() {
                    let editor = LineEditor::new(format!("New label for Boot{}", entry.id), &*entry.label);
                    self.mode = Mode::Prompt(PromptKind::Relabel(entry.id), editor);
                }
            }
            KeyCode::Char('m') => {
                let timeout = self
                    .controller
                    .draft()
                    .effective_timeout()
                    .map(|x| x.to_string())
                    .unwrap_or_default();
                let editor = LineEditor::new("Timeout in seconds", timeout);
                self.mode = Mode::Prompt(PromptKind::Timeout, editor);
            }
            KeyCode::Char('w') => {
                if self.controller.is_dirty() {
                    self.mode = Mode::ConfirmWrite(self.controller.preview());
                } else {
                    self.status = Some("Nothing to write".to_owned());
                }
            }
            KeyCode::Esc => {
                if self.controller.is_dirty() {
                    self.mode = Mode::ConfirmAbandon;
                } else {
                    self.abandon();
                }
            }
            KeyCode::Char('b') => {
                if self.controller.is_dirty() {
                    self.status = Some("Write or abandon the changes before rebooting".to_owned());
                } else {
                    let editor = LineEditor::new(format!("Type \"{REBOOT_WORD}\" to reboot now"), "");
                    self.mode = Mode::Prompt(PromptKind::Reboot, editor);
                }
            }
            KeyCode::Char('v') => self.verbose = !self.verbose,
            _ => (),
        }
    }

    /// Applies what was entered into a prompt.
    fn submit_prompt(&mut self, kind: PromptKind, value: &str) {
        match kind {
            PromptKind::Relabel(id) => self.dispatch(Action::Relabel(id, value.to_owned())),
            PromptKind::Timeout => match value.trim().parse() {
                Ok(seconds) => self.dispatch(Action::SetTimeout(seconds)),
                Err(e) => self.status = Some(format!("\"{}\" is not a number: {e}", value.trim())),
            },
            PromptKind::Reboot => {
                if value.trim() == REBOOT_WORD {
                    info!("Reboot requested");
                    self.state = AppState::Rebooting;
                } else {
                    self.status = Some("Reboot cancelled".to_owned());
                }
            }
        }
    }

    /// Quits, or asks first if there are pending edits.
    fn quit(&mut self) {
        if self.controller.is_dirty() {
            self.mode = Mode::ConfirmQuit;
        } else {
            self.state = AppState::Exiting;
        }
    }

    /// Carries out an edit on the selected entry, then keeps that entry selected.
    fn act_on(&mut self, selected: Option<BootNum>, action: fn(BootNum) -> Action) {
        if let Some(id) = selected {
            self.dispatch(action(id));
            self.entries.select_id(id);
        }
    }

    /// Writes the pending edits, then shows the results.
    ///
    /// This runs outside of the full screen UI, see [`AppState::Writing`].
    pub fn write(&mut self) {
        println!("Writing boot configuration...");
        self.dispatch(Action::Commit);
        self.state = AppState::Running;
        if !self.controller.results().is_empty() {
            self.mode = Mode::Results;
        }
    }

    /// Drops the pending edits and reloads.
    fn abandon(&mut self) {
        self.dispatch(Action::Abandon);
        if self.status.is_none() {
            self.status = Some("Reloaded boot entries".to_owned());
        }
    }

    /// Hands an [`Action`] to the controller, showing any error in the status bar.
    fn dispatch(&mut self, action: Action) {
        if let Err(e) = self.controller.dispatch(action) {
            warn!("{e}");
            self.status = Some(match e {
                BootError::Reconcile(_) | BootError::Inconsistent => {
                    format!("{e} (press ESC to reload, or restart)")
                }
                e => e.to_string(),
            });
        }
        self.entries.refresh(self.controller.view());
    }

    /// Checks if the controller could not reload after a commit.
    #[must_use = "Has no effect if the result is unused"]
    pub fn inconsistent(&self) -> bool {
        self.controller.state() == ControllerState::Committing
    }
}

/// Checks if a key confirms a question.
fn is_yes(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('y' | 'Y'))
}
