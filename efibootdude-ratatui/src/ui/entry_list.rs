// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`EntryList`], which is a way to display [`EntryView`]s using ratatui.
//!
//! Each row is laid out in columns:
//!
//! ```text
//! *NC 0001 ubuntu               /boot/efi \EFI\ubuntu\shimx64.efi
//! ```
//!
//! where `*` marks an active entry, `N` the next boot entry and `C` the entry that was booted this time.

use efibootdude_core::{controller::EntryView, repository::types::BootNum};
use ratatui_widgets::list::ListState;

/// The UI frontend for the boot entries.
#[derive(Default)]
pub struct EntryList {
    /// The entries, in boot order.
    pub items: Vec<EntryView>,

    /// The internal state of the list.
    pub state: ListState,
}

impl EntryList {
    /// Creates a new [`EntryList`] with the first entry selected.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(items: Vec<EntryView>) -> Self {
        let mut list = Self {
            items,
            state: ListState::default(),
        };
        list.clamp_selection();
        list
    }

    /// Replaces the entries, keeping the same entry selected if it is still there.
    pub fn refresh(&mut self, items: Vec<EntryView>) {
        let selected = self.selected().map(|entry| entry.id);
        self.items = items;
        match selected {
            Some(id) if self.select_id(id) => (),
            _ => self.clamp_selection(),
        }
    }

    /// Returns the selected entry.
    #[must_use = "Has no effect if the result is unused"]
    pub fn selected(&self) -> Option<&EntryView> {
        self.state.selected().and_then(|idx| self.items.get(idx))
    }

    /// Selects an entry by its boot number. Returns `false` if there is no such entry.
    pub fn select_id(&mut self, id: BootNum) -> bool {
        let Some(idx) = self.items.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.state.select(Some(idx));
        true
    }

    /// Selects the previous entry, stopping at the first.
    pub fn select_previous(&mut self) {
        let idx = self.state.selected().unwrap_or(0).saturating_sub(1);
        self.state.select((!self.items.is_empty()).then_some(idx));
    }

    /// Selects the next entry, stopping at the last.
    pub fn select_next(&mut self) {
        let last = self.items.len().saturating_sub(1);
        let idx = self.state.selected().map_or(0, |idx| (idx + 1).min(last));
        self.state.select((!self.items.is_empty()).then_some(idx));
    }

    /// Formats every entry as a row.
    #[must_use = "Has no effect if the result is unused"]
    pub fn rows(&self, verbose: bool) -> Vec<String> {
        let width = self
            .items
            .iter()
            .map(|entry| entry.label.chars().count())
            .max()
            .unwrap_or(0);

        self.items
            .iter()
            .map(|entry| {
                let active = if entry.active { '*' } else { ' ' };
                let next = if entry.next_boot { 'N' } else { ' ' };
                let current = if entry.current { 'C' } else { ' ' };
                let device = entry.device.summary(verbose);
                format!(
                    "{active}{next}{current} {} {:<width$}  {device}",
                    entry.id, entry.label
                )
                .trim_end()
                .to_owned()
            })
            .collect()
    }

    /// Keeps the selection inside the list.
    fn clamp_selection(&mut self) {
        let selected = match (self.state.selected(), self.items.len()) {
            (_, 0) => None,
            (Some(idx), len) => Some(idx.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(selected);
    }
}
