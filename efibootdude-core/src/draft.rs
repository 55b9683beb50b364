// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Pending edits to a boot configuration.
//!
//! A [`Draft`] owns a [`Repository`] snapshot and a [`ChangeSet`] of every edit made since the snapshot was
//! loaded. Nothing is written until the draft is committed through [`crate::controller::Controller`].
//!
//! The change set is kept minimal: an edit that brings a value back to what it is in the snapshot removes
//! the pending change instead of recording it, so a draft that was edited back to its starting point is not
//! dirty.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::repository::{Repository, types::BootNum};

/// Errors that may result from an edit to a [`Draft`].
///
/// A rejected edit leaves the draft as it was.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    /// The entry does not exist, or has been removed.
    #[error("Boot{0} does not exist")]
    UnknownEntry(BootNum),

    /// The entry cannot be moved any further in that direction.
    #[error("Boot{0} cannot be moved any further")]
    Boundary(BootNum),

    /// The new label was blank.
    #[error("Label cannot be empty")]
    EmptyLabel,

    /// The timeout was outside of what the firmware can store.
    #[error("Timeout {0} is out of range (0 to 65535 seconds)")]
    Range(i64),
}

/// A pending change to the next boot entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextBootChange {
    /// Boot this entry the next time only.
    Set(BootNum),

    /// Remove the next boot entry.
    Clear,
}

/// Every pending edit relative to a snapshot.
///
/// Removal takes over every other edit of an entry, so a removed boot number is never found anywhere else
/// in here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// The new boot order of the surviving entries, only if it is different from the snapshot order.
    pub reordered: Option<Vec<BootNum>>,

    /// The entries to remove.
    pub removed: BTreeSet<BootNum>,

    /// The new active state of the entries where it differs from the snapshot.
    pub active_override: BTreeMap<BootNum, bool>,

    /// The new labels of the entries where they differ from the snapshot.
    pub relabeled: BTreeMap<BootNum, String>,

    /// The change to the next boot entry, if any.
    pub next_boot: Option<NextBootChange>,

    /// The new timeout in seconds, if it differs from the snapshot.
    pub timeout: Option<u16>,
}

impl ChangeSet {
    /// Checks if there are no pending edits.
    #[must_use = "Has no effect if the result is unused"]
    pub fn is_empty(&self) -> bool {
        self.reordered.is_none()
            && self.removed.is_empty()
            && self.active_override.is_empty()
            && self.relabeled.is_empty()
            && self.next_boot.is_none()
            && self.timeout.is_none()
    }
}

/// An editable view of a boot configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    /// The snapshot the edits are relative to.
    snapshot: Repository,

    /// The edits.
    changes: ChangeSet,
}

impl Draft {
    /// Creates a [`Draft`] with no edits.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(snapshot: Repository) -> Self {
        Self {
            snapshot,
            changes: ChangeSet::default(),
        }
    }

    /// Returns the snapshot the edits are relative to.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn snapshot(&self) -> &Repository {
        &self.snapshot
    }

    /// Returns the pending edits.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Checks if there are any pending edits.
    #[must_use = "Has no effect if the result is unused"]
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Moves an entry one place earlier in the boot order.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist, or if it is already first.
    pub fn move_up(&mut self, id: BootNum) -> Result<(), EditError> {
        self.check(id)?;
        let mut order = self.effective_order();
        let pos = Self::find(&order, id)?;
        if pos == 0 {
            return Err(EditError::Boundary(id));
        }
        order.swap(pos, pos - 1);
        self.set_order(order);
        Ok(())
    }

    /// Moves an entry one place later in the boot order.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist, or if it is already last.
    pub fn move_down(&mut self, id: BootNum) -> Result<(), EditError> {
        self.check(id)?;
        let mut order = self.effective_order();
        let pos = Self::find(&order, id)?;
        if pos + 1 >= order.len() {
            return Err(EditError::Boundary(id));
        }
        order.swap(pos, pos + 1);
        self.set_order(order);
        Ok(())
    }

    /// Marks an entry for removal, dropping every other edit of it.
    ///
    /// Removing the snapshot's next boot entry also clears the next boot entry.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist or was already removed.
    pub fn remove(&mut self, id: BootNum) -> Result<(), EditError> {
        self.check(id)?;
        self.changes.removed.insert(id);
        self.changes.active_override.remove(&id);
        self.changes.relabeled.remove(&id);
        if self.changes.next_boot == Some(NextBootChange::Set(id)) {
            self.changes.next_boot = None;
        }
        // the firmware keeps BootNext pointing at a deleted entry unless it is cleared too
        let next_removed = self
            .snapshot
            .boot_next()
            .is_some_and(|next| self.changes.removed.contains(&next));
        if next_removed && self.changes.next_boot.is_none() {
            self.changes.next_boot = Some(NextBootChange::Clear);
        }
        if let Some(mut order) = self.changes.reordered.take() {
            order.retain(|x| *x != id);
            self.set_order(order);
        }
        Ok(())
    }

    /// Flips whether an entry is active.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist.
    pub fn toggle_active(&mut self, id: BootNum) -> Result<(), EditError> {
        self.check(id)?;
        let original = self.snapshot.get(id).is_some_and(|entry| entry.active);
        let desired = !self.changes.active_override.get(&id).copied().unwrap_or(original);
        if desired == original {
            self.changes.active_override.remove(&id);
        } else {
            self.changes.active_override.insert(id, desired);
        }
        Ok(())
    }

    /// Makes an entry the one to boot the next time only.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist.
    pub fn set_next_boot(&mut self, id: BootNum) -> Result<(), EditError> {
        self.check(id)?;
        self.changes.next_boot = if self.snapshot.boot_next() == Some(id) {
            None
        } else {
            Some(NextBootChange::Set(id))
        };
        Ok(())
    }

    /// Removes the next boot entry.
    pub fn clear_next_boot(&mut self) {
        self.changes.next_boot = self
            .snapshot
            .boot_next()
            .map(|_| NextBootChange::Clear);
    }

    /// Changes the label of an entry. Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist or if the label is blank.
    pub fn relabel(&mut self, id: BootNum, label: &str) -> Result<(), EditError> {
        self.check(id)?;
        let label = label.trim();
        if label.is_empty() {
            return Err(EditError::EmptyLabel);
        }

        let unchanged = self.snapshot.get(id).is_some_and(|entry| entry.label == label);
        if unchanged {
            self.changes.relabeled.remove(&id);
        } else {
            self.changes.relabeled.insert(id, label.to_owned());
        }
        Ok(())
    }

    /// Changes the boot menu timeout.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the timeout is negative or does not fit in 16 bits.
    pub fn set_timeout(&mut self, seconds: i64) -> Result<(), EditError> {
        let seconds = u16::try_from(seconds).map_err(|_| EditError::Range(seconds))?;
        self.changes.timeout = if self.snapshot.timeout() == Some(seconds) {
            None
        } else {
            Some(seconds)
        };
        Ok(())
    }

    /// Returns the boot order with every edit applied.
    #[must_use = "Has no effect if the result is unused"]
    pub fn effective_order(&self) -> Vec<BootNum> {
        self.changes
            .reordered
            .clone()
            .unwrap_or_else(|| self.baseline_order())
    }

    /// Returns if an entry is active with every edit applied, or [`None`] if it does not exist or is removed.
    #[must_use = "Has no effect if the result is unused"]
    pub fn effective_active(&self, id: BootNum) -> Option<bool> {
        if self.changes.removed.contains(&id) {
            return None;
        }
        let entry = self.snapshot.get(id)?;
        Some(
            self.changes
                .active_override
                .get(&id)
                .copied()
                .unwrap_or(entry.active),
        )
    }

    /// Returns the label of an entry with every edit applied, or [`None`] if it does not exist or is removed.
    #[must_use = "Has no effect if the result is unused"]
    pub fn effective_label(&self, id: BootNum) -> Option<&str> {
        if self.changes.removed.contains(&id) {
            return None;
        }
        let entry = self.snapshot.get(id)?;
        Some(
            self.changes
                .relabeled
                .get(&id)
                .map_or(entry.label.as_str(), String::as_str),
        )
    }

    /// Returns the next boot entry with every edit applied.
    #[must_use = "Has no effect if the result is unused"]
    pub fn effective_next_boot(&self) -> Option<BootNum> {
        match self.changes.next_boot {
            Some(NextBootChange::Set(id)) => Some(id),
            Some(NextBootChange::Clear) => None,
            None => self
                .snapshot
                .boot_next()
                .filter(|id| !self.changes.removed.contains(id)),
        }
    }

    /// Returns the boot menu timeout with every edit applied.
    #[must_use = "Has no effect if the result is unused"]
    pub fn effective_timeout(&self) -> Option<u16> {
        self.changes.timeout.or_else(|| self.snapshot.timeout())
    }

    /// The snapshot order without the removed entries.
    ///
    /// This is what a reorder is compared against.
    pub(crate) fn baseline_order(&self) -> Vec<BootNum> {
        self.snapshot
            .ids()
            .into_iter()
            .filter(|id| !self.changes.removed.contains(id))
            .collect()
    }

    /// Records a new order, or drops the pending reorder if it is the same as the baseline.
    fn set_order(&mut self, order: Vec<BootNum>) {
        self.changes.reordered = (order != self.baseline_order()).then_some(order);
    }

    /// Checks that an entry exists and has not been removed.
    fn check(&self, id: BootNum) -> Result<(), EditError> {
        if self.snapshot.contains(id) && !self.changes.removed.contains(&id) {
            Ok(())
        } else {
            Err(EditError::UnknownEntry(id))
        }
    }

    /// Finds the position of an entry in an order.
    fn find(order: &[BootNum], id: BootNum) -> Result<usize, EditError> {
        order
            .iter()
            .position(|x| *x == id)
            .ok_or(EditError::UnknownEntry(id))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::system::sysinfo::SystemInfo;

    fn num(x: u16) -> BootNum {
        BootNum::from_raw(x)
    }

    /// Builds a snapshot of `count` entries, where every third entry is inactive.
    fn snapshot(count: u16) -> Repository {
        let mut content = String::from("Timeout: 5 seconds\n");
        for x in 0..count {
            let star = if x % 3 == 2 { " " } else { "*" };
            content.push_str(&format!("Boot{x:04X}{star} entry {x}\tHD({x})\n"));
        }
        Repository::parse(&content, &SystemInfo::default())
    }

    #[test]
    fn test_fresh_draft() {
        let repo = snapshot(4);
        let draft = Draft::new(repo.clone());
        assert_eq!(draft.effective_order(), repo.ids());
        assert!(!draft.is_dirty());
        assert_eq!(draft.effective_timeout(), Some(5));
    }

    #[test]
    fn test_move() -> Result<(), EditError> {
        let mut draft = Draft::new(snapshot(3));
        assert_eq!(draft.move_up(num(0)), Err(EditError::Boundary(num(0))));
        assert_eq!(draft.move_down(num(2)), Err(EditError::Boundary(num(2))));
        assert!(!draft.is_dirty());

        draft.move_down(num(0))?;
        assert_eq!(draft.effective_order(), vec![num(1), num(0), num(2)]);
        assert!(draft.is_dirty());

        draft.move_up(num(0))?;
        assert_eq!(draft.changes().reordered, None);
        assert!(!draft.is_dirty());
        Ok(())
    }

    #[test]
    fn test_remove_supersedes() -> Result<(), EditError> {
        let mut draft = Draft::new(snapshot(3));
        draft.toggle_active(num(1))?;
        draft.relabel(num(1), "renamed")?;
        draft.set_next_boot(num(1))?;
        draft.move_down(num(1))?;
        draft.remove(num(1))?;

        let changes = draft.changes();
        assert!(changes.removed.contains(&num(1)));
        assert!(changes.active_override.is_empty());
        assert!(changes.relabeled.is_empty());
        assert_eq!(changes.next_boot, None);
        assert_eq!(changes.reordered, None);
        assert_eq!(draft.effective_order(), vec![num(0), num(2)]);
        Ok(())
    }

    #[test]
    fn test_remove_next_boot() -> Result<(), EditError> {
        let repo = Repository::parse(
            "BootNext: 0001\n\
             Boot0000* a\tHD(1)\n\
             Boot0001* b\tHD(2)\n\
             Boot0002* c\tHD(3)\n",
            &SystemInfo::default(),
        );
        let mut draft = Draft::new(repo.clone());
        draft.remove(num(1))?;
        assert_eq!(draft.changes().next_boot, Some(NextBootChange::Clear));
        assert_eq!(draft.effective_next_boot(), None);

        // a pending next boot on the removed entry goes back to the snapshot one
        let mut draft = Draft::new(repo);
        draft.set_next_boot(num(2))?;
        draft.remove(num(2))?;
        assert_eq!(draft.changes().next_boot, None);
        assert_eq!(draft.effective_next_boot(), Some(num(1)));

        // falling back to a removed snapshot next boot still clears it
        draft.remove(num(1))?;
        draft.set_next_boot(num(0))?;
        draft.remove(num(0))?;
        assert_eq!(draft.changes().next_boot, Some(NextBootChange::Clear));
        assert_eq!(draft.effective_next_boot(), None);
        Ok(())
    }

    #[test]
    fn test_removed_is_unknown() -> Result<(), EditError> {
        let mut draft = Draft::new(snapshot(3));
        draft.remove(num(2))?;
        let before = draft.clone();
        let unknown = Err(EditError::UnknownEntry(num(2)));
        assert_eq!(draft.remove(num(2)), unknown);
        assert_eq!(draft.toggle_active(num(2)), unknown);
        assert_eq!(draft.relabel(num(2), "x"), unknown);
        assert_eq!(draft.set_next_boot(num(2)), unknown);
        assert_eq!(draft.move_up(num(2)), unknown);
        assert_eq!(draft.move_down(num(2)), unknown);
        assert_eq!(draft, before);
        assert_eq!(draft.effective_active(num(2)), None);
        assert_eq!(draft.effective_label(num(2)), None);
        Ok(())
    }

    #[test]
    fn test_toggle_is_minimal() -> Result<(), EditError> {
        let mut draft = Draft::new(snapshot(3));
        draft.toggle_active(num(2))?;
        assert_eq!(draft.effective_active(num(2)), Some(true));
        assert_eq!(draft.changes().active_override.get(&num(2)), Some(&true));
        draft.toggle_active(num(2))?;
        assert!(!draft.changes().active_override.contains_key(&num(2)));
        assert!(!draft.is_dirty());
        Ok(())
    }

    #[test]
    fn test_relabel() -> Result<(), EditError> {
        let mut draft = Draft::new(snapshot(2));
        assert_eq!(draft.relabel(num(0), "   "), Err(EditError::EmptyLabel));
        draft.relabel(num(0), "  Linux  ")?;
        assert_eq!(draft.effective_label(num(0)), Some("Linux"));
        draft.relabel(num(0), "entry 0")?;
        assert!(!draft.is_dirty());
        Ok(())
    }

    #[test]
    fn test_timeout() -> Result<(), EditError> {
        let mut draft = Draft::new(snapshot(1));
        assert_eq!(draft.set_timeout(-1), Err(EditError::Range(-1)));
        assert_eq!(draft.set_timeout(65536), Err(EditError::Range(65536)));
        draft.set_timeout(0)?;
        assert_eq!(draft.effective_timeout(), Some(0));
        draft.set_timeout(5)?;
        assert!(!draft.is_dirty());
        Ok(())
    }

    #[test]
    fn test_next_boot() -> Result<(), EditError> {
        let repo = Repository::parse(
            "BootNext: 0001\nBoot0000* a\tHD(1)\nBoot0001* b\tHD(2)\n",
            &SystemInfo::default(),
        );
        let mut draft = Draft::new(repo);
        assert_eq!(draft.effective_next_boot(), Some(num(1)));

        draft.set_next_boot(num(0))?;
        assert_eq!(draft.changes().next_boot, Some(NextBootChange::Set(num(0))));
        draft.set_next_boot(num(1))?;
        assert!(!draft.is_dirty());

        draft.clear_next_boot();
        assert_eq!(draft.changes().next_boot, Some(NextBootChange::Clear));
        assert_eq!(draft.effective_next_boot(), None);

        let mut clean = Draft::new(snapshot(2));
        clean.clear_next_boot();
        assert!(!clean.is_dirty());
        Ok(())
    }

    #[test]
    fn test_unknown_entry() {
        let mut draft = Draft::new(snapshot(2));
        assert_eq!(draft.toggle_active(num(9)), Err(EditError::UnknownEntry(num(9))));
        assert_eq!(draft.move_up(num(9)), Err(EditError::UnknownEntry(num(9))));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Up(u16),
        Down(u16),
        Remove(u16),
        Toggle(u16),
        Relabel(u16, String),
        Next(u16),
        ClearNext,
        Timeout(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u16..6).prop_map(Op::Up),
            (0u16..6).prop_map(Op::Down),
            (0u16..6).prop_map(Op::Remove),
            (0u16..6).prop_map(Op::Toggle),
            ((0u16..6), "[a-z ]{0,6}").prop_map(|(x, label)| Op::Relabel(x, label)),
            (0u16..6).prop_map(Op::Next),
            Just(Op::ClearNext),
            (-3i64..70000).prop_map(Op::Timeout),
        ]
    }

    fn apply(draft: &mut Draft, op: &Op) -> Result<(), EditError> {
        match op {
            Op::Up(x) => draft.move_up(num(*x)),
            Op::Down(x) => draft.move_down(num(*x)),
            Op::Remove(x) => draft.remove(num(*x)),
            Op::Toggle(x) => draft.toggle_active(num(*x)),
            Op::Relabel(x, label) => draft.relabel(num(*x), label),
            Op::Next(x) => draft.set_next_boot(num(*x)),
            Op::ClearNext => {
                draft.clear_next_boot();
                Ok(())
            }
            Op::Timeout(x) => draft.set_timeout(*x),
        }
    }

    proptest! {
        #[test]
        fn keeps_invariants(ops in proptest::collection::vec(op(), 0..40)) {
            let mut draft = Draft::new(snapshot(5));
            for op in &ops {
                let before = draft.clone();
                if apply(&mut draft, op).is_err() {
                    prop_assert_eq!(&draft, &before);
                }

                let changes = draft.changes();
                for id in &changes.removed {
                    prop_assert!(!changes.active_override.contains_key(id));
                    prop_assert!(!changes.relabeled.contains_key(id));
                    prop_assert_ne!(changes.next_boot, Some(NextBootChange::Set(*id)));
                }

                let mut order = draft.effective_order();
                order.sort();
                let mut survivors = draft.baseline_order();
                survivors.sort();
                prop_assert_eq!(order, survivors);

                for (id, active) in &changes.active_override {
                    let original = draft.snapshot().get(*id).map(|x| x.active);
                    prop_assert_ne!(Some(*active), original);
                }
                prop_assert_ne!(changes.reordered.as_ref(), Some(&draft.baseline_order()));
            }
        }

        #[test]
        fn double_toggle_is_minimal(x in 0u16..5) {
            let mut draft = Draft::new(snapshot(5));
            prop_assert!(draft.toggle_active(num(x)).is_ok());
            prop_assert!(draft.toggle_active(num(x)).is_ok());
            prop_assert!(!draft.changes().active_override.contains_key(&num(x)));
        }
    }
}
