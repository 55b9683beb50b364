// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Turns the edits of a [`Draft`] into `efibootmgr` invocations.
//!
//! The invocations are always grouped in the same order, no matter in which order the edits were made:
//!
//! 1. Removals
//! 2. Active and inactive changes
//! 3. Relabels
//! 4. The new boot order
//! 5. The new timeout
//! 6. The next boot entry
//!
//! Removals come first so every later invocation only refers to surviving entries. The next boot entry comes
//! last, after the boot order it may refer to has been written. Inside a group, invocations are sorted by
//! boot number.

use std::fmt;

use crate::{
    draft::{Draft, NextBootChange},
    repository::types::BootNum,
};

/// The kinds of [`PlannedCommand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    /// Removes an entry.
    Remove,

    /// Changes if an entry is active.
    SetActive,

    /// Changes the label of an entry.
    Relabel,

    /// Writes the boot order.
    Reorder,

    /// Writes the boot menu timeout.
    SetTimeout,

    /// Sets the next boot entry.
    SetNextBoot,

    /// Removes the next boot entry.
    ClearNextBoot,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remove => "remove",
            Self::SetActive => "set-active",
            Self::Relabel => "relabel",
            Self::Reorder => "reorder",
            Self::SetTimeout => "timeout",
            Self::SetNextBoot => "next-boot",
            Self::ClearNextBoot => "clear-next-boot",
        })
    }
}

/// One `efibootmgr` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlannedCommand {
    /// Remove the entry.
    Remove(BootNum),

    /// Make the entry active (`true`) or inactive (`false`).
    SetActive(BootNum, bool),

    /// Change the label of the entry.
    Relabel(BootNum, String),

    /// Write the complete boot order.
    Reorder(Vec<BootNum>),

    /// Write the timeout in seconds.
    SetTimeout(u16),

    /// Boot the entry the next time only.
    SetNextBoot(BootNum),

    /// Remove the next boot entry.
    ClearNextBoot,
}

impl PlannedCommand {
    /// Returns the kind of the command.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Remove(_) => OperationKind::Remove,
            Self::SetActive(..) => OperationKind::SetActive,
            Self::Relabel(..) => OperationKind::Relabel,
            Self::Reorder(_) => OperationKind::Reorder,
            Self::SetTimeout(_) => OperationKind::SetTimeout,
            Self::SetNextBoot(_) => OperationKind::SetNextBoot,
            Self::ClearNextBoot => OperationKind::ClearNextBoot,
        }
    }

    /// Returns the entry the command is about, if it is about a single entry.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn target(&self) -> Option<BootNum> {
        match self {
            Self::Remove(id) | Self::SetActive(id, _) | Self::Relabel(id, _) | Self::SetNextBoot(id) => {
                Some(*id)
            }
            Self::Reorder(_) | Self::SetTimeout(_) | Self::ClearNextBoot => None,
        }
    }

    /// Returns the arguments to `efibootmgr` that carry out the command.
    #[must_use = "Has no effect if the result is unused"]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Remove(id) => vec!["--delete-bootnum".into(), "--bootnum".into(), id.to_string()],
            Self::SetActive(id, true) => vec!["--active".into(), "--bootnum".into(), id.to_string()],
            Self::SetActive(id, false) => vec!["--inactive".into(), "--bootnum".into(), id.to_string()],
            Self::Relabel(id, label) => vec![
                "--bootnum".into(),
                id.to_string(),
                "--label".into(),
                label.clone(),
            ],
            Self::Reorder(order) => vec!["--bootorder".into(), join(order)],
            Self::SetTimeout(seconds) => vec!["--timeout".into(), seconds.to_string()],
            Self::SetNextBoot(id) => vec!["--bootnext".into(), id.to_string()],
            Self::ClearNextBoot => vec!["--delete-bootnext".into()],
        }
    }
}

impl fmt::Display for PlannedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove(id) => write!(f, "remove Boot{id}"),
            Self::SetActive(id, true) => write!(f, "activate Boot{id}"),
            Self::SetActive(id, false) => write!(f, "deactivate Boot{id}"),
            Self::Relabel(id, label) => write!(f, "relabel Boot{id} to \"{label}\""),
            Self::Reorder(order) => write!(f, "set boot order to {}", join(order)),
            Self::SetTimeout(seconds) => write!(f, "set timeout to {seconds} seconds"),
            Self::SetNextBoot(id) => write!(f, "boot Boot{id} next time"),
            Self::ClearNextBoot => write!(f, "clear next boot"),
        }
    }
}

/// Joins boot numbers like the `BootOrder` line of a listing.
fn join(order: &[BootNum]) -> String {
    order
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Computes the invocations that write the edits of a [`Draft`].
///
/// A draft with no edits yields no invocations.
#[must_use = "Has no effect if the result is unused"]
pub fn plan(draft: &Draft) -> Vec<PlannedCommand> {
    let changes = draft.changes();
    let mut commands = Vec::new();

    commands.extend(changes.removed.iter().copied().map(PlannedCommand::Remove));

    commands.extend(
        changes
            .active_override
            .iter()
            .map(|(id, active)| PlannedCommand::SetActive(*id, *active)),
    );

    commands.extend(
        changes
            .relabeled
            .iter()
            .map(|(id, label)| PlannedCommand::Relabel(*id, label.clone())),
    );

    if let Some(order) = &changes.reordered
        && *order != draft.baseline_order()
    {
        commands.push(PlannedCommand::Reorder(order.clone()));
    }

    if let Some(seconds) = changes.timeout {
        commands.push(PlannedCommand::SetTimeout(seconds));
    }

    match changes.next_boot {
        Some(NextBootChange::Set(id)) => commands.push(PlannedCommand::SetNextBoot(id)),
        Some(NextBootChange::Clear) => commands.push(PlannedCommand::ClearNextBoot),
        None => (),
    }

    commands
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{draft::EditError, repository::Repository, system::sysinfo::SystemInfo};

    fn num(x: u16) -> BootNum {
        BootNum::from_raw(x)
    }

    fn abc() -> Draft {
        Draft::new(Repository::parse(
            "Timeout: 3 seconds\n\
             BootOrder: 000A,000B,000C\n\
             Boot000A* A\tHD(1)\n\
             Boot000B* B\tHD(2)\n\
             Boot000C  C\tHD(3)\n",
            &SystemInfo::default(),
        ))
    }

    #[test]
    fn test_empty_plan() {
        assert!(plan(&abc()).is_empty());
    }

    #[test]
    fn test_abc_scenario() -> Result<(), EditError> {
        let (a, b, c) = (num(0xA), num(0xB), num(0xC));
        let mut draft = abc();
        draft.move_down(a)?;
        draft.toggle_active(c)?;
        draft.set_next_boot(b)?;

        assert_eq!(
            plan(&draft),
            vec![
                PlannedCommand::SetActive(c, true),
                PlannedCommand::Reorder(vec![b, a, c]),
                PlannedCommand::SetNextBoot(b),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_fixed_order() -> Result<(), EditError> {
        let mut draft = abc();
        draft.clear_next_boot();
        draft.set_next_boot(num(0xC))?;
        draft.set_timeout(10)?;
        draft.move_up(num(0xC))?;
        draft.relabel(num(0xB), "Bee")?;
        draft.toggle_active(num(0xB))?;
        draft.remove(num(0xA))?;

        let kinds: Vec<_> = plan(&draft).iter().map(PlannedCommand::kind).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Remove,
                OperationKind::SetActive,
                OperationKind::Relabel,
                OperationKind::Reorder,
                OperationKind::SetTimeout,
                OperationKind::SetNextBoot,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_args() {
        let id = num(0x1F);
        assert_eq!(
            PlannedCommand::Remove(id).args(),
            vec!["--delete-bootnum", "--bootnum", "001F"]
        );
        assert_eq!(
            PlannedCommand::SetActive(id, false).args(),
            vec!["--inactive", "--bootnum", "001F"]
        );
        assert_eq!(
            PlannedCommand::Relabel(id, "My OS".to_owned()).args(),
            vec!["--bootnum", "001F", "--label", "My OS"]
        );
        assert_eq!(
            PlannedCommand::Reorder(vec![id, num(2)]).args(),
            vec!["--bootorder", "001F,0002"]
        );
        assert_eq!(PlannedCommand::SetTimeout(0).args(), vec!["--timeout", "0"]);
        assert_eq!(PlannedCommand::ClearNextBoot.args(), vec!["--delete-bootnext"]);
        assert_eq!(PlannedCommand::ClearNextBoot.target(), None);
        assert_eq!(PlannedCommand::SetNextBoot(id).target(), Some(id));
    }

    #[test]
    fn test_remove_then_reorder() -> Result<(), EditError> {
        let mut draft = abc();
        draft.move_up(num(0xC))?;
        draft.remove(num(0xB))?;
        // A,C is what is left of the snapshot order anyway
        assert_eq!(plan(&draft), vec![PlannedCommand::Remove(num(0xB))]);

        let mut draft = abc();
        draft.move_up(num(0xC))?;
        draft.move_up(num(0xC))?;
        draft.remove(num(0xA))?;
        assert_eq!(
            plan(&draft),
            vec![
                PlannedCommand::Remove(num(0xA)),
                PlannedCommand::Reorder(vec![num(0xC), num(0xB)]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_remove_next_boot() -> Result<(), EditError> {
        let mut draft = Draft::new(Repository::parse(
            "BootNext: 000B\n\
             BootOrder: 000A,000B\n\
             Boot000A* A\tHD(1)\n\
             Boot000B* B\tHD(2)\n",
            &SystemInfo::default(),
        ));
        draft.remove(num(0xB))?;
        assert_eq!(
            plan(&draft),
            vec![PlannedCommand::Remove(num(0xB)), PlannedCommand::ClearNextBoot]
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn reorder_excludes_removed(
            removed in proptest::collection::btree_set(0xAu16..=0xC, 0..3),
            moves in proptest::collection::vec((0xAu16..=0xC, any::<bool>()), 0..10),
        ) {
            let mut draft = abc();
            for (x, up) in &moves {
                let _ = if *up { draft.move_up(num(*x)) } else { draft.move_down(num(*x)) };
            }
            for x in &removed {
                let _ = draft.remove(num(*x));
            }

            let commands = plan(&draft);
            let mut last = None;
            for command in &commands {
                prop_assert!(last <= Some(command.kind()));
                last = Some(command.kind());
                if let PlannedCommand::Reorder(order) = command {
                    for x in &removed {
                        prop_assert!(!order.contains(&num(*x)));
                    }
                }
            }
        }
    }
}
