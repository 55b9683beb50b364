// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The boot entry repository.
//!
//! A [`Repository`] is an immutable snapshot of the boot configuration, as printed by the boot manager. It is
//! never modified. Edits are recorded separately in a [`crate::draft::Draft`], and after they are written the
//! repository is simply loaded again.

use std::{collections::HashSet, io};

use log::{debug, warn};
use thiserror::Error;

use crate::{
    repository::{
        device::Device,
        parser::{Listing, parse_listing},
        types::BootNum,
    },
    system::{runner::BootManager, sysinfo::SystemInfo},
};

pub mod device;
pub mod types;

pub(crate) mod parser;

/// Errors that may result from loading a [`Repository`].
#[derive(Error, Debug)]
pub enum LoadError {
    /// The boot manager program could not be found.
    #[error("Boot manager not found, is efibootmgr installed and in $PATH?")]
    Missing,

    /// The boot manager program could not be started.
    #[error("Could not run boot manager: {0}")]
    Spawn(#[source] io::Error),

    /// The boot manager exited with an error and printed nothing that could be understood.
    #[error("Boot manager failed with status {status:?}: {}", .stderr.trim())]
    Failed {
        /// The exit code, if there was one.
        status: Option<i32>,

        /// What the boot manager printed to standard error.
        stderr: String,
    },
}

/// One boot option of the firmware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootEntry {
    /// The boot number, which identifies the entry.
    pub id: BootNum,

    /// The label shown in the firmware's boot menu.
    pub label: String,

    /// The full device path, as printed.
    pub device_path: String,

    /// The device path split up for display.
    pub device: Device,

    /// If the firmware will consider this entry at a normal boot.
    pub active: bool,

    /// The position of this entry in the repository, starting at 0.
    pub order: usize,
}

/// A snapshot of the boot configuration.
///
/// The entries are in boot order. Entries that are not in the `BootOrder` variable come last, in the order
/// they were printed, so that every entry has a position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Repository {
    /// The entries, in boot order.
    entries: Vec<BootEntry>,

    /// The boot menu timeout in seconds, if set.
    timeout: Option<u16>,

    /// The entry that will be booted next only, if set.
    boot_next: Option<BootNum>,

    /// The entry that was booted this time, if known.
    boot_current: Option<BootNum>,
}

impl Repository {
    /// Loads the boot configuration through a [`BootManager`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the boot manager could not be run, or if it exited with an error and printed
    /// nothing that could be parsed.
    pub fn load<M: BootManager + ?Sized>(manager: &mut M) -> Result<Self, LoadError> {
        let output = manager.list().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::Missing,
            _ => LoadError::Spawn(e),
        })?;

        let listing = parse_listing(&output.stdout);
        if !output.success() && listing.recognized == 0 {
            return Err(LoadError::Failed {
                status: output.status,
                stderr: output.stderr,
            });
        }
        if !output.success() {
            warn!(
                "Boot manager exited with status {:?}, using the partial listing: {}",
                output.status,
                output.stderr.trim()
            );
        }

        Ok(Self::from_listing(listing, &SystemInfo::gather()))
    }

    /// Parses the text of a listing.
    ///
    /// This never fails, anything that cannot be understood is left out.
    #[must_use = "Has no effect if the result is unused"]
    pub fn parse(content: &str, sysinfo: &SystemInfo) -> Self {
        Self::from_listing(parse_listing(content), sysinfo)
    }

    /// Builds the snapshot out of a [`Listing`].
    fn from_listing(listing: Listing, sysinfo: &SystemInfo) -> Self {
        let Listing {
            entries: raw,
            boot_order,
            boot_next,
            boot_current,
            timeout,
            ..
        } = listing;

        let mut seen = HashSet::new();
        let raw: Vec<_> = raw
            .into_iter()
            .filter(|entry| {
                let first = seen.insert(entry.id);
                if !first {
                    warn!("Ignoring duplicate entry Boot{}", entry.id);
                }
                first
            })
            .collect();

        let mut sequence = Vec::with_capacity(raw.len());
        for id in boot_order.unwrap_or_default() {
            if sequence.contains(&id) {
                continue;
            }
            if raw.iter().any(|entry| entry.id == id) {
                sequence.push(id);
            } else {
                warn!("BootOrder refers to Boot{id}, which does not exist");
            }
        }
        for entry in &raw {
            if !sequence.contains(&entry.id) {
                debug!("Boot{} is not in BootOrder", entry.id);
                sequence.push(entry.id);
            }
        }

        let entries = sequence
            .iter()
            .enumerate()
            .filter_map(|(order, id)| {
                let entry = raw.iter().find(|entry| entry.id == *id)?;
                Some(BootEntry {
                    id: entry.id,
                    label: entry.label.clone(),
                    device_path: entry.device_path.clone(),
                    device: Device::new(&entry.device_path, sysinfo),
                    active: entry.active,
                    order,
                })
            })
            .collect();

        Self {
            entries,
            timeout,
            boot_next,
            boot_current,
        }
    }

    /// Returns every entry in boot order.
    #[must_use = "Has no effect if the result is unused"]
    pub fn entries(&self) -> &[BootEntry] {
        &self.entries
    }

    /// Returns the entry with the given boot number, if there is one.
    #[must_use = "Has no effect if the result is unused"]
    pub fn get(&self, id: BootNum) -> Option<&BootEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns the position of an entry in boot order.
    #[must_use = "Has no effect if the result is unused"]
    pub fn position(&self, id: BootNum) -> Option<usize> {
        self.get(id).map(|entry| entry.order)
    }

    /// Checks if an entry exists.
    #[must_use = "Has no effect if the result is unused"]
    pub fn contains(&self, id: BootNum) -> bool {
        self.get(id).is_some()
    }

    /// Returns the boot numbers in boot order.
    #[must_use = "Has no effect if the result is unused"]
    pub fn ids(&self) -> Vec<BootNum> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Returns how many entries there are.
    #[must_use = "Has no effect if the result is unused"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if there are no entries.
    #[must_use = "Has no effect if the result is unused"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the boot menu timeout in seconds.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn timeout(&self) -> Option<u16> {
        self.timeout
    }

    /// Returns the entry that will be booted next only.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn boot_next(&self) -> Option<BootNum> {
        self.boot_next
    }

    /// Returns the entry the system was booted from.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn boot_current(&self) -> Option<BootNum> {
        self.boot_current
    }
}
