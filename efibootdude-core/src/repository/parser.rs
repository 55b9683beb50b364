// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A parser for the listing that `efibootmgr` prints when run without arguments.
//!
//! Example listing:
//!
//! ```text
//! BootCurrent: 0001
//! Timeout: 1 seconds
//! BootOrder: 0001,0000,0002
//! Boot0000* Windows Boot Manager	HD(1,GPT,cd15e3b1-a1b2-4c3d-8e9f-0123456789ab,0x800,0x32000)/File(\EFI\Microsoft\Boot\bootmgfw.efi)
//! Boot0001* ubuntu	HD(1,GPT,cd15e3b1-a1b2-4c3d-8e9f-0123456789ab,0x800,0x32000)/File(\EFI\ubuntu\shimx64.efi)
//! Boot0002  UEFI: PXE IPv4	PciRoot(0x0)/Pci(0x1c,0x0)/MAC(001122334455,0)/IPv4(0.0.0.0)
//! ```
//!
//! The `*` marks an active entry, and the label is separated from the device path by a tab.

use log::warn;

use crate::repository::types::BootNum;

/// One `BootXXXX` line of the listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawEntry {
    /// The boot number.
    pub id: BootNum,

    /// Whether the entry was marked with a `*`.
    pub active: bool,

    /// The label.
    pub label: String,

    /// The device path text, possibly empty.
    pub device_path: String,
}

/// Everything that could be read out of a listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Listing {
    /// The `BootXXXX` lines in the order they were printed.
    pub entries: Vec<RawEntry>,

    /// The `BootOrder` line, if there was one.
    pub boot_order: Option<Vec<BootNum>>,

    /// The `BootNext` line, if there was one.
    pub boot_next: Option<BootNum>,

    /// The `BootCurrent` line, if there was one.
    pub boot_current: Option<BootNum>,

    /// The `Timeout` line, if there was one.
    pub timeout: Option<u16>,

    /// How many lines were understood.
    pub recognized: usize,
}

/// Parses the text of a listing.
///
/// This never fails. Lines that cannot be understood are skipped, with a warning if they looked like they
/// were meant to be understood.
pub(crate) fn parse_listing(content: &str) -> Listing {
    let mut listing = Listing::default();

    for line in content.lines() {
        let line = line.trim_end();
        let (key, value) = match line.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (line, ""),
        };

        let understood = match key {
            "BootOrder:" => {
                listing.boot_order = Some(parse_boot_order(value));
                true
            }
            "BootNext:" => {
                listing.boot_next = parse_boot_num(key, value);
                listing.boot_next.is_some()
            }
            "BootCurrent:" => {
                listing.boot_current = parse_boot_num(key, value);
                listing.boot_current.is_some()
            }
            "Timeout:" => {
                listing.timeout = parse_timeout(value);
                listing.timeout.is_some()
            }
            _ => match parse_entry(line) {
                Some(entry) => {
                    listing.entries.push(entry);
                    true
                }
                None => false,
            },
        };

        if understood {
            listing.recognized += 1;
        }
    }

    listing
}

/// Parses a `BootXXXX` line into a [`RawEntry`].
///
/// Returns [`None`] if the line is not an entry line.
fn parse_entry(line: &str) -> Option<RawEntry> {
    let rest = line.strip_prefix("Boot")?;
    let id = BootNum::new(rest.get(..4)?).ok()?;
    let rest = rest.get(4..)?;

    let (active, rest) = match rest.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    // the number must be followed by a separator, so that something like Boot00012 is not an entry
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }

    let rest = rest.trim_start_matches(' ');
    let (label, device_path) = rest.split_once('\t').unwrap_or((rest, ""));

    Some(RawEntry {
        id,
        active,
        label: label.trim().to_owned(),
        device_path: device_path.trim().to_owned(),
    })
}

/// Parses the value of a `BootOrder` line.
fn parse_boot_order(value: &str) -> Vec<BootNum> {
    value
        .split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .filter_map(|x| match BootNum::new(x) {
            Ok(num) => Some(num),
            Err(e) => {
                warn!("Skipping BootOrder element: {e}");
                None
            }
        })
        .collect()
}

/// Parses the value of a line holding a single boot number.
fn parse_boot_num(key: &str, value: &str) -> Option<BootNum> {
    match BootNum::new(value) {
        Ok(num) => Some(num),
        Err(e) => {
            warn!("Skipping {key} line: {e}");
            None
        }
    }
}

/// Parses the value of a `Timeout` line, such as `5 seconds`.
fn parse_timeout(value: &str) -> Option<u16> {
    let seconds = value.split_whitespace().next()?;
    match seconds.parse() {
        Ok(seconds) => Some(seconds),
        Err(e) => {
            warn!("Skipping Timeout line \"{value}\": {e}");
            None
        }
    }
}
