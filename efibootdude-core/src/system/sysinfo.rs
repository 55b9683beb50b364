// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Mounts and partitions of the running system.
//!
//! `efibootmgr` only knows about partitions by their GPT partition GUID. To show something more useful than
//! a GUID, [`SystemInfo`] maps those GUIDs to where the partition is mounted, or to its device node if it is
//! not mounted.

use std::{collections::HashMap, fs, path::Path};

use log::debug;

/// Where the kernel lists the current mounts.
const MOUNTS_PATH: &str = "/proc/mounts";

/// Where udev links partitions by their partition GUID.
const PARTUUID_PATH: &str = "/dev/disk/by-partuuid";

/// A snapshot of the system's mounts and partitions.
#[derive(Clone, Debug, Default)]
pub struct SystemInfo {
    /// Maps a device node such as `/dev/nvme0n1p1` to its mount point.
    mounts: HashMap<String, String>,

    /// Maps a lowercase partition GUID to its mount point, or device node if it is not mounted.
    partitions: HashMap<String, String>,
}

impl SystemInfo {
    /// Gathers the mounts and partitions of the running system.
    ///
    /// This never fails. Anything that cannot be read, such as on a system without udev, is simply
    /// left out.
    #[must_use = "Has no effect if the result is unused"]
    pub fn gather() -> Self {
        let mounts = match fs::read_to_string(MOUNTS_PATH) {
            Ok(content) => parse_mounts(&content),
            Err(e) => {
                debug!("Could not read {MOUNTS_PATH}: {e}");
                HashMap::new()
            }
        };

        let mut info = Self {
            mounts,
            partitions: HashMap::new(),
        };
        info.scan_partitions(Path::new(PARTUUID_PATH));
        info
    }

    /// Adds a partition by its GUID with a known location. Mostly useful for a listing captured on
    /// another machine, and for tests.
    #[must_use = "Has no effect if the result is unused"]
    pub fn with_partition(mut self, uuid: &str, location: impl Into<String>) -> Self {
        self.partitions
            .insert(uuid.to_ascii_lowercase(), location.into());
        self
    }

    /// Returns the mount point or device node of a partition given its GUID.
    #[must_use = "Has no effect if the result is unused"]
    pub fn locate(&self, uuid: &str) -> Option<&str> {
        self.partitions
            .get(&uuid.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Resolves every link in the partition GUID directory.
    fn scan_partitions(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Could not read {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let Ok(device) = fs::canonicalize(entry.path()) else {
                continue;
            };
            let device = device.to_string_lossy().into_owned();
            let uuid = entry.file_name().to_string_lossy().to_ascii_lowercase();
            let location = self.mounts.get(&device).cloned().unwrap_or(device);
            self.partitions.insert(uuid, location);
        }
    }
}

/// Parses the contents of `/proc/mounts` into a map of device to mount point.
///
/// If a device is mounted more than once, the first mount wins.
fn parse_mounts(content: &str) -> HashMap<String, String> {
    let mut mounts = HashMap::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        if let (Some(device), Some(mount_point)) = (fields.next(), fields.next()) {
            mounts
                .entry(device.to_owned())
                .or_insert_with(|| unescape_mount(mount_point));
        }
    }
    mounts
}

/// Undoes the octal escaping the kernel uses for spaces and tabs in mount points.
fn unescape_mount(field: &str) -> String {
    field
        .replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\134", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mounts() {
        let content = "\
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
/dev/nvme0n1p1 /boot/efi vfat rw,relatime 0 0
/dev/sdb1 /media/my\\040disk ext4 rw 0 0
/dev/nvme0n1p1 /mnt/again vfat rw 0 0
";
        let mounts = parse_mounts(content);
        assert_eq!(mounts.get("/dev/nvme0n1p1").map(String::as_str), Some("/boot/efi"));
        assert_eq!(mounts.get("/dev/sdb1").map(String::as_str), Some("/media/my disk"));
        assert_eq!(mounts.len(), 3);
    }

    #[test]
    fn test_locate_ignores_case() {
        let info = SystemInfo::default()
            .with_partition("CD15E3B1-A1B2-4C3D-8E9F-0123456789AB", "/boot/efi");
        assert_eq!(
            info.locate("cd15e3b1-a1b2-4c3d-8e9f-0123456789ab"),
            Some("/boot/efi")
        );
        assert_eq!(info.locate("00000000-0000-0000-0000-000000000000"), None);
    }
}
