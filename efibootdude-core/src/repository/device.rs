// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Turns a device path into something a person can read.
//!
//! A typical device path looks like `HD(1,GPT,<partuuid>,0x800,0x100000)/File(\EFI\ubuntu\shimx64.efi)`.
//! [`Device`] splits out the loader path, and finds where the partition is on this system, so it can be shown
//! as `/boot/efi \EFI\ubuntu\shimx64.efi` instead.

use crate::system::{
    helper::{extract_uuids, replace_node},
    sysinfo::SystemInfo,
};

/// A device path split into the parts worth showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    /// The mount point or device node of the partition, if it is known to this system.
    pub location: Option<String>,

    /// The loader path on the partition, such as `\EFI\ubuntu\shimx64.efi`.
    pub loader: Option<String>,

    /// What remains of the device path once the loader is taken out.
    pub rest: String,
}

impl Device {
    /// Splits up a device path, resolving its partition through the [`SystemInfo`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(device_path: &str, sysinfo: &SystemInfo) -> Self {
        let (loader, rest) = split_loader(device_path);
        let location = extract_uuids(&rest)
            .iter()
            .find_map(|uuid| sysinfo.locate(uuid))
            .map(str::to_owned);
        Self {
            location,
            loader,
            rest,
        }
    }

    /// Describes the device in one line.
    ///
    /// With `verbose` unset, long firmware paths are replaced by short tags such as `[Firmware]`.
    #[must_use = "Has no effect if the result is unused"]
    pub fn summary(&self, verbose: bool) -> String {
        let rest = if verbose {
            self.rest.clone()
        } else {
            terse(&self.rest)
        };
        let parts = match (&self.location, &self.loader) {
            (Some(location), Some(loader)) => [location.as_str(), loader.as_str()],
            (Some(location), None) => [location.as_str(), rest.as_str()],
            (None, Some(loader)) => [loader.as_str(), rest.as_str()],
            (None, None) => [rest.as_str(), ""],
        };
        parts
            .iter()
            .filter(|x| !x.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Takes the loader path out of a device path.
///
/// The loader is either in a `File(...)` node, or is a bare `\`-prefixed node after a `/`.
fn split_loader(device_path: &str) -> (Option<String>, String) {
    if let Some(start) = device_path.find("File(\\") {
        let inner = start + "File(".len();
        let end = device_path[inner..]
            .find(')')
            .map_or(device_path.len(), |x| x + inner);
        let loader = device_path[inner..end].to_owned();
        let node_start = if device_path[..start].ends_with('/') {
            start - 1
        } else {
            start
        };
        let node_end = (end + 1).min(device_path.len());
        let rest = format!("{}{}", &device_path[..node_start], &device_path[node_end..]);
        return (Some(loader), rest);
    }

    if let Some(start) = device_path.find("/\\") {
        let end = device_path[start + 1..]
            .find(['/', '(', ')'])
            .map_or(device_path.len(), |x| x + start + 1);
        let loader = device_path[start + 1..end].to_owned();
        let rest = format!("{}{}", &device_path[..start], &device_path[end..]);
        return (Some(loader), rest);
    }

    (None, device_path.to_owned())
}

/// Replaces the noisiest firmware path nodes with short tags.
fn terse(rest: &str) -> String {
    let mut rest = rest.to_owned();

    if let Some(firmware) = replace_node(&rest, "FvVol(", "[Firmware]") {
        rest = replace_node(&firmware, "/FvFile(", "").unwrap_or(firmware);
    }

    if let Some(idx) = rest.find("{auto_created_boot_option}") {
        let prefix = rest[..idx].find("PciRoot(").unwrap_or(idx);
        rest = format!(
            "{}[Auto]{}",
            &rest[..prefix],
            &rest[idx + "{auto_created_boot_option}".len()..]
        );
    }

    for (node, tag) in [("VenHw(", "[Vendor HW]"), ("VenMsg(", "[Vendor Msg]")] {
        if let Some(idx) = rest.find(node) {
            let cut = if rest[..idx].ends_with('/') { idx - 1 } else { idx };
            rest = format!("{}{tag}", &rest[..cut]);
        }
    }

    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "cd15e3b1-a1b2-4c3d-8e9f-0123456789ab";

    #[test]
    fn test_file_node() {
        let path = format!("HD(1,GPT,{UUID},0x800,0x100000)/File(\\EFI\\ubuntu\\shimx64.efi)");
        let device = Device::new(&path, &SystemInfo::default());
        assert_eq!(device.loader.as_deref(), Some("\\EFI\\ubuntu\\shimx64.efi"));
        assert_eq!(device.rest, format!("HD(1,GPT,{UUID},0x800,0x100000)"));
        assert!(device.location.is_none());
    }

    #[test]
    fn test_location() {
        let path = format!("HD(1,GPT,{UUID},0x800,0x100000)/File(\\EFI\\ubuntu\\shimx64.efi)");
        let sysinfo = SystemInfo::default().with_partition(UUID, "/boot/efi");
        let device = Device::new(&path, &sysinfo);
        assert_eq!(device.location.as_deref(), Some("/boot/efi"));
        assert_eq!(device.summary(false), "/boot/efi \\EFI\\ubuntu\\shimx64.efi");
    }

    #[test]
    fn test_bare_loader() {
        let (loader, rest) = split_loader("HD(2,GPT,x)/\\EFI\\BOOT\\BOOTX64.EFI");
        assert_eq!(loader.as_deref(), Some("\\EFI\\BOOT\\BOOTX64.EFI"));
        assert_eq!(rest, "HD(2,GPT,x)");
    }

    #[test]
    fn test_terse_firmware() {
        let device = Device::new(
            "FvVol(7cb8bdc9-f8eb-4f34-aaea-3ee4af6516a1)/FvFile(462caa21-7614-4503-836e-8ab6f4662331)",
            &SystemInfo::default(),
        );
        assert_eq!(device.summary(false), "[Firmware]");
        assert!(device.summary(true).starts_with("FvVol("));
    }

    #[test]
    fn test_terse_auto_and_vendor() {
        assert_eq!(
            terse("PciRoot(0x0)/Pci(0x14,0x0)/USB(1,0){auto_created_boot_option}"),
            "[Auto]"
        );
        assert_eq!(
            terse("PciRoot(0x0)/VenHw(99e275e7-75a0-4b37-a2e6-c5385e6c00cb)"),
            "PciRoot(0x0)[Vendor HW]"
        );
        assert_eq!(terse("VenMsg(abc)/Uri()"), "[Vendor Msg]");
    }

    #[test]
    fn test_empty_path() {
        let device = Device::new("", &SystemInfo::default());
        assert_eq!(device.summary(false), "");
    }
}
