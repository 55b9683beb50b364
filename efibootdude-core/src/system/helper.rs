// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Various helper functions for other modules.

use smallvec::SmallVec;

/// The length of a textual GUID, such as `25d2dea1-9f68-1644-91dd-4836c0b3a30a`.
const UUID_LEN: usize = 36;

/// Tests if a string is a textual GUID.
///
/// Returns true if the string is exactly 36 characters in the `8-4-4-4-12` grouping, with every
/// other character a hex digit. Otherwise, will return false.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn check_uuid_valid(uuid: &str) -> bool {
    uuid.len() == UUID_LEN
        && uuid.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// Finds every textual GUID in a device path, in order of appearance.
///
/// The GUIDs are lowercased, which is how `/dev/disk/by-partuuid` names them.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn extract_uuids(path: &str) -> SmallVec<[String; 2]> {
    path.split(|c: char| !(c.is_ascii_hexdigit() || c == '-'))
        .flat_map(|word| {
            // a GUID may be glued to other hex digits by a dash, so look at every window
            (0..word.len().saturating_sub(UUID_LEN - 1)).filter_map(move |start| {
                let candidate = word.get(start..start + UUID_LEN)?;
                let bounded_left = start == 0 || word.as_bytes()[start - 1] == b'-';
                let bounded_right =
                    start + UUID_LEN == word.len() || word.as_bytes()[start + UUID_LEN] == b'-';
                (bounded_left && bounded_right && check_uuid_valid(candidate))
                    .then(|| candidate.to_ascii_lowercase())
            })
        })
        .collect()
}

/// Replaces the first match of a `Prefix(...)` group, including its closing parenthesis, with some text.
///
/// Returns [`None`] if there is no such group.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn replace_node(path: &str, prefix: &str, with: &str) -> Option<String> {
    let start = path.find(prefix)?;
    let close = path[start..].find(')')? + start;
    Some(format!("{}{with}{}", &path[..start], &path[close + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_valid() {
        assert!(check_uuid_valid("25d2dea1-9f68-1644-91dd-4836c0b3a30a"));
        assert!(check_uuid_valid("25D2DEA1-9F68-1644-91DD-4836C0B3A30A"));
        assert!(!check_uuid_valid("25d2dea1-9f68-1644-91dd-4836c0b3a30"));
        assert!(!check_uuid_valid("25d2dea1x9f68-1644-91dd-4836c0b3a30a"));
        assert!(!check_uuid_valid("g5d2dea1-9f68-1644-91dd-4836c0b3a30a"));
    }

    #[test]
    fn test_extract_uuids() {
        let path = "HD(1,GPT,CD15E3B1-A1B2-4C3D-8E9F-0123456789AB,0x800,0x100000)/File(\\EFI\\ubuntu\\shimx64.efi)";
        assert_eq!(
            extract_uuids(path).as_slice(),
            ["cd15e3b1-a1b2-4c3d-8e9f-0123456789ab"]
        );
        assert!(extract_uuids("PciRoot(0x0)/Pci(0x1,0x1)").is_empty());
    }

    #[test]
    fn test_replace_node() {
        assert_eq!(
            replace_node("FvVol(abc)/FvFile(def)", "FvVol(", "[Firmware]").as_deref(),
            Some("[Firmware]/FvFile(def)")
        );
        assert!(replace_node("HD(1)", "FvVol(", "x").is_none());
    }
}
