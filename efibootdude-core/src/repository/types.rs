// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! `newtype` definitions for fields of [`super::BootEntry`]
//!
//! At the moment, this includes the following type definitions:
//! - [`BootNum`] (constructor enforces exactly 4 hex digits, and will uppercase when displayed)

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors that may happen from invalid inputs to the respective constructors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// The boot number was invalid.
    #[error("\"{0}\" is not a valid boot number")]
    BootNum(String),
}

/// A newtype wrapper around a valid boot number, the `XXXX` in `BootXXXX`.
///
/// The firmware identifies load options by a 16 bit number which `efibootmgr` always prints as 4
/// hexadecimal digits. Two boot numbers that only differ in case are the same boot number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BootNum(u16);

impl BootNum {
    /// Creates a new [`BootNum`] from its textual form.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the boot number is not exactly 4 hexadecimal digits.
    pub fn new(num: &str) -> Result<Self, TypeError> {
        if num.len() == 4 && num.chars().all(|c| c.is_ascii_hexdigit()) {
            u16::from_str_radix(num, 16)
                .map(Self)
                .map_err(|_| TypeError::BootNum(num.to_owned()))
        } else {
            Err(TypeError::BootNum(num.to_owned()))
        }
    }

    /// Creates a [`BootNum`] from the raw 16 bit number.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn from_raw(num: u16) -> Self {
        Self(num)
    }

    /// Returns the raw 16 bit number.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for BootNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl FromStr for BootNum {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() -> Result<(), TypeError> {
        assert_eq!(BootNum::new("001a")?, BootNum::new("001A")?);
        assert_eq!(BootNum::new("001a")?.to_string(), "001A");
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(BootNum::new("1").is_err());
        assert!(BootNum::new("00001").is_err());
        assert!(BootNum::new("00g1").is_err());
        assert!(BootNum::new("+001").is_err());
        assert!(BootNum::new("").is_err());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(BootNum::from_raw(2).to_string(), "0002");
    }
}
