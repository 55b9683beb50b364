// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The seam between this crate and the external boot manager.
//!
//! Everything that touches the firmware goes through a [`BootManager`]. The real implementation,
//! [`Efibootmgr`], runs the `efibootmgr` command with [`duct`].

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Output,
};

use duct::cmd;
use log::{debug, info};

#[cfg(test)]
pub(crate) mod fake;

/// The default name of the external boot manager command.
pub const DEFAULT_PROGRAM: &str = "efibootmgr";

/// The exit status and text output of one command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// The exit code, or [`None`] if the command was killed by a signal or never started.
    pub status: Option<i32>,

    /// Everything the command printed to standard output.
    pub stdout: String,

    /// Everything the command printed to standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Checks if the command exited with status 0.
    #[must_use = "Has no effect if the result is unused"]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

impl From<Output> for CommandOutput {
    fn from(value: Output) -> Self {
        Self {
            status: value.status.code(),
            stdout: String::from_utf8_lossy(&value.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&value.stderr).into_owned(),
        }
    }
}

/// An implementation of an external boot manager.
///
/// Usually this will be [`Efibootmgr`].
pub trait BootManager {
    /// Reads the current boot configuration listing.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the command could not be started at all. A command that ran and failed is
    /// not an `Error`, its status is in the [`CommandOutput`].
    fn list(&mut self) -> io::Result<CommandOutput>;

    /// Runs one modifying invocation with the given arguments.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the command could not be started at all.
    fn invoke(&mut self, args: &[String]) -> io::Result<CommandOutput>;

    /// Returns the full command line that [`BootManager::invoke`] runs for some arguments.
    #[must_use = "Has no effect if the result is unused"]
    fn command_line(&self, args: &[String]) -> String;
}

/// The `efibootmgr` command.
///
/// Listing runs the plain command. Modifying invocations add `--quiet`, and when `sudo` is enabled they are
/// run through `sudo`, since writing EFI variables requires root.
#[derive(Clone, Debug)]
#[must_use = "Has no effect if the result is unused"]
pub struct Efibootmgr {
    /// The program to run.
    program: String,

    /// Runs modifying invocations through `sudo`.
    sudo: bool,

    /// Reads the listing from this file instead of running the program.
    listing: Option<PathBuf>,

    /// Logs modifying invocations instead of running them.
    dry_run: bool,
}

impl Efibootmgr {
    /// Creates a new [`Efibootmgr`] running the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            sudo: true,
            listing: None,
            dry_run: false,
        }
    }

    /// Sets if modifying invocations are run through `sudo`.
    pub const fn sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// Reads the listing from a file of captured `efibootmgr` output instead of running the program.
    pub fn listing(mut self, listing: Option<PathBuf>) -> Self {
        self.listing = listing;
        self
    }

    /// Sets if modifying invocations are only logged, not run.
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the program that is run.
    #[must_use = "Has no effect if the result is unused"]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the file the listing is read from, if there is one.
    #[must_use = "Has no effect if the result is unused"]
    pub fn listing_file(&self) -> Option<&Path> {
        self.listing.as_deref()
    }

    /// Builds the argument vector of a modifying invocation, with the program to run first.
    fn write_argv(&self, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 3);
        if self.sudo {
            argv.push("sudo".to_owned());
        }
        argv.push(self.program.clone());
        argv.push("--quiet".to_owned());
        argv.extend(args.iter().cloned());
        argv
    }
}

impl Default for Efibootmgr {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl BootManager for Efibootmgr {
    fn list(&mut self) -> io::Result<CommandOutput> {
        if let Some(listing) = &self.listing {
            debug!("Reading boot listing from {}", listing.display());
            return Ok(CommandOutput {
                status: Some(0),
                stdout: fs::read_to_string(listing)?,
                stderr: String::new(),
            });
        }

        let output = cmd(self.program.as_str(), Vec::<String>::new())
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;
        Ok(output.into())
    }

    fn invoke(&mut self, args: &[String]) -> io::Result<CommandOutput> {
        let line = self.command_line(args);
        if self.dry_run {
            info!("Dry run, not running: {line}");
            return Ok(CommandOutput {
                status: Some(0),
                stdout: format!("dry run: {line}\n"),
                stderr: String::new(),
            });
        }

        info!("Running: {line}");
        let argv = self.write_argv(args);
        let (program, rest) = argv.split_at(1);
        let output = cmd(program[0].as_str(), rest)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;
        Ok(output.into())
    }

    fn command_line(&self, args: &[String]) -> String {
        self.write_argv(args)
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quotes an argument for display if it would not survive a shell as a single word.
fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.,/=:+".contains(c))
    {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|&x| x.to_owned()).collect()
    }

    #[test]
    fn test_command_line_with_sudo() {
        let manager = Efibootmgr::default();
        assert_eq!(
            manager.command_line(&args(&["--bootnum", "0001", "--label", "My Linux"])),
            "sudo efibootmgr --quiet --bootnum 0001 --label 'My Linux'"
        );
    }

    #[test]
    fn test_command_line_without_sudo() {
        let manager = Efibootmgr::new("/usr/sbin/efibootmgr").sudo(false);
        assert_eq!(
            manager.command_line(&args(&["--bootorder", "0001,0000"])),
            "/usr/sbin/efibootmgr --quiet --bootorder 0001,0000"
        );
    }

    #[test]
    fn test_dry_run_does_not_spawn() -> io::Result<()> {
        // the program does not exist, so this would fail if it was spawned
        let mut manager = Efibootmgr::new("efibootdude-no-such-program").dry_run(true);
        let output = manager.invoke(&args(&["--timeout", "5"]))?;
        assert!(output.success());
        assert!(output.stdout.contains("--timeout 5"));
        Ok(())
    }

    #[test]
    fn test_missing_program() {
        let mut manager = Efibootmgr::new("efibootdude-no-such-program");
        let err = manager.list().err().map(|e| e.kind());
        assert_eq!(err, Some(io::ErrorKind::NotFound));
    }

    #[test]
    fn test_quote() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("0001,0002"), "0001,0002");
    }
}
