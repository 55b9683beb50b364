// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! An in-memory stand-in for `efibootmgr`, for tests.
//!
//! It keeps a small model of the boot variables, prints it in the same format as `efibootmgr`, and applies
//! the same arguments the planner produces to that model.

use std::io;

use crate::system::runner::{BootManager, CommandOutput};

/// One fake load option.
#[derive(Clone, Debug)]
pub(crate) struct FakeOption {
    /// The boot number as printed.
    pub num: String,

    /// The description.
    pub label: String,

    /// The device path text.
    pub path: String,

    /// The active attribute.
    pub active: bool,
}

/// A fake `efibootmgr` backed by memory.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeFirmware {
    /// The load options in listing order.
    pub options: Vec<FakeOption>,

    /// The `BootOrder` variable.
    pub order: Vec<String>,

    /// The `BootNext` variable.
    pub next: Option<String>,

    /// The `BootCurrent` variable.
    pub current: Option<String>,

    /// The `Timeout` variable.
    pub timeout: Option<u16>,

    /// Every modifying invocation, in order.
    pub invocations: Vec<Vec<String>>,

    /// How many times the listing was read.
    pub list_calls: usize,

    /// Invocations (by 0-based index into `invocations`) that fail with status 1.
    pub fail_invocations: Vec<usize>,

    /// Makes every listing fail after this many successful ones.
    pub list_fails_after: Option<usize>,
}

impl FakeFirmware {
    /// Creates a fake with options given as `(num, label, active)`. The boot order is the given order.
    pub(crate) fn with_options(options: &[(&str, &str, bool)]) -> Self {
        let options: Vec<_> = options
            .iter()
            .map(|&(num, label, active)| FakeOption {
                num: num.to_owned(),
                label: label.to_owned(),
                path: format!("HD(1,GPT,00000000-0000-0000-0000-00000000{num},0x800,0x100000)/File(\\EFI\\{label}\\grubx64.efi)"),
                active,
            })
            .collect();
        Self {
            order: options.iter().map(|x| x.num.clone()).collect(),
            options,
            ..Self::default()
        }
    }

    /// Prints the fake variables like `efibootmgr` does.
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        if let Some(next) = &self.next {
            out.push_str(&format!("BootNext: {next}\n"));
        }
        if let Some(current) = &self.current {
            out.push_str(&format!("BootCurrent: {current}\n"));
        }
        if let Some(timeout) = self.timeout {
            out.push_str(&format!("Timeout: {timeout} seconds\n"));
        }
        out.push_str(&format!("BootOrder: {}\n", self.order.join(",")));
        for option in &self.options {
            let star = if option.active { "*" } else { " " };
            out.push_str(&format!(
                "Boot{}{star} {}\t{}\n",
                option.num, option.label, option.path
            ));
        }
        out
    }

    /// Applies `efibootmgr` arguments to the model.
    fn apply(&mut self, args: &[String]) -> Result<(), String> {
        let mut bootnum = None;
        let mut iter = args.iter();
        let mut actions = Vec::new();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--bootnum" => bootnum = iter.next().cloned(),
                "--label" => actions.push(("label", iter.next().cloned())),
                "--bootorder" => actions.push(("order", iter.next().cloned())),
                "--bootnext" => actions.push(("next", iter.next().cloned())),
                "--timeout" => actions.push(("timeout", iter.next().cloned())),
                "--delete-bootnum" => actions.push(("delete", None)),
                "--delete-bootnext" => actions.push(("unnext", None)),
                "--active" => actions.push(("active", None)),
                "--inactive" => actions.push(("inactive", None)),
                other => return Err(format!("unrecognized option '{other}'")),
            }
        }

        for (action, value) in actions {
            match action {
                "label" | "delete" | "active" | "inactive" => {
                    let num = bootnum.clone().ok_or("no bootnum specified")?;
                    let idx = self
                        .options
                        .iter()
                        .position(|x| x.num == num)
                        .ok_or_else(|| format!("Could not find Boot{num}"))?;
                    match action {
                        "label" => self.options[idx].label = value.unwrap_or_default(),
                        "active" => self.options[idx].active = true,
                        "inactive" => self.options[idx].active = false,
                        _ => {
                            self.options.remove(idx);
                            self.order.retain(|x| *x != num);
                        }
                    }
                }
                "order" => {
                    self.order = value
                        .unwrap_or_default()
                        .split(',')
                        .map(str::to_owned)
                        .collect();
                }
                "next" => self.next = value,
                "unnext" => self.next = None,
                "timeout" => {
                    self.timeout = Some(
                        value
                            .unwrap_or_default()
                            .parse()
                            .map_err(|_| "invalid timeout")?,
                    );
                }
                _ => unreachable!(),
            }
        }
        Ok(())
    }
}

impl BootManager for FakeFirmware {
    fn list(&mut self) -> io::Result<CommandOutput> {
        if self
            .list_fails_after
            .is_some_and(|after| self.list_calls >= after)
        {
            return Ok(CommandOutput {
                status: Some(2),
                stdout: String::new(),
                stderr: "EFI variables are not supported on this system.\n".to_owned(),
            });
        }
        self.list_calls += 1;
        Ok(CommandOutput {
            status: Some(0),
            stdout: self.render(),
            stderr: String::new(),
        })
    }

    fn invoke(&mut self, args: &[String]) -> io::Result<CommandOutput> {
        let idx = self.invocations.len();
        self.invocations.push(args.to_vec());
        if self.fail_invocations.contains(&idx) {
            return Ok(CommandOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: "Could not set variable: Input/output error\n".to_owned(),
            });
        }
        match self.apply(args) {
            Ok(()) => Ok(CommandOutput {
                status: Some(0),
                ..CommandOutput::default()
            }),
            Err(e) => Ok(CommandOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: format!("{e}\n"),
            }),
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        format!("efibootmgr --quiet {}", args.join(" "))
    }
}
