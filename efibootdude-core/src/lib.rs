// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `efibootdude` library crate.
//!
//! This holds everything about editing an EFI boot configuration that is not a terminal: the parsed
//! [`repository::Repository`] snapshot, the [`draft::Draft`] of pending edits, the [`plan`] that turns
//! those edits into `efibootmgr` invocations, the [`exec`] stage that runs them, and the
//! [`controller::Controller`] that ties those together for a frontend.
//!
//! Nothing in here reads or writes EFI variables directly. All of that goes through the
//! [`system::runner::BootManager`] seam, which is normally backed by the `efibootmgr` command.
//!
//! The interactive frontend lives in `efibootdude-ratatui`, and a non-interactive one in `efibootdude-cli`.
//!
//! ## MSRV
//!
//! The minimum supported rust version is 1.88.0.

/// The primary result type that wraps around [`crate::error::BootError`].
pub type BootResult<T> = Result<T, crate::error::BootError>;

pub mod controller;
pub mod draft;
pub mod error;
pub mod exec;
pub mod plan;
pub mod repository;
pub mod system;
