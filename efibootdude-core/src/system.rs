// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! System re-exports

pub mod helper;
pub mod log_backend;
pub mod runner;
pub mod sysinfo;
