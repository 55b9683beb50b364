// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Simple backend for the [`log`] crate.
//!
//! A full screen terminal interface cannot have log lines written over it, so where the records go is
//! chosen at startup with a [`LogSink`].

use std::{
    fs::File,
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use log::{Metadata, Record};

/// Where a [`DudeLogger`] writes its records.
pub enum LogSink {
    /// Records are dropped.
    Discard,

    /// Records are written to standard error.
    Stderr,

    /// Records are appended to a file.
    File(File),
}

/// A simple logging backend.
pub struct DudeLogger {
    /// The current destination of log records.
    sink: Mutex<LogSink>,
}

impl DudeLogger {
    /// Constructs a new [`DudeLogger`] that discards everything until a sink is set.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self {
            sink: Mutex::new(LogSink::Discard),
        }
    }

    /// Changes where the records are written.
    pub fn set_sink(&self, sink: LogSink) {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = sink;
    }
}

impl Default for DudeLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for DudeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level = record.level();
            let file = record.file().unwrap_or_default();
            let line = record.line().unwrap_or_default();
            let args = record.args();
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = match &mut *sink {
                LogSink::Discard => Ok(()),
                LogSink::Stderr => writeln!(io::stderr(), "[{level} {file}:{line}] - {args}"),
                LogSink::File(file_sink) => writeln!(file_sink, "[{level} {file}:{line}] - {args}"),
            };
        }
    }

    fn flush(&self) {
        if let LogSink::File(file) = &mut *self.sink.lock().unwrap_or_else(PoisonError::into_inner) {
            let _ = file.flush();
        }
    }
}
