// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `efibootdude` application.
//!
//! This provides a [`main`] function that loads the boot configuration through `efibootmgr`, then runs the
//! full screen editor until the user quits or asks for a reboot.

use std::{
    fs::OpenOptions,
    io::{self, Stdout},
    panic,
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use duct::cmd;
use efibootdude_core::{
    controller::Controller,
    repository::LoadError,
    system::{
        log_backend::{DudeLogger, LogSink},
        runner::Efibootmgr,
    },
};
use log::{LevelFilter, info};
use ratatui_core::terminal::Terminal;
use ratatui_crossterm::{
    CrosstermBackend,
    crossterm::{
        cursor::Show,
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use thiserror::Error;

use crate::{
    app::{App, AppState},
    config::DudeConfig,
    ui::theme::Theme,
};

mod app;
mod config;
mod editor;
mod ui;

/// The global logging instance.
static LOGGER: DudeLogger = DudeLogger::new();

/// An interactive editor for the EFI boot entries, using `efibootmgr`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read the boot listing from this file instead of running efibootmgr (implies --dry-run)
    listing: Option<PathBuf>,

    /// The efibootmgr program to run
    #[arg(short, long)]
    program: Option<String>,

    /// Run efibootmgr directly instead of through sudo
    #[arg(long, default_value_t = false)]
    no_sudo: bool,

    /// Log the commands instead of running them
    #[arg(short = 'n', long, default_value_t = false)]
    dry_run: bool,

    /// Read the configuration from this file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append log records to this file
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Log debug records and show full device paths
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// An error that may occur when running the application.
#[derive(Error, Debug)]
pub enum MainError {
    /// The boot configuration could not be loaded.
    #[error("Load Error: {0}")]
    LoadError(#[from] LoadError),

    /// An error occurred while running the App.
    #[error("App Error: {0}")]
    AppError(#[from] crate::app::AppError),

    /// An error occurred with the terminal, a file, or a command.
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),
}

/// Sets up the terminal for drawing the full screen UI.
///
/// # Errors
///
/// May return an `Error` if the terminal could not be switched to raw mode or to the alternate screen.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Returns the terminal to how it was before [`init_terminal`].
///
/// # Errors
///
/// May return an `Error` if the terminal could not be switched back.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Takes the terminal back after [`restore_terminal`], redrawing everything on the next frame.
///
/// # Errors
///
/// May return an `Error` if the terminal could not be switched to raw mode or to the alternate screen.
fn resume_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    terminal.clear()
}

/// Reboots the machine with `reboot now`.
///
/// # Errors
///
/// May return an `Error` if the command could not be run, or did not succeed.
fn reboot(sudo: bool, dry_run: bool) -> io::Result<()> {
    if dry_run {
        println!("Dry run, not rebooting");
        return Ok(());
    }

    info!("Rebooting");
    let expr = if sudo {
        cmd!("sudo", "reboot", "now")
    } else {
        cmd!("reboot", "now")
    };
    expr.run()?;
    Ok(())
}

/// The actual main function of the program.
///
/// # Errors
///
/// May return an `Error` if the boot configuration could not be loaded, the terminal could not be used, or the
/// reboot failed.
fn main_func() -> Result<(), MainError> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level)); // if the logger was already set, then ignore it
    if let Some(path) = &args.log {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        LOGGER.set_sink(LogSink::File(file));
    }

    let config = DudeConfig::new(args.config.as_deref())?;
    let sudo = config.sudo && !args.no_sudo;
    let dry_run = args.dry_run || args.listing.is_some();
    let program = args.program.unwrap_or_else(|| config.program.clone());

    let manager = Efibootmgr::new(program)
        .sudo(sudo)
        .listing(args.listing)
        .dry_run(dry_run);
    let controller = Controller::new(manager)?;
    let mut app = App::new(controller, Theme::new(&config), config.verbose || args.verbose)?;

    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        hook(info);
    }));

    let mut terminal = init_terminal()?;
    let state = app.run(&mut terminal);
    restore_terminal()?;

    if state? == AppState::Rebooting {
        reboot(sudo, dry_run)?;
    }
    Ok(())
}

/// The main function of the program.
///
/// Errors are printed after the terminal has been restored, rather than panicking.
fn main() -> ExitCode {
    match main_func() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
