// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A command line interface frontend to `efibootdude`.

use std::{env, path::PathBuf, process::ExitCode};

use efibootdude_core::{
    BootResult,
    repository::Repository,
    system::{
        log_backend::{DudeLogger, LogSink},
        runner::{DEFAULT_PROGRAM, Efibootmgr},
    },
};
use getargs::{Arg, Options};

/// The global logging instance.
static LOGGER: DudeLogger = DudeLogger::new();

/// Prints every entry in boot order, after the global values of the listing.
fn print_entries(repository: &Repository) {
    if let Some(current) = repository.boot_current() {
        println!("BootCurrent: {current}");
    }
    if let Some(next) = repository.boot_next() {
        println!("BootNext: {next}");
    }
    if let Some(timeout) = repository.timeout() {
        println!("Timeout: {timeout} seconds");
    }

    for entry in repository.entries() {
        let active = if entry.active { '*' } else { ' ' };
        println!(
            "{}: Boot{}{active} {} ({})",
            entry.order,
            entry.id,
            entry.label,
            entry.device.summary(true),
        );
    }
}

/// The actual main function of the program.
///
/// # Errors
///
/// May return an `Error` if the boot configuration could not be loaded.
fn main_func() -> BootResult<()> {
    let mut args = env::args();
    let app_filename = args.next().unwrap_or_else(|| "efibootdude-cli".to_owned()); // there is usually at least one argument, which is the filename
    let args: Vec<String> = args.collect();

    LOGGER.set_sink(LogSink::Stderr);
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Warn));

    let mut list = false;
    let mut file = None;
    let mut program = DEFAULT_PROGRAM.to_owned();

    let mut opts = Options::new(args.iter().map(String::as_str));
    while let Ok(Some(arg)) = opts.next_arg() {
        match arg {
            Arg::Short('l') | Arg::Long("list") => list = true,
            Arg::Short('f') | Arg::Long("file") => {
                let Ok(value) = opts.value() else {
                    println!("Error: A path was not passed into the file argument");
                    return Ok(());
                };
                file = Some(PathBuf::from(value));
            }
            Arg::Short('p') | Arg::Long("program") => {
                let Ok(value) = opts.value() else {
                    println!("Error: A program was not passed into the program argument");
                    return Ok(());
                };
                value.clone_into(&mut program);
            }
            Arg::Short('h') | Arg::Long("help") => {
                list = false;
                break; // ignore any other arguments and break out of the while loop when help is specified
            }
            Arg::Short(invalid) => println!("Error: Unknown short argument: -{invalid}"),
            Arg::Long(invalid) => println!("Error: Unknown long argument: --{invalid}"),
            Arg::Positional(invalid) => println!("Error: Unknown positional argument: {invalid}"),
        }
    }

    if list {
        let mut manager = Efibootmgr::new(program).listing(file);
        let repository = Repository::load(&mut manager)?;
        print_entries(&repository);
        return Ok(());
    }

    println!(
        r"Usage: {app_filename} [OPTIONS]

-h, --help           display this help and exit
-l, --list           display boot entries and exit
-f, --file FILE      read the efibootmgr listing from FILE
-p, --program PROG   run PROG instead of efibootmgr
"
    );

    Ok(())
}

/// The main function of the program.
///
/// Errors are printed instead of panicking.
fn main() -> ExitCode {
    main_func().map_or_else(
        |e| {
            println!("Error: {e}");
            ExitCode::FAILURE
        },
        |()| ExitCode::SUCCESS,
    )
}
