use clap::{Parser, Subcommand};

use crate::fuzz::Fuzz;

mod build;
mod doc;
mod fuzz;
mod run;
mod test;

#[derive(Parser)]
#[command(about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build all crates in workspace
    Build {
        /// Build with release-lto profile
        #[arg(short, long, default_value_t = false)]
        release: bool,
    },

    /// Build docs for the efibootdude crates
    Doc {
        /// Document private items in crate
        #[arg(short, long, default_value_t = false)]
        private: bool,

        /// Open in web browser after documenting
        #[arg(short, long, default_value_t = false)]
        open: bool,
    },

    /// Run efibootdude, passing the remaining arguments through
    Run {
        /// Build with release-lto profile
        #[arg(short, long, default_value_t = false)]
        release: bool,

        /// Arguments for efibootdude
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Run clippy and the unit tests
    Test,

    /// Run a fuzz target
    Fuzz {
        #[command(subcommand)]
        command: Fuzz,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Build { release } => build::build_all_crates(release)?,
        Commands::Doc { private, open } => doc::doc_crate(private, open)?,
        Commands::Run { release, args } => run::run_efibootdude(release, &args)?,
        Commands::Test => test::test_crate()?,
        Commands::Fuzz { command } => fuzz::fuzz_parsers(command)?,
    }
    Ok(())
}
