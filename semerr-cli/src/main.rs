//! semerr - semantic error scoring CLI
//!
//! Finds slot realizations in NLG outputs and compares them with the input
//! meaning representations.
//!
//! # Usage
//!
//! ```bash
//! # Score one system output; report on stdout
//! semerr score outputs.tsv
//!
//! # Also write per-instance statistics and a corrected dataset
//! semerr score -d dump.tsv -f fixed.csv outputs.csv
//!
//! # Several systems against TGen MRs; summary CSV on stdout
//! semerr score --mrs test-das.txt system-a.txt system-b.txt
//!
//! # One text
//! semerr check --mr "name[Aromi], eatType[pub]" Aromi is a pub.
//! ```
//!
//! Logging goes to stderr. `RUST_LOG` applies unless `-v` or `-q` is given.

use std::process::ExitCode;

use clap::Parser;
use semerr::cli::commands::{catalog, check, dedup, score};
use semerr::cli::output::color;
use semerr::cli::parser::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    tracing::debug!("semerr {}", env!("CARGO_PKG_VERSION"));

    let quiet = cli.quiet;
    let result: Result<(), String> = match cli.command {
        Commands::Score(args) => score::run(args, quiet),
        Commands::Check(args) => check::run(args, quiet),
        Commands::Dedup(args) => dedup::run(args, quiet),
        Commands::Catalog(args) => catalog::run(args, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
