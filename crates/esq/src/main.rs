//! Command-line interface for `esq`, the filter-to-Query-DSL compiler.

mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(cli.plain),
        _ => CommandContext::load(cli.plain),
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}

/// Installs the stderr log subscriber.
///
/// `-v`/`-vv` force debug/trace; otherwise `RUST_LOG` applies, defaulting to warnings only.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
