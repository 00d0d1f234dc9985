//! Command implementations and dispatch.

pub mod aggregate;
pub mod check;
pub mod compile;
pub mod config;
pub mod init;
pub mod search;
mod shared;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Compile(cmd) => compile::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Aggregate(cmd) => aggregate::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
    }
}
