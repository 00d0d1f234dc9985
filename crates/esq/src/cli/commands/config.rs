//! Implementation of `esq config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Prints the effective settings as TOML.
pub fn run(ctx: &CommandContext) -> ExitCode {
    match ctx.config.settings_to_toml() {
        Ok(toml) => {
            ctx.output.toml(&toml);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize settings: {e}");
            ExitCode::FAILURE
        }
    }
}
