//! Implementation of `esq compile`.

use std::process::ExitCode;

use super::shared::load_filters;
use crate::cli::{args::CompileCommand, context::CommandContext, output::report_query_error};

/// Prints the per-index bool query map of each group.
///
/// A bare filter array prints one map; a grouped file prints an array of maps in group order.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let file = match load_filters(ctx, &cmd.filters) {
        Ok(file) => file,
        Err(code) => return code,
    };

    let maps = match file
        .groups
        .iter()
        .map(|group| group.assemble())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(maps) => maps,
        Err(e) => return report_query_error(&e),
    };

    match maps.as_slice() {
        [map] if !file.grouped => ctx.output.json(map),
        _ => ctx.output.json(&maps),
    }
}
