//! Implementation of `esq aggregate`.

use std::process::ExitCode;

use super::shared::load_builder;
use crate::cli::{args::AggregateCommand, context::CommandContext, output::report_query_error};

/// Prints a composite aggregation request.
///
/// `--key` and `--size` fall back to the `[aggregation]` config section.
pub fn run(ctx: &CommandContext, cmd: &AggregateCommand) -> ExitCode {
    let settings = &ctx.config.aggregation;
    let key = cmd.key.as_deref().unwrap_or(&settings.key);
    let size = cmd.size.unwrap_or(settings.size);

    let builder = match load_builder(ctx, &cmd.filters, &cmd.index) {
        Ok(builder) => builder,
        Err(code) => return code,
    };

    match builder.build_aggregation_query_with_size(&cmd.name, &cmd.field, key, size) {
        Ok(request) => ctx.output.json(&request),
        Err(e) => report_query_error(&e),
    }
}
