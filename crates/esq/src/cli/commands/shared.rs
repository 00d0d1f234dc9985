//! Shared helpers for command implementations.

use std::process::ExitCode;

use esq_query::QueryBuilder;

use crate::cli::{
    args::FilterArgs,
    context::CommandContext,
    input::{FilterFile, GroupDefaults},
    output::{report_input_error, report_query_error},
};

/// Loads the filter file named by `args`, reporting failures.
pub fn load_filters(ctx: &CommandContext, args: &FilterArgs) -> Result<FilterFile, ExitCode> {
    let defaults = GroupDefaults::new(&ctx.config.filters, args.or);
    FilterFile::load(args.file.clone(), defaults).map_err(|e| report_input_error(&e))
}

/// Loads the filter file and appends every group to a builder for `index`.
pub fn load_builder(
    ctx: &CommandContext,
    args: &FilterArgs,
    index: &str,
) -> Result<QueryBuilder, ExitCode> {
    load_filters(ctx, args)?
        .builder(index)
        .map_err(|e| report_query_error(&e))
}
