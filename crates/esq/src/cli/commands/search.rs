//! Implementation of `esq search`.

use std::process::ExitCode;

use super::shared::load_builder;
use crate::cli::{args::SearchCommand, context::CommandContext, output::report_query_error};

/// Prints a paginated, sorted search request.
///
/// `--size` and `--sort` fall back to the `[search]` config section.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let search = &ctx.config.search;
    let size = cmd.size.unwrap_or(search.page_size);
    let sort = if cmd.sort.is_empty() {
        match search.sort_fields() {
            Ok(sort) => sort,
            Err(e) => return report_query_error(&e),
        }
    } else {
        cmd.sort.clone()
    };

    let builder = match load_builder(ctx, &cmd.filters, &cmd.index) {
        Ok(builder) => builder,
        Err(code) => return code,
    };

    ctx.output
        .json(&builder.build_search_query(cmd.page, size, &sort))
}
