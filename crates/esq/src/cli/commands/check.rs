//! Implementation of `esq check`.

use std::process::ExitCode;

use esq_config::{ConfigWarning, discover_config_files, is_global_config};

use crate::cli::context::CommandContext;

/// Lists the config files in effect and reports validation warnings.
///
/// Exits non-zero if any warning was found.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let palette = ctx.palette();
    let files = discover_config_files(&ctx.cwd);

    println!("{}", palette.header("Configuration"));
    println!();

    if files.is_empty() {
        println!("{}", palette.dim("No configuration files found, using defaults."));
        println!("Run 'esq init' to create a configuration file.");
    } else {
        println!("{}", palette.subheader("Config files (highest precedence first):"));
        for path in &files {
            let scope = if is_global_config(path) { "global" } else { "local" };
            println!("  {} {}", path.display(), palette.dim(&format!("({scope})")));
        }
    }
    println!();

    let warnings = ctx.config.validate();
    if warnings.is_empty() {
        println!("{}", palette.success("No issues found."));
        return ExitCode::SUCCESS;
    }

    println!(
        "{}",
        palette.warning(&format!("Warnings ({}):", warnings.len()))
    );
    for warning in &warnings {
        println!("  - {warning}");
    }
    println!();
    print_hints(ctx, &warnings);

    ExitCode::FAILURE
}

/// Prints one hint per kind of warning.
fn print_hints(ctx: &CommandContext, warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|warning| match warning {
            ConfigWarning::ZeroPageSize => "Set search.page_size to at least 1.",
            ConfigWarning::ZeroAggregationSize => "Set aggregation.size to at least 1.",
            ConfigWarning::EmptyAggregationKey => {
                "Set aggregation.key to a source name such as \"key\"."
            }
            ConfigWarning::InvalidSort { .. } => {
                "Write sort entries as \"field\", \"field:asc\" or \"field:desc\"."
            }
        })
        .collect();
    hints.sort_unstable();
    hints.dedup();

    println!("{}", ctx.palette().subheader("Hints:"));
    for hint in hints {
        println!("  - {hint}");
    }
}
