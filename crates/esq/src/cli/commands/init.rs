//! Implementation of `esq init`.

use std::{fs, process::ExitCode};

use esq_config::{CONFIG_FILENAME, global_template, local_template, require_global_config_path};

use crate::cli::{args::InitCommand, context::CommandContext};

/// Writes a commented `.esq.toml` template.
///
/// Running in the home directory writes the global template, as `--global` does.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let global_path = require_global_config_path();
    let in_home = global_path
        .as_ref()
        .ok()
        .and_then(|path| path.parent())
        .is_some_and(|home| home == ctx.cwd);
    let use_global = cmd.global || in_home;

    let config_path = if use_global {
        match global_path {
            Ok(path) => path,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        ctx.cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("hint: use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    let palette = ctx.palette();
    println!(
        "{} {}",
        palette.success("Created"),
        config_path.display()
    );
    println!();
    println!("{}", palette.subheader("Configuration written:"));
    ctx.output.toml(&template);

    ExitCode::SUCCESS
}
