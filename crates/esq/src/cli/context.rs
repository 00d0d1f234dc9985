//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use esq_config::Config;
use esq_highlight::Palette;

use super::output::Output;

/// State built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Effective configuration, or the defaults if no file was found.
    pub config: Config,
    /// Where results are written.
    pub output: Output,
}

impl CommandContext {
    /// Loads the working directory and configuration.
    pub fn load(plain: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = Config::load(&cwd).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        Ok(Self {
            cwd,
            config,
            output: Output::new(color_enabled(plain)),
        })
    }

    /// Loads only the working directory.
    ///
    /// Used by commands that must work while an existing config file is broken.
    pub fn load_cwd_only(plain: bool) -> Result<Self, ExitCode> {
        Ok(Self {
            cwd: current_dir_or_failure()?,
            config: Config::default(),
            output: Output::new(color_enabled(plain)),
        })
    }

    /// Status-line styles matching the output mode.
    pub fn palette(&self) -> Palette {
        self.output.palette()
    }
}

/// Colors only when stdout is a terminal and `--plain` wasn't given.
fn color_enabled(plain: bool) -> bool {
    !plain && io::stdout().is_terminal()
}

/// Returns the current working directory or reports the failure.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
