//! Rendering for CLI output.
//!
//! Results go to stdout as pretty JSON or TOML, colored when enabled. Errors go to stderr with
//! an `error:` prefix and, where one exists, a `hint:` line.

use std::process::ExitCode;

use esq_highlight::{Highlighter, Palette, Syntax};
use esq_query::QueryError;
use serde::Serialize;

use super::input::InputError;

/// Writes command results to stdout.
pub struct Output {
    /// Highlighter, present only when color is enabled.
    highlighter: Option<Highlighter>,
}

impl Output {
    /// Creates an output that colors when `color` is true.
    pub fn new(color: bool) -> Self {
        Self {
            highlighter: color.then(Highlighter::new),
        }
    }

    /// Status-line styles for this output.
    pub fn palette(&self) -> Palette {
        Palette::new(self.highlighter.is_some())
    }

    /// Prints `value` as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) -> ExitCode {
        match serde_json::to_string_pretty(value) {
            Ok(rendered) => {
                self.print(&rendered, Syntax::Json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                ExitCode::FAILURE
            }
        }
    }

    /// Prints TOML text.
    pub fn toml(&self, rendered: &str) {
        self.print(rendered, Syntax::Toml);
    }

    /// Prints `rendered`, highlighted if enabled, ending with a newline.
    fn print(&self, rendered: &str, syntax: Syntax) {
        let rendered = rendered.trim_end();
        match &self.highlighter {
            Some(highlighter) => println!("{}", highlighter.highlight(rendered, syntax)),
            None => println!("{rendered}"),
        }
    }
}

/// Reports a query error with its hint.
pub fn report_query_error(err: &QueryError) -> ExitCode {
    eprintln!("error: {err}");
    if let Some(hint) = err.suggestion() {
        eprintln!("hint: {hint}");
    }
    ExitCode::FAILURE
}

/// Reports a filter file error, with a hint if it wraps a query error.
pub fn report_input_error(err: &InputError) -> ExitCode {
    eprintln!("error: {err}");
    if let Some(hint) = err.query_error().and_then(QueryError::suggestion) {
        eprintln!("hint: {hint}");
    }
    ExitCode::FAILURE
}
