//! Syntax highlighting and terminal styling for esq.
//!
//! [`Highlighter`] colors generated requests (JSON) and configuration (TOML) for a terminal.
//! [`Palette`] styles status lines; a disabled palette returns text untouched so the same code
//! path serves pipes and `--plain`.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Formats esq knows how to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Query DSL requests and index maps.
    Json,
    /// `.esq.toml` files and effective settings.
    Toml,
}

impl Syntax {
    /// File extension syntect registers the syntax under.
    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Colors text for 24-bit terminals.
pub struct Highlighter {
    /// Language definitions, including the TOML grammar from two-face.
    syntax_set: SyntaxSet,
    /// Lazily loaded themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme used for every call.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter using the Dracula theme.
    pub fn new() -> Self {
        Self::with_theme(EmbeddedThemeName::Dracula)
    }

    /// Creates a highlighter using `theme`.
    pub fn with_theme(theme: EmbeddedThemeName) -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme,
        }
    }

    /// Colors JSON.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, Syntax::Json)
    }

    /// Colors TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, Syntax::Toml)
    }

    /// Colors `content` as `syntax`, ending with a color reset.
    ///
    /// Lines the grammar can't handle are emitted unstyled.
    pub fn highlight(&self, content: &str, syntax: Syntax) -> String {
        let mut lines = HighlightLines::new(self.syntax(syntax), self.theme_set.get(self.theme));

        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);
        output
    }

    /// Looks up the grammar for `syntax`, falling back to plain text.
    fn syntax(&self, syntax: Syntax) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension(syntax.extension())
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

/// Bold.
const BOLD: &str = "\x1b[1m";
/// Cyan, for headers.
const CYAN: &str = "\x1b[36m";
/// Green, for success.
const GREEN: &str = "\x1b[32m";
/// Yellow, for warnings.
const YELLOW: &str = "\x1b[33m";
/// Red, for errors.
const RED: &str = "\x1b[31m";
/// Dim, for secondary detail.
const DIM: &str = "\x1b[2m";
/// Clears all attributes.
const RESET: &str = "\x1b[0m";

/// Terminal styles for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Emit escape codes; when false every style is the identity.
    enabled: bool,
}

impl Palette {
    /// Creates a palette that styles only when `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns true if escape codes are emitted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Bold cyan.
    pub fn header(&self, text: &str) -> String {
        self.paint(&[BOLD, CYAN], text)
    }

    /// Bold.
    pub fn subheader(&self, text: &str) -> String {
        self.paint(&[BOLD], text)
    }

    /// Dimmed.
    pub fn dim(&self, text: &str) -> String {
        self.paint(&[DIM], text)
    }

    /// Green.
    pub fn success(&self, text: &str) -> String {
        self.paint(&[GREEN], text)
    }

    /// Yellow.
    pub fn warning(&self, text: &str) -> String {
        self.paint(&[YELLOW], text)
    }

    /// Red.
    pub fn error(&self, text: &str) -> String {
        self.paint(&[RED], text)
    }

    /// Wraps `text` in `codes` and a reset.
    fn paint(&self, codes: &[&str], text: &str) -> String {
        if self.enabled {
            format!("{}{text}{RESET}", codes.concat())
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_gets_colored() {
        let output = Highlighter::new().highlight_json("{\"bool\": {\"must\": []}}\n");
        assert!(output.contains("\x1b[38;2;"));
        assert!(output.contains("must"));
        assert!(output.ends_with(RESET));
    }

    #[test]
    fn toml_gets_colored() {
        let output = Highlighter::new().highlight_toml("[search]\npage_size = 10\n");
        assert!(output.contains("\x1b[38;2;"));
        assert!(output.contains("page_size"));
        assert!(output.ends_with(RESET));
    }

    #[test]
    fn grammars_are_bundled() {
        let hl = Highlighter::new();
        for syntax in [Syntax::Json, Syntax::Toml] {
            assert_ne!(
                hl.syntax(syntax).name,
                hl.syntax_set.find_syntax_plain_text().name,
                "{syntax:?}"
            );
        }
    }

    #[test]
    fn enabled_palette_wraps_text() {
        let palette = Palette::new(true);
        assert_eq!(palette.header("Files"), "\x1b[1m\x1b[36mFiles\x1b[0m");
        assert_eq!(palette.warning("careful"), "\x1b[33mcareful\x1b[0m");
        assert!(palette.enabled());
    }

    #[test]
    fn disabled_palette_is_identity() {
        let palette = Palette::new(false);
        for styled in [
            palette.header("x"),
            palette.subheader("x"),
            palette.dim("x"),
            palette.success("x"),
            palette.warning("x"),
            palette.error("x"),
        ] {
            assert_eq!(styled, "x");
        }
    }
}
