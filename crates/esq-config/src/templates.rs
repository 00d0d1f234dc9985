//! Configuration templates for `esq init`.
//!
//! The templates are valid TOML and are rendered with every setting commented out, so a fresh
//! file documents the defaults without overriding anything.

/// Local configuration template.
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template.
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the commented-out local template.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the commented-out global template.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_template(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
