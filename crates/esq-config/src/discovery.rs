//! Configuration file discovery.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::{ConfigError, parse::is_root_config};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".esq.toml";

/// Discovers every configuration file that applies to `cwd`.
///
/// Walks from `cwd` to the filesystem root collecting `.esq.toml` files, stopping after a file
/// with `root = true`. Unless a root file was found, `~/.esq.toml` is appended last. Paths are
/// returned highest precedence first.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let config_path = dir.join(CONFIG_FILENAME);
        if !config_path.is_file() {
            continue;
        }
        let is_root = is_root_config(&config_path);
        configs.push(config_path);
        if is_root {
            return configs;
        }
    }

    if let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path of the global configuration file (`~/.esq.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Like [`global_config_path`], failing when there is no home directory.
pub fn require_global_config_path() -> Result<PathBuf, ConfigError> {
    global_config_path().ok_or(ConfigError::NoHomeDirectory)
}

/// Returns true if `path` is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    /// Drops the global config, which depends on the machine running the tests.
    fn local(configs: &[PathBuf]) -> Vec<&PathBuf> {
        configs.iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn no_configs_found() {
        let dir = TestDir::new();
        let cwd = dir.create_dir("a/b/c");
        assert!(local(&discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn closest_config_comes_first() {
        let dir = TestDir::new();
        let top = dir.create_config("");
        let mid = dir.create_config("a/b");
        let cwd = dir.create_dir("a/b/c/d");

        let configs = discover_config_files(&cwd);
        assert_eq!(local(&configs), [&mid, &top]);
    }

    #[test]
    fn config_in_cwd_is_found() {
        let dir = TestDir::new();
        let config = dir.create_config("");
        assert_eq!(local(&discover_config_files(dir.path())), [&config]);
    }

    #[test]
    fn directories_named_like_config_are_skipped() {
        let dir = TestDir::new();
        fs::create_dir_all(dir.path().join(CONFIG_FILENAME)).unwrap();
        let cwd = dir.create_dir("sub");
        assert!(local(&discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn root_config_stops_discovery() {
        let dir = TestDir::new();
        dir.create_config("");
        let root = dir.create_config_with_content("project", "root = true\n");
        let child = dir.create_config("project/sub");
        let cwd = dir.create_dir("project/sub/deep");

        // No global config either.
        assert_eq!(discover_config_files(&cwd), [child, root]);
    }

    #[test]
    fn root_false_keeps_walking() {
        let dir = TestDir::new();
        let top = dir.create_config("");
        let mid = dir.create_config_with_content("project", "root = false\n");
        let cwd = dir.create_dir("project/src");
        assert_eq!(local(&discover_config_files(&cwd)), [&mid, &top]);
    }

    #[test]
    fn global_path_uses_config_filename() {
        let path = require_global_config_path().unwrap();
        assert!(path.ends_with(CONFIG_FILENAME));
        assert!(is_global_config(&path));
        assert!(!is_global_config(Path::new("/elsewhere/.esq.toml")));
    }
}
