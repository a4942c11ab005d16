//! Configuration: package lists and account settings.
//!
//! Read from an optional TOML file:
//!
//! ```toml
//! [packages]
//! apt = ["curl", "tmux"]
//! brew = ["jq"]
//! cask = ["iterm2"]
//!
//! [user]
//! name = "alice"
//! groups = ["admin"]
//! ```
pub mod packages;
pub mod toml_loader;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use packages::PackageLists;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "GENES_CONFIG";

/// Account settings from the `[user]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Account name to create.
    #[serde(default)]
    pub name: Option<String>,
    /// Groups the account should belong to.
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    packages: packages::PackagesSection,
    #[serde(default)]
    user: UserConfig,
}

/// All loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Package names per backend.
    pub packages: PackageLists,
    /// Account settings.
    pub user: UserConfig,
    /// File the configuration was read from, if one exists.
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path`, or from `$GENES_CONFIG` when `path`
    /// is `None`.  Without either, or when the file does not exist, the
    /// built-in defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match resolve_path(path, std::env::var_os(CONFIG_ENV)) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Self> {
        let file: ConfigFile = toml_loader::load_config(path)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(Self {
            packages: file.packages.resolve(),
            user: UserConfig {
                name: file
                    .user
                    .name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
                groups: packages::dedup(file.user.groups.iter().map(String::as_str)),
            },
            source: path.exists().then(|| path.to_path_buf()),
        })
    }

    /// Check the configuration and return any warnings found.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate(self)
    }
}

/// Pick the config file: the explicit path wins, then the environment.
/// An empty environment value counts as unset.
fn resolve_path(cli: Option<&Path>, env: Option<OsString>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::packages::default_packages;

    fn write(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("genes.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.packages.apt, default_packages());
        assert_eq!(config.user.name, None);
        assert_eq!(config.source, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
[packages]
apt = ["curl", "tmux"]
brew = ["jq"]
cask = ["iterm2"]

[user]
name = "alice"
groups = ["admin", "admin", "staff"]
"#,
        );
        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.packages.apt, vec!["curl", "tmux"]);
        assert_eq!(config.packages.brew, vec!["jq"]);
        assert_eq!(config.packages.cask, vec!["iterm2"]);
        assert_eq!(config.user.name.as_deref(), Some("alice"));
        assert_eq!(config.user.groups, vec!["admin", "staff"]);
        assert_eq!(config.source, Some(path));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[user]\nname = \"bob\"\n");
        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.packages, PackageLists::default());
        assert_eq!(config.user.name.as_deref(), Some("bob"));
    }

    #[test]
    fn blank_user_name_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[user]\nname = \"  \"\n");
        assert_eq!(Config::load_file(&path).unwrap().user.name, None);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[packages]\npacman = [\"git\"]\n");
        let err = Config::load_file(&path).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("genes.toml"), "{chain}");
    }

    #[test]
    fn explicit_path_beats_environment() {
        let chosen = resolve_path(
            Some(Path::new("/cli.toml")),
            Some(OsString::from("/env.toml")),
        );
        assert_eq!(chosen, Some(PathBuf::from("/cli.toml")));
    }

    #[test]
    fn environment_used_without_explicit_path() {
        let chosen = resolve_path(None, Some(OsString::from("/env.toml")));
        assert_eq!(chosen, Some(PathBuf::from("/env.toml")));
    }

    #[test]
    fn empty_environment_is_ignored() {
        assert_eq!(resolve_path(None, Some(OsString::new())), None);
        assert_eq!(resolve_path(None, None), None);
    }
}
