//! Non-fatal configuration checks reported as warnings.
use super::Config;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration table (e.g., "packages.apt", "user").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning about `item` found in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Check the loaded configuration for values the package managers or the
/// directory service would reject.
#[must_use]
pub fn validate(config: &Config) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (source, names) in [
        ("packages.apt", &config.packages.apt),
        ("packages.brew", &config.packages.brew),
        ("packages.cask", &config.packages.cask),
    ] {
        for name in names {
            if name.chars().any(char::is_whitespace) {
                warnings.push(ValidationWarning::new(
                    source,
                    name,
                    "package name contains whitespace",
                ));
            } else if name.starts_with('-') {
                warnings.push(ValidationWarning::new(
                    source,
                    name,
                    "package name looks like a command-line option",
                ));
            }
        }
    }

    match &config.user.name {
        Some(name) if !is_valid_username(name) => {
            warnings.push(ValidationWarning::new(
                "user",
                name,
                "user name must start with a letter or '_' and contain only [a-z0-9_-]",
            ));
        }
        None if !config.user.groups.is_empty() => {
            warnings.push(ValidationWarning::new(
                "user",
                config.user.groups.join(","),
                "groups are set but no user name is configured",
            ));
        }
        _ => {}
    }

    warnings
}

fn is_valid_username(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{PackageLists, UserConfig};

    fn config(apt: &[&str], user: Option<&str>, groups: &[&str]) -> Config {
        Config {
            packages: PackageLists {
                apt: apt.iter().map(ToString::to_string).collect(),
                brew: vec![],
                cask: vec![],
            },
            user: UserConfig {
                name: user.map(String::from),
                groups: groups.iter().map(ToString::to_string).collect(),
            },
            source: None,
        }
    }

    #[test]
    fn clean_config_has_no_warnings() {
        assert!(validate(&config(&["jq", "tmux"], Some("alice"), &["admin"])).is_empty());
    }

    #[test]
    fn defaults_have_no_warnings() {
        assert!(validate(&Config::default()).is_empty());
    }

    #[test]
    fn package_with_whitespace_is_flagged() {
        let warnings = validate(&config(&["vim gtk"], None, &[]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "packages.apt");
        assert_eq!(warnings[0].item, "vim gtk");
    }

    #[test]
    fn option_like_package_is_flagged() {
        let warnings = validate(&config(&["--purge"], None, &[]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("option"));
    }

    #[test]
    fn invalid_username_is_flagged() {
        let warnings = validate(&config(&[], Some("Alice Smith"), &[]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "user");
    }

    #[test]
    fn groups_without_name_are_flagged() {
        let warnings = validate(&config(&[], None, &["admin", "staff"]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "admin,staff");
    }

    #[test]
    fn username_rules() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("_svc-1"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("1alice"));
        assert!(!is_valid_username("alice!"));
    }
}
