//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize a TOML file into `T`.
///
/// A missing file deserializes from empty TOML, so every field falls back to
/// its serde default.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, and
/// [`ConfigError::InvalidSyntax`] if it is not valid TOML for `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return parse("", path);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse(&content, path)
}

fn parse<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
        file: path.display().to_string(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default)]
        names: Vec<String>,
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let sample: Sample = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(sample.names.is_empty());
    }

    #[test]
    fn parses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genes.toml");
        std::fs::write(&path, "names = [\"jq\", \"tmux\"]\n").unwrap();
        let sample: Sample = load_config(&path).unwrap();
        assert_eq!(sample.names, vec!["jq", "tmux"]);
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "names = [\"jq\"\n").unwrap();
        let err = load_config::<Sample>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }));
        assert!(err.to_string().contains("broken.toml"), "{err}");
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config::<Sample>(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err}");
    }
}
