//! # Settings File
//!
//! Optional YAML file providing defaults for the CLI flags. Flags and their
//! environment variables always win over values read here.
//!
//! ```yaml
//! source: ./deploy
//! color: never
//! logLevel: info
//! depth: 3
//! ```
//!
//! The file is read from `--config` when given, which must then exist, and
//! otherwise from `$HOME/.graphmize.yaml` when that file is present. Unknown
//! keys are rejected so typos do not go unnoticed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::default_settings_path;
use crate::error::{Error, Result};

/// Values read from a settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Directory to search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// `always`, `never` or `auto`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Depth limit for `tree`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from YAML text. Blank or comment-only text yields the
    /// defaults.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let parsed: Option<Settings> =
            serde_yaml::from_str(content).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(parsed.unwrap_or_default())
    }

    /// Read settings from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::parse(&content, path)?;
        settings.origin = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Load the settings in effect.
    ///
    /// An `explicit` path must exist. Without one, the default location is
    /// used when a file is there, and the built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_settings_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_all_keys() {
        let settings = Settings::parse(
            "source: ./deploy\ncolor: never\nlogLevel: debug\ndepth: 2\n",
            Path::new("settings.yaml"),
        )
        .unwrap();
        assert_eq!(settings.source.as_deref(), Some("./deploy"));
        assert_eq!(settings.color.as_deref(), Some("never"));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.depth, Some(2));
        assert!(settings.origin.is_none());
    }

    #[test]
    fn test_parse_empty_is_default() {
        let settings = Settings::parse("# nothing yet\n", Path::new("settings.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Settings::parse("sorce: ./deploy\n", Path::new("settings.yaml"));
        match result {
            Err(Error::Parse { path, .. }) => assert_eq!(path, PathBuf::from("settings.yaml")),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_records_origin() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graphmize.yaml");
        std::fs::write(&path, "color: always\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.color.as_deref(), Some("always"));
        assert_eq!(settings.origin, Some(path));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yaml");

        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_serialize_skips_unset_keys() {
        let settings = Settings {
            depth: Some(1),
            ..Settings::default()
        };
        let yaml = serde_yaml::to_string(&settings).unwrap();
        assert_eq!(yaml, "depth: 1\n");
    }
}
