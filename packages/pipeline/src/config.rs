//! Input layout configuration.
//!
//! The defaults describe the incident export the dashboard was built for.
//! Exports with different headers can be described in a TOML file; any key
//! left out keeps its default:
//!
//! ```toml
//! delimiter = ";"
//!
//! [columns]
//! period = "month"
//! region_aliases = ["location", "place"]
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file to use when none is passed
/// explicitly.
pub const CONFIG_ENV_VAR: &str = "STRIKE_MAP_CONFIG";

/// Errors from reading or validating a [`PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`PipelineConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The delimiter is not a single ASCII character.
    #[error("delimiter must be a single ASCII character, got {value:?}")]
    InvalidDelimiter {
        /// The configured value.
        value: String,
    },

    /// The drop pattern is not a valid regular expression.
    #[error("invalid drop pattern: {0}")]
    InvalidDropPattern(#[from] regex::Error),
}

/// Column names the loader looks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    /// Canonical free-text location column.
    pub region: String,
    /// Other headers accepted as the location column when `region` is
    /// absent, tried in order.
    pub region_aliases: Vec<String>,
    /// Period label column.
    pub period: String,
    /// Drone-count column.
    pub drone_count: String,
    /// Fatality-count column.
    pub fatality_count: String,
    /// Headers matching this pattern are dropped before anything else
    /// (index columns left behind by earlier exports).
    pub drop_pattern: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            region: "Region".to_string(),
            region_aliases: vec!["location".to_string()],
            period: "month_year".to_string(),
            drone_count: "Drone_Count".to_string(),
            fatality_count: "Fatality_Count".to_string(),
            drop_pattern: "^Unnamed".to_string(),
        }
    }
}

/// Full loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Field delimiter (default `,`).
    pub delimiter: String,
    /// Column names.
    pub columns: ColumnConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            columns: ColumnConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or fails
    /// [`PipelineConfig::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Loads the config from `path` if given, else from the file named by
    /// [`CONFIG_ENV_VAR`], else the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be read or is invalid.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(path, std::env::var_os(CONFIG_ENV_VAR).as_deref())
    }

    /// [`PipelineConfig::resolve`] with the environment value passed in.
    /// An empty value counts as unset.
    fn resolve_with(path: Option<&Path>, env_value: Option<&OsStr>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        match env_value {
            Some(value) if !value.is_empty() => Self::from_path(Path::new(value)),
            _ => Ok(Self::default()),
        }
    }

    /// Checks the delimiter and drop pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        self.drop_regex()?;
        Ok(())
    }

    /// The delimiter as a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelimiter`] unless the delimiter is
    /// exactly one ASCII character.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::InvalidDelimiter {
                value: self.delimiter.clone(),
            }),
        }
    }

    /// Compiles the drop pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDropPattern`] if the pattern does not
    /// compile.
    pub fn drop_regex(&self) -> Result<Regex, ConfigError> {
        Ok(Regex::new(&self.columns.drop_pattern)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_incident_export() {
        let config = PipelineConfig::default();
        assert_eq!(config.columns.region, "Region");
        assert_eq!(config.columns.region_aliases, ["location"]);
        assert_eq!(config.columns.period, "month_year");
        assert_eq!(config.columns.drone_count, "Drone_Count");
        assert_eq!(config.columns.fatality_count, "Fatality_Count");
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert!(config.drop_regex().unwrap().is_match("Unnamed: 0"));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            PipelineConfig::from_toml_str("").unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            "delimiter = \";\"\n[columns]\nperiod = \"month\"\n",
        )
        .unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.columns.period, "month");
        assert_eq!(config.columns.region, "Region");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[columns]\nregoin = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_multi_char_delimiter() {
        assert!(matches!(
            PipelineConfig::from_toml_str("delimiter = \"::\"\n"),
            Err(ConfigError::InvalidDelimiter { .. })
        ));
    }

    #[test]
    fn rejects_bad_drop_pattern() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[columns]\ndrop_pattern = \"(\"\n"),
            Err(ConfigError::InvalidDropPattern(_))
        ));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strike_map.toml");
        std::fs::write(&path, "[columns]\nregion = \"Oblast\"\n").unwrap();

        let config = PipelineConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.columns.region, "Oblast");
    }

    #[test]
    fn env_value_names_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strike_map.toml");
        std::fs::write(&path, "delimiter = \";\"\n").unwrap();

        let config = PipelineConfig::resolve_with(None, Some(path.as_os_str())).unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b';');
    }

    #[test]
    fn empty_or_unset_env_value_gives_defaults() {
        let empty = PipelineConfig::resolve_with(None, Some(OsStr::new(""))).unwrap();
        assert_eq!(empty, PipelineConfig::default());

        let unset = PipelineConfig::resolve_with(None, None).unwrap();
        assert_eq!(unset, PipelineConfig::default());
    }

    #[test]
    fn explicit_path_beats_env_value() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let from_env = dir.path().join("from_env.toml");
        std::fs::write(&explicit, "[columns]\nperiod = \"month\"\n").unwrap();
        std::fs::write(&from_env, "[columns]\nperiod = \"week\"\n").unwrap();

        let config =
            PipelineConfig::resolve_with(Some(&explicit), Some(from_env.as_os_str())).unwrap();
        assert_eq!(config.columns.period, "month");
    }

    #[test]
    fn env_value_naming_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");
        assert!(matches!(
            PipelineConfig::resolve_with(None, Some(absent.as_os_str())),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PipelineConfig::from_path(&dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
