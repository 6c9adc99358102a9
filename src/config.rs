//! YAML configuration for Planet Finder.
//!
//! One file describes where the catalog lives, how the engine compares
//! records, and how bulk uploads are parsed. Every section is optional and
//! falls back to the engine defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "local"
//!
//! catalog:
//!   path: "data/output.json"
//!
//! matcher:
//!   version: "v1"
//!   trim_values: true
//!   min_score: ~
//!   use_parallel: false
//!
//! bulk:
//!   delimiter: ","
//!   comment: "#"
//!   trim_headers: false
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ingest::CsvOptions;
use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanetFinderConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub catalog: CatalogYamlConfig,

    /// Engine knobs, passed through to [`MatchConfig`] unchanged.
    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub bulk: BulkYamlConfig,

    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl PlanetFinderConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PlanetFinderConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.catalog.validate()?;
        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))?;
        self.csv_options()?
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("bulk: {err}")))?;
        self.logging.validate()?;

        Ok(())
    }

    /// Engine configuration.
    pub fn match_config(&self) -> MatchConfig {
        self.matcher.clone()
    }

    /// Bulk CSV parsing options.
    pub fn csv_options(&self) -> Result<CsvOptions, ConfigLoadError> {
        self.bulk.to_csv_options()
    }
}

impl Default for PlanetFinderConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            catalog: CatalogYamlConfig::default(),
            matcher: MatchConfig::default(),
            bulk: BulkYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

/// Catalog source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogYamlConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl CatalogYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "catalog.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CatalogYamlConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Bulk CSV section. Delimiter and comment are written as one-character
/// strings in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkYamlConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// `~` disables comment lines.
    #[serde(default = "default_comment")]
    pub comment: Option<String>,

    #[serde(default)]
    pub trim_headers: bool,

    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl BulkYamlConfig {
    fn to_csv_options(&self) -> Result<CsvOptions, ConfigLoadError> {
        Ok(CsvOptions {
            delimiter: single_byte("bulk.delimiter", &self.delimiter)?,
            comment: self
                .comment
                .as_deref()
                .map(|c| single_byte("bulk.comment", c))
                .transpose()?,
            trim_headers: self.trim_headers,
            max_rows: self.max_rows,
        })
    }
}

impl Default for BulkYamlConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            comment: default_comment(),
            trim_headers: false,
            max_rows: None,
        }
    }
}

/// Logging section, read by the binaries when they install a subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "logging.level must be one of: {valid_levels:?}"
            )));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn single_byte(field: &str, value: &str) -> Result<u8, ConfigLoadError> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(ConfigLoadError::Validation(format!(
            "{field} must be a single ASCII character, got {value:?}"
        ))),
    }
}

// Helper functions for serde defaults
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/output.json")
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_comment() -> Option<String> {
    Some("#".to_string())
}
fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
catalog:
  path: "fixtures/catalog.json"
matcher:
  version: "v1"
  min_score: 3
"#;

        let config = PlanetFinderConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.catalog.path, PathBuf::from("fixtures/catalog.json"));
        assert_eq!(config.match_config().min_score, Some(3));
        assert!(config.match_config().trim_values);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
logging:
  level: "debug"
  json: true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PlanetFinderConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_default_config() {
        let config = PlanetFinderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.match_config(), MatchConfig::default());
        assert_eq!(config.csv_options().unwrap(), CsvOptions::default());
    }

    #[test]
    fn test_unsupported_version() {
        let result = PlanetFinderConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_matcher_validation() {
        let yaml = r#"
version: "1.0"
matcher:
  version: "v1"
  min_score: 30
"#;

        let err = PlanetFinderConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Validation(_)));
        assert!(err.to_string().contains("min_score"));
    }

    #[test]
    fn test_bulk_section_converts_to_csv_options() {
        let yaml = r#"
version: "1.0"
bulk:
  delimiter: ";"
  comment: ~
  trim_headers: true
  max_rows: 500
"#;

        let opts = PlanetFinderConfig::from_yaml(yaml)
            .unwrap()
            .csv_options()
            .unwrap();
        assert_eq!(opts.delimiter, b';');
        assert_eq!(opts.comment, None);
        assert!(opts.trim_headers);
        assert_eq!(opts.max_rows, Some(500));
    }

    #[test]
    fn test_multi_char_delimiter_rejected() {
        let yaml = r#"
version: "1.0"
bulk:
  delimiter: "::"
"#;

        let err = PlanetFinderConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("bulk.delimiter"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let yaml = r#"
version: "1.0"
logging:
  level: "loud"
"#;

        assert!(PlanetFinderConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = PlanetFinderConfig::from_yaml("version: [unterminated");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }
}
