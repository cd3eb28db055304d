use crate::error::DataspotError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Default minimum pattern percentage (unset keeps everything)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_percentage: Option<f64>,

    /// Default maximum number of patterns returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Children kept per tree level
    pub top: usize,

    /// Relative change treated as significant by `compare`
    pub change_threshold: f64,

    /// Largest field combination tried by `discover`
    pub max_fields: usize,

    /// Combinations tried per size by `discover`
    pub max_combinations: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// "table" or "json"
    pub format: OutputFormat,

    /// Colour percentages and change statuses in tables
    pub colors: bool,

    /// Rows printed per table
    pub max_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when DATASPOT_LOG is not set, e.g. "info" or "dataspot=debug"
    pub level: String,

    /// Also write logs to a timestamped file in the data directory
    pub log_to_file: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_percentage: None,
            limit: None,
            top: 5,
            change_threshold: 0.15,
            max_fields: 3,
            max_combinations: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            colors: true,
            max_rows: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from `path`. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values no analysis could run with
    pub fn validate(&self) -> std::result::Result<(), DataspotError> {
        let analysis = &self.analysis;
        if let Some(min) = analysis.min_percentage {
            if !(0.0..=100.0).contains(&min) {
                return Err(DataspotError::Configuration(format!(
                    "analysis.min_percentage must be between 0 and 100, got {}",
                    min
                )));
            }
        }
        if analysis.limit == Some(0) {
            return Err(DataspotError::Configuration(
                "analysis.limit must be greater than 0".to_string(),
            ));
        }
        if analysis.top == 0 {
            return Err(DataspotError::Configuration(
                "analysis.top must be greater than 0".to_string(),
            ));
        }
        if analysis.change_threshold < 0.0 {
            return Err(DataspotError::Configuration(
                "analysis.change_threshold must not be negative".to_string(),
            ));
        }
        if analysis.max_fields == 0 {
            return Err(DataspotError::Configuration(
                "analysis.max_fields must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("dataspot").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# dataspot configuration file
# Location: ~/.config/dataspot/config.toml (Linux)
#           ~/Library/Application Support/dataspot/config.toml (macOS)
#           %APPDATA%\dataspot\config.toml (Windows)
#
# Command line flags override every value here.

[analysis]
# Only report patterns holding at least this share of records
# min_percentage = 5.0

# Maximum number of patterns to report
# limit = 100

# Children kept per level by the tree command
top = 5

# Relative count change that makes a compare result significant (0.15 = 15%)
change_threshold = 0.15

# Largest field combination tried by discover
max_fields = 3

# Combinations tried per combination size by discover
max_combinations = 10

[output]
# "table" or "json"
format = "table"

# Colour percentages and change statuses
colors = true

# Rows printed per table
max_rows = 50

[logging]
# Used when DATASPOT_LOG is not set: "error", "warn", "info", "debug", "trace"
level = "warn"

# Also write a timestamped log file under the dataspot data directory
log_to_file = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.top, 5);
        assert_eq!(config.analysis.change_threshold, 0.15);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_commented_default_matches_defaults() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(parsed.output.format, OutputFormat::Json);
        assert_eq!(parsed.output.max_rows, 50);
        assert_eq!(parsed.analysis.max_fields, 3);
    }

    #[test]
    fn test_load_from_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        fs::write(&path, "[analysis]\ntop = 0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("analysis.top"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.analysis.min_percentage = Some(12.5);
        config.logging.log_to_file = true;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
