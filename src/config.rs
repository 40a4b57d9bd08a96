use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{QualityError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of invalid rows shown in the HTML preview table
    pub invalid_preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            invalid_preview_rows: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    /// Write a JSON log file next to the console output
    pub json_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            json_file: true,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(constants::CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(QualityError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

/// Locations the pipeline reads from and writes to for one run.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub input: PathBuf,
    pub schema: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self {
            input: PathBuf::from(constants::INPUT_PATH),
            schema: PathBuf::from(constants::SCHEMA_PATH),
            output_dir: PathBuf::from(constants::OUTPUT_DIR),
        }
    }
}

impl PipelinePaths {
    pub fn artifact(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.report.invalid_preview_rows, 20);
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert!(config.logging.json_file);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report]\ninvalid_preview_rows = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.report.invalid_preview_rows, 5);
        assert!(config.logging.json_file);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report\ninvalid_preview_rows = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(QualityError::Toml(_))));
    }

    #[test]
    fn test_default_paths_are_fixed() {
        let paths = PipelinePaths::default();
        assert_eq!(paths.input, PathBuf::from("data/raw_data1.csv"));
        assert_eq!(paths.schema, PathBuf::from("data/schema.json"));
        assert_eq!(
            paths.artifact(constants::CLEANED_DATA_FILE),
            PathBuf::from("outputs/cleaned_data.csv")
        );
    }
}
