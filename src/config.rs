// Runtime configuration.
//
// Everything an operator may want to tune lives in a small TOML file with
// serde defaults, so a missing file or a partial file both behave. Load
// order: `$NOON_VALIDATOR_CONFIG`, then `./validator.toml`, then built-in
// defaults.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ValidateError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "NOON_VALIDATOR_CONFIG";
/// File picked up from the working directory when the env var is unset.
pub const CONFIG_FILE: &str = "validator.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Report table offered as the default by the menu.
    #[serde(default = "default_input_path")]
    pub path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            path: default_input_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Enables the cylinder-oil consumption check and the SCOC column.
    /// Off by default; most of the fleet does not report `Cyl. Oil Cons.`.
    #[serde(default)]
    pub cylinder_oil: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_processed_csv")]
    pub processed_csv: String,
    #[serde(default = "default_failed_csv")]
    pub failed_csv: String,
    #[serde(default = "default_summary_json")]
    pub summary_json: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            processed_csv: default_processed_csv(),
            failed_csv: default_failed_csv(),
            summary_json: default_summary_json(),
        }
    }
}

fn default_input_path() -> String {
    "noon_reports.csv".to_string()
}

fn default_processed_csv() -> String {
    "All_Reports_Processed.csv".to_string()
}

fn default_failed_csv() -> String {
    "Failed_Validation.csv".to_string()
}

fn default_summary_json() -> String {
    "validation_summary.json".to_string()
}

impl ValidatorConfig {
    /// Load configuration using the standard search order:
    /// 1. `$NOON_VALIDATOR_CONFIG` environment variable
    /// 2. `./validator.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// A broken file is reported and skipped rather than aborting startup.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from NOON_VALIDATOR_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from NOON_VALIDATOR_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "NOON_VALIDATOR_CONFIG points to a non-existent file, falling back");
            }
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./validator.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./validator.toml, using defaults");
                }
            }
        }

        info!("No validator.toml found, using built-in defaults");
        Self::default()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ValidateError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ValidateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ValidateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ValidatorConfig::default();
        assert_eq!(config.input.path, "noon_reports.csv");
        assert!(!config.rules.cylinder_oil);
        assert_eq!(config.export.processed_csv, "All_Reports_Processed.csv");
        assert_eq!(config.export.failed_csv, "Failed_Validation.csv");
        assert_eq!(config.export.summary_json, "validation_summary.json");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rules]\ncylinder_oil = true").unwrap();

        let config = ValidatorConfig::load_from_file(file.path()).unwrap();
        assert!(config.rules.cylinder_oil);
        assert_eq!(config.input.path, "noon_reports.csv");
        assert_eq!(config.export.failed_csv, "Failed_Validation.csv");
    }

    #[test]
    fn full_file_overrides_everything() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[input]
path = "fleet.csv"

[rules]
cylinder_oil = true

[export]
processed_csv = "out/processed.csv"
failed_csv = "out/failed.csv"
summary_json = "out/summary.json"
"#
        )
        .unwrap();

        let config = ValidatorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.input.path, "fleet.csv");
        assert!(config.rules.cylinder_oil);
        assert_eq!(config.export.processed_csv, "out/processed.csv");
        assert_eq!(config.export.failed_csv, "out/failed.csv");
        assert_eq!(config.export.summary_json, "out/summary.json");
    }

    #[test]
    fn broken_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rules\ncylinder_oil = maybe").unwrap();

        let err = ValidatorConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ValidateError::Config { .. }));
    }
}
