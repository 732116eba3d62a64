use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Structure representing the application configuration. Contains pathing and flag selection information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input_files: Vec<PathBuf>,
    pub report_path: PathBuf,
    pub flags: Vec<String>,
    #[serde(default)]
    pub injection_flags: Vec<String>,
    #[serde(default)]
    pub strain_rate: Option<u32>,
    #[serde(default)]
    pub gate_strain: bool,
}

impl Default for Config {
    /// Generate a new Config object. Paths will be empty/invalid
    fn default() -> Self {
        Self {
            input_files: vec![],
            report_path: PathBuf::from("None"),
            flags: vec![String::from("DATA")],
            injection_flags: vec![],
            strain_rate: None,
            gate_strain: false,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Self::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str::<Self>(yaml_str)?)
    }

    /// Get the path to the report for a given input file
    pub fn get_report_file_name(&self, input_path: &Path) -> Result<PathBuf, ConfigError> {
        let stem = input_path
            .file_stem()
            .ok_or_else(|| ConfigError::BadFilePath(input_path.to_path_buf()))?;
        let report_file_path: PathBuf = self
            .report_path
            .join(format!("{}_dq.yml", stem.to_string_lossy()));
        if self.report_path.exists() {
            Ok(report_file_path)
        } else {
            Err(ConfigError::BadFilePath(self.report_path.clone()))
        }
    }

    pub fn has_injection_selection(&self) -> bool {
        !self.injection_flags.is_empty()
    }

    pub fn does_input_exist(&self, input_path: &Path) -> bool {
        input_path.exists()
    }
}
