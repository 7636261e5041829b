//! Configuration for the weather pipeline.
//!
//! Provides the pipeline configuration structure with input/output paths,
//! query engine settings and basic sanity validation.

use crate::error::{Result, WeatherError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The two fixed monthly observation files processed by a parameterless run
pub const DEFAULT_INPUT_FILES: [&str; 2] =
    ["Data/weather.20160201.csv", "Data/weather.20160301.csv"];

/// Default location of the columnar output file
pub const DEFAULT_PARQUET_PATH: &str = "Data/weather.parquet";

/// Default location of the site-coordinate export feeding reverse geocoding
pub const DEFAULT_COORDINATES_PATH: &str = "Data/ForecastSiteCords.csv";

/// Default diagnostic log file
pub const DEFAULT_LOG_PATH: &str = "error.log";

/// Connection settings for the Apache Drill query service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the wait for a query call, in seconds
    pub timeout_secs: u64,
    /// Drill storage plugin used to address the parquet file
    pub storage_plugin: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8047,
            timeout_secs: 10,
            storage_plugin: "dfs".to_string(),
        }
    }
}

impl EngineConfig {
    /// Base URL of the Drill REST API
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Engine-addressable locator for a persisted parquet file
    pub fn storage_locator(&self, parquet_path: &Path) -> String {
        format!("{}.`{}`", self.storage_plugin, parquet_path.display())
    }
}

/// Complete configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Monthly observation CSV files, concatenated before validation
    pub input_files: Vec<PathBuf>,
    /// Destination of the enriched columnar output
    pub parquet_path: PathBuf,
    /// Destination of the optional site-coordinate export
    pub coordinates_path: PathBuf,
    /// Whether to write the site-coordinate export for the geocoding job
    pub export_coordinates: bool,
    /// Diagnostic log file
    pub log_path: PathBuf,
    pub engine: EngineConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_files: DEFAULT_INPUT_FILES.iter().map(PathBuf::from).collect(),
            parquet_path: PathBuf::from(DEFAULT_PARQUET_PATH),
            coordinates_path: PathBuf::from(DEFAULT_COORDINATES_PATH),
            export_coordinates: false,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            engine: EngineConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Check the configuration for obvious mistakes before running
    pub fn validate(&self) -> Result<()> {
        if self.input_files.is_empty() {
            return Err(WeatherError::configuration(
                "at least one input file must be specified",
            ));
        }
        if self.engine.timeout_secs == 0 {
            return Err(WeatherError::configuration(
                "query timeout must be greater than zero seconds",
            ));
        }
        if self.engine.host.is_empty() {
            return Err(WeatherError::configuration(
                "query engine host must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input_files.len(), 2);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let config = PipelineConfig {
            input_files: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = PipelineConfig::default();
        config.engine.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_locator_uses_plugin() {
        let engine = EngineConfig::default();
        let locator = engine.storage_locator(Path::new("Data/weather.parquet"));
        assert_eq!(locator, "dfs.`Data/weather.parquet`");
    }
}
