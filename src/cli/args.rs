//! Command-line argument definitions for the weather pipeline.
//!
//! Defines the CLI interface using the clap derive API. A parameterless
//! invocation runs the full pipeline over the two fixed monthly files.

use crate::config::PipelineConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the weather observation pipeline
///
/// Validates and enriches monthly weather observation CSV files, converts
/// them to Parquet and reports the site/day with the maximum daily average
/// screen temperature via Apache Drill.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weather-pipeline",
    version,
    about = "Validate, enrich and convert monthly weather CSV files, then report the hottest site/day"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: import, validate, transform, persist and report
    Run(RunArgs),
    /// Import and validate the input files without transforming them
    Validate(ValidateArgs),
}

/// Arguments for the run command (full pipeline)
#[derive(Debug, Clone, Default, Parser)]
pub struct RunArgs {
    /// Monthly weather CSV files to process
    ///
    /// Defaults to the two fixed monthly files under Data/.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        num_args = 1..,
        help = "Monthly weather CSV files to process"
    )]
    pub input_files: Vec<PathBuf>,

    /// Output path for the enriched Parquet file
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path for the enriched Parquet file"
    )]
    pub output_path: Option<PathBuf>,

    /// Hostname of the Apache Drill REST API
    #[arg(long = "drill-host", value_name = "HOST")]
    pub drill_host: Option<String>,

    /// Port of the Apache Drill REST API
    #[arg(long = "drill-port", value_name = "PORT")]
    pub drill_port: Option<u16>,

    /// Upper bound on the aggregate query call, in seconds
    #[arg(long = "query-timeout", value_name = "SECONDS")]
    pub query_timeout: Option<u64>,

    /// Drill storage plugin used to address the parquet file
    #[arg(long = "storage-plugin", value_name = "NAME")]
    pub storage_plugin: Option<String>,

    /// Also export distinct site coordinates for the reverse-geocoding job
    #[arg(long = "export-coordinates")]
    pub export_coordinates: bool,

    /// Diagnostic log file
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    /// Fold the arguments over the default configuration
    pub fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        if !self.input_files.is_empty() {
            config.input_files = self.input_files;
        }
        if let Some(output_path) = self.output_path {
            config.parquet_path = output_path;
        }
        if let Some(host) = self.drill_host {
            config.engine.host = host;
        }
        if let Some(port) = self.drill_port {
            config.engine.port = port;
        }
        if let Some(timeout) = self.query_timeout {
            config.engine.timeout_secs = timeout;
        }
        if let Some(plugin) = self.storage_plugin {
            config.engine.storage_plugin = plugin;
        }
        if let Some(log_file) = self.log_file {
            config.log_path = log_file;
        }
        config.export_coordinates = self.export_coordinates;
        config
    }
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Monthly weather CSV files to validate
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        num_args = 1..,
        help = "Monthly weather CSV files to validate"
    )]
    pub input_files: Vec<PathBuf>,

    /// Diagnostic log file
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
