//! Error handling for weather pipeline operations.
//!
//! Provides error types with context for import, schema validation,
//! transformation and aggregate query failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Empty weather file: {path} - {reason}")]
    EmptyFile { path: PathBuf, reason: String },

    #[error("Structural defect in weather file: {path} - {reason}")]
    StructuralImport { path: PathBuf, reason: String },

    #[error("Data validation failed with {violations} violation(s); refer to the error log for details")]
    DataValidation { violations: usize },

    #[error("Query engine unavailable at {url}: {reason}")]
    EngineUnavailable { url: String, reason: String },

    #[error("Aggregate query failed: {reason}")]
    Query { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl WeatherError {
    /// Create a structural import error for a file
    pub fn structural(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StructuralImport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty-file error
    pub fn empty_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::EmptyFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a query error
    pub fn query(reason: impl Into<String>) -> Self {
        Self::Query {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
