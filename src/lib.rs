//! Weather Pipeline Library
//!
//! A Rust library for validating, enriching and converting monthly UK weather
//! observation CSV files into Apache Parquet, and for answering the fixed
//! "hottest site/day" aggregate question through Apache Drill.
//!
//! This library provides tools for:
//! - Importing delimited observation files with sentinel and whitespace handling
//! - Validating rows against a declarative per-column constraint schema
//! - Deriving human-readable fields (compass points, weather types, visibility)
//! - Correcting known upstream reference-data gaps (regions and countries)
//! - Writing Parquet output suitable for SQL-on-files querying
//! - Formatting the maximum daily-average temperature report

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod mappings;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod schema;
pub mod transform;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{Result, WeatherError};
pub use pipeline::WeatherPipeline;
