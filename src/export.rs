//! Durable output writers.
//!
//! Writes the enriched dataset to a Parquet file for SQL-on-files querying,
//! and optionally exports the distinct site coordinates that feed the
//! out-of-band reverse-geocoding job.

use crate::error::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Row group size for the weather parquet output
const ROW_GROUP_SIZE: usize = 10_000;

/// Write the enriched weather dataset to a Parquet file.
///
/// No synthetic row index is persisted; the file is addressed by the query
/// engine through its storage locator. Returns the number of rows written.
pub fn write_weather_parquet(df: &DataFrame, path: &Path) -> Result<usize> {
    ensure_parent(path)?;
    let file = File::create(path)?;

    let mut out = df.clone();
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .with_statistics(StatisticsOptions::full())
        .with_row_group_size(Some(ROW_GROUP_SIZE))
        .finish(&mut out)?;

    debug!("Wrote {} rows to {}", out.height(), path.display());
    Ok(out.height())
}

/// Export distinct (site code, latitude, longitude) triples as CSV for the
/// reverse-geocoding batch job
pub fn export_site_coordinates(df: &DataFrame, path: &Path) -> Result<usize> {
    ensure_parent(path)?;

    let mut coords = df
        .select(["ForecastSiteCode", "Latitude", "Longitude"])?
        .unique_stable(None, UniqueKeepStrategy::First, None)?;

    let file = File::create(path)?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut coords)?;

    debug!(
        "Exported {} site coordinates to {}",
        coords.height(),
        path.display()
    );
    Ok(coords.height())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
