//! Core column contracts and statistics types for the weather pipeline.

use std::path::PathBuf;

/// The exact column set and order every monthly weather file must carry.
/// Any deviation is a structural defect, not a semantic validation failure.
pub const EXPECTED_COLUMNS: [&str; 15] = [
    "ForecastSiteCode",
    "ObservationTime",
    "ObservationDate",
    "WindDirection",
    "WindSpeed",
    "WindGust",
    "Visibility",
    "ScreenTemperature",
    "Pressure",
    "SignificantWeatherCode",
    "SiteName",
    "Latitude",
    "Longitude",
    "Region",
    "Country",
];

/// Columns coerced to a nullable integer representation after enrichment
pub const INTEGER_COLUMNS: [&str; 6] = [
    "Pressure",
    "WindDirection",
    "WindSpeed",
    "SignificantWeatherCode",
    "WindGust",
    "Visibility",
];

/// Columns coerced to a timestamp representation after enrichment
pub const DATETIME_COLUMNS: [&str; 2] = ["ObservationDate", "ObservationDateTime"];

/// Final ordering key of the enriched dataset, ascending on all levels
pub const SORT_COLUMNS: [&str; 4] = [
    "ObservationDate",
    "ObservationTime",
    "Region",
    "SiteName",
];

/// Observation date pattern used for validation and timestamp coercion
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Processing statistics for a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub files_imported: usize,
    pub rows_imported: usize,
    pub duplicates_dropped: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
