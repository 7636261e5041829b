//! Monthly observation file import.
//!
//! Reads a delimited observation file into a DataFrame, normalises the `-99`
//! missing-value sentinel to null, trims whitespace from string cells and
//! enforces the fixed 15-column contract. Structural defects are reported
//! distinctly from empty files and from decoder-level errors.

use crate::error::{Result, WeatherError};
use crate::models::EXPECTED_COLUMNS;
use polars::prelude::*;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Import one monthly weather CSV file.
///
/// Converts `-99` to null and removes leading and trailing whitespace from
/// every string cell.
pub fn import_monthly_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1_000))
        .map_parse_options(|opts| {
            opts.with_null_values(Some(NullValues::AllColumns(vec![
                "-99".into(),
                "-99.0".into(),
            ])))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| match e {
            PolarsError::NoData(_) => WeatherError::empty_file(path, "the file contains no data"),
            other => WeatherError::Polars(other),
        })?;

    if df.height() == 0 {
        return Err(WeatherError::empty_file(
            path,
            "the file only has a header and no data",
        ));
    }

    check_column_contract(path, &df)?;

    let df = trim_string_columns(df)?;
    debug!("Imported {} rows from {}", df.height(), path.display());
    Ok(df)
}

/// Import several monthly files and concatenate them into one dataset
pub fn import_many(paths: &[PathBuf]) -> Result<DataFrame> {
    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        frames.push(import_monthly_csv(path)?.lazy());
    }
    let df = concat(frames, UnionArgs::default())?.collect()?;
    Ok(df)
}

/// Enforce the exact column set and order of the import contract
fn check_column_contract(path: &Path, df: &DataFrame) -> Result<()> {
    let names = df.get_column_names_str();
    match names.len().cmp(&EXPECTED_COLUMNS.len()) {
        Ordering::Less => Err(WeatherError::structural(
            path,
            "missing column names or too few row data values",
        )),
        Ordering::Greater => Err(WeatherError::structural(
            path,
            "extra column names or too many row data values",
        )),
        Ordering::Equal => {
            if names != EXPECTED_COLUMNS {
                Err(WeatherError::structural(path, "unexpected column names"))
            } else {
                Ok(())
            }
        }
    }
}

fn trim_string_columns(df: DataFrame) -> Result<DataFrame> {
    let trims: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .map(|column| col(column.name().as_str()).str().strip_chars(lit(NULL)))
        .collect();

    if trims.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(trims).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "ForecastSiteCode,ObservationTime,ObservationDate,WindDirection,\
        WindSpeed,WindGust,Visibility,ScreenTemperature,Pressure,SignificantWeatherCode,\
        SiteName,Latitude,Longitude,Region,Country";

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn sample_rows() -> String {
        format!(
            "{HEADER}\n\
             3002,0,2016-02-01T00:00:00,12,8,-99,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland\n\
             3005,1,2016-02-01T00:00:00,10,2,15,35000,0.1,997,7,LERWICK (S. SCREEN) (3005),60.139,-1.183,Orkney & Shetland,Scotland\n"
        )
    }

    #[test]
    fn test_import_converts_sentinel_to_null() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "weather.csv", &sample_rows());

        let df = import_monthly_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("WindGust").unwrap().null_count(), 1);
    }

    #[test]
    fn test_import_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let content = format!(
            "{HEADER}\n\
             3002,0,2016-02-01T00:00:00,12,8,5,30000,2.1,997,8,  BALTASOUND (3002)  ,60.749,-0.854,Orkney & Shetland,Scotland\n"
        );
        let path = write_csv(&dir, "weather.csv", &content);

        let df = import_monthly_csv(&path).unwrap();
        let names = df.column("SiteName").unwrap().str().unwrap().clone();
        assert_eq!(names.get(0), Some("BALTASOUND (3002)"));
    }

    #[test]
    fn test_missing_column_is_structural_defect() {
        let dir = TempDir::new().unwrap();
        let content = "ForecastSiteCode,ObservationTime\n3002,0\n";
        let path = write_csv(&dir, "weather.csv", content);

        let err = import_monthly_csv(&path).unwrap_err();
        assert!(matches!(err, WeatherError::StructuralImport { .. }));
    }

    #[test]
    fn test_extra_column_is_structural_defect() {
        let dir = TempDir::new().unwrap();
        let content = format!(
            "{HEADER},Extra\n\
             3002,0,2016-02-01T00:00:00,12,8,5,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland,x\n"
        );
        let path = write_csv(&dir, "weather.csv", &content);

        let err = import_monthly_csv(&path).unwrap_err();
        assert!(matches!(err, WeatherError::StructuralImport { .. }));
    }

    #[test]
    fn test_renamed_column_is_structural_defect() {
        let dir = TempDir::new().unwrap();
        let content = sample_rows().replace("ForecastSiteCode", "SiteCode");
        let path = write_csv(&dir, "weather.csv", &content);

        let err = import_monthly_csv(&path).unwrap_err();
        assert!(matches!(err, WeatherError::StructuralImport { .. }));
    }

    #[test]
    fn test_header_only_file_is_empty_not_structural() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "weather.csv", &format!("{HEADER}\n"));

        let err = import_monthly_csv(&path).unwrap_err();
        assert!(matches!(err, WeatherError::EmptyFile { .. }));
    }

    #[test]
    fn test_import_many_concatenates_months() {
        let dir = TempDir::new().unwrap();
        let first = write_csv(&dir, "weather.201602.csv", &sample_rows());
        let second = write_csv(&dir, "weather.201603.csv", &sample_rows());

        let df = import_many(&[first, second]).unwrap();
        assert_eq!(df.height(), 4);
    }
}
