//! Declarative schema validation for weather observation datasets.
//!
//! Each column carries an ordered list of independent constraints. The
//! validator evaluates every applicable constraint against every row and
//! accumulates all violations; it never fails fast and never deduplicates.
//! Range checks follow the min-inclusive, max-exclusive convention.

use crate::error::{Result, WeatherError};
use crate::models::DATE_FORMAT;
use chrono::NaiveDateTime;
use polars::prelude::*;
use regex::Regex;
use std::fmt;

/// Character class shared by SiteName, Region and Country, 1-50 characters
const NAME_PATTERN: &str = r#"^[A-Za-z0-9 &,./\-()"']{1,50}$"#;

/// One independent check applied to a column
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Value must satisfy `min <= value < max`
    InRange { min: f64, max: f64 },
    /// Column must have an integer dtype
    DtypeInteger,
    /// Column must have a float dtype
    DtypeFloat,
    /// Every value must convert losslessly to an integer
    ConvertibleToInt,
    /// Every value must match the regular expression
    MatchesPattern(&'static str),
    /// Every value must parse with the given date-time format
    DateFormat(&'static str),
}

/// Constraint set for one column of the import contract
pub struct ColumnRule {
    pub name: &'static str,
    /// Missing values are exempt from every constraint on this column
    pub allow_empty: bool,
    pub constraints: Vec<Constraint>,
}

impl ColumnRule {
    fn new(name: &'static str, allow_empty: bool, constraints: Vec<Constraint>) -> Self {
        Self {
            name,
            allow_empty,
            constraints,
        }
    }
}

/// One recorded violation of a (column, constraint) pair.
/// `row` is `None` for column-scoped checks such as dtype constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub column: String,
    pub row: Option<usize>,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "column \"{}\" row {}: {}", self.column, row, self.message),
            None => write!(f, "column \"{}\": {}", self.column, self.message),
        }
    }
}

fn row_violation(column: &str, row: usize, message: String) -> ValidationError {
    ValidationError {
        column: column.to_string(),
        row: Some(row),
        message,
    }
}

fn column_violation(column: &str, message: String) -> ValidationError {
    ValidationError {
        column: column.to_string(),
        row: None,
        message,
    }
}

/// The per-column constraint table for monthly weather files, in the fixed
/// schema order
pub fn weather_schema() -> Vec<ColumnRule> {
    use Constraint::*;

    vec![
        ColumnRule::new(
            "ForecastSiteCode",
            false,
            vec![
                InRange {
                    min: 1_000.0,
                    max: 100_000.0,
                },
                DtypeInteger,
            ],
        ),
        ColumnRule::new(
            "ObservationTime",
            false,
            vec![InRange { min: 0.0, max: 24.0 }, DtypeInteger],
        ),
        ColumnRule::new("ObservationDate", false, vec![DateFormat(DATE_FORMAT)]),
        // 16 points of the compass; N is both 0 and 16 (0 and 360 degrees)
        ColumnRule::new(
            "WindDirection",
            false,
            vec![InRange { min: 0.0, max: 17.0 }, DtypeInteger],
        ),
        ColumnRule::new(
            "WindSpeed",
            true,
            vec![
                InRange {
                    min: 0.0,
                    max: 255.0,
                },
                ConvertibleToInt,
            ],
        ),
        ColumnRule::new(
            "WindGust",
            true,
            vec![
                InRange {
                    min: 0.0,
                    max: 255.0,
                },
                ConvertibleToInt,
            ],
        ),
        ColumnRule::new(
            "Visibility",
            true,
            vec![
                ConvertibleToInt,
                InRange {
                    min: 0.0,
                    max: 125_000.0,
                },
            ],
        ),
        ColumnRule::new(
            "ScreenTemperature",
            true,
            vec![
                InRange {
                    min: -50.0,
                    max: 50.0,
                },
                DtypeFloat,
            ],
        ),
        ColumnRule::new(
            "Pressure",
            true,
            vec![
                InRange {
                    min: 870.0,
                    max: 1_085.0,
                },
                ConvertibleToInt,
            ],
        ),
        ColumnRule::new(
            "SignificantWeatherCode",
            true,
            vec![InRange { min: 0.0, max: 31.0 }],
        ),
        ColumnRule::new("SiteName", false, vec![MatchesPattern(NAME_PATTERN)]),
        // Signed latitude range
        ColumnRule::new(
            "Latitude",
            false,
            vec![
                InRange {
                    min: -90.0,
                    max: 90.0,
                },
                DtypeFloat,
            ],
        ),
        // Upper bound of 80 preserved from the observed upstream contract
        ColumnRule::new(
            "Longitude",
            false,
            vec![
                InRange {
                    min: -180.0,
                    max: 80.0,
                },
                DtypeFloat,
            ],
        ),
        ColumnRule::new("Region", true, vec![MatchesPattern(NAME_PATTERN)]),
        ColumnRule::new("Country", true, vec![MatchesPattern(NAME_PATTERN)]),
    ]
}

/// Validate a dataset against the weather schema.
///
/// Returns every violation found across all columns and rows; an empty
/// vector means the dataset is valid. Raising on a non-empty result is the
/// orchestrator's responsibility.
pub fn validate(df: &DataFrame) -> Result<Vec<ValidationError>> {
    let mut violations = Vec::new();

    for rule in weather_schema() {
        let column = df.column(rule.name)?;
        let series = column.as_materialized_series();

        if !rule.allow_empty {
            record_missing(series, rule.name, &mut violations);
        }
        for constraint in &rule.constraints {
            apply_constraint(series, rule.name, constraint, &mut violations)?;
        }
    }

    Ok(violations)
}

fn record_missing(series: &Series, column: &str, out: &mut Vec<ValidationError>) {
    if series.null_count() == 0 {
        return;
    }
    for (row, is_null) in series.is_null().into_iter().enumerate() {
        if is_null == Some(true) {
            out.push(row_violation(
                column,
                row,
                "missing value in a column that does not allow empties".to_string(),
            ));
        }
    }
}

fn apply_constraint(
    series: &Series,
    column: &str,
    constraint: &Constraint,
    out: &mut Vec<ValidationError>,
) -> Result<()> {
    match constraint {
        Constraint::InRange { min, max } => {
            let Ok(cast) = series.cast(&DataType::Float64) else {
                out.push(column_violation(
                    column,
                    format!("cannot range-check a {} column", series.dtype()),
                ));
                return Ok(());
            };
            for (row, value) in cast.f64()?.into_iter().enumerate() {
                if let Some(v) = value {
                    if !(v >= *min && v < *max) {
                        out.push(row_violation(
                            column,
                            row,
                            format!("value {v} out of range [{min}, {max})"),
                        ));
                    }
                }
            }
        }
        Constraint::DtypeInteger => {
            if !series.dtype().is_integer() {
                out.push(column_violation(
                    column,
                    format!("expected an integer column, found {}", series.dtype()),
                ));
            }
        }
        Constraint::DtypeFloat => {
            if !series.dtype().is_float() {
                out.push(column_violation(
                    column,
                    format!("expected a float column, found {}", series.dtype()),
                ));
            }
        }
        Constraint::ConvertibleToInt => {
            let Ok(cast) = series.cast(&DataType::Float64) else {
                out.push(column_violation(
                    column,
                    format!("a {} column cannot be converted to integers", series.dtype()),
                ));
                return Ok(());
            };
            for (row, value) in cast.f64()?.into_iter().enumerate() {
                if let Some(v) = value {
                    if v.fract() != 0.0 {
                        out.push(row_violation(
                            column,
                            row,
                            format!("value {v} cannot be converted to an integer"),
                        ));
                    }
                }
            }
        }
        Constraint::MatchesPattern(pattern) => {
            let re = Regex::new(pattern).map_err(|e| {
                WeatherError::configuration(format!("invalid schema pattern: {e}"))
            })?;
            let Ok(values) = series.str() else {
                out.push(column_violation(
                    column,
                    format!("expected a string column, found {}", series.dtype()),
                ));
                return Ok(());
            };
            for (row, value) in values.into_iter().enumerate() {
                if let Some(s) = value {
                    if !re.is_match(s) {
                        out.push(row_violation(
                            column,
                            row,
                            format!("value \"{s}\" does not match the column pattern"),
                        ));
                    }
                }
            }
        }
        Constraint::DateFormat(format) => {
            let Ok(values) = series.str() else {
                out.push(column_violation(
                    column,
                    format!("expected a date string column, found {}", series.dtype()),
                ));
                return Ok(());
            };
            for (row, value) in values.into_iter().enumerate() {
                if let Some(s) = value {
                    if NaiveDateTime::parse_from_str(s, format).is_err() {
                        out.push(row_violation(
                            column,
                            row,
                            format!("value \"{s}\" does not match date format {format}"),
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}
