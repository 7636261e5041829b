//! Aggregation query layer.
//!
//! Formulates the fixed two-level group-by/max query over the persisted
//! parquet file and delegates execution to an external SQL-on-files engine
//! behind the narrow [`QueryEngine`] seam, so query construction and report
//! formatting stay testable without a live backend.

pub mod drill;

use crate::error::{Result, WeatherError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Semantic column order of the hottest-day report
pub const REPORT_COLUMNS: [&str; 4] = [
    "ObservationDate",
    "Region",
    "SiteName",
    "DailyAverageTemperature",
];

/// Row-oriented result set as returned by the engine. `columns` carries the
/// engine-defined column order, which may differ from the declared SQL
/// projection order; rows map column names to values.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResults {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, serde_json::Value>>,
}

/// Narrow query-execution seam over the external SQL engine
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Signal an engine-unavailable condition before query submission
    async fn ensure_available(&self) -> Result<()>;

    /// Submit a SQL statement and collect the row set
    async fn execute(&self, sql: &str) -> Result<QueryResults>;
}

/// SQL text answering the fixed question: which (date, region, site) group
/// has the highest daily-average screen temperature. Groups are averaged
/// and rounded to two decimals, then filtered to the global maximum, so
/// every tied group comes back.
pub fn max_daily_average_temperature_sql(storage_locator: &str) -> String {
    format!(
        "select\n\
         \x20   *\n\
         from\n\
         (\n\
         \x20   select\n\
         \x20       ObservationDate, Region, SiteName, round(avg(ScreenTemperature), 2) as DailyAverageTemperature\n\
         \x20   from\n\
         \x20       {storage_locator}\n\
         \x20   group by\n\
         \x20       ObservationDate, Region, SiteName\n\
         )\n\
         where\n\
         \x20   DailyAverageTemperature = (select\n\
         \x20                                  max(DailyAverageTemperature)\n\
         \x20                              from\n\
         \x20                                  (select\n\
         \x20                                      round(avg(ScreenTemperature), 2) as DailyAverageTemperature\n\
         \x20                                  from\n\
         \x20                                      {storage_locator}\n\
         \x20                                  group by\n\
         \x20                                      ObservationDate, Region, SiteName))"
    )
}

/// One (date, region, site) group holding the maximum daily average
#[derive(Debug, Clone, PartialEq)]
pub struct HottestDayRow {
    pub observation_date: String,
    pub region: String,
    pub site_name: String,
    pub daily_average_temperature: String,
}

/// The hottest-day result set; more than one row means a tie on the maximum
#[derive(Debug, Clone)]
pub struct HottestDayReport {
    pub rows: Vec<HottestDayRow>,
}

impl HottestDayReport {
    /// Build the report from an engine result set, selecting values by
    /// semantic column name rather than positional index
    pub fn from_results(results: &QueryResults) -> Result<Self> {
        if results.rows.is_empty() {
            return Err(WeatherError::query("aggregate query returned no rows"));
        }

        let rows = results
            .rows
            .iter()
            .map(|row| {
                Ok(HottestDayRow {
                    observation_date: field(row, "ObservationDate")?,
                    region: field(row, "Region")?,
                    site_name: field(row, "SiteName")?,
                    daily_average_temperature: field(row, "DailyAverageTemperature")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Render the fixed-width 4-column text report. Every column is padded
    /// to the longest value or header label plus two spaces.
    pub fn render(&self) -> String {
        let width = self.column_width();

        let mut out = String::from(
            "Data for the weather station site with the hottest day \
             (maximum daily average temperature):\n\n",
        );
        for label in REPORT_COLUMNS {
            out.push_str(&pad(label, width));
        }
        out.push('\n');
        for row in &self.rows {
            for value in row.values() {
                out.push_str(&pad(value, width));
            }
            out.push('\n');
        }
        out
    }

    fn column_width(&self) -> usize {
        let value_width = self
            .rows
            .iter()
            .flat_map(|row| row.values().into_iter().map(str::len))
            .max()
            .unwrap_or(0);
        let header_width = REPORT_COLUMNS.iter().map(|label| label.len()).max().unwrap_or(0);
        value_width.max(header_width) + 2
    }
}

impl HottestDayRow {
    fn values(&self) -> [&str; 4] {
        [
            &self.observation_date,
            &self.region,
            &self.site_name,
            &self.daily_average_temperature,
        ]
    }
}

fn pad(value: &str, width: usize) -> String {
    format!("{value:<width$}")
}

fn field(row: &HashMap<String, serde_json::Value>, name: &str) -> Result<String> {
    let value = row.get(name).ok_or_else(|| {
        WeatherError::query(format!("engine result is missing column \"{name}\""))
    })?;
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Null => Err(WeatherError::query(format!(
            "engine result has a null value for column \"{name}\""
        ))),
        other => Ok(other.to_string()),
    }
}

/// Run the fixed aggregate question against the persisted parquet file
pub async fn max_daily_average_temperature(
    engine: &dyn QueryEngine,
    storage_locator: &str,
) -> Result<HottestDayReport> {
    engine.ensure_available().await?;

    let sql = max_daily_average_temperature_sql(storage_locator);
    debug!("Submitting aggregate query:\n{sql}");

    let results = engine.execute(&sql).await?;
    HottestDayReport::from_results(&results)
}
