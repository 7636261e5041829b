//! Deterministic enrichment of validated weather datasets.
//!
//! A pure, ordered sequence of derivation, correction, deduplication and
//! sorting stages. Each stage takes the dataset by value and rebinds a new
//! one; nothing mutates in place. Later stages depend on earlier ones, so
//! the order is fixed: the region correction must land before the country
//! lookup keys off it, and type coercion runs only after all string-based
//! derivations.

use crate::error::Result;
use crate::mappings;
use crate::models::{DATETIME_COLUMNS, DATE_FORMAT, INTEGER_COLUMNS, SORT_COLUMNS};
use polars::prelude::*;
use tracing::debug;

/// Enrich, deduplicate and sort a validated weather dataset.
///
/// Total and deterministic: the same input always yields the same output
/// ordering and values, given the same lookup tables.
pub fn transform(df: DataFrame) -> Result<DataFrame> {
    let rows_in = df.height();

    let df = derive_observation_datetime(df)?;
    let df = rewrite_site_names(df)?;
    let df = derive_visibility_description(df)?;
    let df = correct_region(df)?;
    let df = derive_country(df)?;
    let df = derive_wind_compass(df)?;
    let df = derive_weather_type(df)?;
    let df = drop_duplicates(df)?;
    let df = coerce_types(df)?;
    let df = sort_observations(df)?;

    debug!(
        "Transformed {} rows into {} enriched rows",
        rows_in,
        df.height()
    );
    Ok(df)
}

/// Merge the date portion of `ObservationDate` with the zero-padded
/// observation hour, keeping the original trailing fragment of the date
/// string
fn derive_observation_datetime(df: DataFrame) -> Result<DataFrame> {
    let merged = concat_str(
        [
            col("ObservationDate").str().slice(lit(0), lit(11)),
            col("ObservationTime")
                .cast(DataType::String)
                .str()
                .zfill(lit(2)),
            col("ObservationDate").str().slice(lit(13), lit(NULL)),
        ],
        "",
        false,
    )
    .alias("ObservationDateTime");

    Ok(df.lazy().with_columns([merged]).collect()?)
}

/// Rewrite site names to proper case with the trailing site-code suffix
/// stripped. The raw name embeds the numeric code, so the suffix is 7
/// characters for 4-digit codes and 8 for longer ones.
fn rewrite_site_names(df: DataFrame) -> Result<DataFrame> {
    let codes_column = df.column("ForecastSiteCode")?.cast(&DataType::Int64)?;
    let codes = codes_column.as_materialized_series().i64()?;
    let names = df.column("SiteName")?.as_materialized_series().str()?;

    let rewritten: Vec<Option<String>> = codes
        .into_iter()
        .zip(names)
        .map(|(code, name)| match (code, name) {
            (Some(code), Some(name)) => {
                let suffix = if code < 10_000 { 7 } else { 8 };
                let stem_len = name.chars().count().saturating_sub(suffix);
                let stem: String = name.chars().take(stem_len).collect();
                Some(proper_case(&stem))
            }
            (_, name) => name.map(str::to_string),
        })
        .collect();

    let mut df = df;
    df.with_column(Series::new("SiteName".into(), rewritten))?;
    Ok(df)
}

/// Categorical visibility label; missing visibility gets no category
fn derive_visibility_description(df: DataFrame) -> Result<DataFrame> {
    let cast = df.column("Visibility")?.cast(&DataType::Int64)?;
    let values = cast.as_materialized_series().i64()?;
    let labels: Vec<Option<&str>> = values
        .into_iter()
        .map(mappings::visibility_description)
        .collect();

    let mut df = df;
    df.with_column(Series::new("VisibilityDescription".into(), labels))?;
    Ok(df)
}

/// Site 3204 is missing from the upstream reference data; it is on the
/// Isle of Man
fn correct_region(df: DataFrame) -> Result<DataFrame> {
    let corrected = when(col("ForecastSiteCode").eq(lit(3204)))
        .then(lit("Isle of Man"))
        .otherwise(col("Region"))
        .alias("Region");

    Ok(df.lazy().with_columns([corrected]).collect()?)
}

/// Re-derive `Country` from the corrected region. The raw country column
/// contains capitalised and blank values upstream, so the lookup table is
/// authoritative. A region without an entry yields a missing country.
fn derive_country(df: DataFrame) -> Result<DataFrame> {
    let cast = df.column("Region")?.cast(&DataType::String)?;
    let regions = cast.as_materialized_series().str()?;
    let countries: Vec<Option<&str>> = regions
        .into_iter()
        .map(|region| region.and_then(mappings::country_for_region))
        .collect();

    let mut df = df;
    df.with_column(Series::new("Country".into(), countries))?;
    Ok(df)
}

fn derive_wind_compass(df: DataFrame) -> Result<DataFrame> {
    let cast = df.column("WindDirection")?.cast(&DataType::Int64)?;
    let directions = cast.as_materialized_series().i64()?;
    let labels: Vec<Option<&str>> = directions
        .into_iter()
        .map(|direction| direction.and_then(mappings::compass_point))
        .collect();

    let mut df = df;
    df.with_column(Series::new("WindCompass".into(), labels))?;
    Ok(df)
}

fn derive_weather_type(df: DataFrame) -> Result<DataFrame> {
    let cast = df.column("SignificantWeatherCode")?.cast(&DataType::Int64)?;
    let codes = cast.as_materialized_series().i64()?;
    let labels: Vec<Option<&str>> = codes.into_iter().map(mappings::weather_type).collect();

    let mut df = df;
    df.with_column(Series::new("WeatherType".into(), labels))?;
    Ok(df)
}

/// Remove exact full-row duplicates, keeping the first occurrence
fn drop_duplicates(df: DataFrame) -> Result<DataFrame> {
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Correct wrongly inferred types: nullable integers for the coded and
/// measured columns, timestamps for the date columns
fn coerce_types(df: DataFrame) -> Result<DataFrame> {
    let mut casts: Vec<Expr> = INTEGER_COLUMNS
        .iter()
        .map(|name| col(*name).cast(DataType::Int64))
        .collect();

    let options = StrptimeOptions {
        format: Some(DATE_FORMAT.into()),
        ..Default::default()
    };
    for name in DATETIME_COLUMNS {
        casts.push(col(name).str().to_datetime(
            Some(TimeUnit::Milliseconds),
            None,
            options.clone(),
            lit("raise"),
        ));
    }

    Ok(df.lazy().with_columns(casts).collect()?)
}

/// Stable sort; rows tying on all four keys keep their pre-sort order so
/// repeated runs produce identical output
fn sort_observations(df: DataFrame) -> Result<DataFrame> {
    Ok(df
        .lazy()
        .sort(
            SORT_COLUMNS,
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?)
}

/// Proper-case a site name: first letter of every word upper-cased, the
/// rest lowered. Word boundaries are any non-alphabetic character.
fn proper_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
