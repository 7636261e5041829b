//! Fixed lookup tables used by the transform engine.
//!
//! Compass points, significant-weather labels, visibility bands and the
//! authoritative region-to-country table. The raw `Country` column is known
//! to contain capitalised and blank values upstream, so country is always
//! re-derived from region.

/// 17-entry compass scale. Wind direction 0 and 16 both mean North
/// (0 and 360 degrees).
const COMPASS_16_PT: [&str; 17] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW", "N",
];

/// Met Office significant weather codes 0-30
const WEATHER_TYPES: [&str; 31] = [
    "Clear night",
    "Sunny day",
    "Partly cloudy (night)",
    "Partly cloudy (day)",
    "Not used",
    "Mist",
    "Fog",
    "Cloudy",
    "Overcast",
    "Light rain shower (night)",
    "Light rain shower (day)",
    "Drizzle",
    "Light rain",
    "Heavy rain shower (night)",
    "Heavy rain shower (day)",
    "Heavy rain",
    "Sleet shower (night)",
    "Sleet shower (day)",
    "Sleet",
    "Hail shower (night)",
    "Hail shower (day)",
    "Hail",
    "Light snow shower (night)",
    "Light snow shower (day)",
    "Light snow",
    "Heavy snow shower (night)",
    "Heavy snow shower (day)",
    "Heavy snow",
    "Thunder shower (night)",
    "Thunder shower (day)",
    "Thunder",
];

/// Visibility bands in metres. Each entry is the left-inclusive lower edge
/// of its category; the last band is open-ended.
const VISIBILITY_BANDS: [(i64, &str); 6] = [
    (0, "Very poor"),
    (1_000, "Poor"),
    (4_000, "Moderate"),
    (10_000, "Good"),
    (20_000, "Very good"),
    (40_000, "Excellent"),
];

/// UK forecast regions mapped to their country. Authoritative over the raw
/// `Country` field (eg Glasgow and Strathclyde are not in England).
const REGION_TO_COUNTRY: [(&str, &str); 17] = [
    ("Orkney & Shetland", "Scotland"),
    ("Highland & Eilean Siar", "Scotland"),
    ("Grampian", "Scotland"),
    ("Strathclyde", "Scotland"),
    ("Central Tayside & Fife", "Scotland"),
    ("Dumfries, Galloway, Lothian & Borders", "Scotland"),
    ("Northern Ireland", "Northern Ireland"),
    ("Wales", "Wales"),
    ("North West England", "England"),
    ("North East England", "England"),
    ("Yorkshire & Humber", "England"),
    ("West Midlands", "England"),
    ("East Midlands", "England"),
    ("East of England", "England"),
    ("South West England", "England"),
    ("London & South East England", "England"),
    ("Isle of Man", "Isle of Man"),
];

/// Compass-point label for a wind direction index, if the index is on the scale
pub fn compass_point(direction: i64) -> Option<&'static str> {
    usize::try_from(direction)
        .ok()
        .and_then(|idx| COMPASS_16_PT.get(idx))
        .copied()
}

/// Human-readable label for a significant weather code.
/// A missing code reads as "Not available"; a code outside the table is
/// left missing.
pub fn weather_type(code: Option<i64>) -> Option<&'static str> {
    match code {
        None => Some("Not available"),
        Some(code) => usize::try_from(code)
            .ok()
            .and_then(|idx| WEATHER_TYPES.get(idx))
            .copied(),
    }
}

/// Categorical label for a visibility distance in metres.
/// Missing visibility gets no category rather than falling into the
/// lowest band.
pub fn visibility_description(visibility: Option<i64>) -> Option<&'static str> {
    let visibility = visibility?;
    VISIBILITY_BANDS
        .iter()
        .rev()
        .find(|(lower, _)| visibility >= *lower)
        .map(|(_, label)| *label)
}

/// Country for a forecast region; unknown regions yield no country
pub fn country_for_region(region: &str) -> Option<&'static str> {
    REGION_TO_COUNTRY
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, country)| *country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_wraps_north() {
        assert_eq!(compass_point(0), Some("N"));
        assert_eq!(compass_point(16), Some("N"));
        assert_eq!(compass_point(4), Some("E"));
        assert_eq!(compass_point(8), Some("S"));
        assert_eq!(compass_point(17), None);
        assert_eq!(compass_point(-1), None);
    }

    #[test]
    fn test_weather_type_missing_code() {
        assert_eq!(weather_type(None), Some("Not available"));
        assert_eq!(weather_type(Some(0)), Some("Clear night"));
        assert_eq!(weather_type(Some(30)), Some("Thunder"));
        assert_eq!(weather_type(Some(31)), None);
    }

    #[test]
    fn test_visibility_band_edges_are_left_inclusive() {
        assert_eq!(visibility_description(Some(0)), Some("Very poor"));
        assert_eq!(visibility_description(Some(999)), Some("Very poor"));
        assert_eq!(visibility_description(Some(1_000)), Some("Poor"));
        assert_eq!(visibility_description(Some(3_999)), Some("Poor"));
        assert_eq!(visibility_description(Some(4_000)), Some("Moderate"));
        assert_eq!(visibility_description(Some(10_000)), Some("Good"));
        assert_eq!(visibility_description(Some(20_000)), Some("Very good"));
        assert_eq!(visibility_description(Some(40_000)), Some("Excellent"));
        assert_eq!(visibility_description(Some(125_000)), Some("Excellent"));
    }

    #[test]
    fn test_visibility_missing_has_no_category() {
        assert_eq!(visibility_description(None), None);
    }

    #[test]
    fn test_region_to_country() {
        assert_eq!(country_for_region("Strathclyde"), Some("Scotland"));
        assert_eq!(country_for_region("Wales"), Some("Wales"));
        assert_eq!(country_for_region("East Midlands"), Some("England"));
        assert_eq!(country_for_region("Isle of Man"), Some("Isle of Man"));
        assert_eq!(country_for_region("Bretagne"), None);
    }
}
