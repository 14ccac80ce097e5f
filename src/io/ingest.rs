//! Series payload ingest and normalization.
//!
//! This module turns saved API payloads (one JSON document per series) into
//! clean `NamedSeries` values that the engine can trust:
//!
//! - both observation shapes (`{year, period, value}` and `{date, value}`) are
//!   accepted, resolved once into a `PeriodInput`, and never branched on again
//! - values may be numbers, numeric strings, or missing markers (`"."`, `"-"`,
//!   `""`, `null`); anything else becomes a missing value with a warning
//! - points are sorted chronologically and de-duplicated (first occurrence wins)
//! - multiple files are loaded in parallel, preserving input order

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Deserializer, de};
use tracing::{debug, info, warn};

use crate::domain::{Frequency, NamedSeries, SeriesPoint};
use crate::error::AppError;
use crate::period::{PeriodInput, normalize_for};

/// Wire shape of a series payload.
#[derive(Debug, Deserialize)]
struct SeriesPayload {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    unit_scale: Option<i32>,
    #[serde(default)]
    is_percent_type: bool,
    frequency: Frequency,
    observations: Vec<Observation>,
}

/// Either observation shape; resolved into a `PeriodInput` right after parsing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Observation {
    YearPeriod {
        #[serde(deserialize_with = "year_from_number_or_string")]
        year: i32,
        period: String,
        #[serde(default)]
        value: RawValue,
    },
    Dated {
        date: String,
        #[serde(default)]
        value: RawValue,
    },
}

/// BLS payloads carry the year as a string (`"year": "2024"`).
fn year_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i32),
        Text(String),
    }

    match RawYear::deserialize(deserializer)? {
        RawYear::Number(year) => Ok(year),
        RawYear::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid year '{s}'"))),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Observation {
    fn into_parts(self) -> (PeriodInput, RawValue) {
        match self {
            Observation::YearPeriod { year, period, value } => {
                (PeriodInput::YearPeriod { year, period }, value)
            }
            Observation::Dated { date, value } => (PeriodInput::Iso { date }, value),
        }
    }
}

/// Parse one series payload from a JSON string.
pub fn parse_series_json(json: &str) -> Result<NamedSeries, AppError> {
    let payload: SeriesPayload = serde_json::from_str(json)
        .map_err(|e| AppError::input(format!("Invalid series JSON: {e}")))?;
    Ok(build_series(payload))
}

/// Load one series payload from a file.
pub fn load_series(path: &Path) -> Result<NamedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open series file '{}': {e}", path.display())))?;
    let payload: SeriesPayload = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid series JSON in '{}': {e}", path.display())))?;

    let series = build_series(payload);
    info!(
        id = %series.id,
        points = series.points.len(),
        path = %path.display(),
        "loaded series"
    );
    Ok(series)
}

/// Load several series files in parallel.
///
/// Output order matches `paths`. Series ids must be unique across the set.
pub fn load_series_set(paths: &[PathBuf]) -> Result<Vec<NamedSeries>, AppError> {
    if paths.is_empty() {
        return Err(AppError::input("No series files given."));
    }

    let series = paths
        .par_iter()
        .map(|p| load_series(p))
        .collect::<Result<Vec<_>, _>>()?;

    ensure_unique_ids(&series)?;

    if series.iter().all(|s| s.points.is_empty()) {
        return Err(AppError::no_data("No observations found in any series."));
    }
    Ok(series)
}

fn ensure_unique_ids(series: &[NamedSeries]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for s in series {
        if !seen.insert(s.id.as_str()) {
            return Err(AppError::input(format!("Duplicate series id '{}'.", s.id)));
        }
    }
    Ok(())
}

fn build_series(payload: SeriesPayload) -> NamedSeries {
    let frequency = payload.frequency;
    let id = payload.id;

    let mut points: Vec<SeriesPoint> = payload
        .observations
        .into_iter()
        .map(|obs| {
            let (period, raw) = obs.into_parts();
            let normalized = normalize_for(&period, frequency);
            let value = parse_value(&raw);
            if value.is_none() && !raw.is_missing_marker() {
                warn!(series = %id, period = %normalized.label, "unparseable value treated as missing");
            }
            SeriesPoint {
                key: normalized.key,
                label: normalized.label,
                value,
            }
        })
        .collect();

    // Stable sort keeps source order among duplicates so "first wins" holds.
    points.sort_by(|a, b| a.key.cmp(&b.key));
    let before = points.len();
    points.dedup_by(|later, earlier| later.key == earlier.key);
    if points.len() != before {
        warn!(
            series = %id,
            dropped = before - points.len(),
            "duplicate periods dropped (first occurrence kept)"
        );
    }
    debug!(series = %id, points = points.len(), "normalized series");

    NamedSeries {
        display_name: payload.display_name.unwrap_or_else(|| id.clone()),
        id,
        unit: payload.unit.filter(|u| !u.trim().is_empty()),
        unit_scale: payload.unit_scale,
        is_percent_type: payload.is_percent_type,
        frequency,
        points,
    }
}

impl RawValue {
    fn is_missing_marker(&self) -> bool {
        match self {
            RawValue::Missing => true,
            RawValue::Text(s) => matches!(s.trim(), "" | "." | "-" | "NA" | "N/A"),
            RawValue::Number(_) => false,
        }
    }
}

fn parse_value(raw: &RawValue) -> Option<f64> {
    let v = match raw {
        RawValue::Number(v) => *v,
        RawValue::Text(s) => {
            // Sources sometimes include thousands separators ("1,234.5").
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok()?
        }
        RawValue::Missing => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}
