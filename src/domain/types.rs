//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced once at ingest and passed by reference through the engine
//! - exported to JSON/CSV
//! - compared structurally in tests (`BTreeMap` keeps map order deterministic)

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::period::PeriodKey;

/// Reporting frequency of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    /// Lookback stride for year-ago comparisons.
    pub fn periods_per_year(self) -> usize {
        match self {
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Annual => 1,
        }
    }

    /// Column label for the prior-period change.
    pub fn prior_label(self) -> &'static str {
        match self {
            Frequency::Weekly => "WoW",
            Frequency::Monthly => "MoM",
            Frequency::Quarterly => "QoQ",
            Frequency::Annual => "YoY",
        }
    }
}

/// Row ordering of an aligned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Which change a ranking or report column is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChangeBasis {
    /// Versus the previous observation (WoW/MoM/QoQ).
    #[default]
    Prior,
    /// Versus the observation one year earlier.
    Year,
}

/// One observation of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub key: PeriodKey,
    pub label: String,
    pub value: Option<f64>,
}

/// A fetched series plus the metadata that drives changes and formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub id: String,
    pub display_name: String,
    /// Free-form unit string (`"percent"`, `"index 1982-84=100"`, `"billions of dollars"`).
    pub unit: Option<String>,
    /// Power-of-ten multiplier applied before magnitude formatting.
    pub unit_scale: Option<i32>,
    /// Changes are reported as percentage-point deltas rather than relative %.
    pub is_percent_type: bool,
    pub frequency: Frequency,
    /// Chronological order, one point per key.
    pub points: Vec<SeriesPoint>,
}

impl NamedSeries {
    pub fn periods_per_year(&self) -> usize {
        self.frequency.periods_per_year()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

/// Prior-period and year-ago changes for a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub prior_delta: Option<f64>,
    pub prior_pct: Option<f64>,
    pub year_delta: Option<f64>,
    pub year_pct: Option<f64>,
}

impl ChangeSet {
    pub fn delta(&self, basis: ChangeBasis) -> Option<f64> {
        match basis {
            ChangeBasis::Prior => self.prior_delta,
            ChangeBasis::Year => self.year_delta,
        }
    }

    pub fn pct(&self, basis: ChangeBasis) -> Option<f64> {
        match basis {
            ChangeBasis::Prior => self.prior_pct,
            ChangeBasis::Year => self.year_pct,
        }
    }
}

/// One period across every input series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub key: PeriodKey,
    pub label: String,
    pub values: BTreeMap<String, Option<f64>>,
    pub changes: BTreeMap<String, ChangeSet>,
}

/// The most recent non-null observation of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestObservation {
    pub label: String,
    pub value: f64,
    pub changes: ChangeSet,
}

/// Descriptive statistics of a sample plus where a current value sits in it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DistributionSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
    pub current_value: Option<f64>,
    pub current_percentile: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverItem {
    pub id: String,
    pub pct_change: Option<f64>,
}

/// Top-N gainers and losers (top-N each side).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Movers {
    pub gainers: Vec<MoverItem>,
    pub losers: Vec<MoverItem>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags plus environment defaults.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub inputs: Vec<PathBuf>,
    /// Year used as "now" when turning a trailing window into a cutoff.
    pub reference_year: i32,
    /// Keep periods with `year >= cutoff_year`; `None` keeps everything.
    pub cutoff_year: Option<i32>,
    pub order: SortOrder,
    pub top_n: usize,
    pub basis: ChangeBasis,
    /// Restrict per-series reports to one id.
    pub series_filter: Option<String>,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
