//! Period normalization.
//!
//! Economic series arrive with heterogeneous period representations:
//!
//! - BLS-style `(year, "M07")` / `(year, "Q02")` / `(year, "M13")` pairs
//! - FRED/BEA-style ISO dates (`"2024-07-01"`, `"2024-07"`)
//!
//! Everything is resolved once, at ingest, into a [`PeriodKey`] whose derived
//! ordering is chronological, plus a display label. Downstream code never
//! branches on the raw shape again.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::Frequency;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month slot for annual observations (sorts after December).
const ANNUAL_SLOT: u8 = 13;
/// Month slot for unrecognized codes (sorts after everything else in the year).
const OTHER_SLOT: u8 = 14;

/// Raw period representation as delivered by a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodInput {
    /// Year plus a period code (`M07`, `Q02`, `A01`, `M13`, ...).
    YearPeriod { year: i32, period: String },
    /// ISO date (`YYYY-MM-DD`) or year-month (`YYYY-MM`).
    Iso { date: String },
}

/// Granularity tag of a [`PeriodKey`].
///
/// The variant order matters: it breaks ties between periods that start in the
/// same month (e.g. January vs Q1 vs a date on the 0th day slot).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Date,
    Month,
    Quarter,
    Annual,
    Other(String),
}

/// Sortable, comparable period identity.
///
/// Field order defines the derived `Ord`: year, then month slot, then day,
/// then kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub kind: PeriodKind,
}

impl PeriodKey {
    pub fn date(year: i32, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            kind: PeriodKind::Date,
        }
    }

    pub fn month(year: i32, month: u8) -> Self {
        Self {
            year,
            month,
            day: 0,
            kind: PeriodKind::Month,
        }
    }

    /// Quarter `q` (1..=4), keyed on the quarter's first month.
    pub fn quarter(year: i32, q: u8) -> Self {
        Self {
            year,
            month: (q.clamp(1, 4) - 1) * 3 + 1,
            day: 0,
            kind: PeriodKind::Quarter,
        }
    }

    pub fn annual(year: i32) -> Self {
        Self {
            year,
            month: ANNUAL_SLOT,
            day: 0,
            kind: PeriodKind::Annual,
        }
    }

    fn other(year: i32, code: &str) -> Self {
        Self {
            year,
            month: OTHER_SLOT,
            day: 0,
            kind: PeriodKind::Other(code.to_string()),
        }
    }

    /// Collapse date/month keys onto the series' declared frequency.
    ///
    /// Quarter, annual and unrecognized keys are returned unchanged, as are
    /// all keys of weekly series.
    pub fn coarsen(self, frequency: Frequency) -> Self {
        if !matches!(self.kind, PeriodKind::Date | PeriodKind::Month) {
            return self;
        }
        match frequency {
            Frequency::Weekly => self,
            Frequency::Monthly => PeriodKey::month(self.year, self.month),
            Frequency::Quarterly => PeriodKey::quarter(self.year, (self.month - 1) / 3 + 1),
            Frequency::Annual => PeriodKey::annual(self.year),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PeriodKind::Date => write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day),
            PeriodKind::Month => write!(f, "{:04}-{:02}", self.year, self.month),
            PeriodKind::Quarter => write!(f, "{:04}-Q{}", self.year, (self.month - 1) / 3 + 1),
            PeriodKind::Annual => write!(f, "{:04}", self.year),
            PeriodKind::Other(code) => write!(f, "{:04}-{code}", self.year),
        }
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPeriod {
    pub key: PeriodKey,
    pub label: String,
}

enum PeriodCode {
    Month(u8),
    Quarter(u8),
    Annual,
}

fn parse_code(raw: &str) -> Option<PeriodCode> {
    let code = raw.trim().to_ascii_uppercase();
    if matches!(code.as_str(), "A" | "A01" | "ANNUAL" | "M13") {
        return Some(PeriodCode::Annual);
    }

    let mut chars = code.chars();
    let prefix = chars.next()?;
    let n: u8 = chars.as_str().parse().ok()?;
    match (prefix, n) {
        ('M', 1..=12) => Some(PeriodCode::Month(n)),
        ('Q', 1..=4) => Some(PeriodCode::Quarter(n)),
        _ => None,
    }
}

/// Short label for a period code: `M07` → `Jul`, `Q02` → `Q2`, annual codes →
/// `Annual`. Unrecognized codes are returned unchanged.
pub fn period_label(code: &str) -> String {
    match parse_code(code) {
        Some(PeriodCode::Month(m)) => MONTH_ABBR[usize::from(m - 1)].to_string(),
        Some(PeriodCode::Quarter(q)) => format!("Q{q}"),
        Some(PeriodCode::Annual) => "Annual".to_string(),
        None => code.to_string(),
    }
}

/// Resolve a raw period into its key and display label. Never panics.
pub fn normalize(input: &PeriodInput) -> NormalizedPeriod {
    match input {
        PeriodInput::YearPeriod { year, period } => normalize_year_period(*year, period),
        PeriodInput::Iso { date } => normalize_iso(date),
    }
}

/// [`normalize`], then coarsen the key to `frequency` (see [`PeriodKey::coarsen`]).
///
/// The label is left as produced by `normalize`.
pub fn normalize_for(input: &PeriodInput, frequency: Frequency) -> NormalizedPeriod {
    let NormalizedPeriod { key, label } = normalize(input);
    NormalizedPeriod {
        key: key.coarsen(frequency),
        label,
    }
}

fn normalize_year_period(year: i32, period: &str) -> NormalizedPeriod {
    let code = period.trim();
    if code.is_empty() {
        return NormalizedPeriod {
            key: PeriodKey::other(year, ""),
            label: year.to_string(),
        };
    }

    let key = match parse_code(code) {
        Some(PeriodCode::Month(m)) => PeriodKey::month(year, m),
        Some(PeriodCode::Quarter(q)) => PeriodKey::quarter(year, q),
        Some(PeriodCode::Annual) => PeriodKey::annual(year),
        None => PeriodKey::other(year, code),
    };

    NormalizedPeriod {
        key,
        label: format!("{} {year}", period_label(code)),
    }
}

fn normalize_iso(raw: &str) -> NormalizedPeriod {
    let s = raw.trim();

    let key = if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        PeriodKey::date(d.year(), d.month() as u8, d.day() as u8)
    } else if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        PeriodKey::month(d.year(), d.month() as u8)
    } else {
        let year = s.get(..4).and_then(|y| y.parse().ok()).unwrap_or(0);
        PeriodKey::other(year, s)
    };

    NormalizedPeriod {
        key,
        label: s.to_string(),
    }
}
