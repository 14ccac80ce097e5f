//! Prior-period and year-ago change metrics.
//!
//! Neighbors are taken by position in the series' own point list, so a series
//! with gaps compares against its previous *observation*, not the previous
//! calendar period.

use crate::domain::{ChangeSet, SeriesPoint};

/// Compute changes for `points[index]`.
///
/// - missing value on either side → `None` delta and pct
/// - percent-type series → delta only (percentage points), pct stays `None`
/// - otherwise pct = delta / |other| × 100, `None` when `other == 0`
///
/// An out-of-range `index` yields an all-`None` set.
pub fn compute_changes(
    points: &[SeriesPoint],
    index: usize,
    periods_per_year: usize,
    is_percent_type: bool,
) -> ChangeSet {
    let Some(current) = points.get(index).and_then(|p| p.value) else {
        return ChangeSet::default();
    };

    let prior = index
        .checked_sub(1)
        .and_then(|i| points.get(i))
        .and_then(|p| p.value);

    let year_ago = if periods_per_year > 0 {
        index
            .checked_sub(periods_per_year)
            .and_then(|i| points.get(i))
            .and_then(|p| p.value)
    } else {
        None
    };

    let (prior_delta, prior_pct) = diff(current, prior, is_percent_type);
    let (year_delta, year_pct) = diff(current, year_ago, is_percent_type);

    ChangeSet {
        prior_delta,
        prior_pct,
        year_delta,
        year_pct,
    }
}

fn diff(current: f64, other: Option<f64>, is_percent_type: bool) -> (Option<f64>, Option<f64>) {
    let Some(other) = other else {
        return (None, None);
    };

    let delta = current - other;
    if !delta.is_finite() {
        return (None, None);
    }
    if is_percent_type {
        return (Some(delta), None);
    }

    let pct = if other == 0.0 {
        None
    } else {
        Some(delta / other.abs() * 100.0).filter(|v| v.is_finite())
    };
    (Some(delta), pct)
}
