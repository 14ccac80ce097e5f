//! Distribution summaries.
//!
//! Quantiles use the R-7 linear interpolation method (`h = (n - 1) * p`), the
//! default in R and NumPy. For `[10, 20, 30, 40, 50]` this gives p25 = 20,
//! median = 30, p75 = 40.

use crate::domain::{DistributionSummary, NamedSeries};

/// Summarize `sample` and locate `current` within it.
///
/// Missing and non-finite values are dropped first; an empty sample returns an
/// all-`None` summary. `current_percentile` is the share of sample values
/// `<= current`, in percent.
pub fn summarize(sample: &[Option<f64>], current: f64) -> DistributionSummary {
    let mut sorted: Vec<f64> = sample.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return DistributionSummary::default();
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;

    let current_percentile = if current.is_nan() {
        None
    } else {
        let at_or_below = sorted.partition_point(|&v| v <= current);
        Some((at_or_below as f64 / n as f64 * 100.0).clamp(0.0, 100.0))
    };

    DistributionSummary {
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        mean: Some(mean),
        median: quantile_sorted(&sorted, 0.5),
        p25: quantile_sorted(&sorted, 0.25),
        p75: quantile_sorted(&sorted, 0.75),
        current_value: Some(current),
        current_percentile,
    }
}

/// Summarize a series' full history against its latest observation.
pub fn summarize_series(series: &NamedSeries) -> DistributionSummary {
    let sample: Vec<Option<f64>> = series.points.iter().map(|p| p.value).collect();
    match sample.iter().rev().flatten().next() {
        Some(&current) => summarize(&sample, current),
        None => DistributionSummary::default(),
    }
}

/// R-7 quantile on data sorted ascending.
fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted[n - 1])
    } else {
        Some((1.0 - g) * sorted[j] + g * sorted[j + 1])
    }
}
