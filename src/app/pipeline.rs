//! Shared "explore pipeline" logic used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> align -> summaries -> movers
//!
//! The command handlers can then focus on presentation.

use tracing::debug;

use crate::analytics::{align, latest_observation, movers_from_series, summarize};
use crate::domain::{AlignedRow, DistributionSummary, ExplorerConfig, Movers, NamedSeries};
use crate::error::AppError;
use crate::io::ingest::load_series_set;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: Vec<NamedSeries>,
    pub rows: Vec<AlignedRow>,
    /// One summary per entry of `series`, same order.
    pub summaries: Vec<DistributionSummary>,
    pub movers: Movers,
}

/// Execute the full pipeline, loading series from `config.inputs`.
pub fn run_explorer(config: &ExplorerConfig) -> Result<RunOutput, AppError> {
    let series = load_series_set(&config.inputs)?;
    run_with_series(config, series)
}

/// Execute the pipeline on already-loaded series.
pub fn run_with_series(config: &ExplorerConfig, series: Vec<NamedSeries>) -> Result<RunOutput, AppError> {
    let rows = align(&series, config.cutoff_year, config.order);
    if rows.is_empty() {
        return Err(AppError::no_data("No periods remain after applying the time window."));
    }
    debug!(series = series.len(), rows = rows.len(), cutoff = ?config.cutoff_year, "aligned");

    let summaries = series
        .iter()
        .map(|s| summarize_window(s, config.cutoff_year))
        .collect();
    let movers = movers_from_series(&series, config.basis, config.top_n);
    debug!(
        gainers = movers.gainers.len(),
        losers = movers.losers.len(),
        "ranked movers"
    );

    Ok(RunOutput {
        series,
        rows,
        summaries,
        movers,
    })
}

/// Summaries to report, honoring `config.series_filter`.
pub fn selected_summaries<'a>(
    run: &'a RunOutput,
    config: &ExplorerConfig,
) -> Result<Vec<(&'a NamedSeries, &'a DistributionSummary)>, AppError> {
    let pairs: Vec<_> = run.series.iter().zip(&run.summaries).collect();
    match &config.series_filter {
        None => Ok(pairs),
        Some(id) => {
            let picked: Vec<_> = pairs.into_iter().filter(|(s, _)| &s.id == id).collect();
            if picked.is_empty() {
                return Err(AppError::input(format!("Unknown series id '{id}'.")));
            }
            Ok(picked)
        }
    }
}

/// Summarize the points inside the window against the series' latest value.
fn summarize_window(series: &NamedSeries, cutoff_year: Option<i32>) -> DistributionSummary {
    let Some(latest) = latest_observation(series) else {
        return DistributionSummary::default();
    };
    let cutoff = cutoff_year.filter(|&y| y != 0);
    let sample: Vec<Option<f64>> = series
        .points
        .iter()
        .filter(|p| cutoff.is_none_or(|c| p.key.year >= c))
        .map(|p| p.value)
        .collect();
    summarize(&sample, latest.value)
}
