//! Formatted terminal output: aligned tables, snapshots, summaries, movers.
//!
//! We keep formatting code in one place so:
//! - the engine stays free of presentation concerns
//! - output changes are localized (golden-string tests live here)

use crate::analytics::latest_observation;
use crate::domain::{AlignedRow, ChangeBasis, ChangeSet, DistributionSummary, Movers, NamedSeries};
use crate::report::magnitude::{format_delta, format_magnitude, format_pct_change};

const PERIOD_W: usize = 12;
const VALUE_W: usize = 12;
const CHANGE_W: usize = 9;

/// Format aligned rows as a table: one value column plus prior/year change
/// columns per series.
pub fn format_aligned_table(rows: &[AlignedRow], series: &[NamedSeries]) -> String {
    let mut out = String::new();

    let mut header = format!("{:<PERIOD_W$}", "period");
    let mut rule = format!("{:-<PERIOD_W$}", "");
    for s in series {
        header.push_str(&format!(
            " {:>VALUE_W$} {:>CHANGE_W$} {:>CHANGE_W$}",
            truncate(&s.display_name, VALUE_W),
            s.frequency.prior_label(),
            "YoY"
        ));
        rule.push_str(&format!(" {:-<VALUE_W$} {:-<CHANGE_W$} {:-<CHANGE_W$}", "", "", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    for row in rows {
        let mut line = format!("{:<PERIOD_W$}", truncate(&row.label, PERIOD_W));
        for s in series {
            let value = row.values.get(&s.id).copied().flatten();
            let change = row.changes.get(&s.id).copied().unwrap_or_default();
            line.push_str(&format!(
                " {:>VALUE_W$} {:>CHANGE_W$} {:>CHANGE_W$}",
                format_magnitude(value, s.unit(), s.unit_scale, s.is_percent_type),
                fmt_change(&change, ChangeBasis::Prior, s),
                fmt_change(&change, ChangeBasis::Year, s),
            ));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Latest value per series with its changes ("snapshot cards").
pub fn format_latest(series: &[NamedSeries]) -> String {
    let mut out = String::new();
    out.push_str("Latest:\n");
    for s in series {
        match latest_observation(s) {
            Some(obs) => out.push_str(&format!(
                "- {} ({}): {} | {} {} | YoY {}\n",
                s.display_name,
                obs.label,
                format_magnitude(Some(obs.value), s.unit(), s.unit_scale, s.is_percent_type),
                s.frequency.prior_label(),
                fmt_change(&obs.changes, ChangeBasis::Prior, s),
                fmt_change(&obs.changes, ChangeBasis::Year, s),
            )),
            None => out.push_str(&format!("- {}: no data\n", s.display_name)),
        }
    }
    out
}

/// Distribution summary of one series.
pub fn format_summary(series: &NamedSeries, summary: &DistributionSummary) -> String {
    let fmt = |v: Option<f64>| format_magnitude(v, series.unit(), series.unit_scale, series.is_percent_type);

    let mut out = String::new();
    out.push_str(&format!("=== {} [{}] ===\n", series.display_name, series.id));
    out.push_str(&format!(
        "Range: min={} | p25={} | median={} | p75={} | max={}\n",
        fmt(summary.min),
        fmt(summary.p25),
        fmt(summary.median),
        fmt(summary.p75),
        fmt(summary.max),
    ));
    out.push_str(&format!("Mean: {}\n", fmt(summary.mean)));
    out.push_str(&format!(
        "Current: {} (percentile {})\n",
        fmt(summary.current_value),
        summary
            .current_percentile
            .map(|p| format!("{p:.0}"))
            .unwrap_or_else(|| "N/A".to_string()),
    ));
    out
}

/// Format the gainers/losers tables.
pub fn format_movers(movers: &Movers, series: &[NamedSeries], basis: ChangeBasis) -> String {
    let basis_label = match basis {
        ChangeBasis::Prior => "prior period",
        ChangeBasis::Year => "year ago",
    };

    let mut out = String::new();
    out.push_str(&format!("Top gainers (vs {basis_label}):\n"));
    out.push_str(&format_mover_table(&movers.gainers, series));
    out.push('\n');
    out.push_str(&format!("Top losers (vs {basis_label}):\n"));
    out.push_str(&format_mover_table(&movers.losers, series));
    out
}

fn format_mover_table(items: &[crate::domain::MoverItem], series: &[NamedSeries]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<24} {:<32} {:>9}", "id", "name", "change").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<32} {:-<9}", "", "", "").trim_end());
    out.push('\n');

    for item in items {
        let name = series
            .iter()
            .find(|s| s.id == item.id)
            .map(|s| s.display_name.as_str())
            .unwrap_or("");
        out.push_str(
            format!(
                "{:<24} {:<32} {:>9}",
                truncate(&item.id, 24),
                truncate(name, 32),
                format_pct_change(item.pct_change),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Percent-type series show the pp delta; everything else the relative change.
fn fmt_change(change: &ChangeSet, basis: ChangeBasis, s: &NamedSeries) -> String {
    if s.is_percent_type {
        format_delta(change.delta(basis), s.unit(), s.unit_scale, true)
    } else {
        format_pct_change(change.pct(basis))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
