//! Top gainers / losers ranking.

use std::cmp::Ordering;

use crate::analytics::align::latest_observation;
use crate::domain::{ChangeBasis, MoverItem, Movers, NamedSeries};

/// Rank the top-N gainers and losers by signed percent change.
///
/// Items without a finite change are dropped. A change of exactly zero is
/// neither a gain nor a loss, so it appears in neither list. Ties keep input
/// order.
pub fn rank(items: &[MoverItem], top_n: usize) -> Movers {
    let mut gainers: Vec<MoverItem> = items
        .iter()
        .filter(|i| i.pct_change.is_some_and(|v| v.is_finite() && v > 0.0))
        .cloned()
        .collect();
    gainers.sort_by(|a, b| cmp_change(b, a));
    gainers.truncate(top_n);

    let mut losers: Vec<MoverItem> = items
        .iter()
        .filter(|i| i.pct_change.is_some_and(|v| v.is_finite() && v < 0.0))
        .cloned()
        .collect();
    losers.sort_by(cmp_change);
    losers.truncate(top_n);

    Movers { gainers, losers }
}

/// Build mover items from each series' latest observation and rank them.
///
/// Percent-type series carry no relative change and are therefore skipped.
pub fn movers_from_series(series: &[NamedSeries], basis: ChangeBasis, top_n: usize) -> Movers {
    let items: Vec<MoverItem> = series
        .iter()
        .map(|s| MoverItem {
            id: s.id.clone(),
            pct_change: latest_observation(s).and_then(|o| o.changes.pct(basis)),
        })
        .collect();
    rank(&items, top_n)
}

fn cmp_change(a: &MoverItem, b: &MoverItem) -> Ordering {
    let a = a.pct_change.unwrap_or(0.0);
    let b = b.pct_change.unwrap_or(0.0);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
