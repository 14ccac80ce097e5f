//! The alignment and analytics engine.
//!
//! Everything here is a pure function over in-memory series: no I/O, no
//! shared state, safe to call concurrently.
//!
//! - `changes`: prior-period / year-ago deltas and percent changes
//! - `align`: union alignment of many series onto one period axis
//! - `stats`: distribution summaries and percentile rank
//! - `movers`: top gainers / losers

pub mod align;
pub mod changes;
pub mod movers;
pub mod stats;

pub use align::{align, column, cutoff_year, latest_observation};
pub use changes::compute_changes;
pub use movers::{movers_from_series, rank};
pub use stats::{summarize, summarize_series};
