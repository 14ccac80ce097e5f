//! Reporting utilities: magnitude formatting and text tables.

pub mod format;
pub mod magnitude;

pub use format::{format_aligned_table, format_latest, format_movers, format_summary};
pub use magnitude::{format_delta, format_magnitude, format_pct_change};
