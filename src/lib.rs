//! `series-explorer` library crate.
//!
//! Aligns economic time series on a shared period axis and derives
//! period-over-period changes, distribution summaries, and top movers.
//! The `sx` binary is a thin CLI over this library.

pub mod analytics;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod period;
pub mod report;
