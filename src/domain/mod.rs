//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - configuration enums (`Frequency`, `SortOrder`, `ChangeBasis`)
//! - input series (`NamedSeries`, `SeriesPoint`)
//! - engine outputs (`AlignedRow`, `ChangeSet`, `DistributionSummary`, `Movers`)

pub mod types;

pub use types::*;
