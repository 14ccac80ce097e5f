//! Input/output helpers.
//!
//! - series payload ingest + validation (`ingest`)
//! - aligned-row exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
