//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - engine inputs (`Sample`, `SeriesConfig`, `DateRange`)
//! - ingest outputs (`Observation`) and the region table (`Region`)
//! - analysis outputs (`RegionCorrelation`, `HoldoutModel`, etc.)

pub mod region;
pub mod types;

pub use region::*;
pub use types::*;
