//! `daily-metrics` library crate.
//!
//! The binary (`dm`) is a thin wrapper around this library so that:
//!
//! - the gap-filling engine is testable without spawning processes
//! - the engine (`series`) is reusable on its own for any sparse daily metric
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod series;
