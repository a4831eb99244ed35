//! Gap-filling engine for sparse daily metrics.
//!
//! - `regression`: local OLS line over a window of samples
//! - `estimator`: per-segment estimators (`Concrete`, `Interpolated`, `Extrapolated`)
//! - `metric`: `MetricSeries` index resolution and the day-by-day generator
//! - `adapters`: record -> `Sample` projection and same-day averaging

pub mod adapters;
pub mod estimator;
pub mod metric;
pub mod regression;

pub use adapters::*;
pub use estimator::*;
pub use metric::*;
pub use regression::*;
