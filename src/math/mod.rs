//! Mathematical utilities: least-squares lines and correlation.

pub mod correlation;
pub mod ols;

pub use correlation::*;
pub use ols::*;
