//! Reporting utilities: notable regions and formatted terminal output.

use crate::domain::RegionCorrelation;

pub mod format;

pub use format::*;

/// The regions at both ends of the correlation ranking.
#[derive(Debug, Clone)]
pub struct NotableRegions {
    /// Highest correlation first.
    pub most: Vec<RegionCorrelation>,
    /// Lowest correlation first.
    pub least: Vec<RegionCorrelation>,
}

/// Pick the `top_n` most and least correlated regions.
///
/// The two lists overlap when fewer than `2 * top_n` regions are available.
pub fn notable_regions(correlations: &[RegionCorrelation], top_n: usize) -> NotableRegions {
    let mut sorted = correlations.to_vec();
    sorted.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    let most = sorted.iter().take(top_n).cloned().collect();

    sorted.reverse();
    let least = sorted.iter().take(top_n).cloned().collect();

    NotableRegions { most, least }
}
