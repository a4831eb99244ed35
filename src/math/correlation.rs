//! Pearson correlation between two equal-length sequences.

use nalgebra::DVector;

/// Pearson's correlation coefficient.
///
/// Returns `None` when the lengths differ, fewer than two values are given,
/// either side has zero variance, or the input is not finite.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let x = DVector::from_column_slice(x);
    let y = DVector::from_column_slice(y);
    let xc = x.add_scalar(-x.mean());
    let yc = y.add_scalar(-y.mean());

    let denom = (xc.dot(&xc) * yc.dot(&yc)).sqrt();
    if !(denom.is_finite() && denom > 0.0) {
        return None;
    }
    let r = xc.dot(&yc) / denom;
    // Rounding can push |r| a hair past 1 for perfectly collinear input.
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
