//! Simple (one regressor) ordinary least squares.
//!
//! Every regression in this project has the form:
//!
//! ```text
//! minimize Σ (y_i - (slope * x_i + intercept))^2
//! ```
//!
//! Solved in closed form on centered data. For exactly-representable inputs
//! this reproduces exact slopes (a two-point fit returns the secant slope
//! bit-for-bit), so rounded outputs land on the expected integer.

use nalgebra::DVector;

use crate::domain::LineFit;

/// Fit `y = slope * x + intercept`.
///
/// Returns `None` for mismatched lengths, fewer than two points, non-finite
/// input, or when all `x` are equal (slope undefined).
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if !xs.iter().chain(ys.iter()).all(|v| v.is_finite()) {
        return None;
    }

    let x = DVector::from_column_slice(xs);
    let y = DVector::from_column_slice(ys);
    let x_mean = x.mean();
    let y_mean = y.mean();
    let xc = x.add_scalar(-x_mean);
    let yc = y.add_scalar(-y_mean);

    let sxx = xc.dot(&xc);
    if sxx <= 0.0 {
        return None;
    }
    let slope = xc.dot(&yc) / sxx;
    let intercept = y_mean - slope * x_mean;

    if slope.is_finite() && intercept.is_finite() {
        Some(LineFit { slope, intercept })
    } else {
        None
    }
}

/// Root mean squared error of `line` over the given points.
///
/// Returns `None` for mismatched lengths or empty input.
pub fn rmse(line: &LineFit, xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }
    let residuals = DVector::from_iterator(
        xs.len(),
        xs.iter().zip(ys).map(|(&x, &y)| y - line.predict(x)),
    );
    Some((residuals.dot(&residuals) / xs.len() as f64).sqrt())
}
