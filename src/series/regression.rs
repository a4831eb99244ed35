//! Local linear regression over a window of daily samples.

use chrono::NaiveDate;

use crate::domain::{LineFit, Sample};
use crate::error::SeriesError;
use crate::math::fit_line;

/// OLS line of value against whole-day offset from the window's first date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionModel {
    base_date: NaiveDate,
    line: LineFit,
    integer_output: bool,
}

impl RegressionModel {
    /// Fit a line through `window` (sorted ascending, at least two distinct dates).
    pub fn fit(window: &[Sample], integer_output: bool) -> Result<Self, SeriesError> {
        let base_date = window
            .first()
            .map(|s| s.date)
            .ok_or_else(|| SeriesError::InternalInconsistency("empty regression window".into()))?;

        let xs: Vec<f64> = window
            .iter()
            .map(|s| (s.date - base_date).num_days() as f64)
            .collect();
        let ys: Vec<f64> = window.iter().map(|s| s.value).collect();

        let line = fit_line(&xs, &ys).ok_or_else(|| {
            SeriesError::InternalInconsistency(format!(
                "cannot fit a line through {} sample(s) starting {base_date}",
                window.len()
            ))
        })?;

        Ok(Self {
            base_date,
            line,
            integer_output,
        })
    }

    /// Evaluate the line at `date`; dates outside the window extrapolate.
    pub fn evaluate(&self, date: NaiveDate) -> f64 {
        let offset = (date - self.base_date).num_days() as f64;
        let value = self.line.predict(offset);
        if self.integer_output {
            // f64::round rounds half away from zero.
            value.round()
        } else {
            value
        }
    }

    pub fn slope(&self) -> f64 {
        self.line.slope
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }
}
