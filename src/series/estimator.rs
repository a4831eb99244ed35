//! Per-segment estimators used while walking a date range.

use chrono::NaiveDate;

use crate::domain::Sample;
use crate::error::SeriesError;
use crate::series::regression::RegressionModel;

/// Which end of the sample set an extrapolation runs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    BeforeFirst,
    AfterLast,
}

/// Answers "valid for this date?" and "value at this date?" for one segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimator {
    /// A recorded sample, reproduced verbatim.
    Concrete(Sample),
    /// Regression over the gap `[start, end]` (both ends inclusive).
    Interpolated {
        model: RegressionModel,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Regression past the first or last recorded date (open-ended).
    Extrapolated {
        model: RegressionModel,
        boundary: NaiveDate,
        direction: Direction,
    },
}

impl Estimator {
    pub fn is_compatible(&self, date: NaiveDate) -> bool {
        match self {
            Estimator::Concrete(sample) => sample.date == date,
            Estimator::Interpolated { start, end, .. } => *start <= date && date <= *end,
            Estimator::Extrapolated {
                boundary,
                direction: Direction::BeforeFirst,
                ..
            } => date < *boundary,
            Estimator::Extrapolated {
                boundary,
                direction: Direction::AfterLast,
                ..
            } => date > *boundary,
        }
    }

    pub fn value_at(&self, date: NaiveDate) -> Result<f64, SeriesError> {
        if !self.is_compatible(date) {
            return Err(SeriesError::DateNotCovered { date });
        }
        Ok(match self {
            Estimator::Concrete(sample) => sample.value,
            Estimator::Interpolated { model, .. } | Estimator::Extrapolated { model, .. } => {
                model.evaluate(date)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn model(integer_output: bool) -> RegressionModel {
        let window = [Sample::new(day(0), 10.0), Sample::new(day(4), 20.0)];
        RegressionModel::fit(&window, integer_output).unwrap()
    }

    #[test]
    fn concrete_is_exact_and_single_day() {
        let est = Estimator::Concrete(Sample::new(day(2), 0.123_456_789));
        assert!(est.is_compatible(day(2)));
        assert!(!est.is_compatible(day(3)));
        assert_eq!(est.value_at(day(2)).unwrap(), 0.123_456_789);
        assert_eq!(
            est.value_at(day(1)),
            Err(SeriesError::DateNotCovered { date: day(1) })
        );
    }

    #[test]
    fn interpolated_covers_both_bounds() {
        let est = Estimator::Interpolated {
            model: model(false),
            start: day(0),
            end: day(4),
        };
        assert!(est.is_compatible(day(0)));
        assert!(est.is_compatible(day(4)));
        assert!(!est.is_compatible(day(5)));
        assert!(!est.is_compatible(day(-1)));
        assert_eq!(est.value_at(day(2)).unwrap(), 15.0);
        assert!(est.value_at(day(5)).is_err());
    }

    #[test]
    fn extrapolated_is_strict_and_open_ended() {
        let before = Estimator::Extrapolated {
            model: model(false),
            boundary: day(0),
            direction: Direction::BeforeFirst,
        };
        assert!(before.is_compatible(day(-100)));
        assert!(!before.is_compatible(day(0)));
        assert_eq!(before.value_at(day(-2)).unwrap(), 5.0);

        let after = Estimator::Extrapolated {
            model: model(true),
            boundary: day(4),
            direction: Direction::AfterLast,
        };
        assert!(!after.is_compatible(day(4)));
        assert!(after.is_compatible(day(400)));
        assert_eq!(after.value_at(day(5)).unwrap(), 23.0);
    }
}
