//! `MetricSeries`: sorted samples plus the day-by-day gap-filling generator.
//!
//! A series is built once from a closed sample set. `get(start, end)` walks the
//! range one calendar day at a time, holding a single "current" estimator:
//!
//! - a recorded day always emits its sample verbatim (`Concrete`)
//! - a day between two recorded days uses a local regression over the gap
//! - a day outside the recorded span extrapolates a regression fitted at the
//!   nearest end
//!
//! Estimators are rebuilt only when the current one stops covering the day, so
//! each gap is fitted once per walk.

use std::iter::FusedIterator;

use chrono::NaiveDate;

use crate::domain::{Sample, SeriesConfig};
use crate::error::SeriesError;
use crate::series::estimator::{Direction, Estimator};
use crate::series::regression::RegressionModel;

/// Where a date falls relative to the sorted sample dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Earlier than the first sample.
    Before,
    /// Exactly on `samples[i]`.
    At(usize),
    /// Later than the last sample.
    After,
    /// Strictly between `samples[i]` and `samples[i + 1]`.
    Between(usize, usize),
}

#[derive(Debug, Clone)]
pub struct MetricSeries {
    samples: Vec<Sample>,
    config: SeriesConfig,
}

impl MetricSeries {
    /// Sort `samples` and validate them against `config`.
    ///
    /// # Errors
    /// `ConstructionInvariantViolation` if a radius is zero, a value is not
    /// finite, two samples share a date, or there are not more samples than
    /// the larger radius.
    pub fn new<I>(samples: I, config: SeriesConfig) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = Sample>,
    {
        if config.interpolation_radius == 0 || config.extrapolation_radius == 0 {
            return Err(SeriesError::ConstructionInvariantViolation(
                "interpolation and extrapolation radii must be >= 1".into(),
            ));
        }

        let mut samples: Vec<Sample> = samples.into_iter().collect();
        if let Some(bad) = samples.iter().find(|s| !s.value.is_finite()) {
            return Err(SeriesError::ConstructionInvariantViolation(format!(
                "non-finite value on {}",
                bad.date
            )));
        }

        samples.sort_by_key(|s| s.date);
        if let Some(dup) = samples.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SeriesError::ConstructionInvariantViolation(format!(
                "duplicate samples on {} (average same-day samples first)",
                dup[0].date
            )));
        }

        let required = config.max_radius();
        if samples.len() <= required {
            return Err(SeriesError::ConstructionInvariantViolation(format!(
                "{} sample(s) but more than {required} are required",
                samples.len()
            )));
        }

        Ok(Self { samples, config })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first_date(&self) -> NaiveDate {
        self.samples[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.samples[self.samples.len() - 1].date
    }

    /// Binary search for `date` among the sample dates.
    pub fn locate(&self, date: NaiveDate) -> Result<Location, SeriesError> {
        let n = self.samples.len();
        if n == 0 {
            return Err(SeriesError::InternalInconsistency(
                "locate on an empty series".into(),
            ));
        }

        match self.samples.binary_search_by(|s| s.date.cmp(&date)) {
            Ok(i) => Ok(Location::At(i)),
            Err(0) => Ok(Location::Before),
            Err(i) if i == n => Ok(Location::After),
            Err(i) => {
                let (lower, upper) = (self.samples[i - 1].date, self.samples[i].date);
                if lower < date && date < upper {
                    Ok(Location::Between(i - 1, i))
                } else {
                    Err(SeriesError::InternalInconsistency(format!(
                        "{date} does not fall between {lower} and {upper}"
                    )))
                }
            }
        }
    }

    /// Samples used to fit a regression anchored at `index`.
    ///
    /// Takes up to `radius` samples at-or-before `index` and up to `radius`
    /// samples after it, clipped to the array. The gap `index..index + 1` is
    /// therefore always inside the window. A window clipped down to a single
    /// sample borrows one more from below so a line can still be fitted.
    pub fn window_around(&self, index: usize, radius: usize) -> &[Sample] {
        let n = self.samples.len();
        if n == 0 {
            return &[];
        }
        let index = index.min(n - 1);
        let radius = radius.max(1);

        let mut lo = (index + 1).saturating_sub(radius);
        let hi = (index + radius).min(n - 1);
        if lo == hi {
            lo = lo.saturating_sub(1);
        }
        &self.samples[lo..=hi]
    }

    fn interpolate(&self, index: usize) -> Result<Estimator, SeriesError> {
        let (start, end) = match (self.samples.get(index), self.samples.get(index + 1)) {
            (Some(a), Some(b)) => (a.date, b.date),
            _ => {
                return Err(SeriesError::InternalInconsistency(format!(
                    "no gap after sample index {index}"
                )));
            }
        };
        let window = self.window_around(index, self.config.interpolation_radius);
        let model = RegressionModel::fit(window, self.config.integer_output)?;
        Ok(Estimator::Interpolated { model, start, end })
    }

    fn extrapolate(&self, direction: Direction) -> Result<Estimator, SeriesError> {
        let (index, boundary) = match direction {
            Direction::BeforeFirst => (0, self.first_date()),
            Direction::AfterLast => (self.samples.len() - 1, self.last_date()),
        };
        let window = self.window_around(index, self.config.extrapolation_radius);
        let model = RegressionModel::fit(window, self.config.integer_output)?;
        Ok(Estimator::Extrapolated {
            model,
            boundary,
            direction,
        })
    }

    /// Lazy sequence of one value per calendar day in `[start, end]`.
    ///
    /// # Errors
    /// `InvalidRange` if `start > end`; nothing is produced in that case.
    pub fn get(&self, start: NaiveDate, end: NaiveDate) -> Result<DailyValues<'_>, SeriesError> {
        if start > end {
            return Err(SeriesError::InvalidRange { start, end });
        }
        let remaining = usize::try_from((end - start).num_days() + 1)
            .map_err(|_| SeriesError::InvalidRange { start, end })?;

        let (current, next_index) = match self.locate(start)? {
            Location::Before => (self.extrapolate(Direction::BeforeFirst)?, 0),
            Location::After => (
                self.extrapolate(Direction::AfterLast)?,
                self.samples.len(),
            ),
            Location::At(i) => (Estimator::Concrete(self.samples[i]), i + 1),
            Location::Between(i, upper) => (self.interpolate(i)?, upper),
        };

        Ok(DailyValues {
            series: self,
            current,
            next_index,
            day: start,
            remaining,
            started: false,
        })
    }

    /// Collect `get(start, end)` into a vector.
    pub fn values(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<f64>, SeriesError> {
        self.get(start, end)?.collect()
    }
}

/// Forward-only iterator returned by [`MetricSeries::get`].
///
/// Owns its cursor, so any number of walks can run over one shared series.
/// After an error is yielded the iterator is exhausted.
#[derive(Debug)]
pub struct DailyValues<'a> {
    series: &'a MetricSeries,
    current: Estimator,
    /// Index of the first sample dated after `day`.
    next_index: usize,
    day: NaiveDate,
    remaining: usize,
    started: bool,
}

impl DailyValues<'_> {
    /// Day of the value the next call to `next` would produce.
    ///
    /// `None` once the walk has passed the last representable date.
    pub fn day(&self) -> Option<NaiveDate> {
        if self.started { self.day.succ_opt() } else { Some(self.day) }
    }

    fn advance(&mut self) -> Result<(), SeriesError> {
        let day = self.day.succ_opt().ok_or_else(|| {
            SeriesError::InternalInconsistency(format!("no calendar day after {}", self.day))
        })?;
        self.day = day;

        let samples = self.series.samples();
        let n = samples.len();

        if let Some(sample) = samples.get(self.next_index).filter(|s| s.date == day) {
            self.current = Estimator::Concrete(*sample);
            self.next_index += 1;
        } else if self.current.is_compatible(day) {
            // Still inside the current segment.
        } else if self.next_index == n {
            self.current = self.series.extrapolate(Direction::AfterLast)?;
        } else if self.next_index == 0 || samples[self.next_index].date < day {
            return Err(SeriesError::InternalInconsistency(format!(
                "cursor at sample {} cannot cover {day}",
                self.next_index
            )));
        } else {
            self.current = self.series.interpolate(self.next_index - 1)?;
        }
        Ok(())
    }
}

impl Iterator for DailyValues<'_> {
    type Item = Result<f64, SeriesError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if self.started {
            if let Err(err) = self.advance() {
                self.remaining = 0;
                return Some(Err(err));
            }
        }
        self.started = true;
        self.remaining -= 1;

        match self.current.value_at(self.day) {
            Ok(value) => Some(Ok(value)),
            Err(err) => {
                self.remaining = 0;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for DailyValues<'_> {}
