//! Turn arbitrary records into `Sample`s ready for `MetricSeries`.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::Sample;

/// Lazily project each item to a `Sample`, preserving item order.
pub fn generate<I, T, F>(items: I, mut extractor: F) -> impl Iterator<Item = Sample>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> (NaiveDate, f64),
{
    items.into_iter().map(move |item| {
        let (date, value) = extractor(item);
        Sample::new(date, value)
    })
}

/// Collapse same-day samples into one sample holding their arithmetic mean.
///
/// Output is ascending by date.
pub fn average_by_date<I>(samples: I) -> Vec<Sample>
where
    I: IntoIterator<Item = Sample>,
{
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for sample in samples {
        let entry = sums.entry(sample.date).or_insert((0.0, 0));
        entry.0 += sample.value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, count))| Sample::new(date, sum / count as f64))
        .collect()
}

/// Group items by a key (e.g. region code), keeping input order within a group.
pub fn group_by_region<I, T, K, F>(items: I, mut region_of: F) -> BTreeMap<K, Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(region_of(&item)).or_default().push(item);
    }
    groups
}
