//! Point-in-time category reads
//!
//! A [`CategorySnapshot`] is the result of one read of a counter category:
//! counter name to [`CounterSeries`]. Snapshots are only built through
//! [`crate::builder::SnapshotBuilder`] and expose no mutation once handed
//! out, so a snapshot may be shared between threads and read without
//! coordination.

use crate::{
    collection::{Error, KeyedMap},
    key,
    sample::RawSample,
    series::CounterSeries,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One frozen read of a counter category.
pub struct CategorySnapshot {
    category_name: String,
    counters: KeyedMap<CounterSeries>,
}

impl CategorySnapshot {
    pub(crate) fn new(category_name: &str) -> Self {
        Self {
            category_name: category_name.to_string(),
            counters: KeyedMap::default(),
        }
    }

    /// The category name as given by the collector.
    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Look up the series recorded for `counter_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if no name is given and
    /// [`Error::NotFound`] if this read has no such counter.
    pub fn get<'a>(
        &self,
        counter_name: impl Into<Option<&'a str>>,
    ) -> Result<&CounterSeries, Error> {
        let name = counter_name.into().ok_or(Error::InvalidArgument {
            reason: "counter name is required",
        })?;
        self.counters.get(&key::counter_key(name))
    }

    /// Look up the raw sample of one counter instance.
    ///
    /// # Errors
    ///
    /// As [`CategorySnapshot::get`] then [`CounterSeries::get`].
    pub fn sample(&self, counter_name: &str, instance_name: &str) -> Result<&RawSample, Error> {
        self.get(counter_name)?
            .get(instance_name)
            .map(crate::sample::InstanceSample::sample)
    }

    /// Whether `counter_name` was recorded. Absent names are never present.
    #[must_use]
    pub fn contains<'a>(&self, counter_name: impl Into<Option<&'a str>>) -> bool {
        counter_name
            .into()
            .is_some_and(|name| self.counters.contains(&key::counter_key(name)))
    }

    /// Normalized counter names, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counters.keys()
    }

    /// Counter series, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &CounterSeries> {
        self.counters.values()
    }

    /// Pairs of normalized counter name and series.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CounterSeries)> {
        self.counters.iter()
    }

    /// Number of counters recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether no counter was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Copy every counter series into `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `buffer` cannot hold all series from
    /// `offset` on. The buffer is left untouched in that case.
    pub fn copy_into(&self, buffer: &mut [CounterSeries], offset: usize) -> Result<(), Error> {
        self.counters.copy_into(buffer, offset)
    }

    pub(crate) fn series_mut(&mut self, counter_name: &str) -> &mut CounterSeries {
        self.counters
            .get_or_insert_with(key::counter_key(counter_name), || {
                CounterSeries::new(counter_name)
            })
    }
}
