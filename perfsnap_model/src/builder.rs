//! Assembling snapshots from collected samples
//!
//! The collector side of the crate. A [`SnapshotBuilder`] is the only way to
//! populate a [`CategorySnapshot`]; calling [`SnapshotBuilder::finish`]
//! consumes the builder, so no reference to a half-filled snapshot can exist.
//! [`read_category`] drives any [`SampleSource`] through a builder.

use tracing::trace;

use crate::{collection, sample::RawSample, snapshot::CategorySnapshot};

/// One `(counter, instance, sample)` reading handed over by a collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// Name of the counter read.
    pub counter: String,
    /// Name of the instance read, empty for a single-instance counter.
    pub instance: String,
    /// The sample taken.
    pub sample: RawSample,
}

impl Reading {
    /// Create a new `Reading`.
    #[must_use]
    pub fn new(counter: impl Into<String>, instance: impl Into<String>, sample: RawSample) -> Self {
        Self {
            counter: counter.into(),
            instance: instance.into(),
            sample,
        }
    }
}

/// Something that can read every counter of a category at once.
///
/// Implementations own all I/O. They are expected to have finished talking to
/// the operating system before returning.
pub trait SampleSource {
    /// Errors produced by the source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Counters defined for `category`, whether or not any instance exists
    /// right now. The default declares nothing beyond what
    /// [`SampleSource::read`] returns.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn counters(&mut self, _category: &str) -> Result<Vec<String>, Self::Error> {
        Ok(Vec::new())
    }

    /// Read every counter instance of `category`.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn read(&mut self, category: &str) -> Result<Vec<Reading>, Self::Error>;
}

/// Errors produced by [`read_category`].
#[derive(thiserror::Error, Debug)]
pub enum Error<E>
where
    E: std::error::Error + 'static,
{
    /// The source failed to read the category.
    #[error("Sample source failed: {0}")]
    Source(#[source] E),
    /// The source handed over conflicting readings.
    #[error(transparent)]
    Collection(#[from] collection::Error),
}

#[derive(Debug)]
/// Accumulates readings into a [`CategorySnapshot`].
pub struct SnapshotBuilder {
    snapshot: CategorySnapshot,
}

impl SnapshotBuilder {
    /// Begin a read of `category_name`.
    #[must_use]
    pub fn new(category_name: &str) -> Self {
        Self {
            snapshot: CategorySnapshot::new(category_name),
        }
    }

    /// Register `counter_name` with no instances. Has no effect if the
    /// counter is already present.
    pub fn declare_counter(&mut self, counter_name: &str) {
        self.snapshot.series_mut(counter_name);
    }

    /// Record one sample.
    ///
    /// # Errors
    ///
    /// Returns [`collection::Error::DuplicateKey`] if this counter already has
    /// a sample for the same normalized instance name.
    pub fn record(
        &mut self,
        counter_name: &str,
        instance_name: &str,
        sample: RawSample,
    ) -> Result<(), collection::Error> {
        trace!(
            category = self.snapshot.category_name(),
            counter = counter_name,
            instance = instance_name,
            "recording sample"
        );
        self.snapshot
            .series_mut(counter_name)
            .add(instance_name, sample)
    }

    /// Freeze the snapshot.
    #[must_use]
    pub fn finish(self) -> CategorySnapshot {
        self.snapshot
    }
}

/// Read `category` from `source` into a frozen snapshot.
///
/// # Errors
///
/// Returns [`Error::Source`] if the source fails and [`Error::Collection`] if
/// the source reports the same counter instance twice.
pub fn read_category<S>(source: &mut S, category: &str) -> Result<CategorySnapshot, Error<S::Error>>
where
    S: SampleSource,
{
    let declared = source.counters(category).map_err(Error::Source)?;
    let readings = source.read(category).map_err(Error::Source)?;

    let mut builder = SnapshotBuilder::new(category);
    for counter in &declared {
        builder.declare_counter(counter);
    }
    for reading in readings {
        builder.record(&reading.counter, &reading.instance, reading.sample)?;
    }
    let snapshot = builder.finish();
    trace!(
        category,
        counters = snapshot.len(),
        "category read complete"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter_type::CounterType;

    #[derive(Debug, thiserror::Error)]
    #[error("source offline")]
    struct Offline;

    #[derive(Debug, Default)]
    struct Fixed {
        declared: Vec<String>,
        readings: Vec<Reading>,
        offline: bool,
    }

    impl SampleSource for Fixed {
        type Error = Offline;

        fn counters(&mut self, _category: &str) -> Result<Vec<String>, Self::Error> {
            Ok(self.declared.clone())
        }

        fn read(&mut self, _category: &str) -> Result<Vec<Reading>, Self::Error> {
            if self.offline {
                return Err(Offline);
            }
            Ok(self.readings.clone())
        }
    }

    fn items(raw: i64) -> RawSample {
        RawSample::new(CounterType::NumberOfItems32, raw)
    }

    #[test]
    fn readings_become_two_level_index() {
        let mut source = Fixed {
            declared: vec!["Handle Count".to_string()],
            readings: vec![
                Reading::new("Thread Count", "sshd", items(3)),
                Reading::new("Thread Count", "nginx", items(9)),
                Reading::new("Working Set", "sshd", items(4_096)),
            ],
            offline: false,
        };
        let snapshot = read_category(&mut source, "Process").expect("read succeeds");

        assert_eq!(snapshot.category_name(), "Process");
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get("thread count").map(|s| s.len()), Ok(2));
        assert_eq!(
            snapshot.sample("Working Set", "SSHD").map(RawSample::raw_value),
            Ok(4_096)
        );
        assert!(snapshot.get("Handle Count").expect("declared").is_empty());
    }

    #[test]
    fn duplicate_reading_rejected() {
        let mut source = Fixed {
            readings: vec![
                Reading::new("Thread Count", "sshd", items(3)),
                Reading::new("thread count", "SSHD", items(4)),
            ],
            ..Fixed::default()
        };
        let err = read_category(&mut source, "Process").expect_err("duplicate");
        assert!(matches!(
            err,
            Error::Collection(collection::Error::DuplicateKey { .. })
        ));
    }

    #[test]
    fn source_failure_propagates() {
        let mut source = Fixed {
            offline: true,
            ..Fixed::default()
        };
        let err = read_category(&mut source, "Process").expect_err("offline");
        assert!(matches!(err, Error::Source(Offline)));
    }

    #[test]
    fn single_instance_counter() {
        let mut builder = SnapshotBuilder::new("System");
        builder
            .record("System Up Time", "", items(12))
            .expect("record");
        builder.declare_counter("system up time");
        let snapshot = builder.finish();

        let series = snapshot.get("System Up Time").expect("present");
        assert_eq!(series.len(), 1);
        assert_eq!(series.get("").map(|s| s.raw_value()), Ok(12));
    }
}
