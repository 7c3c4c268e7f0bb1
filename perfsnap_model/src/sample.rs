//! Raw counter samples
//!
//! A [`RawSample`] is one unprocessed read of a counter: the raw value, the
//! paired base value if the counter type has one, and the clocks the read was
//! taken against. Samples are plain values. Two samples of the same counter
//! and instance taken at different times are what the calculator consumes.

use serde::{Deserialize, Serialize};

use crate::counter_type::CounterType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// One unprocessed measurement of a counter.
///
/// The default value is the empty sample: every field zero and a type of
/// [`CounterType::NumberOfItems32`].
pub struct RawSample {
    /// The counter value as read.
    raw_value: i64,
    /// The paired base counter value, used by ratio and average types.
    #[serde(default)]
    base_value: i64,
    /// Monotonic clock ticks at the time of the read.
    #[serde(default)]
    time_stamp: i64,
    /// The same instant in 100ns units.
    #[serde(default)]
    time_stamp_100nsec: i64,
    /// Ticks per second of `time_stamp`.
    #[serde(default)]
    counter_frequency: i64,
    /// The declared kind of counter.
    counter_type: CounterType,
}

impl RawSample {
    /// Create a sample with only a raw value, every clock zeroed.
    #[must_use]
    pub const fn new(counter_type: CounterType, raw_value: i64) -> Self {
        Self {
            raw_value,
            base_value: 0,
            time_stamp: 0,
            time_stamp_100nsec: 0,
            counter_frequency: 0,
            counter_type,
        }
    }

    /// Set the paired base value.
    #[must_use]
    pub const fn with_base(mut self, base_value: i64) -> Self {
        self.base_value = base_value;
        self
    }

    /// Set the tick timestamp and the tick frequency.
    #[must_use]
    pub const fn with_time_stamp(mut self, time_stamp: i64, counter_frequency: i64) -> Self {
        self.time_stamp = time_stamp;
        self.counter_frequency = counter_frequency;
        self
    }

    /// Set the 100ns timestamp.
    #[must_use]
    pub const fn with_time_stamp_100nsec(mut self, time_stamp_100nsec: i64) -> Self {
        self.time_stamp_100nsec = time_stamp_100nsec;
        self
    }

    /// The counter value as read.
    #[must_use]
    pub const fn raw_value(&self) -> i64 {
        self.raw_value
    }

    /// The paired base counter value.
    #[must_use]
    pub const fn base_value(&self) -> i64 {
        self.base_value
    }

    /// Monotonic clock ticks at the time of the read.
    #[must_use]
    pub const fn time_stamp(&self) -> i64 {
        self.time_stamp
    }

    /// The time of the read in 100ns units.
    #[must_use]
    pub const fn time_stamp_100nsec(&self) -> i64 {
        self.time_stamp_100nsec
    }

    /// Ticks per second of [`RawSample::time_stamp`].
    #[must_use]
    pub const fn counter_frequency(&self) -> i64 {
        self.counter_frequency
    }

    /// The declared kind of counter.
    #[must_use]
    pub const fn counter_type(&self) -> CounterType {
        self.counter_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A [`RawSample`] tied to the object instance it was measured against.
pub struct InstanceSample {
    instance_name: String,
    sample: RawSample,
}

impl InstanceSample {
    /// Create a new `InstanceSample`. An empty name denotes the only instance
    /// of a single-instance counter.
    #[must_use]
    pub fn new(instance_name: impl Into<String>, sample: RawSample) -> Self {
        Self {
            instance_name: instance_name.into(),
            sample,
        }
    }

    /// The instance name as given by the collector, not normalized.
    #[must_use]
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// The sample taken for this instance.
    #[must_use]
    pub const fn sample(&self) -> &RawSample {
        &self.sample
    }

    /// Shorthand for `self.sample().raw_value()`.
    #[must_use]
    pub const fn raw_value(&self) -> i64 {
        self.sample.raw_value
    }
}
