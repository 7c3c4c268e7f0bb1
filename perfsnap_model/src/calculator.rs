//! Counter value calculation
//!
//! Turns one or two [`RawSample`]s into the value a monitoring tool would
//! display. The formula is picked by the sample's [`CounterType`], see
//! [`compute`]. Every function here is pure.
//!
//! # Clamping
//!
//! A counter can go backwards between two reads, for instance when the
//! process that owns it restarts. Any difference between a current and a
//! previous reading that would come out negative is clamped to zero, and
//! any formula whose denominator is zero reports zero. Neither case is an
//! error. Inverse timers never go below zero.
//!
//! # Formulas
//!
//! With `N` the raw value, `B` the base value, `D` the tick timestamp, `T`
//! the 100ns timestamp, `F` the counter frequency and subscripts 0 and 1 the
//! previous and current sample:
//!
//! | Counter type                      | Value                                  |
//! |-----------------------------------|----------------------------------------|
//! | `NumberOfItems*`                  | `N1`                                   |
//! | `RateOfCountsPerSecond*`          | `(N1 - N0) / ((D1 - D0) / F)`          |
//! | `CountPerTimeInterval*`           | `(N1 - N0) / (D1 - D0)`                |
//! | `CounterTimer`                    | `100 * (N1 - N0) / (D1 - D0)`          |
//! | `CounterTimerInverse`             | `100 * (1 - (N1 - N0) / (D1 - D0))`    |
//! | `Timer100Ns`                      | `100 * (N1 - N0) / (T1 - T0)`          |
//! | `Timer100NsInverse`               | `100 * (1 - (N1 - N0) / (T1 - T0))`    |
//! | `AverageTimer32`                  | `((N1 - N0) / F) / (B1 - B0)`          |
//! | `AverageCount64`                  | `(N1 - N0) / (B1 - B0)`                |
//! | `SampleFraction`                  | `100 * (N1 - N0) / (B1 - B0)`          |
//! | `SampleCounter`                   | `(N1 - N0) / ((D1 - D0) / F)`          |
//! | `RawFraction`                     | `100 * N1 / B1`                        |
//! | `CounterDelta*`                   | `N1 - N0`                              |
//! | `ElapsedTime`                     | `(D1 - N1) / F`                        |
//! | `CounterMultiTimer`               | `100 * ((N1 - N0) / (D1 - D0)) / B1`   |
//! | `CounterMultiTimer100Ns`          | `100 * ((N1 - N0) / (T1 - T0)) / B1`   |
//! | `CounterMultiTimerInverse`        | `100 * (B1 - (N1 - N0) / (D1 - D0)) / B1` |
//! | `CounterMultiTimer100NsInverse`   | `100 * (B1 - (N1 - N0) / (T1 - T0)) / B1` |
//!
//! Timer counters count busy time in the same unit as their clock, so the
//! clock rate cancels out: the 100ns kinds never need `F` and neither do
//! `CounterTimer` and its relatives. An `ElapsedTime` sample stores the
//! object's start time as its raw value and the time of the read as its
//! timestamp.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{counter_type::CounterType, sample::RawSample};

/// Errors produced by [`compute`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sample's declared type differs from the requested one.
    #[error("Counter type mismatch: expected {expected}, sample is {actual}")]
    MismatchedCounterType {
        /// The counter type computation was requested for
        expected: CounterType,
        /// The counter type the sample declares
        actual: CounterType,
    },
    /// The counter type divides by frequency but the sample has none.
    #[error("Counter type {counter_type} requires a positive frequency, got {frequency}")]
    InvalidFrequency {
        /// The counter type computation was requested for
        counter_type: CounterType,
        /// The frequency the sample carries
        frequency: i64,
    },
    /// Base counters only exist as denominators and have no value of their
    /// own.
    #[error("Counter type {counter_type} is a base counter and cannot be displayed")]
    UnsupportedOperation {
        /// The base counter type
        counter_type: CounterType,
    },
}

impl Error {
    /// Whether this error stems from the caller passing bad samples.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::MismatchedCounterType { .. } | Error::InvalidFrequency { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// A computed, displayable counter value.
pub enum CounterValue {
    /// A whole count.
    Count(i64),
    /// A whole count displayed in hexadecimal.
    Hex(i64),
    /// A rate, ratio, percentage or duration in seconds.
    Float(f64),
}

impl CounterValue {
    /// Get an f64 representation of this value. Extremely large integers
    /// lose precision.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            CounterValue::Count(v) | CounterValue::Hex(v) => *v as f64,
            CounterValue::Float(v) => *v,
        }
    }
}

impl fmt::Display for CounterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterValue::Count(v) => write!(f, "{v}"),
            CounterValue::Hex(v) => write!(f, "{v:#x}"),
            CounterValue::Float(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
        }
    }
}

/// Compute the displayable value of a `counter_type` counter.
///
/// `previous` is the earlier of two reads of the same counter instance.
/// Types that need two reads report zero when `previous` is `None`: there is
/// no baseline yet. Types that need one read ignore `previous`.
///
/// # Errors
///
/// * [`Error::MismatchedCounterType`] if either sample declares a type other
///   than `counter_type`.
/// * [`Error::InvalidFrequency`] if the formula divides by the counter
///   frequency and `current` carries a frequency that is not positive.
/// * [`Error::UnsupportedOperation`] if `counter_type` is a base type.
pub fn compute(
    counter_type: CounterType,
    previous: Option<&RawSample>,
    current: &RawSample,
) -> Result<CounterValue, Error> {
    for sample in std::iter::once(current).chain(previous) {
        if sample.counter_type() != counter_type {
            return Err(Error::MismatchedCounterType {
                expected: counter_type,
                actual: sample.counter_type(),
            });
        }
    }
    let frequency = current.counter_frequency();
    if counter_type.needs_frequency() && frequency <= 0 {
        return Err(Error::InvalidFrequency {
            counter_type,
            frequency,
        });
    }
    let deltas = previous.map(|previous| Deltas::between(counter_type, previous, current));
    let frequency = frequency as f64;

    let value = match counter_type {
        CounterType::NumberOfItems32
        | CounterType::NumberOfItems64
        | CounterType::NumberOfItemsHex32
        | CounterType::NumberOfItemsHex64 => {
            if counter_type.is_hex() {
                CounterValue::Hex(current.raw_value())
            } else {
                CounterValue::Count(current.raw_value())
            }
        }
        CounterType::RawFraction => {
            CounterValue::Float(100.0 * ratio(current.raw_value(), current.base_value()))
        }
        CounterType::ElapsedTime => {
            let ticks = clamped_delta(current.time_stamp(), current.raw_value());
            CounterValue::Float(ticks as f64 / frequency)
        }
        CounterType::CounterDelta32 | CounterType::CounterDelta64 => match deltas {
            Some(d) => CounterValue::Count(d.counts),
            None => no_baseline(counter_type, CounterValue::Count(0)),
        },
        CounterType::RateOfCountsPerSecond32
        | CounterType::RateOfCountsPerSecond64
        | CounterType::SampleCounter => per_interval(counter_type, deltas, |d| {
            if d.ticks == 0 {
                return 0.0;
            }
            d.counts as f64 * frequency / d.ticks as f64
        }),
        CounterType::CountPerTimeInterval32 | CounterType::CountPerTimeInterval64 => {
            per_interval(counter_type, deltas, |d| ratio(d.counts, d.ticks))
        }
        CounterType::CounterTimer
        | CounterType::Timer100Ns
        | CounterType::CounterTimerInverse
        | CounterType::Timer100NsInverse => per_interval(counter_type, deltas, |d| {
            let busy = ratio(d.counts, d.ticks);
            if !counter_type.is_inverse() {
                return 100.0 * busy;
            }
            if d.ticks == 0 {
                return 0.0;
            }
            (100.0 * (1.0 - busy)).max(0.0)
        }),
        CounterType::AverageTimer32 => {
            per_interval(counter_type, deltas, |d| ratio(d.counts, d.bases) / frequency)
        }
        CounterType::AverageCount64 => {
            per_interval(counter_type, deltas, |d| ratio(d.counts, d.bases))
        }
        CounterType::SampleFraction => {
            per_interval(counter_type, deltas, |d| 100.0 * ratio(d.counts, d.bases))
        }
        CounterType::CounterMultiTimer
        | CounterType::CounterMultiTimer100Ns
        | CounterType::CounterMultiTimerInverse
        | CounterType::CounterMultiTimer100NsInverse => per_interval(counter_type, deltas, |d| {
            if d.instances <= 0 {
                return 0.0;
            }
            let instances = d.instances as f64;
            let busy = ratio(d.counts, d.ticks);
            if !counter_type.is_inverse() {
                return 100.0 * busy / instances;
            }
            if d.ticks == 0 {
                return 0.0;
            }
            (100.0 * (instances - busy) / instances).max(0.0)
        }),
        CounterType::SampleBase
        | CounterType::AverageBase
        | CounterType::RawBase
        | CounterType::CounterMultiBase => {
            return Err(Error::UnsupportedOperation { counter_type });
        }
    };
    Ok(value)
}

/// Seconds between `sample`'s timestamp and `now`, both in ticks of the
/// sample's counter frequency. Zero if `now` precedes the sample.
///
/// # Errors
///
/// Returns [`Error::InvalidFrequency`] if the sample has no positive
/// frequency.
pub fn elapsed_since(sample: &RawSample, now: i64) -> Result<f64, Error> {
    let frequency = sample.counter_frequency();
    if frequency <= 0 {
        return Err(Error::InvalidFrequency {
            counter_type: sample.counter_type(),
            frequency,
        });
    }
    Ok(clamped_delta(now, sample.time_stamp()) as f64 / frequency as f64)
}

/// Clamped differences between two reads of the same counter instance.
#[derive(Debug, Clone, Copy)]
struct Deltas {
    counts: i64,
    bases: i64,
    /// Elapsed ticks on whichever clock the counter type reads.
    ticks: i64,
    /// The current base value, the number of components a multi-timer
    /// measures.
    instances: i64,
}

impl Deltas {
    fn between(counter_type: CounterType, previous: &RawSample, current: &RawSample) -> Self {
        let ticks = if counter_type.uses_100ns_clock() {
            clamped_delta(current.time_stamp_100nsec(), previous.time_stamp_100nsec())
        } else {
            clamped_delta(current.time_stamp(), previous.time_stamp())
        };
        Self {
            counts: clamped_delta(current.raw_value(), previous.raw_value()),
            bases: clamped_delta(current.base_value(), previous.base_value()),
            ticks,
            instances: current.base_value(),
        }
    }
}

fn per_interval(
    counter_type: CounterType,
    deltas: Option<Deltas>,
    formula: impl FnOnce(Deltas) -> f64,
) -> CounterValue {
    match deltas {
        Some(d) => CounterValue::Float(formula(d)),
        None => no_baseline(counter_type, CounterValue::Float(0.0)),
    }
}

fn no_baseline(counter_type: CounterType, zero: CounterValue) -> CounterValue {
    debug!(%counter_type, "no previous sample, reporting zero");
    zero
}

/// `current - previous`, or zero if that would be negative.
fn clamped_delta(current: i64, previous: i64) -> i64 {
    if current < previous {
        debug!(current, previous, "counter went backwards, clamping to zero");
        return 0;
    }
    current.saturating_sub(previous)
}

/// `numerator / denominator`, or zero if the denominator is not positive.
fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
