//! The perfsnap counter model
//!
//! This library holds point-in-time reads of performance counter categories
//! and turns raw counter samples into the values a person would want to look
//! at. A category read is a two level index, counter name to instance name to
//! [`sample::RawSample`]. Each sample carries its [`counter_type::CounterType`]
//! and that type alone decides how one or two samples become a displayable
//! number, see [`calculator`].
//!
//! Nothing in this crate does I/O. Whatever talks to the operating system
//! hands over `(counter, instance, sample)` triples through a
//! [`builder::SampleSource`] and receives a frozen
//! [`snapshot::CategorySnapshot`] back.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(missing_debug_implementations)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::multiple_crate_versions)]

pub mod builder;
pub mod calculator;
mod collection;
pub mod counter_type;
pub mod key;
pub mod sample;
pub mod series;
pub mod snapshot;

pub use builder::{Reading, SampleSource, SnapshotBuilder, read_category};
pub use calculator::{CounterValue, compute, elapsed_since};
pub use counter_type::{CounterType, Family};
pub use sample::{InstanceSample, RawSample};
pub use series::CounterSeries;
pub use snapshot::CategorySnapshot;

/// Errors produced by this crate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Lookup, insertion or bulk copy against a keyed collection failed.
    #[error(transparent)]
    Collection(#[from] collection::Error),
    /// A counter value could not be computed.
    #[error(transparent)]
    Calculator(#[from] calculator::Error),
    /// A native counter type code was not recognized.
    #[error(transparent)]
    CounterType(#[from] counter_type::Error),
}

pub use collection::Error as CollectionError;

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_length(snapshot: &CategorySnapshot, code: u32) -> Result<CounterValue, Error> {
        let counter_type = CounterType::try_from(code)?;
        let sample = snapshot.sample("Queue Length", "")?;
        Ok(compute(counter_type, None, sample)?)
    }

    #[test]
    fn module_errors_convert() {
        let mut builder = SnapshotBuilder::new("System");
        builder
            .record(
                "Queue Length",
                "",
                RawSample::new(CounterType::NumberOfItems32, 4),
            )
            .expect("record");
        let snapshot = builder.finish();

        assert_eq!(
            queue_length(&snapshot, CounterType::NumberOfItems32.code()),
            Ok(CounterValue::Count(4))
        );
        assert_eq!(
            queue_length(&snapshot, 0xdead_beef),
            Err(Error::CounterType(counter_type::Error::UnknownCode {
                code: 0xdead_beef
            }))
        );
        assert_eq!(
            queue_length(&snapshot, CounterType::RawBase.code()),
            Err(Error::Calculator(calculator::Error::MismatchedCounterType {
                expected: CounterType::RawBase,
                actual: CounterType::NumberOfItems32,
            }))
        );
        assert_eq!(
            queue_length(
                &SnapshotBuilder::new("System").finish(),
                CounterType::NumberOfItems32.code()
            ),
            Err(Error::Collection(CollectionError::NotFound {
                key: "queue length".to_string()
            }))
        );
    }
}
