//! Counter reports
//!
//! A report is every displayable value of a category read. Values come from
//! the current snapshot alone for single-read counter types and from the
//! matching instance in the previous snapshot for the rest. An instance that
//! is new in the current read has no baseline and reports zero, as the
//! calculator does.

use perfsnap_model::{
    CategorySnapshot, CounterType, CounterValue, calculator, compute as compute_value, key,
};
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
/// One counter instance in a [`Report`].
pub struct Row {
    /// Counter name as collected.
    pub counter: String,
    /// Instance name as collected, empty for single-instance counters.
    pub instance: String,
    /// Declared counter type of the current sample.
    pub counter_type: CounterType,
    /// The computed value or why there is none.
    pub value: Result<CounterValue, calculator::Error>,
}

#[derive(Debug, Clone, PartialEq)]
/// Computed values for one category read.
pub struct Report {
    /// Category name as collected.
    pub category: String,
    /// One row per reported counter instance, ordered by counter then
    /// instance, case-insensitively.
    pub rows: Vec<Row>,
}

/// Compute a report for `current`, using `previous` as the baseline for
/// counter types that need two reads.
#[must_use]
pub fn compute(
    previous: Option<&CategorySnapshot>,
    current: &CategorySnapshot,
    config: &Config,
) -> Report {
    let mut rows = Vec::new();
    for series in current.values() {
        if !config.wants_counter(series.counter_name()) {
            continue;
        }
        for instance in series.values() {
            let sample = instance.sample();
            let counter_type = sample.counter_type();
            if counter_type.is_base() && !config.include_base_counters {
                debug!(
                    counter = series.counter_name(),
                    %counter_type,
                    "skipping base counter"
                );
                continue;
            }
            let baseline = previous.and_then(|previous| {
                previous
                    .sample(series.counter_name(), instance.instance_name())
                    .ok()
            });
            let value = compute_value(counter_type, baseline, sample);
            match &value {
                Ok(_) | Err(calculator::Error::UnsupportedOperation { .. }) => {}
                Err(err) => warn!(
                    counter = series.counter_name(),
                    instance = instance.instance_name(),
                    "cannot compute value: {err}"
                ),
            }
            rows.push(Row {
                counter: series.counter_name().to_string(),
                instance: instance.instance_name().to_string(),
                counter_type,
                value,
            });
        }
    }
    rows.sort_by_cached_key(|row| {
        (
            key::counter_key(&row.counter),
            key::instance_key(&row.instance),
        )
    });

    Report {
        category: current.category_name().to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsnap_model::{RawSample, SnapshotBuilder};
    use proptest::prelude::*;

    const FREQ: i64 = 1_000;

    fn processor(busy_total: i64, busy_zero: i64, ticks: i64) -> CategorySnapshot {
        let timer =
            |raw| RawSample::new(CounterType::CounterTimer, raw).with_time_stamp(ticks, FREQ);
        let mut builder = SnapshotBuilder::new("Processor");
        builder
            .record("% Processor Time", "_Total", timer(busy_total))
            .expect("record");
        builder
            .record("% Processor Time", "0", timer(busy_zero))
            .expect("record");
        builder
            .record(
                "Interrupts/sec",
                "_Total",
                RawSample::new(CounterType::RateOfCountsPerSecond32, busy_total)
                    .with_time_stamp(ticks, FREQ),
            )
            .expect("record");
        builder
            .record("Queue Base", "", RawSample::new(CounterType::RawBase, 7))
            .expect("record");
        builder.finish()
    }

    #[test]
    fn two_reads_produce_rates() {
        let previous = processor(1_000, 100, 0);
        let current = processor(1_500, 350, 1_000);
        let report = compute(Some(&previous), &current, &Config::default());

        assert_eq!(report.category, "Processor");
        let values: Vec<(&str, &str, CounterValue)> = report
            .rows
            .iter()
            .map(|row| {
                (
                    row.counter.as_str(),
                    row.instance.as_str(),
                    row.value.expect("computes"),
                )
            })
            .collect();
        assert_eq!(
            values,
            vec![
                ("% Processor Time", "0", CounterValue::Float(25.0)),
                ("% Processor Time", "_Total", CounterValue::Float(50.0)),
                ("Interrupts/sec", "_Total", CounterValue::Float(500.0)),
            ]
        );
    }

    #[test]
    fn first_read_has_no_baseline() {
        let current = processor(1_500, 350, 1_000);
        let report = compute(None, &current, &Config::default());
        assert_eq!(report.rows.len(), 3);
        assert!(
            report
                .rows
                .iter()
                .all(|row| row.value == Ok(CounterValue::Float(0.0)))
        );
    }

    #[test]
    fn base_counters_listed_on_request() {
        let current = processor(1_500, 350, 1_000);
        let config = Config {
            include_base_counters: true,
            ..Config::default()
        };
        let report = compute(None, &current, &config);
        let base = report
            .rows
            .iter()
            .find(|row| row.counter == "Queue Base")
            .expect("base counter listed");
        assert_eq!(
            base.value,
            Err(calculator::Error::UnsupportedOperation {
                counter_type: CounterType::RawBase
            })
        );
    }

    #[test]
    fn counter_filter_applies() {
        let previous = processor(1_000, 100, 0);
        let current = processor(1_500, 350, 1_000);
        let config = Config {
            counters: Some(vec![String::from("interrupts/SEC")]),
            ..Config::default()
        };
        let report = compute(Some(&previous), &current, &config);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].counter, "Interrupts/sec");
    }

    #[test]
    fn counter_type_change_reported() {
        let previous = processor(1_000, 100, 0);
        let mut builder = SnapshotBuilder::new("Processor");
        builder
            .record(
                "% Processor Time",
                "_Total",
                RawSample::new(CounterType::Timer100Ns, 5),
            )
            .expect("record");
        let current = builder.finish();

        let report = compute(Some(&previous), &current, &Config::default());
        assert!(matches!(
            report.rows[0].value,
            Err(calculator::Error::MismatchedCounterType { .. })
        ));
    }

    proptest! {
        #[test]
        fn rows_ordered_and_complete(
            readings in proptest::collection::btree_map(
                ("[a-z]{1,6}", "[a-z0-9]{0,4}"),
                0i64..1_000,
                0..32,
            )
        ) {
            let mut builder = SnapshotBuilder::new("Category");
            for ((counter, instance), raw) in &readings {
                builder
                    .record(counter, instance, RawSample::new(CounterType::NumberOfItems64, *raw))
                    .expect("keys are distinct and already folded");
            }
            let report = compute(None, &builder.finish(), &Config::default());

            prop_assert_eq!(report.rows.len(), readings.len());
            for pair in report.rows.windows(2) {
                let left = (key::counter_key(&pair[0].counter), key::instance_key(&pair[0].instance));
                let right = (key::counter_key(&pair[1].counter), key::instance_key(&pair[1].instance));
                prop_assert!(left < right);
            }
            for row in &report.rows {
                let raw = readings[&(row.counter.clone(), row.instance.clone())];
                prop_assert_eq!(row.value, Ok(CounterValue::Count(raw)));
            }
        }
    }
}
