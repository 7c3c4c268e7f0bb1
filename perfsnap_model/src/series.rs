//! The instances of one counter
//!
//! A [`CounterSeries`] maps instance names to the [`InstanceSample`] read for
//! that instance during one category read. Lookups fold case and treat the
//! empty name as the single-instance sentinel, see [`crate::key`].

use crate::{
    collection::{Error, KeyedMap},
    key,
    sample::{InstanceSample, RawSample},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every instance sampled for a single counter in one category read.
pub struct CounterSeries {
    counter_name: String,
    instances: KeyedMap<InstanceSample>,
}

impl CounterSeries {
    pub(crate) fn new(counter_name: &str) -> Self {
        Self {
            counter_name: counter_name.to_string(),
            instances: KeyedMap::default(),
        }
    }

    /// The counter name as given by the collector.
    #[must_use]
    pub fn counter_name(&self) -> &str {
        &self.counter_name
    }

    /// Look up the sample for `instance_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if no name is given and
    /// [`Error::NotFound`] if the instance was not sampled.
    pub fn get<'a>(
        &self,
        instance_name: impl Into<Option<&'a str>>,
    ) -> Result<&InstanceSample, Error> {
        let name = instance_name.into().ok_or(Error::InvalidArgument {
            reason: "instance name is required",
        })?;
        self.instances.get(&key::instance_key(name))
    }

    /// Whether `instance_name` was sampled. Absent names are never present.
    #[must_use]
    pub fn contains<'a>(&self, instance_name: impl Into<Option<&'a str>>) -> bool {
        instance_name
            .into()
            .is_some_and(|name| self.instances.contains(&key::instance_key(name)))
    }

    /// Normalized instance names, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.instances.keys()
    }

    /// Instance samples, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &InstanceSample> {
        self.instances.values()
    }

    /// Pairs of normalized instance name and sample.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceSample)> {
        self.instances.iter()
    }

    /// Number of instances sampled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance was sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Copy every instance sample into `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `buffer` cannot hold all samples from
    /// `offset` on. The buffer is left untouched in that case.
    pub fn copy_into(&self, buffer: &mut [InstanceSample], offset: usize) -> Result<(), Error> {
        self.instances.copy_into(buffer, offset)
    }

    pub(crate) fn add(&mut self, instance_name: &str, sample: RawSample) -> Result<(), Error> {
        self.instances.insert(
            key::instance_key(instance_name),
            InstanceSample::new(instance_name, sample),
        )
    }
}
