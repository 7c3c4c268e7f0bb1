//! Keyed storage shared by counter series and category snapshots.
//!
//! Keys are stored already normalized, normalization itself is the caller's
//! business. Keys are unique and iteration order is unspecified.

use rustc_hash::FxHashMap;

/// Errors produced by keyed lookups, insertions and bulk copies.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required key was absent.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: &'static str,
    },
    /// No entry is stored under the key.
    #[error("No entry named {key:?}")]
    NotFound {
        /// The normalized key looked up
        key: String,
    },
    /// An entry is already stored under the key.
    #[error("Duplicate entry named {key:?}")]
    DuplicateKey {
        /// The normalized key inserted
        key: String,
    },
    /// The destination buffer cannot hold every value from `offset` on.
    #[error("Cannot copy {needed} values at offset {offset} into a buffer of {available}")]
    OutOfRange {
        /// Requested starting position in the buffer
        offset: usize,
        /// Number of values to copy
        needed: usize,
        /// Length of the buffer
        available: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyedMap<V> {
    entries: FxHashMap<String, V>,
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<V> KeyedMap<V> {
    pub(crate) fn insert(&mut self, key: String, value: V) -> Result<(), Error> {
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateKey { key });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub(crate) fn get_or_insert_with(&mut self, key: String, f: impl FnOnce() -> V) -> &mut V {
        self.entries.entry(key).or_insert_with(f)
    }

    pub(crate) fn get(&self, key: &str) -> Result<&V, Error> {
        self.entries.get(key).ok_or_else(|| Error::NotFound {
            key: key.to_string(),
        })
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone every value into `buffer` starting at `offset`. Nothing is
    /// written unless all values fit.
    pub(crate) fn copy_into(&self, buffer: &mut [V], offset: usize) -> Result<(), Error>
    where
        V: Clone,
    {
        let needed = self.entries.len();
        let available = buffer.len();
        let end = offset
            .checked_add(needed)
            .filter(|end| *end <= available)
            .ok_or(Error::OutOfRange {
                offset,
                needed,
                available,
            })?;
        for (slot, value) in buffer[offset..end].iter_mut().zip(self.entries.values()) {
            slot.clone_from(value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_rejected() {
        let mut map = KeyedMap::default();
        map.insert("a".to_string(), 1).expect("first insert");
        assert_eq!(
            map.insert("a".to_string(), 2),
            Err(Error::DuplicateKey {
                key: "a".to_string()
            })
        );
        assert_eq!(map.get("a"), Ok(&1));
    }

    #[test]
    fn copy_into_respects_offset() {
        let mut map = KeyedMap::default();
        map.insert("a".to_string(), 1).expect("insert");
        map.insert("b".to_string(), 2).expect("insert");

        let mut buffer = [0; 4];
        map.copy_into(&mut buffer, 2).expect("fits");
        assert_eq!(buffer[..2], [0, 0]);
        let mut tail = buffer[2..].to_vec();
        tail.sort_unstable();
        assert_eq!(tail, vec![1, 2]);
    }

    #[test]
    fn copy_into_short_buffer_untouched() {
        let mut map = KeyedMap::default();
        map.insert("a".to_string(), 1).expect("insert");
        map.insert("b".to_string(), 2).expect("insert");

        let mut buffer = [0; 3];
        assert_eq!(
            map.copy_into(&mut buffer, 2),
            Err(Error::OutOfRange {
                offset: 2,
                needed: 2,
                available: 3
            })
        );
        assert_eq!(buffer, [0, 0, 0]);
        assert!(map.copy_into(&mut buffer, usize::MAX).is_err());
    }
}
