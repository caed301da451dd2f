//! Flat, order-independent images of a collection.
//!
//! A [`Snapshot`] records the element count, the identity of the comparator,
//! and the keys and values in sorted order. Reloading replays the keys
//! through `insert` and refuses a snapshot whose parts disagree.

use alloc::string::String;
use alloc::vec::Vec;

use crate::compare::Compare;
use crate::{Error, RankedMap, RankedMultiMap, RankedSet};

/// The persisted form of a collection.
///
/// Sets leave `values` empty. With the `serde` feature enabled the snapshot
/// implements `Serialize` and `Deserialize`; encoding it is up to the caller.
///
/// # Examples
///
/// ```
/// use ranked_tree::{Natural, RankedMap};
///
/// let map = RankedMap::from([(2, "b"), (1, "a")]);
/// let snapshot = map.snapshot();
/// assert_eq!(snapshot.count, 2);
/// assert_eq!(snapshot.comparator, "natural");
/// assert_eq!(snapshot.keys, [1, 2]);
///
/// let restored = RankedMap::from_snapshot(snapshot, Natural).unwrap();
/// assert_eq!(restored, map);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<K, V> {
    pub count: usize,
    pub comparator: String,
    pub keys: Vec<K>,
    pub values: Vec<V>,
}

impl<K, V> Snapshot<K, V> {
    fn capture<'a, C, I>(count: usize, comparer: &C, entries: I) -> Self
    where
        K: Clone + 'a,
        V: Clone + 'a,
        C: Compare<K>,
        I: Iterator<Item = (&'a K, &'a V)>,
    {
        let mut keys = Vec::with_capacity(count);
        let mut values = Vec::with_capacity(count);
        for (k, v) in entries {
            keys.push(k.clone());
            values.push(v.clone());
        }
        Snapshot {
            count,
            comparator: String::from(comparer.identity()),
            keys,
            values,
        }
    }

    /// Checks the comparator and the declared lengths before any replay.
    fn preflight<C: Compare<K>>(&self, comparer: &C, expect_values: bool) -> Result<(), Error> {
        let expected = comparer.identity();
        if self.comparator != expected {
            return Err(Error::ComparatorMismatch {
                expected: String::from(expected),
                found: self.comparator.clone(),
            });
        }
        let values = self.values.len();
        if (expect_values && values != self.keys.len()) || (!expect_values && values != 0) {
            return Err(Error::LengthMismatch {
                keys: self.keys.len(),
                values,
            });
        }
        if self.count != self.keys.len() {
            return Err(Error::CountMismatch {
                declared: self.count,
                actual: self.keys.len(),
            });
        }
        Ok(())
    }
}

/// Compares the replayed length with the declared one.
fn settle<T>(collection: T, declared: usize, actual: usize) -> Result<T, Error> {
    if declared == actual {
        Ok(collection)
    } else {
        tracing::debug!(declared, actual, "snapshot replay lost elements");
        Err(Error::CountMismatch { declared, actual })
    }
}

impl<K: Clone, V: Clone, C: Compare<K>> RankedMap<K, V, C> {
    /// Captures the map as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot<K, V> {
        Snapshot::capture(self.len(), self.comparer(), self.iter())
    }

    /// Rebuilds a map from a [`Snapshot`] taken under an equivalent
    /// comparator.
    ///
    /// # Errors
    ///
    /// - [`Error::ComparatorMismatch`] if the snapshot names another
    ///   comparator.
    /// - [`Error::LengthMismatch`] if keys and values differ in number.
    /// - [`Error::CountMismatch`] if the declared count disagrees with the
    ///   keys, or duplicate keys made the replay come up short.
    pub fn from_snapshot(snapshot: Snapshot<K, V>, comparer: C) -> Result<Self, Error> {
        snapshot.preflight(&comparer, true)?;
        let mut map = Self::with_comparer(comparer);
        map.extend(snapshot.keys.into_iter().zip(snapshot.values));
        let actual = map.len();
        settle(map, snapshot.count, actual)
    }
}

impl<K: Clone, V: Clone, C: Compare<K>> RankedMultiMap<K, V, C> {
    /// Captures the multimap as a [`Snapshot`], duplicates included.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        Snapshot::capture(self.len(), self.comparer(), self.iter())
    }

    /// Rebuilds a multimap from a [`Snapshot`]. Entries under equal keys keep
    /// their recorded order.
    ///
    /// # Errors
    ///
    /// As [`RankedMap::from_snapshot`], except that duplicates are accepted.
    pub fn from_snapshot(snapshot: Snapshot<K, V>, comparer: C) -> Result<Self, Error> {
        snapshot.preflight(&comparer, true)?;
        let mut map = Self::with_comparer(comparer);
        map.extend(snapshot.keys.into_iter().zip(snapshot.values));
        let actual = map.len();
        settle(map, snapshot.count, actual)
    }
}

impl<T: Clone, C: Compare<T>> RankedSet<T, C> {
    /// Captures the set as a [`Snapshot`] with no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::{CaseInsensitive, RankedSet};
    ///
    /// let set: RankedSet<&str, CaseInsensitive> = ["b", "A"].into_iter().collect();
    /// let snapshot = set.snapshot();
    /// assert_eq!(snapshot.keys, ["A", "b"]);
    /// assert!(snapshot.values.is_empty());
    /// assert!(RankedSet::from_snapshot(snapshot, CaseInsensitive).is_ok());
    /// ```
    pub fn snapshot(&self) -> Snapshot<T, ()> {
        let keys: Vec<T> = self.iter().cloned().collect();
        Snapshot {
            count: self.len(),
            comparator: String::from(self.comparer().identity()),
            keys,
            values: Vec::new(),
        }
    }

    /// Rebuilds a set from a [`Snapshot`].
    ///
    /// # Errors
    ///
    /// As [`RankedMap::from_snapshot`]; a snapshot carrying values is a
    /// [`Error::LengthMismatch`].
    pub fn from_snapshot(snapshot: Snapshot<T, ()>, comparer: C) -> Result<Self, Error> {
        snapshot.preflight(&comparer, false)?;
        let mut set = Self::with_comparer(comparer);
        set.extend(snapshot.keys);
        let actual = set.len();
        settle(set, snapshot.count, actual)
    }
}
