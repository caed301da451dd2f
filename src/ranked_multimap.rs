use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Error;
use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, sealed};
use crate::ranked_map::{IntoIter, Iter, Keys, Values};
use crate::raw::{DuplicatePolicy, RawTree, TreeStats};

mod capacity;
mod order_statistic;

/// An ordered map that keeps every value inserted under a key.
///
/// Equal keys form one contiguous run, ordered by insertion: a new entry goes
/// after every entry already present under an equal key. Lookups by key
/// address the oldest entry of the run.
///
/// # Examples
///
/// ```
/// use ranked_tree::RankedMultiMap;
///
/// let mut visits = RankedMultiMap::new();
/// visits.insert("paris", 2019);
/// visits.insert("oslo", 2021);
/// visits.insert("paris", 2023);
///
/// assert_eq!(visits.len(), 3);
/// assert_eq!(visits.count(&"paris"), 2);
/// assert_eq!(visits.get(&"paris"), Some(&2019));
/// assert!(visits.get_all(&"paris").map(|(_, year)| *year).eq([2019, 2023]));
/// ```
pub struct RankedMultiMap<K, V, C = Natural> {
    raw: RawTree<K, V, C>,
}

impl<K, V> RankedMultiMap<K, V> {
    /// Makes a new, empty multimap ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparer(Natural)
    }
}

impl<K, V, C> RankedMultiMap<K, V, C> {
    /// Makes a new, empty multimap ordered by `comparer`.
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            raw: RawTree::new(comparer, crate::DEFAULT_ORDER),
        }
    }

    /// The comparator this multimap orders its keys by.
    pub fn comparer(&self) -> &C {
        self.raw.comparer()
    }

    /// Returns the number of entries, counting every duplicate.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the multimap contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every entry. Outstanding cursors become stale.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first entry, the oldest one under the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.raw.first()
    }

    /// Returns the last entry, the newest one under the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.raw.last()
    }

    /// Gets an iterator over every entry, sorted by key and, within a run of
    /// equal keys, by insertion.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the keys, yielding each duplicate in turn.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values, in key order and then insertion order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Shape statistics of the underlying tree.
    pub fn stats(&self) -> TreeStats {
        self.raw.stats()
    }
}

impl<K: Clone, V, C: Compare<K>> RankedMultiMap<K, V, C> {
    /// Inserts an entry after any entries already stored under an equal key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) {
        self.raw.insert(key, value, DuplicatePolicy::Append);
    }

    /// Returns the oldest value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the oldest value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key).map(|(_, v)| v)
    }

    /// Iterates every entry stored under `key`, oldest first.
    ///
    /// # Complexity
    ///
    /// O(log n) to position the iterator.
    pub fn get_all(&self, key: &K) -> Iter<'_, K, V> {
        match self.raw.rank_of(key) {
            Ok(start) => Iter::ranks(&self.raw, start, start + self.raw.count_of(key)),
            Err(_) => Iter::default(),
        }
    }

    /// Number of entries stored under `key`.
    ///
    /// # Complexity
    ///
    /// O(log n), independent of the number of duplicates.
    pub fn count(&self, key: &K) -> usize {
        self.raw.count_of(key)
    }

    /// Returns `true` if at least one entry is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.find(key).is_ok()
    }

    /// Removes the oldest entry stored under `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(key).map(|(_, v)| v)
    }

    /// Removes up to `count` entries stored under `key`, oldest first, and
    /// returns how many were removed.
    ///
    /// The run is deleted as one rank range, so removing many duplicates
    /// costs about as much as removing one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMultiMap;
    ///
    /// let mut map: RankedMultiMap<i32, ()> = [3, 3, 5, 5, 5, 7].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.remove_count(&5, 2), 2);
    /// assert_eq!(map.count(&5), 1);
    /// assert_eq!(map.len(), 4);
    ///
    /// // Asking for more than the run holds removes the whole run.
    /// assert_eq!(map.remove_count(&3, 10), 2);
    /// assert_eq!(map.remove_count(&4, 1), 0);
    /// ```
    pub fn remove_count(&mut self, key: &K, count: usize) -> usize {
        self.raw.remove_count(key, count)
    }

    /// Removes every entry stored under `key` and returns how many there were.
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.raw.remove_count(key, usize::MAX)
    }

    /// Removes every entry for which `predicate` returns `true` and returns
    /// how many were removed.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.raw.remove_where(predicate)
    }

    /// Removes and returns the first entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        (!self.is_empty()).then(|| self.raw.remove_at(0))
    }

    /// Removes and returns the last entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let len = self.len();
        (len > 0).then(|| self.raw.remove_at(len - 1))
    }

    /// Verifies the structural invariants of the underlying tree, allowing
    /// equal neighbors.
    ///
    /// # Errors
    ///
    /// [`Error::Invariant`] describing every violation found.
    pub fn sanity_check(&self) -> Result<(), Error> {
        self.raw.sanity_check(false)
    }
}

impl<K: Clone, V: Clone, C> RankedMultiMap<K, V, C> {
    /// Returns a detached cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor<K, V> {
        Cursor::forward(&self.raw)
    }

    /// Returns a detached cursor positioned after the last entry.
    pub fn cursor_rev(&self) -> Cursor<K, V> {
        Cursor::reverse(&self.raw)
    }
}

impl<K, V, C> sealed::Sealed<K, V> for RankedMultiMap<K, V, C> {
    type Comparer = C;

    fn raw(&self) -> &RawTree<K, V, C> {
        &self.raw
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RankedMultiMap<K, V, C> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RankedMultiMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RankedMultiMap<K, V, C> {}

impl<K: Hash, V: Hash, C> Hash for RankedMultiMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RankedMultiMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RankedMultiMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<K: Clone, V, C: Compare<K> + Default> FromIterator<(K, V)> for RankedMultiMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Clone, V, C: Compare<K>> Extend<(K, V)> for RankedMultiMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Clone + Ord, V, const N: usize> From<[(K, V); N]> for RankedMultiMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RankedMultiMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RankedMultiMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::from_entries(self.raw.into_entries())
    }
}
