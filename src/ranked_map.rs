use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use crate::Error;
use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, sealed};
use crate::raw::{Arena, DuplicatePolicy, Handle, Node, RawTree, TreeStats};

mod capacity;
mod order_statistic;

/// An ordered map with unique keys and logarithmic rank operations.
///
/// Entries are kept sorted by a comparator `C`, which defaults to
/// [`Natural`] (the key's [`Ord`]). Besides the usual lookups the map can
/// fetch the entry at any position ([`get_by_rank`](RankedMap::get_by_rank)),
/// report the position of a key ([`rank_of`](RankedMap::rank_of)), and remove
/// whole runs of positions at once
/// ([`remove_range`](RankedMap::remove_range)).
///
/// Inserting a key that is already present is rejected and the map keeps the
/// first value it saw. Use [`get_mut`](RankedMap::get_mut) to update in place.
///
/// It is a logic error for a key to change its ordering relative to other
/// keys while it is in the map. The resulting behavior is unspecified but
/// never undefined.
///
/// # Examples
///
/// ```
/// use ranked_tree::RankedMap;
///
/// let mut scores = RankedMap::new();
/// scores.insert("Carol", 92);
/// scores.insert("Alice", 100);
/// scores.insert("Bob", 85);
///
/// assert_eq!(scores.get(&"Bob"), Some(&85));
/// assert_eq!(scores.get_by_rank(0), Some((&"Alice", &100)));
/// assert_eq!(scores.rank_of(&"Carol"), Ok(2));
///
/// // Duplicates are rejected.
/// assert!(!scores.insert("Bob", 0));
/// assert_eq!(scores[&"Bob"], 85);
/// ```
pub struct RankedMap<K, V, C = Natural> {
    raw: RawTree<K, V, C>,
}

impl<K, V> RankedMap<K, V> {
    /// Makes a new, empty map ordered by [`Ord`].
    ///
    /// Does not allocate anything beyond the initial empty leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparer(Natural)
    }
}

impl<K, V, C> RankedMap<K, V, C> {
    /// Makes a new, empty map ordered by `comparer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::with_comparer(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "low");
    /// map.insert(9, "high");
    /// assert_eq!(map.first(), Some((&9, &"high")));
    /// ```
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            raw: RawTree::new(comparer, crate::DEFAULT_ORDER),
        }
    }

    /// The comparator this map orders its keys by.
    pub fn comparer(&self) -> &C {
        self.raw.comparer()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries. Outstanding cursors become stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first entry in the map.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.raw.first()
    }

    /// Returns the last entry in the map.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.raw.last()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let map = RankedMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// assert_eq!(map.iter().rev().next(), Some((&3, &"c")));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Shape statistics of the underlying tree.
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let map: RankedMap<u32, ()> = (0..1000).map(|k| (k, ())).collect();
    /// let stats = map.stats();
    /// assert_eq!(stats.elements, 1000);
    /// println!("{stats}");
    /// ```
    pub fn stats(&self) -> TreeStats {
        self.raw.stats()
    }
}

impl<K: Clone, V, C: Compare<K>> RankedMap<K, V, C> {
    /// Inserts a key-value pair. Returns `false` and drops the pair, leaving
    /// the map unchanged, if an equal key is already present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map[&37], "a");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.raw.insert(key, value, DuplicatePolicy::Reject)
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.find(key).is_ok()
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove(key)
    }

    /// Removes every entry for which `predicate` returns `true` and returns
    /// how many were removed.
    ///
    /// The whole sweep is one pass over the leaves followed by one structural
    /// repair, which beats removing the matches one by one.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map: RankedMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// assert_eq!(map.remove_where(|&k, _| k % 2 == 0), 4);
    /// assert!(map.keys().eq(&[1, 3, 5, 7]));
    /// ```
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

    /// Verifies the structural invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// [`Error::Invariant`] describing every violation found. A well-behaved
    /// comparator never produces one.
    pub fn sanity_check(&self) -> Result<(), Error> {
        self.raw.sanity_check(true)
    }
}

impl<K: Clone, V: Clone, C> RankedMap<K, V, C> {
    /// Returns a detached cursor positioned before the first entry.
    ///
    /// The cursor does not borrow the map; see [`Cursor`].
    pub fn cursor(&self) -> Cursor<K, V> {
        Cursor::forward(&self.raw)
    }

    /// Returns a detached cursor positioned after the last entry, moving
    /// toward the front.
    pub fn cursor_rev(&self) -> Cursor<K, V> {
        Cursor::reverse(&self.raw)
    }
}

impl<K, V, C> sealed::Sealed<K, V> for RankedMap<K, V, C> {
    type Comparer = C;

    fn raw(&self) -> &RawTree<K, V, C> {
        &self.raw
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RankedMap<K, V, C> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RankedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RankedMap<K, V, C> {}

impl<K: Hash, V: Hash, C> Hash for RankedMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RankedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RankedMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<K: Clone, V, C: Compare<K> + Default> FromIterator<(K, V)> for RankedMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Clone, V, C: Compare<K>> Extend<(K, V)> for RankedMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Clone + Ord, V, const N: usize> From<[(K, V); N]> for RankedMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Clone, V, C: Compare<K>> Index<&K> for RankedMap<K, V, C> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a RankedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RankedMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::from_entries(self.raw.into_entries())
    }
}

/// An iterator over the entries of a [`RankedMap`] or
/// [`RankedMultiMap`](crate::RankedMultiMap), in order.
///
/// Created by the `iter` method on either collection.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    nodes: Option<&'a Arena<Node<K, V>>>,
    front_leaf: Option<Handle>,
    front_index: usize,
    back_leaf: Option<Handle>,
    back_index: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new<C>(raw: &'a RawTree<K, V, C>) -> Self {
        let remaining = raw.len();
        let back_leaf = raw.rightmost();
        Self {
            nodes: Some(raw.nodes()),
            front_leaf: Some(raw.leftmost()),
            front_index: 0,
            back_leaf: Some(back_leaf),
            back_index: raw.node(back_leaf).weight().saturating_sub(1),
            remaining,
        }
    }

    /// Iterates the elements whose ranks fall in `start..end`, which must lie
    /// within the tree.
    pub(crate) fn ranks<C>(raw: &'a RawTree<K, V, C>, start: usize, end: usize) -> Self {
        if start >= end {
            return Self::default();
        }
        let front = raw.find_by_index(start);
        let back = raw.find_by_index(end - 1);
        Self {
            nodes: Some(raw.nodes()),
            front_leaf: Some(front.leaf()),
            front_index: front.index(),
            back_leaf: Some(back.leaf()),
            back_index: back.index(),
            remaining: end - start,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes?;
        let leaf = nodes.get(self.front_leaf?).as_leaf();
        let item = (&leaf.keys[self.front_index], &leaf.values[self.front_index]);

        self.remaining -= 1;
        self.front_index += 1;
        if self.front_index >= leaf.len() {
            self.front_leaf = leaf.right;
            self.front_index = 0;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes?;
        let leaf = nodes.get(self.back_leaf?).as_leaf();
        let item = (&leaf.keys[self.back_index], &leaf.values[self.back_index]);

        self.remaining -= 1;
        if self.back_index == 0 {
            self.back_leaf = leaf.left;
            if let Some(prev) = self.back_leaf {
                self.back_index = nodes.get(prev).weight().saturating_sub(1);
            }
        } else {
            self.back_index -= 1;
        }
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front_leaf: self.front_leaf,
            front_index: self.front_index,
            back_leaf: self.back_leaf,
            back_index: self.back_index,
            remaining: self.remaining,
        }
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty iterator.
    ///
    /// ```
    /// # use ranked_tree::ranked_map;
    /// let iter: ranked_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Self {
            nodes: None,
            front_leaf: None,
            front_index: 0,
            back_leaf: None,
            back_index: 0,
            remaining: 0,
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

/// An iterator over the keys of a map, in order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug)]
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    fn default() -> Self {
        Self { inner: Iter::default() }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a map, in key order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug)]
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<K, V> Default for Values<'_, K, V> {
    fn default() -> Self {
        Self { inner: Iter::default() }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of a map, in order.
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn from_entries(entries: alloc::vec::Vec<(K, V)>) -> Self {
        Self { inner: entries.into_iter() }
    }
}
