use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::Error;
use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, sealed};
use crate::ranked_map::{self, Keys, RankedMap};
use crate::raw::{RawTree, TreeStats};

mod capacity;
mod order_statistic;

/// An ordered set of unique items with logarithmic rank operations.
///
/// The set is a [`RankedMap`] whose values are `()`, so it shares the map's
/// performance characteristics.
///
/// It is a logic error for an item to change its ordering relative to other
/// items while it is in the set.
///
/// # Examples
///
/// ```
/// use ranked_tree::RankedSet;
///
/// let mut books = RankedSet::new();
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// assert!(!books.contains(&"The Winds of Winter"));
/// assert_eq!(books.get_by_rank(1), Some(&"The Great Gatsby"));
///
/// books.remove(&"The Odyssey");
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A set with a known list of items can be initialized from an array:
///
/// ```
/// use ranked_tree::RankedSet;
///
/// let set = RankedSet::from([1, 2, 3]);
/// ```
pub struct RankedSet<T, C = Natural> {
    map: RankedMap<T, (), C>,
}

/// An iterator over the items of a [`RankedSet`], in order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: Keys<'a, T, ()>,
}

/// An owning iterator over the items of a [`RankedSet`], in order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
    inner: ranked_map::IntoIter<T, ()>,
}

impl<T> RankedSet<T> {
    /// Makes a new, empty set ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let mut set: RankedSet<i32> = RankedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparer(Natural)
    }
}

impl<T, C> RankedSet<T, C> {
    /// Makes a new, empty set ordered by `comparer`.
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        RankedSet {
            map: RankedMap::with_comparer(comparer),
        }
    }

    /// The comparator this set orders its items by.
    pub fn comparer(&self) -> &C {
        self.map.comparer()
    }

    /// Returns the number of items in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every item. Outstanding cursors become stale.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the smallest item.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let set = RankedSet::from([3, 1, 2]);
    /// assert_eq!(set.first(), Some(&1));
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    pub fn first(&self) -> Option<&T> {
        self.map.first().map(|(k, _)| k)
    }

    /// Returns the largest item.
    pub fn last(&self) -> Option<&T> {
        self.map.last().map(|(k, _)| k)
    }

    /// Gets an iterator that visits the items in ascending order.
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) per step via linked leaves.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.keys() }
    }

    /// Shape statistics of the underlying tree.
    pub fn stats(&self) -> TreeStats {
        self.map.stats()
    }
}

impl<T: Clone, C: Compare<T>> RankedSet<T, C> {
    /// Adds an item. Returns `false`, leaving the set unchanged, if an equal
    /// item is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let mut set = RankedSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ())
    }

    /// Returns `true` if the set contains an item equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    /// Returns the stored item equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Removes the item equal to `value`. Returns whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the stored item equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let mut set = RankedSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    /// Removes every item for which `predicate` returns `true` and returns how
    /// many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let mut set: RankedSet<i32> = (0..10).collect();
    /// assert_eq!(set.remove_where(|&x| x >= 5), 5);
    /// assert!(set.iter().eq(&[0, 1, 2, 3, 4]));
    /// ```
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.map.remove_where(|k, _| predicate(k))
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, _)| k)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, _)| k)
    }

    /// Verifies the structural invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// [`Error::Invariant`] describing every violation found.
    pub fn sanity_check(&self) -> Result<(), Error> {
        self.map.sanity_check()
    }
}

impl<T: Clone, C> RankedSet<T, C> {
    /// Returns a detached cursor positioned before the first item. The
    /// cursor's values are `()`.
    pub fn cursor(&self) -> Cursor<T, ()> {
        self.map.cursor()
    }

    /// Returns a detached cursor positioned after the last item.
    pub fn cursor_rev(&self) -> Cursor<T, ()> {
        self.map.cursor_rev()
    }
}

impl<T, C> sealed::Sealed<T, ()> for RankedSet<T, C> {
    type Comparer = C;

    fn raw(&self) -> &RawTree<T, (), C> {
        sealed::Sealed::raw(&self.map)
    }
}

impl<T: Clone, C: Clone> Clone for RankedSet<T, C> {
    fn clone(&self) -> Self {
        RankedSet { map: self.map.clone() }
    }
}

impl<T: PartialEq, C> PartialEq for RankedSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map.eq(&other.map)
    }
}

impl<T: Eq, C> Eq for RankedSet<T, C> {}

impl<T: Hash, C> Hash for RankedSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RankedSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for RankedSet<T, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<T: Clone, C: Compare<T> + Default> FromIterator<T> for RankedSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Clone, C: Compare<T>> Extend<T> for RankedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for RankedSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Clone + Ord, const N: usize> From<[T; N]> for RankedSet<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T, C> IntoIterator for RankedSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the set's items in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let set = RankedSet::from([3, 1, 2, 4]);
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RankedSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `ranked_set::Iter`.
    ///
    /// ```
    /// # use ranked_tree::ranked_set;
    /// let iter: ranked_set::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            inner: Keys::default(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.inner.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::CaseInsensitive;
    use alloc::vec::Vec;

    #[test]
    fn comparator_decides_equality() {
        let mut set = RankedSet::with_comparer(CaseInsensitive);
        assert!(set.insert("Apple"));
        assert!(!set.insert("APPLE"));
        assert!(set.contains(&"apple"));
        assert_eq!(set.get(&"aPPle"), Some(&"Apple"));
        assert!(set.remove(&"apple"));
        assert!(set.is_empty());
    }

    #[test]
    fn pops_from_both_ends() {
        let mut set: RankedSet<u32> = RankedSet::with_order(4);
        set.extend(&[8, 3, 5, 1, 9]);
        assert_eq!(set.pop_first(), Some(1));
        assert_eq!(set.pop_last(), Some(9));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 5, 8]);
        set.sanity_check().unwrap();
    }

    #[test]
    fn equal_sets_hash_alike() {
        use core::hash::BuildHasher;
        use std::collections::hash_map::RandomState;

        let state = RandomState::new();
        let a: RankedSet<i32> = (0..100).collect();
        let b: RankedSet<i32> = (0..100).rev().collect();
        assert_eq!(a, b);
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
    }
}
