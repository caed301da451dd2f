use core::ops::{Index, RangeBounds};

use super::{Iter, RankedMap};
use crate::compare::Compare;
use crate::{Rank, order_statistic};

impl<K, V, C> RankedMap<K, V, C> {
    /// Returns the entry at position `rank` in sorted order, or `None` if
    /// `rank` is out of bounds.
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
    /// let map = RankedMap::from([("a", 10), ("c", 30), ("b", 20)]);
    /// assert_eq!(map.get_by_rank(1), Some((&"b", &20)));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        (rank < self.len()).then(|| self.raw.element_at(rank))
    }

    /// Returns the key and a mutable reference to the value at position
    /// `rank`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::from([(10, "a"), (5, "b")]);
    /// if let Some((key, value)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(*key, 5);
    ///     *value = "updated";
    /// }
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        if rank >= self.len() {
            return None;
        }
        let path = self.raw.find_by_index(rank);
        Some(self.raw.entry_mut(&path))
    }

    /// Iterates the entries whose ranks fall in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range start exceeds its end or the end exceeds
    /// `self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let map: RankedMap<i32, i32> = (0..100).map(|k| (k, k * k)).collect();
    /// let squares: Vec<i32> = map.range_by_rank(3..6).map(|(_, v)| *v).collect();
    /// assert_eq!(squares, [9, 16, 25]);
    /// ```
    pub fn range_by_rank<R: RangeBounds<usize>>(&self, range: R) -> Iter<'_, K, V> {
        let (start, end) = order_statistic::resolve(&range, self.len());
        Iter::ranks(&self.raw, start, end)
    }
}

impl<K: Clone, V, C> RankedMap<K, V, C> {
    /// Removes and returns the entry at position `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// assert_eq!(map.remove_at(1), (2, "b"));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove_at(&mut self, rank: usize) -> (K, V) {
        let len = self.len();
        assert!(rank < len, "removal rank (is {rank}) should be < len (is {len})");
        self.raw.remove_at(rank)
    }

    /// Removes the entries whose ranks fall in `range` and returns how many
    /// were removed.
    ///
    /// Whole subtrees inside the range are released at once, so the cost
    /// depends on the tree height and the number of nodes touched at the two
    /// ends rather than on the length of the range.
    ///
    /// # Panics
    ///
    /// Panics if the range start exceeds its end or the end exceeds
    /// `self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map: RankedMap<i32, ()> = (0..10).map(|k| (k, ())).collect();
    /// assert_eq!(map.remove_range(2..8), 6);
    /// assert!(map.keys().eq(&[0, 1, 8, 9]));
    /// ```
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let (start, end) = order_statistic::resolve(&range, self.len());
        self.raw.remove_range(start, end - start);
        end - start
    }
}

impl<K: Clone, V, C: Compare<K>> RankedMap<K, V, C> {
    /// Returns `Ok(rank)` if `key` is present, or `Err(rank)` with the
    /// position it would be inserted at.
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
    /// let map = RankedMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.rank_of(&10), Ok(0));
    /// assert_eq!(map.rank_of(&15), Err(1));
    /// ```
    pub fn rank_of(&self, key: &K) -> Result<usize, usize> {
        self.raw.rank_of(key)
    }
}

/// Indexes the map by rank, yielding the value at that position.
///
/// # Panics
///
/// Panics if the rank is out of bounds.
impl<K, V, C> Index<Rank> for RankedMap<K, V, C> {
    type Output = V;

    fn index(&self, rank: Rank) -> &V {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("rank out of bounds")
    }
}
