use core::ops::{Index, RangeBounds};

use super::RankedMultiMap;
use crate::compare::Compare;
use crate::ranked_map::Iter;
use crate::{Rank, order_statistic};

impl<K, V, C> RankedMultiMap<K, V, C> {
    /// Returns the entry at position `rank`, counting every duplicate.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        (rank < self.len()).then(|| self.raw.element_at(rank))
    }

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
    pub fn range_by_rank<R: RangeBounds<usize>>(&self, range: R) -> Iter<'_, K, V> {
        let (start, end) = order_statistic::resolve(&range, self.len());
        Iter::ranks(&self.raw, start, end)
    }
}

impl<K: Clone, V, C> RankedMultiMap<K, V, C> {
    /// Removes and returns the entry at position `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= self.len()`.
    pub fn remove_at(&mut self, rank: usize) -> (K, V) {
        let len = self.len();
        assert!(rank < len, "removal rank (is {rank}) should be < len (is {len})");
        self.raw.remove_at(rank)
    }

    /// Removes the entries whose ranks fall in `range` and returns how many
    /// were removed.
    ///
    /// # Panics
    ///
    /// Panics if the range start exceeds its end or the end exceeds
    /// `self.len()`.
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let (start, end) = order_statistic::resolve(&range, self.len());
        self.raw.remove_range(start, end - start);
        end - start
    }
}

impl<K: Clone, V, C: Compare<K>> RankedMultiMap<K, V, C> {
    /// Returns `Ok(rank)` of the oldest entry under `key`, or `Err(rank)` with
    /// the position a new entry would take.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMultiMap;
    ///
    /// let map = RankedMultiMap::from([(1, 'a'), (2, 'b'), (2, 'c'), (4, 'd')]);
    /// assert_eq!(map.rank_of(&2), Ok(1));
    /// assert_eq!(map.rank_of(&3), Err(3));
    /// ```
    pub fn rank_of(&self, key: &K) -> Result<usize, usize> {
        self.raw.rank_of(key)
    }
}

/// Indexes the multimap by rank, yielding the value at that position.
///
/// # Panics
///
/// Panics if the rank is out of bounds.
impl<K, V, C> Index<Rank> for RankedMultiMap<K, V, C> {
    type Output = V;

    fn index(&self, rank: Rank) -> &V {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("rank out of bounds")
    }
}
