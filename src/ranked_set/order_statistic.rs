use core::ops::{Index, RangeBounds};

use super::{Iter, RankedSet};
use crate::Rank;
use crate::compare::Compare;
use crate::ranked_map::Keys;

impl<T, C> RankedSet<T, C> {
    /// Returns the item at position `rank` in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let set = RankedSet::from([30, 10, 20]);
    /// assert_eq!(set.get_by_rank(0), Some(&10));
    /// assert_eq!(set.get_by_rank(3), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.map.get_by_rank(rank).map(|(k, _)| k)
    }

    /// Iterates the items whose ranks fall in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range start exceeds its end or the end exceeds
    /// `self.len()`.
    pub fn range_by_rank<R: RangeBounds<usize>>(&self, range: R) -> Iter<'_, T> {
        Iter {
            inner: Keys {
                inner: self.map.range_by_rank(range),
            },
        }
    }
}

impl<T: Clone, C> RankedSet<T, C> {
    /// Removes and returns the item at position `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= self.len()`.
    pub fn remove_at(&mut self, rank: usize) -> T {
        self.map.remove_at(rank).0
    }

    /// Removes the items whose ranks fall in `range` and returns how many were
    /// removed.
    ///
    /// # Panics
    ///
    /// Panics if the range start exceeds its end or the end exceeds
    /// `self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let mut set: RankedSet<i32> = (0..10).collect();
    /// assert_eq!(set.remove_range(..3), 3);
    /// assert_eq!(set.first(), Some(&3));
    /// ```
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        self.map.remove_range(range)
    }
}

impl<T: Clone, C: Compare<T>> RankedSet<T, C> {
    /// Returns `Ok(rank)` if `value` is present, or `Err(rank)` with the
    /// position it would be inserted at.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let set = RankedSet::from([1, 3, 5]);
    /// assert_eq!(set.rank_of(&3), Ok(1));
    /// assert_eq!(set.rank_of(&4), Err(2));
    /// ```
    pub fn rank_of(&self, value: &T) -> Result<usize, usize> {
        self.map.rank_of(value)
    }
}

/// Indexes the set by rank.
///
/// # Panics
///
/// Panics if the rank is out of bounds.
impl<T, C> Index<Rank> for RankedSet<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &T {
        self.get_by_rank(rank.0).expect("rank out of bounds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn rank_round_trip() {
        let set: RankedSet<i64> = (0..500).map(|x| x * 3).collect();
        for rank in 0..set.len() {
            let item = set[Rank(rank)];
            assert_eq!(set.rank_of(&item), Ok(rank));
        }
    }

    #[test]
    fn range_by_rank_walks_a_window() {
        let set: RankedSet<u8> = (0..=255).collect();
        let window: Vec<u8> = set.range_by_rank(250..).copied().collect();
        assert_eq!(window, [250, 251, 252, 253, 254, 255]);
    }

    #[test]
    #[should_panic(expected = "rank out of bounds")]
    fn index_past_end_panics() {
        let set = RankedSet::from([1]);
        let _ = set[Rank(1)];
    }
}
