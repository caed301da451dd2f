use super::RankedSet;
use crate::RankedMap;

impl<T> RankedSet<T> {
    /// Creates an empty set whose nodes hold up to `order` children.
    ///
    /// # Panics
    ///
    /// Panics if `order` lies outside `MIN_ORDER..=MAX_ORDER`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedSet;
    ///
    /// let set: RankedSet<i32> = RankedSet::with_order(32);
    /// assert_eq!(set.capacity(), 32);
    /// ```
    #[must_use]
    pub fn with_order(order: usize) -> Self {
        RankedSet {
            map: RankedMap::with_order(order),
        }
    }
}

impl<T, C> RankedSet<T, C> {
    /// Creates an empty set ordered by `comparer` whose nodes hold up to
    /// `order` children.
    ///
    /// # Panics
    ///
    /// Panics if `order` lies outside `MIN_ORDER..=MAX_ORDER`.
    #[must_use]
    pub fn with_comparer_and_order(comparer: C, order: usize) -> Self {
        RankedSet {
            map: RankedMap::with_comparer_and_order(comparer, order),
        }
    }

    /// Returns the order: the maximum number of children per node.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Changes the order if the set is empty and `order` is in range; returns
    /// whether it took effect.
    pub fn set_capacity(&mut self, order: usize) -> bool {
        self.map.set_capacity(order)
    }
}
