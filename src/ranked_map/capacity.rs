use super::RankedMap;
use crate::compare::Natural;
use crate::raw::{MAX_ORDER, MIN_ORDER, RawTree};

impl<K, V> RankedMap<K, V> {
    /// Creates an empty map whose nodes hold up to `order` children.
    ///
    /// Small orders make deep, narrow trees; the default of
    /// [`DEFAULT_ORDER`](crate::DEFAULT_ORDER) suits most workloads.
    ///
    /// # Panics
    ///
    /// Panics if `order` lies outside `MIN_ORDER..=MAX_ORDER`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let map: RankedMap<i32, i32> = RankedMap::with_order(16);
    /// assert_eq!(map.capacity(), 16);
    /// ```
    #[must_use]
    pub fn with_order(order: usize) -> Self {
        Self::with_comparer_and_order(Natural, order)
    }
}

impl<K, V, C> RankedMap<K, V, C> {
    /// Creates an empty map ordered by `comparer` whose nodes hold up to
    /// `order` children.
    ///
    /// # Panics
    ///
    /// Panics if `order` lies outside `MIN_ORDER..=MAX_ORDER`.
    #[must_use]
    pub fn with_comparer_and_order(comparer: C, order: usize) -> Self {
        assert!(
            (MIN_ORDER..=MAX_ORDER).contains(&order),
            "order {order} outside {MIN_ORDER}..={MAX_ORDER}"
        );
        RankedMap {
            raw: RawTree::new(comparer, order),
        }
    }

    /// Returns the order: the maximum number of children per node.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.order()
    }

    /// Changes the order. The request is ignored unless the map is empty and
    /// `order` lies in `MIN_ORDER..=MAX_ORDER`; returns whether it took
    /// effect.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_tree::RankedMap;
    ///
    /// let mut map = RankedMap::new();
    /// assert!(map.set_capacity(8));
    /// map.insert(1, ());
    /// assert!(!map.set_capacity(32));
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn set_capacity(&mut self, order: usize) -> bool {
        self.raw.set_order(order)
    }
}
