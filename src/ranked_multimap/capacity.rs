use super::RankedMultiMap;
use crate::compare::Natural;
use crate::raw::{MAX_ORDER, MIN_ORDER, RawTree};

impl<K, V> RankedMultiMap<K, V> {
    /// Creates an empty multimap whose nodes hold up to `order` children.
    ///
    /// # Panics
    ///
    /// Panics if `order` lies outside `MIN_ORDER..=MAX_ORDER`.
    #[must_use]
    pub fn with_order(order: usize) -> Self {
        Self::with_comparer_and_order(Natural, order)
    }
}

impl<K, V, C> RankedMultiMap<K, V, C> {
    /// Creates an empty multimap ordered by `comparer` whose nodes hold up to
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
        RankedMultiMap {
            raw: RawTree::new(comparer, order),
        }
    }

    /// Returns the order: the maximum number of children per node.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.order()
    }

    /// Changes the order if the multimap is empty and `order` is in range;
    /// returns whether it took effect.
    pub fn set_capacity(&mut self, order: usize) -> bool {
        self.raw.set_order(order)
    }
}
