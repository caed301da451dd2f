use core::cmp::Ordering;

use alloc::vec::Vec;

use super::arena::Handle;
use crate::compare::Compare;

/// Smallest accepted order (maximum children per branch).
pub const MIN_ORDER: usize = 4;
/// Largest accepted order.
pub const MAX_ORDER: usize = 256;
/// Order used by collections that do not choose one.
pub const DEFAULT_ORDER: usize = 128;

/// Which end of a run of equal keys a search should land on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Edge {
    /// First position whose key is not less than the probe.
    Left,
    /// First position whose key is greater than the probe.
    Right,
}

#[derive(Clone)]
pub(crate) enum Node<K, V> {
    Branch(Branch<K>),
    Leaf(Leaf<K, V>),
}

/// Internal node. `keys[i]` is a copy of the smallest key stored under
/// `children[i + 1]`; it is only ever used for routing.
#[derive(Clone)]
pub(crate) struct Branch<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<Handle>,
    /// Number of elements in the subtree rooted here.
    pub(crate) weight: usize,
}

/// Terminal node holding elements in sorted order. `values` is parallel to
/// `keys`; the set stores `()` values, which never allocate.
#[derive(Clone)]
pub(crate) struct Leaf<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Vec<V>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn as_leaf(&self) -> &Leaf<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Branch(_) => panic!("expected leaf node"),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> &mut Leaf<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Branch(_) => panic!("expected leaf node"),
        }
    }

    pub(crate) fn as_branch(&self) -> &Branch<K> {
        match self {
            Node::Branch(branch) => branch,
            Node::Leaf(_) => panic!("expected branch node"),
        }
    }

    pub(crate) fn as_branch_mut(&mut self) -> &mut Branch<K> {
        match self {
            Node::Branch(branch) => branch,
            Node::Leaf(_) => panic!("expected branch node"),
        }
    }

    pub(crate) fn into_leaf(self) -> Leaf<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Branch(_) => panic!("expected leaf node"),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Element count of the subtree rooted at this node.
    #[inline]
    pub(crate) fn weight(&self) -> usize {
        match self {
            Node::Branch(branch) => branch.weight,
            Node::Leaf(leaf) => leaf.keys.len(),
        }
    }

    /// The quantity the fill rules apply to: keys for a leaf, children for a
    /// branch.
    pub(crate) fn fill(&self) -> usize {
        match self {
            Node::Branch(branch) => branch.children.len(),
            Node::Leaf(leaf) => leaf.keys.len(),
        }
    }
}

/// Position of the left or right end of the run of keys equal to `key`.
#[inline]
pub(crate) fn bound<K, C: Compare<K>>(keys: &[K], key: &K, cmp: &C, edge: Edge) -> usize {
    match edge {
        Edge::Left => keys.partition_point(|probe| cmp.compare(probe, key) == Ordering::Less),
        Edge::Right => keys.partition_point(|probe| cmp.compare(probe, key) != Ordering::Greater),
    }
}

impl<K> Branch<K> {
    pub(crate) fn new(keys: Vec<K>, children: Vec<Handle>, weight: usize) -> Self {
        debug_assert_eq!(keys.len() + 1, children.len());
        Self { keys, children, weight }
    }

    /// Index of the child whose subtree holds the requested end of `key`'s run.
    #[inline]
    pub(crate) fn route<C: Compare<K>>(&self, key: &K, cmp: &C, edge: Edge) -> usize {
        bound(&self.keys, key, cmp, edge)
    }

    /// Inserts `pivot` and the child to its right after `children[index]`.
    pub(crate) fn insert_child(&mut self, index: usize, pivot: K, child: Handle) {
        self.keys.insert(index, pivot);
        self.children.insert(index + 1, child);
    }

    /// Splits an over-full branch. The left half keeps `children.len() / 2`
    /// children; returns the promoted pivot and the right half's keys and
    /// children. Weights are left to the caller.
    pub(crate) fn split(&mut self) -> (K, Vec<K>, Vec<Handle>) {
        let keep = self.children.len() / 2;
        let children = self.children.split_off(keep);
        let mut keys = self.keys.split_off(keep - 1);
        let pivot = keys.remove(0);
        (pivot, keys, children)
    }
}

impl<K, V> Leaf<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            left: None,
            right: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn insert(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    pub(crate) fn remove(&mut self, index: usize) -> (K, V) {
        (self.keys.remove(index), self.values.remove(index))
    }

    /// Removes the elements in `start..end`.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        self.keys.drain(start..end);
        self.values.drain(start..end);
    }

    /// Moves `keys[at..]` into a new vector pair, leaving `keys[..at]`.
    pub(crate) fn split_off(&mut self, at: usize) -> (Vec<K>, Vec<V>) {
        (self.keys.split_off(at), self.values.split_off(at))
    }

    /// Prepends the last `count` elements of `left` (its immediate left
    /// sibling) to this leaf.
    pub(crate) fn move_left(&mut self, left: &mut Leaf<K, V>, count: usize) {
        let at = left.len() - count;
        let (mut keys, mut values) = left.split_off(at);
        keys.append(&mut self.keys);
        values.append(&mut self.values);
        self.keys = keys;
        self.values = values;
    }

    /// Appends the first `count` elements of `right` (its immediate right
    /// sibling) to this leaf.
    pub(crate) fn move_right(&mut self, right: &mut Leaf<K, V>, count: usize) {
        self.keys.extend(right.keys.drain(..count));
        self.values.extend(right.values.drain(..count));
    }

    /// Absorbs every element of `right` and takes over its right link.
    pub(crate) fn coalesce(&mut self, mut right: Leaf<K, V>) {
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.right = right.right;
    }

    /// Keeps only the elements for which `keep` returns true, compacting the
    /// survivors toward the front. Returns the number removed.
    pub(crate) fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let len = self.keys.len();
        let mut write = 0;
        for read in 0..len {
            if keep(&self.keys[read], &self.values[read]) {
                if read != write {
                    self.keys.swap(read, write);
                    self.values.swap(read, write);
                }
                write += 1;
            }
        }
        self.keys.truncate(write);
        self.values.truncate(write);
        len - write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::vec;

    fn leaf(keys: &[i32]) -> Leaf<i32, i32> {
        let mut leaf = Leaf::new();
        for (i, &k) in keys.iter().enumerate() {
            leaf.insert(i, k, k * 10);
        }
        leaf
    }

    #[test]
    fn bounds_bracket_duplicate_runs() {
        let keys = [1, 3, 3, 3, 7];
        assert_eq!(bound(&keys, &3, &Natural, Edge::Left), 1);
        assert_eq!(bound(&keys, &3, &Natural, Edge::Right), 4);
        assert_eq!(bound(&keys, &4, &Natural, Edge::Left), 4);
        assert_eq!(bound(&keys, &4, &Natural, Edge::Right), 4);
    }

    #[test]
    fn branch_split_promotes_right_minimum() {
        // 5 children, pivots are the minimum of each right child.
        let handles: Vec<Handle> = {
            let mut arena = super::super::arena::Arena::new();
            (0..5).map(|i| arena.alloc(i)).collect()
        };
        let mut branch = Branch::new(vec![10, 20, 30, 40], handles.clone(), 0);
        let (pivot, keys, children) = branch.split();
        assert_eq!(branch.children, handles[..2]);
        assert_eq!(branch.keys, [10]);
        assert_eq!(pivot, 20);
        assert_eq!(keys, [30, 40]);
        assert_eq!(children, handles[2..]);
    }

    #[test]
    fn move_left_and_right_preserve_order() {
        let mut left = leaf(&[1, 2, 3, 4]);
        let mut right = leaf(&[8, 9]);
        right.move_left(&mut left, 2);
        assert_eq!(left.keys, [1, 2]);
        assert_eq!(right.keys, [3, 4, 8, 9]);
        assert_eq!(right.values, [30, 40, 80, 90]);

        left.move_right(&mut right, 3);
        assert_eq!(left.keys, [1, 2, 3, 4, 8]);
        assert_eq!(right.keys, [9]);
    }

    #[test]
    fn retain_compacts_survivors() {
        let mut leaf = leaf(&[1, 2, 3, 4, 5, 6]);
        let removed = leaf.retain(|k, _| k % 2 == 0);
        assert_eq!(removed, 3);
        assert_eq!(leaf.keys, [2, 4, 6]);
        assert_eq!(leaf.values, [20, 40, 60]);
    }

    #[test]
    fn remove_range_drops_span() {
        let mut leaf = leaf(&[1, 2, 3, 4, 5]);
        leaf.remove_range(1, 4);
        assert_eq!(leaf.keys, [1, 5]);
        assert_eq!(leaf.values, [10, 50]);
    }
}
