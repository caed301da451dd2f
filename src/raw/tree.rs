use alloc::vec::Vec;

use super::arena::{Arena, Handle};
use super::node::{DEFAULT_ORDER, Edge, Leaf, MAX_ORDER, MIN_ORDER, Node};
use super::path::Path;
use crate::compare::Compare;

/// What an insert does when an equal key is already present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DuplicatePolicy {
    /// Leave the tree untouched and report the collision.
    Reject,
    /// Insert after the existing run of equal keys.
    Append,
}

/// The shared B+tree engine behind every collection in the crate.
///
/// All nodes live in one arena and address each other by [`Handle`]. Leaves
/// form a doubly-linked chain from `leftmost` to `rightmost`. Every branch
/// caches the element count of its subtree, which makes rank queries
/// logarithmic.
#[allow(unreachable_pub)]
#[derive(Clone)]
pub struct RawTree<K, V, C> {
    pub(super) nodes: Arena<Node<K, V>>,
    pub(super) root: Handle,
    pub(super) leftmost: Handle,
    pub(super) rightmost: Handle,
    pub(super) cmp: C,
    pub(super) max_key_count: usize,
    pub(super) stage: u64,
}

impl<K, V, C> RawTree<K, V, C> {
    pub(crate) fn new(cmp: C, order: usize) -> Self {
        debug_assert!((MIN_ORDER..=MAX_ORDER).contains(&order), "order {order} out of range");
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::Leaf(Leaf::new()));
        Self {
            nodes,
            root,
            leftmost: root,
            rightmost: root,
            cmp,
            max_key_count: order - 1,
            stage: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.get(self.root).weight()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum children per branch.
    #[inline]
    pub(crate) fn order(&self) -> usize {
        self.max_key_count + 1
    }

    /// Changes the order. Only honored while the tree is empty and `order`
    /// lies in `[MIN_ORDER, MAX_ORDER]`; returns whether it took effect.
    pub(crate) fn set_order(&mut self, order: usize) -> bool {
        if !(MIN_ORDER..=MAX_ORDER).contains(&order) {
            tracing::debug!(order, "ignoring capacity outside the accepted range");
            return false;
        }
        if !self.is_empty() {
            tracing::debug!(order, len = self.len(), "ignoring capacity change on a non-empty tree");
            return false;
        }
        self.max_key_count = order - 1;
        true
    }

    #[inline]
    pub(crate) fn stage(&self) -> u64 {
        self.stage
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.stage = self.stage.wrapping_add(1);
    }

    pub(crate) fn comparer(&self) -> &C {
        &self.cmp
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<K, V>> {
        &self.nodes
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn try_node(&self, handle: Handle) -> Option<&Node<K, V>> {
        self.nodes.try_get(handle)
    }

    pub(crate) fn leftmost(&self) -> Handle {
        self.leftmost
    }

    pub(crate) fn rightmost(&self) -> Handle {
        self.rightmost
    }

    /// Minimum keys for a leaf that has a right sibling.
    pub(crate) fn min_leaf(&self) -> usize {
        self.max_key_count.div_ceil(2)
    }

    /// Minimum children for a branch that has a right sibling.
    pub(crate) fn min_children(&self) -> usize {
        self.order().div_ceil(2)
    }

    /// Fill a non-root node must reach to be valid.
    pub(crate) fn fill_target(&self, is_leaf: bool, rightmost: bool) -> usize {
        match (is_leaf, rightmost) {
            (true, true) => 1,
            (true, false) => self.min_leaf(),
            (false, true) => 2,
            (false, false) => self.min_children(),
        }
    }

    /// Drops every element and resets the root to one empty leaf.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::Leaf(Leaf::new()));
        self.leftmost = self.root;
        self.rightmost = self.root;
        self.bump();
    }

    /// Key and value at the leaf position of `path`.
    pub(crate) fn entry(&self, path: &Path) -> (&K, &V) {
        let leaf = self.nodes.get(path.leaf()).as_leaf();
        (&leaf.keys[path.index()], &leaf.values[path.index()])
    }

    pub(crate) fn entry_mut(&mut self, path: &Path) -> (&K, &mut V) {
        let index = path.index();
        let leaf = self.nodes.get_mut(path.leaf()).as_leaf_mut();
        (&leaf.keys[index], &mut leaf.values[index])
    }

    /// Element at `index`, which must be in bounds.
    pub(crate) fn element_at(&self, index: usize) -> (&K, &V) {
        self.entry(&self.find_by_index(index))
    }

    pub(crate) fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.nodes.get(self.leftmost).as_leaf();
        Some((leaf.keys.first()?, leaf.values.first()?))
    }

    pub(crate) fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.nodes.get(self.rightmost).as_leaf();
        Some((leaf.keys.last()?, leaf.values.last()?))
    }

    /// Consumes the tree, returning its elements in order.
    pub(crate) fn into_entries(mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.len());
        let mut cursor = Some(self.leftmost);
        while let Some(handle) = cursor {
            let leaf = self.nodes.take(handle).into_leaf();
            cursor = leaf.right;
            entries.extend(leaf.keys.into_iter().zip(leaf.values));
        }
        entries
    }

    /// Releases a detached subtree and every node below it.
    pub(super) fn free_subtree(&mut self, handle: Handle) {
        let mut pending = alloc::vec![handle];
        while let Some(handle) = pending.pop() {
            if let Node::Branch(branch) = self.nodes.take(handle) {
                pending.extend(branch.children);
            }
        }
    }

    /// Replaces the root by its only child for as long as it has exactly one.
    pub(super) fn trim_root(&mut self) {
        loop {
            let Node::Branch(branch) = self.nodes.get(self.root) else {
                return;
            };
            if branch.children.len() != 1 {
                return;
            }
            let child = branch.children[0];
            self.nodes.free(self.root);
            self.root = child;
            tracing::trace!("root trimmed, tree lost one level");
        }
    }
}

impl<K: Clone, V, C> RawTree<K, V, C> {
    /// Removes the element at `index`, which must be in bounds.
    pub(crate) fn remove_at(&mut self, index: usize) -> (K, V) {
        let path = self.find_by_index(index);
        self.remove_at_path(path)
    }

    /// Removes the element at an interior path position, then restores the
    /// pivot and fill invariants along the path.
    pub(super) fn remove_at_path(&mut self, mut path: Path) -> (K, V) {
        let index = path.index();
        let leaf = self.nodes.get_mut(path.leaf()).as_leaf_mut();
        let removed = leaf.remove(index);
        let refresh = index == 0 && !leaf.is_empty();
        self.change_path_weight(&path, -1);
        self.bump();
        if refresh {
            self.refresh_pivot(&path, path.leaf_level());
        }
        let skipped = self.balance_path(&mut path);
        // Every non-root branch has two children, so one removal cannot strand
        // a lone child.
        debug_assert!(!skipped, "single removal met a one-child parent");
        self.trim_root();
        removed
    }

    /// Copies the new minimum of the node at `level` into the nearest
    /// ancestor pivot that names it.
    pub(super) fn refresh_pivot(&mut self, path: &Path, level: usize) {
        let Some(ancestor) = (0..level).rev().find(|&a| path.step(a).index > 0) else {
            return;
        };
        let key = self.first_key(path.step(level).node).clone();
        let step = path.step(ancestor);
        self.nodes.get_mut(step.node).as_branch_mut().keys[step.index - 1] = key;
    }

    /// Splits the path's leaf in two, keeping the smaller half in place, and
    /// promotes the new right leaf's first key.
    fn split_leaf(&mut self, path: &Path) {
        let handle = path.leaf();
        let leaf = self.nodes.get_mut(handle).as_leaf_mut();
        let keep = leaf.len() / 2;
        let (keys, values) = leaf.split_off(keep);
        let old_right = leaf.right;
        let pivot = keys[0].clone();
        let sibling = Leaf {
            keys,
            values,
            left: Some(handle),
            right: old_right,
        };
        let sibling = self.nodes.alloc(Node::Leaf(sibling));
        self.nodes.get_mut(handle).as_leaf_mut().right = Some(sibling);
        match old_right {
            Some(next) => self.nodes.get_mut(next).as_leaf_mut().left = Some(sibling),
            None => self.rightmost = sibling,
        }
        tracing::trace!(keep, "leaf split");
        self.promote(path, path.leaf_level(), pivot, sibling);
    }
}

impl<K: Clone, V, C: Compare<K>> RawTree<K, V, C> {
    /// Inserts an element. Returns `false`, leaving the tree untouched, when
    /// `policy` is [`DuplicatePolicy::Reject`] and an equal key exists.
    pub(crate) fn insert(&mut self, key: K, value: V, policy: DuplicatePolicy) -> bool {
        let path = match policy {
            DuplicatePolicy::Reject => {
                let path = self.descend(&key, Edge::Left);
                if self.key_at_or_after(&path).is_some_and(|k| self.cmp.compare(k, &key).is_eq()) {
                    return false;
                }
                path
            }
            DuplicatePolicy::Append => self.descend(&key, Edge::Right),
        };

        let leaf = self.nodes.get_mut(path.leaf()).as_leaf_mut();
        leaf.insert(path.index(), key, value);
        let overflow = leaf.len() > self.max_key_count;
        self.change_path_weight(&path, 1);
        self.bump();
        if overflow {
            self.split_leaf(&path);
        }
        true
    }

    pub(crate) fn get(&self, key: &K) -> Option<(&K, &V)> {
        let path = self.find(key).ok()?;
        Some(self.entry(&path))
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<(&K, &mut V)> {
        let path = self.find(key).ok()?;
        Some(self.entry_mut(&path))
    }

    /// Removes the first element equal to `key`.
    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let path = self.find(key).ok()?;
        Some(self.remove_at_path(path))
    }

    /// `Ok(rank)` of the first element equal to `key`, or `Err(rank)` where it
    /// would be inserted.
    pub(crate) fn rank_of(&self, key: &K) -> Result<usize, usize> {
        let path = self.descend(key, Edge::Left);
        let rank = self.rank(&path);
        if self.key_at_or_after(&path).is_some_and(|k| self.cmp.compare(k, key).is_eq()) {
            Ok(rank)
        } else {
            Err(rank)
        }
    }

    /// Number of elements equal to `key`.
    pub(crate) fn count_of(&self, key: &K) -> usize {
        self.bound_rank(key, Edge::Right) - self.bound_rank(key, Edge::Left)
    }
}

impl<K, V, C: Default> Default for RawTree<K, V, C> {
    fn default() -> Self {
        Self::new(C::default(), DEFAULT_ORDER)
    }
}
