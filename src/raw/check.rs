use core::fmt;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::arena::Handle;
use super::node::Node;
use super::tree::RawTree;
use crate::Error;
use crate::compare::Compare;

/// Shape summary of a tree, as reported by `stats()` on every collection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TreeStats {
    /// Levels from the root to the leaves, both included.
    pub height: usize,
    /// Number of internal nodes.
    pub branches: usize,
    /// Number of leaf nodes.
    pub leaves: usize,
    /// Number of stored elements.
    pub elements: usize,
    /// Maximum children per branch.
    pub order: usize,
    /// Mean leaf occupancy in percent of the leaf capacity.
    pub leaf_fill: usize,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "order:    {}", self.order)?;
        writeln!(f, "height:   {}", self.height)?;
        writeln!(f, "branches: {}", self.branches)?;
        writeln!(f, "leaves:   {}", self.leaves)?;
        writeln!(f, "elements: {}", self.elements)?;
        write!(f, "fill:     {}%", self.leaf_fill)
    }
}

struct Walk<'a, K> {
    leaf_depth: Option<usize>,
    leaves: Vec<Handle>,
    errors: Vec<String>,
    previous: Option<&'a K>,
}

impl<K, V, C> RawTree<K, V, C> {
    pub(crate) fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            order: self.order(),
            elements: self.len(),
            ..TreeStats::default()
        };
        let mut pending = alloc::vec![(self.root, 1)];
        while let Some((handle, depth)) = pending.pop() {
            stats.height = stats.height.max(depth);
            match self.nodes.get(handle) {
                Node::Branch(branch) => {
                    stats.branches += 1;
                    pending.extend(branch.children.iter().map(|&c| (c, depth + 1)));
                }
                Node::Leaf(_) => stats.leaves += 1,
            }
        }
        stats.leaf_fill = stats.elements * 100 / (stats.leaves * self.max_key_count);
        stats
    }
}

impl<K, V, C: Compare<K>> RawTree<K, V, C> {
    /// Verifies every structural invariant, collecting all violations into
    /// one [`Error::Invariant`]. With `unique` set, equal neighbors are
    /// reported as well.
    pub(crate) fn sanity_check(&self, unique: bool) -> Result<(), Error> {
        let mut walk = Walk {
            leaf_depth: None,
            leaves: Vec::new(),
            errors: Vec::new(),
            previous: None,
        };
        let weight = self.check_node(self.root, 0, true, unique, &mut walk);
        if weight != self.len() {
            walk.errors.push(format!("root weight {} disagrees with element count {weight}", self.len()));
        }
        self.check_chain(&walk.leaves, &mut walk.errors);
        let reachable = self.stats();
        if reachable.branches + reachable.leaves != self.nodes.len() {
            walk.errors.push(format!(
                "{} live nodes but only {} reachable",
                self.nodes.len(),
                reachable.branches + reachable.leaves
            ));
        }

        if walk.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Invariant(walk.errors.join("\n")))
        }
    }

    /// Returns the number of elements found under `handle`.
    fn check_node<'a>(&'a self, handle: Handle, depth: usize, rightmost: bool, unique: bool, walk: &mut Walk<'a, K>) -> usize {
        let is_root = handle == self.root;
        match self.nodes.get(handle) {
            Node::Leaf(leaf) => {
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        walk.errors.push(format!("leaf {handle:?} at depth {depth}, expected {expected}"));
                    }
                    Some(_) => {}
                }
                if leaf.keys.len() != leaf.values.len() {
                    walk.errors.push(format!("leaf {handle:?} has {} keys but {} values", leaf.keys.len(), leaf.values.len()));
                }
                if leaf.len() > self.max_key_count {
                    walk.errors.push(format!("leaf {handle:?} overfull with {} keys", leaf.len()));
                }
                if !is_root && leaf.len() < self.fill_target(true, rightmost) {
                    walk.errors.push(format!("leaf {handle:?} underfull with {} keys", leaf.len()));
                }
                for key in &leaf.keys {
                    if let Some(previous) = walk.previous {
                        let order = self.cmp.compare(previous, key);
                        if order.is_gt() || (unique && order.is_eq()) {
                            walk.errors.push(format!("leaf {handle:?} breaks key order"));
                        }
                    }
                    walk.previous = Some(key);
                }
                walk.leaves.push(handle);
                leaf.len()
            }
            Node::Branch(branch) => {
                let count = branch.children.len();
                if branch.keys.len() + 1 != count {
                    walk.errors.push(format!("branch {handle:?} has {} keys for {count} children", branch.keys.len()));
                }
                if count > self.order() {
                    walk.errors.push(format!("branch {handle:?} overfull with {count} children"));
                }
                let target = if is_root { 2 } else { self.fill_target(false, rightmost) };
                if count < target {
                    walk.errors.push(format!("branch {handle:?} underfull with {count} children"));
                }

                let mut total = 0;
                for (i, &child) in branch.children.iter().enumerate() {
                    let weight = self.check_node(child, depth + 1, rightmost && i + 1 == count, unique, walk);
                    total += weight;
                    if i > 0
                        && weight > 0
                        && let Some(pivot) = branch.keys.get(i - 1)
                        && self.cmp.compare(pivot, self.first_key(child)).is_ne()
                    {
                        walk.errors.push(format!("branch {handle:?} pivot {} does not match child minimum", i - 1));
                    }
                }
                if total != branch.weight {
                    walk.errors.push(format!("branch {handle:?} weight {} but holds {total}", branch.weight));
                }
                total
            }
        }
    }

    fn check_chain(&self, leaves: &[Handle], errors: &mut Vec<String>) {
        if leaves.first() != Some(&self.leftmost) {
            errors.push(format!("leftmost {:?} is not the first leaf", self.leftmost));
        }
        if leaves.last() != Some(&self.rightmost) {
            errors.push(format!("rightmost {:?} is not the last leaf", self.rightmost));
        }
        for (i, &handle) in leaves.iter().enumerate() {
            let leaf = self.nodes.get(handle).as_leaf();
            let prev = i.checked_sub(1).map(|p| leaves[p]);
            let next = leaves.get(i + 1).copied();
            if leaf.left != prev {
                errors.push(format!("leaf {handle:?} left link {:?}, expected {prev:?}", leaf.left));
            }
            if leaf.right != next {
                errors.push(format!("leaf {handle:?} right link {:?}, expected {next:?}", leaf.right));
            }
        }
    }
}
