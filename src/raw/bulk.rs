use alloc::vec::Vec;

use super::arena::Handle;
use super::balance::Fix;
use super::node::{Edge, Node};
use super::path::Path;
use super::tree::RawTree;
use crate::compare::Compare;

impl<K: Clone, V, C> RawTree<K, V, C> {
    /// Removes the `count` consecutive elements starting at rank `start`.
    ///
    /// The cut is made between the last surviving element before the range
    /// (the lead-in) and the first surviving element after it (the lead-out).
    /// Subtrees that fall entirely inside the range are released without
    /// being visited element by element.
    pub(crate) fn remove_range(&mut self, start: usize, count: usize) {
        let len = self.len();
        debug_assert!(start + count <= len, "range {start}+{count} beyond len {len}");
        match count {
            0 => return,
            1 => {
                self.remove_at(start);
                return;
            }
            _ if count == len => {
                tracing::debug!(count, "bulk delete covers the whole tree");
                self.clear();
                return;
            }
            _ => {}
        }

        let end = start + count;
        let lead_in = (start > 0).then(|| self.find_by_index(start - 1));
        let lead_out = (end < len).then(|| self.find_by_index(end));
        tracing::debug!(start, count, "bulk delete");
        self.bump();

        match (lead_in, lead_out) {
            (Some(mut a), Some(b)) if a.leaf() == b.leaf() => {
                let leaf = self.nodes.get_mut(a.leaf()).as_leaf_mut();
                leaf.remove_range(a.index() + 1, b.index());
                self.change_path_weight(&a, -isize::try_from(count).expect("count fits isize"));
                // The lead-in survives, so the leaf keeps its minimum.
                if self.balance_path(&mut a) {
                    self.rebalance_around(start);
                }
                self.trim_root();
            }
            (a, b) => {
                self.cut(a.as_ref(), b.as_ref(), count);
                self.rebalance_around(start);
            }
        }
    }

    /// Detaches everything strictly between the two lead positions. A missing
    /// lead means the range reaches that end of the tree.
    fn cut(&mut self, lead_in: Option<&Path>, lead_out: Option<&Path>, count: usize) {
        let reference = lead_in.or(lead_out).expect("a partial range keeps one lead");
        let leaf_level = reference.leaf_level();

        let in_leaf = lead_in.map(Path::leaf);
        let out_leaf = lead_out.map(Path::leaf);
        if let Some(a) = lead_in {
            let leaf = self.nodes.get_mut(a.leaf()).as_leaf_mut();
            let len = leaf.len();
            leaf.remove_range(a.index() + 1, len);
            leaf.right = out_leaf;
        }
        if let Some(b) = lead_out {
            let leaf = self.nodes.get_mut(b.leaf()).as_leaf_mut();
            leaf.remove_range(0, b.index());
            leaf.left = in_leaf;
        }
        match (in_leaf, out_leaf) {
            (Some(a), None) => self.rightmost = a,
            (None, Some(b)) => self.leftmost = b,
            _ => {}
        }

        let delta = -isize::try_from(count).expect("count fits isize");
        for level in (0..leaf_level).rev() {
            let step_in = lead_in.map(|a| a.step(level));
            let step_out = lead_out.map(|b| b.step(level));

            if let (Some(si), Some(so)) = (step_in, step_out)
                && si.node == so.node
            {
                // The two paths meet here: drop the children between them and
                // refresh the pivot that now names the lead-out subtree.
                let branch = self.nodes.get_mut(si.node).as_branch_mut();
                let doomed: Vec<Handle> = branch.children.drain(si.index + 1..so.index).collect();
                branch.keys.drain(si.index..so.index - 1);
                branch.weight -= count;
                let next = branch.children[si.index + 1];
                let pivot = self.first_key(next).clone();
                self.nodes.get_mut(si.node).as_branch_mut().keys[si.index] = pivot;
                for handle in doomed {
                    self.free_subtree(handle);
                }
                for above in 0..level {
                    let step = reference.step(above);
                    let branch = self.nodes.get_mut(step.node).as_branch_mut();
                    branch.weight = branch.weight.checked_add_signed(delta).expect("branch weight underflow");
                }
                tracing::trace!(level, "bulk delete joined at common ancestor");
                return;
            }

            if let Some(si) = step_in {
                let branch = self.nodes.get_mut(si.node).as_branch_mut();
                let doomed = branch.children.split_off(si.index + 1);
                branch.keys.truncate(si.index);
                for handle in doomed {
                    self.free_subtree(handle);
                }
                self.recompute_weight(si.node);
            }
            if let Some(so) = step_out {
                let branch = self.nodes.get_mut(so.node).as_branch_mut();
                let doomed: Vec<Handle> = branch.children.drain(..so.index).collect();
                branch.keys.drain(..so.index);
                for handle in doomed {
                    self.free_subtree(handle);
                }
                self.recompute_weight(so.node);
            }
        }
    }

    /// Repairs fill around the cut left by a range removal at `start`, rerunning
    /// until no level had to be skipped.
    fn rebalance_around(&mut self, start: usize) {
        loop {
            let mut skipped = false;
            if start > 0 {
                let mut path = self.find_by_index(start - 1);
                skipped |= self.balance_path(&mut path);
            }
            self.trim_root();
            if start < self.len() {
                let mut path = self.find_by_index(start);
                skipped |= self.balance_path(&mut path);
            }
            self.trim_root();
            if !skipped {
                return;
            }
        }
    }

    fn recompute_weight(&mut self, handle: Handle) {
        let branch = self.nodes.get(handle).as_branch();
        let weight = branch.children.iter().map(|&c| self.nodes.get(c).weight()).sum();
        self.nodes.get_mut(handle).as_branch_mut().weight = weight;
    }

    /// Removes every element for which `predicate` returns `true` and returns
    /// how many were removed.
    ///
    /// Leaves are compacted in one left-to-right pass, then the structure is
    /// repaired in a single bottom-up sweep.
    pub(crate) fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let len = self.len();
        let mut removed = 0;
        let mut cursor = Some(self.leftmost);
        while let Some(handle) = cursor {
            let leaf = self.nodes.get_mut(handle).as_leaf_mut();
            let matched = leaf.retain(|k, v| !predicate(k, v));
            cursor = leaf.right;
            removed += matched;
            self.stage = self.stage.wrapping_add(matched as u64);
        }

        tracing::debug!(removed, len, "predicate delete");
        if removed == 0 {
            return 0;
        }
        if removed == len {
            self.clear();
            return removed;
        }
        self.repair(self.root, true);
        self.trim_root();
        removed
    }

    /// Rebuilds weights, pivots and fill for the subtree at `handle` after
    /// leaves were compacted in place. Returns the subtree's new weight; a
    /// zero-weight subtree is left for the caller to detach.
    fn repair(&mut self, handle: Handle, rightmost: bool) -> usize {
        if let Node::Leaf(leaf) = self.nodes.get(handle) {
            return leaf.len();
        }

        let mut index = 0;
        loop {
            let children = &self.nodes.get(handle).as_branch().children;
            let Some(&child) = children.get(index) else { break };
            let last = index + 1 == children.len();
            if self.repair(child, rightmost && last) == 0 {
                self.detach_child(handle, index);
            } else {
                index += 1;
            }
        }

        let count = self.nodes.get(handle).as_branch().children.len();
        for i in 1..count {
            let child = self.nodes.get(handle).as_branch().children[i];
            let pivot = self.first_key(child).clone();
            self.nodes.get_mut(handle).as_branch_mut().keys[i - 1] = pivot;
        }

        self.settle(handle, rightmost);
        self.recompute_weight(handle);
        self.nodes.get(handle).weight()
    }

    /// Brings every child of the branch `handle` up to its fill target.
    ///
    /// A branch child that borrowed or merged now holds grandchildren next to
    /// new siblings, so it is settled in turn and then checked again.
    fn settle(&mut self, handle: Handle, rightmost: bool) {
        let mut index = 0;
        while index < self.nodes.get(handle).as_branch().children.len() {
            match self.fix_child(handle, index, rightmost) {
                Fix::Unchanged => {
                    index += 1;
                    continue;
                }
                Fix::Skipped => break,
                Fix::Borrowed | Fix::AbsorbedRight => {}
                Fix::MergedIntoLeft => index -= 1,
            }
            let children = &self.nodes.get(handle).as_branch().children;
            let child = children[index];
            let last = index + 1 == children.len();
            if !self.nodes.get(child).is_leaf() {
                self.settle(child, rightmost && last);
            }
        }
    }

    /// Unlinks and frees an emptied child of `parent`.
    fn detach_child(&mut self, parent: Handle, index: usize) {
        let branch = self.nodes.get_mut(parent).as_branch_mut();
        let child = branch.children.remove(index);
        if index > 0 {
            branch.keys.remove(index - 1);
        } else if !branch.keys.is_empty() {
            branch.keys.remove(0);
        }
        if let Node::Leaf(leaf) = self.nodes.take(child) {
            match leaf.left {
                Some(left) => self.nodes.get_mut(left).as_leaf_mut().right = leaf.right,
                None => {
                    if let Some(right) = leaf.right {
                        self.leftmost = right;
                    }
                }
            }
            match leaf.right {
                Some(right) => self.nodes.get_mut(right).as_leaf_mut().left = leaf.left,
                None => {
                    if let Some(left) = leaf.left {
                        self.rightmost = left;
                    }
                }
            }
        }
    }
}

impl<K: Clone, V, C: Compare<K>> RawTree<K, V, C> {
    /// Removes up to `count` elements equal to `key`, oldest first, and
    /// returns how many were removed.
    pub(crate) fn remove_count(&mut self, key: &K, count: usize) -> usize {
        let Ok(lo) = self.rank_of(key) else {
            return 0;
        };
        if count == 0 {
            return 0;
        }
        // Probe the last element a full-length removal would take; if it still
        // matches, the whole span does.
        let hi = match lo.checked_add(count - 1) {
            Some(probe) if probe < self.len() && self.cmp.compare(self.element_at(probe).0, key).is_eq() => lo + count,
            _ => self.bound_rank(key, Edge::Right),
        };
        self.remove_range(lo, hi - lo);
        hi - lo
    }
}
