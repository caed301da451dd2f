use core::mem;

use alloc::vec::Vec;

use super::arena::Handle;
use super::node::Node;
use super::path::Path;
use super::tree::RawTree;

/// What [`RawTree::fix_child`] did to the child it was asked about.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Fix {
    /// The child already met its fill target.
    Unchanged,
    /// The child took entries from a sibling and now meets its target.
    Borrowed,
    /// The child was folded into its left sibling and no longer exists.
    MergedIntoLeft,
    /// The child's right sibling was folded into it; it may still be short.
    AbsorbedRight,
    /// The child is short but has no sibling to work with.
    Skipped,
}

impl<K: Clone, V, C> RawTree<K, V, C> {
    /// Restores fill bottom-up along `path`, from the leaf's parent to the
    /// root. Returns `true` if some level was skipped because its parent had
    /// a single child; the caller must then rerun from a fresh path.
    pub(super) fn balance_path(&mut self, path: &mut Path) -> bool {
        let mut skipped = false;
        for level in (1..path.depth()).rev() {
            let parent_rightmost = self.is_rightmost(path, level - 1);
            loop {
                let parent = path.step(level - 1);
                match self.fix_child(parent.node, parent.index, parent_rightmost) {
                    Fix::Unchanged | Fix::Borrowed => break,
                    Fix::Skipped => {
                        skipped = true;
                        break;
                    }
                    Fix::MergedIntoLeft => {
                        let index = parent.index - 1;
                        let survivor = self.nodes.get(parent.node).as_branch().children[index];
                        path.set_index(level - 1, index);
                        path.set(level, survivor, path.step(level).index);
                    }
                    Fix::AbsorbedRight => {}
                }
            }
        }
        skipped
    }

    /// Brings `children[index]` of `parent` up to its fill target by
    /// borrowing from or merging with an adjacent sibling. The left sibling
    /// is preferred; the first child works with its right sibling instead.
    pub(super) fn fix_child(&mut self, parent: Handle, index: usize, parent_rightmost: bool) -> Fix {
        let branch = self.nodes.get(parent).as_branch();
        let count = branch.children.len();
        let child = self.nodes.get(branch.children[index]);
        let is_leaf = child.is_leaf();
        let fill = child.fill();
        let target = self.fill_target(is_leaf, parent_rightmost && index + 1 == count);
        if fill >= target {
            return Fix::Unchanged;
        }
        if count < 2 {
            return Fix::Skipped;
        }

        let needed = target - fill;
        let min = self.fill_target(is_leaf, false);
        if index > 0 {
            let left = self.nodes.get(branch.children[index - 1]).fill();
            if left >= min + needed {
                self.shift_right(parent, index - 1, needed);
                Fix::Borrowed
            } else {
                self.merge(parent, index - 1);
                Fix::MergedIntoLeft
            }
        } else {
            let right = self.nodes.get(branch.children[1]).fill();
            let right_target = self.fill_target(is_leaf, parent_rightmost && count == 2);
            if right >= right_target + needed {
                self.shift_left(parent, 0, needed);
                Fix::Borrowed
            } else {
                self.merge(parent, 0);
                Fix::AbsorbedRight
            }
        }
    }

    /// Moves the last `count` entries of `children[sep]` to the front of
    /// `children[sep + 1]`.
    fn shift_right(&mut self, parent: Handle, sep: usize, count: usize) {
        let children = &self.nodes.get(parent).as_branch().children;
        let (left, right) = (children[sep], children[sep + 1]);
        match self.nodes.get2_mut(left, right) {
            (Node::Leaf(l), Node::Leaf(r)) => {
                r.move_left(l, count);
                let pivot = r.keys[0].clone();
                self.nodes.get_mut(parent).as_branch_mut().keys[sep] = pivot;
            }
            (Node::Branch(l), Node::Branch(_)) => {
                let at = l.children.len() - count;
                let mut moved = l.children.split_off(at);
                let mut keys = l.keys.split_off(at - 1);
                let pivot = keys.remove(0);
                let separator = mem::replace(&mut self.nodes.get_mut(parent).as_branch_mut().keys[sep], pivot);
                let weight = self.weight_of(&moved);

                let Node::Branch(r) = self.nodes.get_mut(right) else { unreachable!() };
                keys.push(separator);
                keys.append(&mut r.keys);
                r.keys = keys;
                moved.append(&mut r.children);
                r.children = moved;
                r.weight += weight;
                self.nodes.get_mut(left).as_branch_mut().weight -= weight;
            }
            _ => unreachable!("siblings at different levels"),
        }
        tracing::trace!(sep, count, "borrowed from left sibling");
    }

    /// Moves the first `count` entries of `children[sep + 1]` to the end of
    /// `children[sep]`.
    fn shift_left(&mut self, parent: Handle, sep: usize, count: usize) {
        let children = &self.nodes.get(parent).as_branch().children;
        let (left, right) = (children[sep], children[sep + 1]);
        match self.nodes.get2_mut(left, right) {
            (Node::Leaf(l), Node::Leaf(r)) => {
                l.move_right(r, count);
                let pivot = r.keys[0].clone();
                self.nodes.get_mut(parent).as_branch_mut().keys[sep] = pivot;
            }
            (Node::Branch(_), Node::Branch(r)) => {
                let moved: Vec<Handle> = r.children.drain(..count).collect();
                let mut keys: Vec<K> = r.keys.drain(..count).collect();
                let pivot = keys.pop().expect("count is at least one");
                let separator = mem::replace(&mut self.nodes.get_mut(parent).as_branch_mut().keys[sep], pivot);
                let weight = self.weight_of(&moved);

                let Node::Branch(l) = self.nodes.get_mut(left) else { unreachable!() };
                l.keys.push(separator);
                l.keys.append(&mut keys);
                l.children.extend(moved);
                l.weight += weight;
                self.nodes.get_mut(right).as_branch_mut().weight -= weight;
            }
            _ => unreachable!("siblings at different levels"),
        }
        tracing::trace!(sep, count, "borrowed from right sibling");
    }

    /// Folds `children[sep + 1]` into `children[sep]` and drops the
    /// separator between them.
    fn merge(&mut self, parent: Handle, sep: usize) {
        let branch = self.nodes.get_mut(parent).as_branch_mut();
        let separator = branch.keys.remove(sep);
        let right = branch.children.remove(sep + 1);
        let left = branch.children[sep];
        match self.nodes.take(right) {
            Node::Leaf(r) => {
                let next = r.right;
                self.nodes.get_mut(left).as_leaf_mut().coalesce(r);
                match next {
                    Some(next) => self.nodes.get_mut(next).as_leaf_mut().left = Some(left),
                    None => self.rightmost = left,
                }
            }
            Node::Branch(mut r) => {
                let l = self.nodes.get_mut(left).as_branch_mut();
                l.keys.push(separator);
                l.keys.append(&mut r.keys);
                l.children.append(&mut r.children);
                l.weight += r.weight;
            }
        }
        tracing::trace!(sep, "merged siblings");
    }

    fn weight_of(&self, children: &[Handle]) -> usize {
        children.iter().map(|&c| self.nodes.get(c).weight()).sum()
    }
}
