use smallvec::SmallVec;

use super::arena::Handle;
use super::node::{Branch, Edge, Node, bound};
use super::tree::RawTree;
use crate::compare::Compare;

/// One level of a root-to-leaf route: the node visited and the index taken
/// inside it (a child index for branches, an element index for the leaf).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Step {
    pub(crate) node: Handle,
    pub(crate) index: usize,
}

/// A captured route from the root (level 0) down to a leaf (last level).
///
/// Paths are ephemeral: any structural mutation other than the one the path
/// was built for invalidates it.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    steps: SmallVec<[Step; 16]>,
}

impl Path {
    fn new() -> Self {
        Self { steps: SmallVec::new() }
    }

    fn push(&mut self, node: Handle, index: usize) {
        self.steps.push(Step { node, index });
    }

    /// Number of levels, root and leaf included.
    pub(crate) fn depth(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn leaf_level(&self) -> usize {
        self.steps.len() - 1
    }

    pub(crate) fn step(&self, level: usize) -> Step {
        self.steps[level]
    }

    pub(crate) fn leaf(&self) -> Handle {
        self.steps[self.leaf_level()].node
    }

    /// Element index inside the leaf.
    pub(crate) fn index(&self) -> usize {
        self.steps[self.leaf_level()].index
    }

    pub(crate) fn set(&mut self, level: usize, node: Handle, index: usize) {
        self.steps[level] = Step { node, index };
    }

    pub(crate) fn set_index(&mut self, level: usize, index: usize) {
        self.steps[level].index = index;
    }

    /// Branch steps, root first.
    pub(crate) fn branches(&self) -> &[Step] {
        &self.steps[..self.leaf_level()]
    }
}

impl<K, V, C> RawTree<K, V, C> {
    /// Descends to the leaf holding the element at `index`, subtracting the
    /// weights of skipped children at every level.
    pub(crate) fn find_by_index(&self, index: usize) -> Path {
        debug_assert!(index < self.len(), "find_by_index({index}) beyond len {}", self.len());
        let mut path = Path::new();
        let mut current = self.root;
        let mut remaining = index;
        loop {
            match self.nodes.get(current) {
                Node::Branch(branch) => {
                    let last = branch.children.len() - 1;
                    let mut slot = last;
                    for (i, &child) in branch.children.iter().enumerate() {
                        let weight = self.nodes.get(child).weight();
                        if remaining < weight || i == last {
                            slot = i;
                            break;
                        }
                        remaining -= weight;
                    }
                    path.push(current, slot);
                    current = branch.children[slot];
                }
                Node::Leaf(_) => {
                    path.push(current, remaining);
                    return path;
                }
            }
        }
    }

    /// Rank of the position a path points at.
    pub(crate) fn rank(&self, path: &Path) -> usize {
        let mut rank = path.index();
        for step in path.branches() {
            let branch = self.nodes.get(step.node).as_branch();
            rank += branch.children[..step.index].iter().map(|&c| self.nodes.get(c).weight()).sum::<usize>();
        }
        rank
    }

    /// Applies `delta` to the weight of every branch on the path.
    pub(crate) fn change_path_weight(&mut self, path: &Path, delta: isize) {
        for step in path.branches() {
            let branch = self.nodes.get_mut(step.node).as_branch_mut();
            branch.weight = branch.weight.checked_add_signed(delta).expect("branch weight underflow");
        }
    }

    /// Moves a position that sits just past the end of its leaf onto index 0
    /// of the right sibling, rewriting the branch steps to match. Positions
    /// already inside a leaf, or at the very end of the tree, are left alone.
    pub(crate) fn normalize(&self, path: &mut Path) {
        let leaf = self.nodes.get(path.leaf()).as_leaf();
        if path.index() < leaf.len() || leaf.right.is_none() {
            return;
        }
        // Climb to the deepest branch that has a child to the right of ours.
        let mut level = path.leaf_level();
        loop {
            level -= 1;
            let step = path.step(level);
            let branch = self.nodes.get(step.node).as_branch();
            if step.index + 1 < branch.children.len() {
                path.set_index(level, step.index + 1);
                break;
            }
        }
        // Then walk down the leftmost edge of that child.
        let mut current = self.nodes.get(path.step(level).node).as_branch().children[path.step(level).index];
        for below in level + 1..path.depth() {
            path.set(below, current, 0);
            if let Node::Branch(branch) = self.nodes.get(current) {
                current = branch.children[0];
            }
        }
        debug_assert_eq!(Some(path.leaf()), leaf.right);
    }

    /// Smallest key stored under `handle`. The subtree must be non-empty.
    pub(crate) fn first_key(&self, mut handle: Handle) -> &K {
        loop {
            match self.nodes.get(handle) {
                Node::Branch(branch) => handle = branch.children[0],
                Node::Leaf(leaf) => return &leaf.keys[0],
            }
        }
    }

    /// The key at the path's position, or the first key of the next leaf when
    /// the position sits at a leaf boundary.
    pub(crate) fn key_at_or_after(&self, path: &Path) -> Option<&K> {
        let leaf = self.nodes.get(path.leaf()).as_leaf();
        match leaf.keys.get(path.index()) {
            Some(key) => Some(key),
            None => leaf.right.map(|right| &self.nodes.get(right).as_leaf().keys[0]),
        }
    }

    /// Whether the node at `level` is the last node of its level.
    pub(crate) fn is_rightmost(&self, path: &Path, level: usize) -> bool {
        path.steps[..level].iter().all(|step| {
            let branch = self.nodes.get(step.node).as_branch();
            step.index + 1 == branch.children.len()
        })
    }
}

impl<K: Clone, V, C> RawTree<K, V, C> {
    /// Inserts `pivot` and `new_node` to the right of the node at `level`,
    /// splitting and promoting further up as long as parents overflow. A split
    /// of the root grows the tree by one level.
    pub(crate) fn promote(&mut self, path: &Path, mut level: usize, mut pivot: K, mut new_node: Handle) {
        let order = self.order();
        loop {
            if level == 0 {
                let old_root = self.root;
                let weight = self.nodes.get(old_root).weight() + self.nodes.get(new_node).weight();
                let branch = Branch::new(alloc::vec![pivot], alloc::vec![old_root, new_node], weight);
                self.root = self.nodes.alloc(Node::Branch(branch));
                tracing::trace!(weight, "root split, tree grew one level");
                return;
            }

            let parent = path.step(level - 1);
            let branch = self.nodes.get_mut(parent.node).as_branch_mut();
            branch.insert_child(parent.index, pivot, new_node);
            if branch.children.len() <= order {
                return;
            }

            let (promoted, keys, children) = branch.split();
            let moved: usize = children.iter().map(|&c| self.nodes.get(c).weight()).sum();
            self.nodes.get_mut(parent.node).as_branch_mut().weight -= moved;
            new_node = self.nodes.alloc(Node::Branch(Branch::new(keys, children, moved)));
            pivot = promoted;
            level -= 1;
            tracing::trace!(level, moved, "branch split");
        }
    }
}

impl<K, V, C: Compare<K>> RawTree<K, V, C> {
    /// Descends to the leftmost (`Edge::Left`) or past-the-rightmost
    /// (`Edge::Right`) position of `key`'s run. The leaf index may equal the
    /// leaf length; see [`RawTree::normalize`].
    pub(crate) fn descend(&self, key: &K, edge: Edge) -> Path {
        let mut path = Path::new();
        let mut current = self.root;
        loop {
            match self.nodes.get(current) {
                Node::Branch(branch) => {
                    let slot = branch.route(key, &self.cmp, edge);
                    path.push(current, slot);
                    current = branch.children[slot];
                }
                Node::Leaf(leaf) => {
                    path.push(current, bound(&leaf.keys, key, &self.cmp, edge));
                    return path;
                }
            }
        }
    }

    /// Locates the first occurrence of `key`. `Ok` holds an interior path to
    /// it; `Err` holds the insertion path for the left edge of the run.
    pub(crate) fn find(&self, key: &K) -> Result<Path, Path> {
        let mut path = self.descend(key, Edge::Left);
        let found = self.key_at_or_after(&path).is_some_and(|k| self.cmp.compare(k, key).is_eq());
        if found {
            self.normalize(&mut path);
            Ok(path)
        } else {
            Err(path)
        }
    }

    /// Rank of the left or right edge of `key`'s run.
    pub(crate) fn bound_rank(&self, key: &K, edge: Edge) -> usize {
        self.rank(&self.descend(key, edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use crate::raw::DuplicatePolicy;
    use alloc::vec::Vec;

    fn tree(order: usize, keys: impl IntoIterator<Item = i32>) -> RawTree<i32, (), Natural> {
        let mut tree = RawTree::new(Natural, order);
        for k in keys {
            tree.insert(k, (), DuplicatePolicy::Append);
        }
        tree
    }

    #[test]
    fn find_by_index_visits_every_rank() {
        let tree = tree(4, 0..200);
        for i in 0..200 {
            let path = tree.find_by_index(i);
            let leaf = tree.node(path.leaf()).as_leaf();
            assert_eq!(leaf.keys[path.index()], i as i32);
            assert_eq!(tree.rank(&path), i);
        }
    }

    #[test]
    fn normalize_crosses_leaf_boundaries() {
        let tree = tree(4, 0..64);
        let mut crossed = 0;
        for k in 0..64 {
            let mut path = tree.descend(&k, Edge::Left);
            let at_boundary = path.index() == tree.node(path.leaf()).as_leaf().len();
            tree.normalize(&mut path);
            let leaf = tree.node(path.leaf()).as_leaf();
            assert_eq!(leaf.keys[path.index()], k);
            assert_eq!(tree.rank(&path), k as usize);
            crossed += usize::from(at_boundary);
        }
        assert!(crossed > 0, "expected some keys to sit on a leaf boundary");
    }

    #[test]
    fn duplicate_edges_bracket_runs_across_leaves() {
        let keys: Vec<i32> = (0..10).flat_map(|k| core::iter::repeat_n(k, 7)).collect();
        let tree = tree(4, keys);
        for k in 0..10 {
            assert_eq!(tree.bound_rank(&k, Edge::Left), k as usize * 7);
            assert_eq!(tree.bound_rank(&k, Edge::Right), k as usize * 7 + 7);
            assert!(tree.find(&k).is_ok());
        }
        assert!(tree.find(&10).is_err());
        assert_eq!(tree.bound_rank(&-1, Edge::Right), 0);
    }

    #[test]
    fn rightmost_detection_follows_last_children() {
        let tree = tree(4, 0..100);
        let last = tree.find_by_index(99);
        assert!(tree.is_rightmost(&last, last.leaf_level()));
        let first = tree.find_by_index(0);
        assert!(!tree.is_rightmost(&first, first.leaf_level()));
        assert!(tree.is_rightmost(&first, 0));
    }
}
