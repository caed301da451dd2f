//! Detached cursors.
//!
//! A [`Cursor`] does not borrow the collection it walks. Instead every call
//! that moves it takes the collection by shared reference and first checks
//! that the collection has not been mutated since the cursor was created. A
//! cursor that detects a mutation fails with [`Error::StaleCursor`].
//!
//! Borrowing iterators such as [`RankedMap::iter`](crate::RankedMap::iter)
//! cannot observe mutation at all and are the better choice when the walk
//! does not need to outlive a borrow.

use crate::Error;
use crate::raw::{Handle, Leaf, Node, RawTree};

/// A collection a [`Cursor`] can walk. Implemented by every collection in
/// this crate and sealed against outside implementations.
pub trait CursorSource<K, V>: sealed::Sealed<K, V> {}

pub(crate) mod sealed {
    use crate::raw::RawTree;

    #[allow(unreachable_pub)]
    pub trait Sealed<K, V> {
        type Comparer;

        fn raw(&self) -> &RawTree<K, V, Self::Comparer>;
    }
}

impl<K, V, T: sealed::Sealed<K, V>> CursorSource<K, V> for T {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Forward,
    Reverse,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    NotStarted,
    Active,
    Exhausted,
}

/// A forward or reverse position in a collection that survives across
/// borrows.
///
/// A forward cursor starts before the first element and a reverse cursor
/// after the last; the first [`advance`](Cursor::advance) moves onto an
/// element. The element under the cursor is cloned into the cursor, so
/// [`current`](Cursor::current) keeps returning it even after the collection
/// changes.
///
/// # Examples
///
/// ```
/// use ranked_tree::{Error, RankedMap};
///
/// let mut map = RankedMap::new();
/// map.insert(1, "one");
/// map.insert(2, "two");
///
/// let mut cursor = map.cursor();
/// assert_eq!(cursor.advance(&map), Ok(true));
/// assert_eq!(cursor.current(), Some((&1, &"one")));
///
/// map.clear();
/// assert_eq!(cursor.current(), Some((&1, &"one")));
/// assert_eq!(cursor.advance(&map), Err(Error::StaleCursor));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<K, V> {
    direction: Direction,
    state: State,
    leaf: Option<Handle>,
    index: usize,
    rank: usize,
    stage: u64,
    current: Option<(K, V)>,
}

impl<K: Clone, V: Clone> Cursor<K, V> {
    pub(crate) fn forward<C>(raw: &RawTree<K, V, C>) -> Self {
        Self::new(raw, Direction::Forward)
    }

    pub(crate) fn reverse<C>(raw: &RawTree<K, V, C>) -> Self {
        Self::new(raw, Direction::Reverse)
    }

    fn new<C>(raw: &RawTree<K, V, C>, direction: Direction) -> Self {
        Self {
            direction,
            state: State::NotStarted,
            leaf: None,
            index: 0,
            rank: 0,
            stage: raw.stage(),
            current: None,
        }
    }

    /// The element under the cursor, as of the last successful move. Does not
    /// check for staleness.
    pub fn current(&self) -> Option<(&K, &V)> {
        self.current.as_ref().map(|(k, v)| (k, v))
    }

    /// Rank of the element under the cursor.
    pub fn rank(&self) -> Option<usize> {
        (self.state == State::Active).then_some(self.rank)
    }

    /// Whether the cursor has run off the end.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Moves to the next element in the cursor's direction. Returns
    /// `Ok(false)` once the cursor runs off the end.
    ///
    /// # Errors
    ///
    /// [`Error::StaleCursor`] if `source` was mutated since the cursor was
    /// created. The cursor does not move.
    pub fn advance<S: CursorSource<K, V>>(&mut self, source: &S) -> Result<bool, Error> {
        let raw = source.raw();
        self.validate(raw)?;
        match self.state {
            State::Exhausted => Ok(false),
            State::NotStarted => {
                if raw.is_empty() {
                    return Ok(self.exhaust());
                }
                let (leaf, index, rank) = match self.direction {
                    Direction::Forward => (raw.leftmost(), 0, 0),
                    Direction::Reverse => {
                        let last = raw.rightmost();
                        (last, leaf_len(raw, last)? - 1, raw.len() - 1)
                    }
                };
                self.land(raw, leaf, index, rank)
            }
            State::Active => {
                let leaf = self.leaf.ok_or(Error::StaleCursor)?;
                let node = leaf_node(raw, leaf)?;
                let next = match self.direction {
                    Direction::Forward if self.index + 1 < node.keys.len() => Some((leaf, self.index + 1)),
                    Direction::Forward => node.right.map(|right| (right, 0)),
                    Direction::Reverse if self.index > 0 => Some((leaf, self.index - 1)),
                    Direction::Reverse => match node.left {
                        Some(left) => Some((left, leaf_len(raw, left)? - 1)),
                        None => None,
                    },
                };
                match next {
                    Some((leaf, index)) => {
                        let rank = match self.direction {
                            Direction::Forward => self.rank + 1,
                            Direction::Reverse => self.rank - 1,
                        };
                        self.land(raw, leaf, index, rank)
                    }
                    None => Ok(self.exhaust()),
                }
            }
        }
    }

    /// Moves `count` elements in the cursor's direction in logarithmic time.
    /// `skip(1)` is equivalent to `advance`, and `skip(0)` stays put.
    ///
    /// # Errors
    ///
    /// [`Error::StaleCursor`] if `source` was mutated since the cursor was
    /// created.
    pub fn skip<S: CursorSource<K, V>>(&mut self, source: &S, count: usize) -> Result<bool, Error> {
        let raw = source.raw();
        self.validate(raw)?;
        if count == 0 || self.state == State::Exhausted {
            return Ok(self.state == State::Active);
        }
        let len = raw.len();
        let target = match (self.state, self.direction) {
            (State::NotStarted, Direction::Forward) => Some(count - 1),
            (State::NotStarted, Direction::Reverse) => len.checked_sub(count),
            (_, Direction::Forward) => self.rank.checked_add(count),
            (_, Direction::Reverse) => self.rank.checked_sub(count),
        };
        match target {
            Some(rank) if rank < len => {
                let path = raw.find_by_index(rank);
                self.land(raw, path.leaf(), path.index(), rank)
            }
            _ => Ok(self.exhaust()),
        }
    }

    /// Advances past every element for which `predicate` holds, stopping on
    /// the first one that fails it. Returns whether such an element exists.
    /// The element the cursor already sits on is tested first.
    ///
    /// # Errors
    ///
    /// [`Error::StaleCursor`] if `source` was mutated since the cursor was
    /// created.
    pub fn skip_while<S, F>(&mut self, source: &S, mut predicate: F) -> Result<bool, Error>
    where
        S: CursorSource<K, V>,
        F: FnMut(&K, &V) -> bool,
    {
        if self.state == State::NotStarted && !self.advance(source)? {
            return Ok(false);
        }
        loop {
            match &self.current {
                Some((k, v)) if !predicate(k, v) => return Ok(true),
                Some(_) => {}
                None => return Ok(false),
            }
            if !self.advance(source)? {
                return Ok(false);
            }
        }
    }

    fn validate<C>(&self, raw: &RawTree<K, V, C>) -> Result<(), Error> {
        if raw.stage() == self.stage {
            Ok(())
        } else {
            Err(Error::StaleCursor)
        }
    }

    fn land<C>(&mut self, raw: &RawTree<K, V, C>, leaf: Handle, index: usize, rank: usize) -> Result<bool, Error> {
        let node = leaf_node(raw, leaf)?;
        let key = node.keys.get(index).ok_or(Error::StaleCursor)?;
        self.current = Some((key.clone(), node.values[index].clone()));
        self.leaf = Some(leaf);
        self.index = index;
        self.rank = rank;
        self.state = State::Active;
        Ok(true)
    }

    fn exhaust(&mut self) -> bool {
        self.state = State::Exhausted;
        self.leaf = None;
        self.current = None;
        false
    }
}

/// Looks a leaf up without trusting the handle; a cursor handed a collection
/// it was not created from sees a stale cursor rather than a panic.
fn leaf_node<K, V, C>(raw: &RawTree<K, V, C>, handle: Handle) -> Result<&Leaf<K, V>, Error> {
    match raw.try_node(handle) {
        Some(Node::Leaf(leaf)) => Ok(leaf),
        _ => Err(Error::StaleCursor),
    }
}

fn leaf_len<K, V, C>(raw: &RawTree<K, V, C>, handle: Handle) -> Result<usize, Error> {
    let len = leaf_node(raw, handle)?.keys.len();
    if len == 0 { Err(Error::StaleCursor) } else { Ok(len) }
}
