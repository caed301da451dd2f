//! Rank-aware ordered collections over a weight-augmented B+tree.
//!
//! This crate provides three collections that share one tree engine:
//!
//! - [`RankedMap`] - an ordered map with unique keys
//! - [`RankedMultiMap`] - an ordered map that keeps every value inserted
//!   under a key, in insertion order
//! - [`RankedSet`] - an ordered set of unique items
//!
//! Besides the usual ordered-map operations, every collection answers rank
//! queries in O(log n):
//!
//! - `get_by_rank` - the element at a sorted position
//! - `rank_of` - the sorted position of a key
//! - `remove_range` - delete a run of positions at once
//! - indexing by [`Rank`], e.g. `map[Rank(0)]` for the first value
//!
//! # Example
//!
//! ```
//! use ranked_tree::{RankedMap, Rank};
//!
//! let mut scores = RankedMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//!
//! // The median entry.
//! let (name, score) = scores.get_by_rank(1).unwrap();
//! assert_eq!((*name, *score), ("Bob", 85));
//!
//! assert_eq!(scores.rank_of(&"Carol"), Ok(2));
//! assert_eq!(scores[Rank(0)], 100);
//! ```
//!
//! # Comparators
//!
//! Ordering is a type parameter: [`Natural`] (the default) defers to [`Ord`],
//! [`CaseInsensitive`] folds string case, and any `Fn(&K, &K) -> Ordering`
//! closure works too.
//!
//! # Cursors
//!
//! Borrowing iterators are the normal way to walk a collection. A [`Cursor`]
//! is the detached alternative: it does not hold a borrow, and reports
//! [`Error::StaleCursor`] when the collection changed underneath it.
//!
//! # Implementation
//!
//! All elements live in leaves that form a doubly-linked chain. Each branch
//! records the number of elements below it, which turns rank queries into a
//! single root-to-leaf descent. Node capacity (the order) is configurable
//! between [`MIN_ORDER`] and [`MAX_ORDER`]; see [`TreeStats`] for a view of
//! the resulting shape.
//!
//! # Features
//!
//! - **`no_std` compatible** - only requires `alloc`
//! - **`serde`** - derives `Serialize` and `Deserialize` for [`Snapshot`]

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![deny(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod compare;
mod cursor;
mod error;
mod order_statistic;
mod raw;
mod snapshot;

pub mod ranked_map;
pub mod ranked_multimap;
pub mod ranked_set;

pub use compare::{CaseInsensitive, Compare, Natural};
pub use cursor::{Cursor, CursorSource};
pub use error::Error;
pub use order_statistic::Rank;
pub use ranked_map::RankedMap;
pub use ranked_multimap::RankedMultiMap;
pub use ranked_set::RankedSet;
pub use raw::{DEFAULT_ORDER, MAX_ORDER, MIN_ORDER, TreeStats};
pub use snapshot::Snapshot;
