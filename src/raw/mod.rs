mod arena;
mod balance;
mod bulk;
mod check;
mod node;
mod path;
mod tree;

pub(crate) use arena::{Arena, Handle};
pub use check::TreeStats;
pub(crate) use node::{Leaf, Node};
pub use node::{DEFAULT_ORDER, MAX_ORDER, MIN_ORDER};
pub(crate) use tree::RawTree;
pub(crate) use tree::DuplicatePolicy;
