use alloc::string::String;

/// Errors reported by cursors, invariant checks and snapshot reloads.
///
/// Argument misuse (an out-of-range index, an inverted range) is not an
/// `Error`; like the standard collections, those calls panic.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The collection was mutated after the cursor was created.
    #[error("collection was modified; cursor is stale")]
    StaleCursor,

    /// A structural invariant does not hold. This indicates a bug in the
    /// crate, never a caller error.
    #[error("tree invariant violated:\n{0}")]
    Invariant(String),

    /// A snapshot declares a different element count than it carries.
    #[error("snapshot declares {declared} elements but holds {actual} keys")]
    CountMismatch { declared: usize, actual: usize },

    /// A snapshot's key and value lists differ in length.
    #[error("snapshot holds {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },

    /// A snapshot was taken under a different comparator.
    #[error("snapshot ordered by `{found}`, collection expects `{expected}`")]
    ComparatorMismatch { expected: String, found: String },
}
