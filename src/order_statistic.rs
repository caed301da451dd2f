use core::ops::{Bound, RangeBounds};

/// A zero-based position in the sorted order of a collection.
///
/// Indexing a map by `Rank` yields the value stored at that position, and
/// indexing a set yields the item.
///
/// # Examples
///
/// ```
/// use ranked_tree::{RankedMap, Rank};
///
/// let mut map = RankedMap::new();
/// map.insert("b", 20);
/// map.insert("a", 10);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

/// Resolves a rank range against a collection length into `(start, end)`.
///
/// # Panics
///
/// Panics if the start exceeds the end or the end exceeds `len`.
pub(crate) fn resolve<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).expect("range start overflows usize"),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).expect("range end overflows usize"),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    assert!(start <= end, "range starts at {start} but ends at {end}");
    assert!(end <= len, "range end index {end} out of range for slice of length {len}");
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_bound_kind() {
        assert_eq!(resolve(&(..), 5), (0, 5));
        assert_eq!(resolve(&(1..3), 5), (1, 3));
        assert_eq!(resolve(&(1..=3), 5), (1, 4));
        assert_eq!(resolve(&(2..), 5), (2, 5));
        assert_eq!(resolve(&(Bound::Excluded(1), Bound::Unbounded), 5), (2, 5));
        assert_eq!(resolve(&(5..5), 5), (5, 5));
    }

    #[test]
    #[should_panic(expected = "range end index 6")]
    fn end_past_len_panics() {
        resolve(&(0..6), 5);
    }

    #[test]
    #[should_panic(expected = "range starts at 3 but ends at 1")]
    #[allow(clippy::reversed_empty_ranges)]
    fn inverted_range_panics() {
        resolve(&(3..1), 5);
    }
}
