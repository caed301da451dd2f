use core::cmp::Ordering;

/// A total order over keys, supplied by a collection at construction time.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator, as is [`Natural`],
/// which defers to the key's [`Ord`] implementation.
///
/// It is a logic error for a comparator to be inconsistent (not a total order),
/// or for its answers to change while keys it ordered remain in a collection.
/// The resulting behavior is unspecified but never undefined.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use ranked_tree::RankedSet;
///
/// let mut set = RankedSet::with_comparer(|a: &i32, b: &i32| b.cmp(a));
/// set.insert(1);
/// set.insert(3);
/// set.insert(2);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Name recorded in a [`Snapshot`](crate::Snapshot) and checked on reload.
    fn identity(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Orders keys by their [`Ord`] implementation.
///
/// This is the default comparator of every collection in the crate. The call
/// is monomorphized down to a direct `Ord::cmp`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }

    fn identity(&self) -> &'static str {
        "natural"
    }
}

/// Orders string keys ignoring case, by comparing their lowercase expansions.
///
/// # Examples
///
/// ```
/// use ranked_tree::{CaseInsensitive, RankedMap};
///
/// let mut map = RankedMap::with_comparer(CaseInsensitive);
/// assert!(map.insert("Apple", 1));
/// assert!(!map.insert("APPLE", 2));
/// assert_eq!(map.get(&"apple"), Some(&1));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct CaseInsensitive;

impl<K: AsRef<str> + ?Sized> Compare<K> for CaseInsensitive {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        let a = a.as_ref().chars().flat_map(char::to_lowercase);
        let b = b.as_ref().chars().flat_map(char::to_lowercase);
        a.cmp(b)
    }

    fn identity(&self) -> &'static str {
        "case-insensitive"
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_matches_ord() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Compare::<i32>::identity(&Natural), "natural");
    }

    #[test]
    fn case_insensitive_folds_case() {
        assert_eq!(CaseInsensitive.compare("AAA", "aaa"), Ordering::Equal);
        assert_eq!(CaseInsensitive.compare("bbb", "CCC"), Ordering::Less);
        assert_eq!(Natural.compare("bbb", "CCC"), Ordering::Greater);
    }

    #[test]
    fn closures_are_comparators() {
        let reverse = |a: &u8, b: &u8| b.cmp(a);
        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
        assert!(reverse.identity().contains("closure"));
    }
}
