use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ranked_tree::{CaseInsensitive, Error, MAX_ORDER, MIN_ORDER, Natural, Rank, RankedMap, Snapshot};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range narrower than `TEST_SIZE` so that collisions happen.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn order_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![MIN_ORDER..9usize, Just(32usize), Just(MAX_ORDER)]
}

/// Inserts into a `BTreeMap` the way a `RankedMap` does: the first value wins.
fn model_insert(model: &mut BTreeMap<i64, i64>, key: i64, value: i64) -> bool {
    if model.contains_key(&key) {
        false
    } else {
        model.insert(key, value);
        true
    }
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    RemoveAt(usize),
    RemoveRange(usize, usize),
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => any::<usize>().prop_map(MapOp::RemoveAt),
        1 => (any::<usize>(), 0usize..40).prop_map(|(start, len)| MapOp::RemoveRange(start, len)),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both a `RankedMap` and a
    /// `BTreeMap` and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(order in order_strategy(), ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: RankedMap<i64, i64> = RankedMap::with_order(order);
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model_insert(&mut model, k, v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => prop_assert_eq!(map.remove(&k), model.remove(&k), "remove({})", k),
                MapOp::Get(k) => prop_assert_eq!(map.get(&k), model.get(&k), "get({})", k),
                MapOp::RemoveAt(i) => {
                    if model.is_empty() {
                        continue;
                    }
                    let i = i % model.len();
                    let key = *model.keys().nth(i).unwrap();
                    prop_assert_eq!(map.remove_at(i), model.remove_entry(&key).unwrap());
                }
                MapOp::RemoveRange(start, len) => {
                    let start = if model.is_empty() { 0 } else { start % model.len() };
                    let end = (start + len).min(model.len());
                    let doomed: Vec<i64> = model.keys().skip(start).take(end - start).copied().collect();
                    for key in &doomed {
                        model.remove(key);
                    }
                    prop_assert_eq!(map.remove_range(start..end), doomed.len());
                }
                MapOp::PopFirst => prop_assert_eq!(map.pop_first(), model.pop_first()),
                MapOp::PopLast => prop_assert_eq!(map.pop_last(), model.pop_last()),
            }
            prop_assert_eq!(map.len(), model.len());
        }
        prop_assert!(map.sanity_check().is_ok(), "{:?}", map.sanity_check());
        prop_assert!(map.iter().eq(model.iter()));
    }

    #[test]
    fn iter_size_and_double_ended(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let map: RankedMap<i64, i64> = entries.iter().copied().collect();
        let mut model = BTreeMap::new();
        for &(k, v) in &entries {
            model_insert(&mut model, k, v);
        }

        prop_assert_eq!(map.iter().len(), model.len());
        prop_assert!(map.iter().rev().eq(model.iter().rev()));
        prop_assert!(map.keys().eq(model.keys()));
        prop_assert!(map.values().eq(model.values()));
        prop_assert_eq!(map.into_iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn remove_where_matches_retain(
        order in order_strategy(),
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        modulus in 1i64..6,
    ) {
        let mut map: RankedMap<i64, i64> = RankedMap::with_order(order);
        let mut model = BTreeMap::new();
        for &(k, v) in &entries {
            map.insert(k, v);
            model_insert(&mut model, k, v);
        }
        let before = model.len();
        model.retain(|k, _| k.rem_euclid(modulus) != 0);

        prop_assert_eq!(map.remove_where(|k, _| k.rem_euclid(modulus) == 0), before - model.len());
        prop_assert!(map.sanity_check().is_ok(), "{:?}", map.sanity_check());
        prop_assert!(map.iter().eq(model.iter()));
    }

    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut map: RankedMap<i64, i64> = entries.into_iter().collect();
        map.clear();
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.iter().next(), None);
        prop_assert!(map.insert(1, 1));
        prop_assert!(map.sanity_check().is_ok());
    }
}

// ─── Order-statistic operations ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn get_by_rank_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: RankedMap<i64, i64> = entries.iter().copied().collect();
        let mut model = BTreeMap::new();
        for &(k, v) in &entries {
            model_insert(&mut model, k, v);
        }
        let sorted: Vec<(i64, i64)> = model.into_iter().collect();

        for (rank, (k, v)) in sorted.iter().enumerate() {
            prop_assert_eq!(map.get_by_rank(rank), Some((k, v)));
            prop_assert_eq!(map[Rank(rank)], *v);
        }
        prop_assert_eq!(map.get_by_rank(sorted.len()), None);
    }

    #[test]
    fn rank_of_matches_binary_search(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        probes in proptest::collection::vec(key_strategy(), 100),
    ) {
        let map: RankedMap<i64, i64> = entries.iter().copied().collect();
        let keys: Vec<i64> = map.keys().copied().collect();
        for probe in probes {
            prop_assert_eq!(map.rank_of(&probe), keys.binary_search(&probe));
        }
    }

    #[test]
    fn bulk_remove_equals_one_at_a_time(
        order in order_strategy(),
        len in 1usize..TEST_SIZE,
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let (lo, hi) = {
            let (a, b) = (a % (len + 1), b % (len + 1));
            (a.min(b), a.max(b))
        };
        let mut bulk = RankedMap::with_order(order);
        let mut single = RankedMap::with_order(order);
        for k in 0..len {
            bulk.insert(k, k);
            single.insert(k, k);
        }
        bulk.remove_range(lo..hi);
        for rank in (lo..hi).rev() {
            single.remove_at(rank);
        }
        prop_assert!(bulk.sanity_check().is_ok(), "{:?}", bulk.sanity_check());
        prop_assert_eq!(&bulk, &single);
        for (rank, (k, _)) in bulk.iter().enumerate() {
            prop_assert_eq!(bulk.rank_of(k), Ok(rank));
        }
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn bulk_delete_middle_of_order_five_tree() {
    let mut map = RankedMap::with_order(5);
    for k in 0..1000 {
        map.insert(k, ());
    }
    assert_eq!(map.remove_range(300..700), 400);
    map.sanity_check().unwrap();
    let expected: Vec<i32> = (0..300).chain(700..1000).collect();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), expected);
    assert_eq!(map.get_by_rank(300), Some((&700, &())));
}

#[test]
fn predicate_delete_wide_window_on_tall_tree() {
    let doomed = |k: i32| k % 2 == 1 || (81..401).contains(&k);
    let mut small = RankedMap::with_order(4);
    for k in 0..571 {
        small.insert(k, k);
    }
    small.remove_where(|&k, _| doomed(k));
    small.sanity_check().unwrap();
    assert!(small.keys().copied().eq((0..571).filter(|&k| !doomed(k))));

    let doomed = |k: i32| k % 3 == 0 || (1_500..9_000).contains(&k);
    let mut map = RankedMap::with_order(5);
    for k in 0..10_000 {
        map.insert(k, k);
    }
    assert!(map.stats().height >= 5);
    let expected: Vec<i32> = (0..10_000).filter(|&k| !doomed(k)).collect();
    assert_eq!(map.remove_where(|&k, _| doomed(k)), 10_000 - expected.len());
    map.sanity_check().unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), expected);
    assert_eq!(map.rank_of(&9_001), Ok(1_000));
}

#[test]
fn comparator_decides_order() {
    let entries = [("AAA", 0), ("bbb", 1), ("CCC", 2), ("ddd", 3)];

    let folded: RankedMap<&str, i32, CaseInsensitive> = entries.into_iter().collect();
    assert_eq!(folded.keys().copied().collect::<Vec<_>>(), ["AAA", "bbb", "CCC", "ddd"]);
    assert_eq!(folded.get(&"ccc"), Some(&2));

    let exact: RankedMap<&str, i32> = entries.into_iter().collect();
    assert_eq!(exact.keys().copied().collect::<Vec<_>>(), ["AAA", "CCC", "bbb", "ddd"]);
    assert_eq!(exact.get(&"ccc"), None);
}

#[test]
fn cursor_goes_stale_after_clear() {
    let mut map = RankedMap::from([(1, "one"), (2, "two"), (3, "three")]);
    let mut cursor = map.cursor();
    assert_eq!(cursor.advance(&map), Ok(true));
    assert_eq!(cursor.current(), Some((&1, &"one")));

    map.clear();
    assert_eq!(cursor.current(), Some((&1, &"one")));
    assert_eq!(cursor.advance(&map), Err(Error::StaleCursor));
    assert_eq!(cursor.skip(&map, 1), Err(Error::StaleCursor));
}

// ─── Cursors ─────────────────────────────────────────────────────────────────

#[test]
fn cursors_walk_both_directions() {
    let map: RankedMap<u32, u32> = (0..100).map(|k| (k, k * 10)).collect();

    let mut forward = map.cursor();
    let mut seen = Vec::new();
    while forward.advance(&map).unwrap() {
        let (k, v) = forward.current().unwrap();
        assert_eq!(forward.rank(), Some(seen.len()));
        seen.push((*k, *v));
    }
    assert!(forward.is_exhausted());
    assert_eq!(seen, map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());

    let mut reverse = map.cursor_rev();
    assert_eq!(reverse.advance(&map), Ok(true));
    assert_eq!(reverse.current(), Some((&99, &990)));
    assert_eq!(reverse.skip(&map, 49), Ok(true));
    assert_eq!(reverse.current(), Some((&50, &500)));
    assert_eq!(reverse.skip(&map, 51), Ok(false));
    assert!(reverse.is_exhausted());
}

#[test]
fn cursor_skip_and_skip_while() {
    let map: RankedMap<i32, ()> = (0..1000).map(|k| (k, ())).collect();
    let mut cursor = map.cursor();
    assert_eq!(cursor.skip(&map, 250), Ok(true));
    assert_eq!(cursor.current(), Some((&249, &())));
    assert_eq!(cursor.skip_while(&map, |&k, _| k < 600), Ok(true));
    assert_eq!(cursor.rank(), Some(600));
    assert_eq!(cursor.skip_while(&map, |_, _| true), Ok(false));
    assert!(cursor.is_exhausted());
}

#[test]
fn cursor_survives_reads() {
    let map: RankedMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
    let mut cursor = map.cursor();
    cursor.advance(&map).unwrap();
    assert_eq!(map.get(&5), Some(&5));
    assert_eq!(map.rank_of(&5), Ok(5));
    assert_eq!(cursor.advance(&map), Ok(true));
    assert_eq!(cursor.current(), Some((&1, &1)));
}

// ─── Capacity ────────────────────────────────────────────────────────────────

#[test]
fn capacity_guard() {
    let mut map: RankedMap<i32, i32> = RankedMap::new();
    assert_eq!(map.capacity(), ranked_tree::DEFAULT_ORDER);
    assert!(!map.set_capacity(MIN_ORDER - 1));
    assert!(!map.set_capacity(MAX_ORDER + 1));
    assert!(map.set_capacity(MIN_ORDER));
    map.insert(1, 1);
    assert!(!map.set_capacity(64));
    assert_eq!(map.capacity(), MIN_ORDER);
}

#[test]
#[should_panic(expected = "order 3 outside")]
fn with_order_rejects_tiny_orders() {
    let _ = RankedMap::<i32, i32>::with_order(3);
}

#[test]
fn stats_describe_shape() {
    let map: RankedMap<i32, i32> = {
        let mut map = RankedMap::with_order(4);
        for k in 0..500 {
            map.insert(k, k);
        }
        map
    };
    let stats = map.stats();
    assert_eq!(stats.elements, 500);
    assert_eq!(stats.order, 4);
    assert!(stats.height > 3);
    assert!(stats.leaves >= 500 / 3);
    assert!(format!("{stats}").contains("elements: 500"));
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[test]
fn snapshot_round_trip() {
    let map: RankedMap<String, usize, CaseInsensitive> =
        ["delta", "Alpha", "charlie", "BRAVO"].into_iter().map(String::from).zip(0..).collect();
    let snapshot: Snapshot<String, usize> = map.snapshot();
    assert_eq!(snapshot.comparator, "case-insensitive");
    assert_eq!(snapshot.keys, ["Alpha", "BRAVO", "charlie", "delta"]);
    assert_eq!(snapshot.values, [1, 3, 2, 0]);

    let restored = RankedMap::from_snapshot(snapshot.clone(), CaseInsensitive).unwrap();
    assert_eq!(restored, map);

    let err = RankedMap::<String, usize>::from_snapshot(snapshot, Natural).unwrap_err();
    assert!(matches!(err, Error::ComparatorMismatch { .. }));
}

// ─── Trait impls ─────────────────────────────────────────────────────────────

#[test]
fn debug_lists_entries() {
    let map = RankedMap::from([(2, 'b'), (1, 'a')]);
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
}

#[test]
fn clone_is_independent() {
    let mut a: RankedMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    let b = a.clone();
    a.remove_range(..50);
    assert_eq!(a.len(), 50);
    assert_eq!(b.len(), 100);
    b.sanity_check().unwrap();
    a.sanity_check().unwrap();
}
