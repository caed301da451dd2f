use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ranked_tree::{Error, Natural, Rank, RankedMultiMap};

const TEST_SIZE: usize = 2_000;

/// A narrow key range so that long duplicate runs form.
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..24
}

/// Sorted `(key, value)` pairs with equal keys kept in insertion order.
#[derive(Debug, Default)]
struct Model {
    entries: Vec<(u8, u32)>,
}

impl Model {
    fn run(&self, key: u8) -> (usize, usize) {
        let start = self.entries.partition_point(|&(k, _)| k < key);
        let end = self.entries.partition_point(|&(k, _)| k <= key);
        (start, end)
    }

    fn insert(&mut self, key: u8, value: u32) {
        let (_, end) = self.run(key);
        self.entries.insert(end, (key, value));
    }

    fn remove_count(&mut self, key: u8, count: usize) -> usize {
        let (start, end) = self.run(key);
        let take = count.min(end - start);
        self.entries.drain(start..start + take);
        take
    }
}

#[derive(Debug, Clone)]
enum MultiOp {
    Insert(u8),
    Remove(u8),
    RemoveCount(u8, usize),
    RemoveAll(u8),
    RemoveAt(usize),
}

fn op_strategy() -> impl Strategy<Value = MultiOp> {
    prop_oneof![
        8 => key_strategy().prop_map(MultiOp::Insert),
        2 => key_strategy().prop_map(MultiOp::Remove),
        2 => (key_strategy(), 0usize..12).prop_map(|(k, n)| MultiOp::RemoveCount(k, n)),
        1 => key_strategy().prop_map(MultiOp::RemoveAll),
        1 => any::<usize>().prop_map(MultiOp::RemoveAt),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn multimap_ops_match_vec_model(
        order in 4usize..10,
        ops in proptest::collection::vec(op_strategy(), TEST_SIZE),
    ) {
        let mut map = RankedMultiMap::with_order(order);
        let mut model = Model::default();

        for (serial, op) in (0u32..).zip(&ops) {
            match *op {
                MultiOp::Insert(k) => {
                    map.insert(k, serial);
                    model.insert(k, serial);
                }
                MultiOp::Remove(k) => {
                    let (start, end) = model.run(k);
                    let expected = (start < end).then(|| model.entries.remove(start).1);
                    prop_assert_eq!(map.remove(&k), expected);
                }
                MultiOp::RemoveCount(k, n) => prop_assert_eq!(map.remove_count(&k, n), model.remove_count(k, n)),
                MultiOp::RemoveAll(k) => prop_assert_eq!(map.remove_all(&k), model.remove_count(k, usize::MAX)),
                MultiOp::RemoveAt(i) => {
                    if model.entries.is_empty() {
                        continue;
                    }
                    let i = i % model.entries.len();
                    prop_assert_eq!(map.remove_at(i), model.entries.remove(i));
                }
            }
            prop_assert_eq!(map.len(), model.entries.len());
        }

        prop_assert!(map.sanity_check().is_ok(), "{:?}", map.sanity_check());
        prop_assert_eq!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), model.entries.clone());
        for key in 0..24 {
            let (start, end) = model.run(key);
            prop_assert_eq!(map.count(&key), end - start);
            if start < end {
                prop_assert_eq!(map.rank_of(&key), Ok(start));
            } else {
                prop_assert_eq!(map.rank_of(&key), Err(start));
            }
        }
    }

    #[test]
    fn remove_where_keeps_runs_ordered(
        keys in proptest::collection::vec(key_strategy(), TEST_SIZE),
        cutoff in 0u32..2_000,
    ) {
        let mut map: RankedMultiMap<u8, u32> = RankedMultiMap::with_order(5);
        let mut model = Model::default();
        for (serial, &k) in (0u32..).zip(&keys) {
            map.insert(k, serial);
            model.insert(k, serial);
        }
        let before = model.entries.len();
        model.entries.retain(|&(_, v)| v >= cutoff);

        prop_assert_eq!(map.remove_where(|_, &v| v < cutoff), before - model.entries.len());
        prop_assert!(map.sanity_check().is_ok(), "{:?}", map.sanity_check());
        prop_assert_eq!(map.into_iter().collect::<Vec<_>>(), model.entries);
    }
}

#[test]
fn remove_count_leaves_one_of_three() {
    let mut map = RankedMultiMap::new();
    for k in [3, 3, 5, 5, 5, 7] {
        map.insert(k, ());
    }
    assert_eq!(map.remove_count(&5, 2), 2);
    assert_eq!(map.count(&5), 1);
    assert_eq!(map.len(), 4);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 3, 5, 7]);
    map.sanity_check().unwrap();
}

#[test]
fn long_run_across_many_leaves() {
    let mut map = RankedMultiMap::with_order(4);
    map.insert(0, 0);
    for i in 0..500 {
        map.insert(1, i);
    }
    map.insert(2, 0);
    assert_eq!(map.count(&1), 500);
    assert_eq!(map.rank_of(&1), Ok(1));
    assert_eq!(map.rank_of(&2), Ok(501));
    assert!(map.get_all(&1).map(|(_, v)| *v).eq(0..500));
    assert_eq!(map.get_all(&1).rev().next(), Some((&1, &499)));

    assert_eq!(map.remove_count(&1, 499), 499);
    map.sanity_check().unwrap();
    assert_eq!(map.get(&1), Some(&499));
    assert_eq!(map.iter().map(|(k, _)| *k).collect::<Vec<_>>(), [0, 1, 2]);
}

#[test]
fn index_and_rank_queries() {
    let map = RankedMultiMap::from([("b", 2), ("a", 1), ("b", 3)]);
    assert_eq!(map[Rank(0)], 1);
    assert_eq!(map[Rank(2)], 3);
    assert_eq!(map.get_by_rank(1), Some((&"b", &2)));
    assert_eq!(map.range_by_rank(1..).map(|(_, v)| *v).collect::<Vec<_>>(), [2, 3]);
}

#[test]
fn cursor_reports_staleness() {
    let mut map = RankedMultiMap::from([(1, 'x'), (1, 'y')]);
    let mut cursor = map.cursor();
    assert_eq!(cursor.advance(&map), Ok(true));
    assert_eq!(cursor.advance(&map), Ok(true));
    assert_eq!(cursor.current(), Some((&1, &'y')));
    map.insert(1, 'z');
    assert_eq!(cursor.advance(&map), Err(Error::StaleCursor));
    assert_eq!(cursor.current(), Some((&1, &'y')));
}

#[test]
fn snapshot_preserves_duplicates() {
    let map = RankedMultiMap::from([(2, "two"), (1, "one"), (2, "deux")]);
    let snapshot = map.snapshot();
    assert_eq!(snapshot.count, 3);
    assert_eq!(snapshot.keys, [1, 2, 2]);
    assert_eq!(snapshot.values, ["one", "two", "deux"]);
    let restored = RankedMultiMap::from_snapshot(snapshot, Natural).unwrap();
    assert_eq!(restored, map);
}

#[test]
fn predicate_delete_on_tall_tree_with_runs() {
    let mut map = RankedMultiMap::with_order(4);
    for i in 0..6_000u32 {
        map.insert(i / 3, i);
    }
    assert!(map.stats().height >= 5);
    let doomed = |v: u32| v % 4 == 1 || (700..5_200).contains(&v);
    let expected: Vec<(u32, u32)> = (0..6_000).filter(|&v| !doomed(v)).map(|v| (v / 3, v)).collect();
    assert_eq!(map.remove_where(|_, &v| doomed(v)), 6_000 - expected.len());
    map.sanity_check().unwrap();
    assert_eq!(map.into_iter().collect::<Vec<_>>(), expected);
}
