use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use ranked_tree::{RankedMap, RankedMultiMap, RankedSet};
use std::collections::{BTreeMap, BTreeSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn shuffled_keys(n: usize) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n as i64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(0x5eed));
    keys
}

fn filled_map(order: usize) -> RankedMap<i64, i64> {
    let mut map = RankedMap::with_order(order);
    for k in 0..N as i64 {
        map.insert(k, k);
    }
    map
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_insert_random");

    for order in [8, 32, 128] {
        group.bench_function(BenchmarkId::new("RankedMap", order), |b| {
            b.iter(|| {
                let mut map = RankedMap::with_order(order);
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.entry(k).or_insert(k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_get_random(c: &mut Criterion) {
    let keys = shuffled_keys(N);
    let ranked = filled_map(128);
    let bt_map: BTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();

    let mut group = c.benchmark_group("map_get_random");

    group.bench_function(BenchmarkId::new("RankedMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = ranked.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = bt_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_remove_random(c: &mut Criterion) {
    let keys = shuffled_keys(N);
    let mut group = c.benchmark_group("map_remove_random");

    group.bench_function(BenchmarkId::new("RankedMap", N), |b| {
        b.iter_batched(
            || filled_map(128),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || (0..N as i64).map(|k| (k, k)).collect::<BTreeMap<_, _>>(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Rank Benchmarks ────────────────────────────────────────────────────────

fn bench_get_by_rank(c: &mut Criterion) {
    let ranks: Vec<usize> = shuffled_keys(N).into_iter().map(|k| k as usize).collect();
    let ranked = filled_map(128);
    let bt_map: BTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();

    let mut group = c.benchmark_group("get_by_rank");

    group.bench_function(BenchmarkId::new("RankedMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &r in &ranks {
                if let Some((_, &v)) = ranked.get_by_rank(r) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    // BTreeMap has no rank index; a sample of linear scans shows the gap.
    group.bench_function(BenchmarkId::new("BTreeMap_nth", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &r in ranks.iter().take(100) {
                if let Some((_, &v)) = bt_map.iter().nth(r) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_remove_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_range_half");

    group.bench_function(BenchmarkId::new("bulk", N), |b| {
        b.iter_batched(
            || filled_map(32),
            |mut map| {
                map.remove_range(N / 4..3 * N / 4);
                map
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("one_at_a_time", N), |b| {
        b.iter_batched(
            || filled_map(32),
            |mut map| {
                for rank in (N / 4..3 * N / 4).rev() {
                    map.remove_at(rank);
                }
                map
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_remove_where(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_where_odd");

    group.bench_function(BenchmarkId::new("RankedMap", N), |b| {
        b.iter_batched(|| filled_map(128), |mut map| map.remove_where(|k, _| k % 2 == 1), BatchSize::LargeInput);
    });

    group.bench_function(BenchmarkId::new("BTreeMap_retain", N), |b| {
        b.iter_batched(
            || (0..N as i64).map(|k| (k, k)).collect::<BTreeMap<_, _>>(),
            |mut map| {
                map.retain(|k, _| k % 2 == 0);
                map
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Multimap and Set Benchmarks ────────────────────────────────────────────

fn bench_multimap_remove_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("multimap_remove_count");

    for run in [10usize, 1_000] {
        group.bench_function(BenchmarkId::new("RankedMultiMap", run), |b| {
            b.iter_batched(
                || {
                    let mut map = RankedMultiMap::new();
                    for i in 0..N {
                        map.insert((i % (N / run)) as i64, i);
                    }
                    map
                },
                |mut map| {
                    map.remove_count(&0, run);
                    map
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_set_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_insert_random");

    group.bench_function(BenchmarkId::new("RankedSet", N), |b| {
        b.iter(|| {
            let mut set = RankedSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

criterion_group!(
    map_benches,
    bench_map_insert_random,
    bench_map_get_random,
    bench_map_remove_random,
);
criterion_group!(rank_benches, bench_get_by_rank, bench_remove_range, bench_remove_where);
criterion_group!(other_benches, bench_multimap_remove_count, bench_set_insert_random);
criterion_main!(map_benches, rank_benches, other_benches);
