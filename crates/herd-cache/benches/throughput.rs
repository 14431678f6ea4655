//! Benchmarks for herd-cache hit and coalesced paths

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use herd_cache::{CoalescingCache, MemoryConfig, MemoryStore};
use std::hint::black_box;
use tokio::runtime::Runtime;

fn create_cache() -> CoalescingCache<MemoryStore> {
    CoalescingCache::new(MemoryStore::new(MemoryConfig::default()))
}

fn bench_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    rt.block_on(async {
        cache.set("key", 42i32).await.unwrap();
    });

    let mut group = c.benchmark_group("hit");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value: Option<i32> = cache.get(black_box("key")).await.unwrap();
                black_box(value);
            });
        });
    });

    group.bench_function("get_or_populate", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value: i32 = cache
                    .get_or_populate(black_box("key"), || async { Ok::<_, String>(0) })
                    .await
                    .unwrap();
                black_box(value);
            });
        });
    });

    group.finish();
}

fn bench_coalesced_miss(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("coalesced_miss");
    group.throughput(Throughput::Elements(64));

    group.bench_function("64_callers_one_key", |b| {
        b.iter(|| {
            let cache = create_cache();
            rt.block_on(async {
                let handles: Vec<_> = (0..64)
                    .map(|_| {
                        let cache = cache.clone();
                        tokio::spawn(async move {
                            cache
                                .get_or_populate::<Vec<u32>, _, _, _>("tracks", || async {
                                    tokio::task::yield_now().await;
                                    Ok::<_, String>(vec![23, 45, 77])
                                })
                                .await
                                .unwrap()
                        })
                    })
                    .collect();
                for handle in handles {
                    black_box(handle.await.unwrap());
                }
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hit, bench_coalesced_miss);
criterion_main!(benches);
