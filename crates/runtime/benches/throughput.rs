use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use runtime::GameEngine;

const BENCH_ROLLS: u64 = 10_000;

fn bench_roll_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("roll_throughput");
    group.throughput(Throughput::Elements(BENCH_ROLLS));

    group.bench_function(BenchmarkId::new("roll_once", BENCH_ROLLS), |b| {
        b.iter(|| {
            let mut engine = GameEngine::for_test_seed(7);
            engine
                .start_round(i64::from(u32::MAX))
                .expect("round should start");
            for _ in 0..BENCH_ROLLS {
                let _ = engine.roll_once();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_roll_throughput);
criterion_main!(benches);
