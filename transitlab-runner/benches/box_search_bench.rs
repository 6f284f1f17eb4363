//! Criterion benchmark for the reference box-search engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use transitlab_core::SignalSearchEngine;
use transitlab_runner::{generate, BoxSearch, EngineConfig, SyntheticSpec};

fn bench_box_search(c: &mut Criterion) {
    let series = generate(&SyntheticSpec::demo("bench")).expect("demo curve");
    let engine = BoxSearch::new(&EngineConfig {
        period_samples: 500,
        ..EngineConfig::default()
    });

    c.bench_function("box_search_demo_500_periods", |b| {
        b.iter(|| {
            engine
                .search(
                    black_box(series.time()),
                    black_box(series.flux()),
                    1.0,
                    13.0,
                )
                .expect("search")
        })
    });
}

criterion_group!(benches, bench_box_search);
criterion_main!(benches);
