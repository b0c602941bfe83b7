use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geoveil::adapter::WebMercatorAdapter;
use geoveil::cluster::ClusterAggregator;
use geoveil::config::{ObfuscationConfig, ObfuscationMode};
use geoveil::obfuscation::ObfuscationEngine;
use geoveil::viewport::{ViewportFeed, filter_by_bounds};
use geoveil::{BoundingBox, Config, LocationRecord};
use std::sync::Arc;

fn records(n: usize) -> Arc<[LocationRecord]> {
    (0..n)
        .map(|i| {
            let lat = 30.0 + (i % 100) as f64 * 0.1;
            let lng = 45.0 + (i / 100) as f64 * 0.1;
            LocationRecord::new(format!("user:{}", i), lat, lng).with_capital(i as f64)
        })
        .collect::<Vec<_>>()
        .into()
}

fn benchmark_obfuscation(c: &mut Criterion) {
    let mut group = c.benchmark_group("obfuscation");

    for &size in &[100, 1_000, 10_000] {
        let data = records(size);

        group.bench_with_input(BenchmarkId::new("jitter", size), &data, |b, data| {
            let mut engine = ObfuscationEngine::new(ObfuscationConfig::default()).unwrap();
            b.iter(|| {
                engine.invalidate();
                black_box(engine.obfuscate(data))
            })
        });

        group.bench_with_input(BenchmarkId::new("grid_snap", size), &data, |b, data| {
            let mut engine = ObfuscationEngine::new(ObfuscationConfig {
                mode: ObfuscationMode::GridSnap,
                ..ObfuscationConfig::default()
            })
            .unwrap();
            b.iter(|| {
                engine.invalidate();
                black_box(engine.obfuscate(data))
            })
        });
    }

    // Memoized path: same dataset identity every call
    let data = records(10_000);
    let mut engine = ObfuscationEngine::new(ObfuscationConfig::default()).unwrap();
    engine.obfuscate(&data);
    group.bench_function("cache_hit_10000", |b| {
        b.iter(|| black_box(engine.obfuscate(black_box(&data))))
    });

    group.finish();
}

fn benchmark_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");

    let mut engine = ObfuscationEngine::new(ObfuscationConfig::default()).unwrap();
    let aggregator = ClusterAggregator::default();

    for &size in &[1_000, 5_000] {
        let obfuscated = engine.obfuscate(&records(size));

        for zoom in [3.0, 8.0, 14.0] {
            let adapter = WebMercatorAdapter::new(zoom);
            group.bench_with_input(
                BenchmarkId::new(format!("zoom_{}", zoom), size),
                obfuscated.locations(),
                |b, points| b.iter(|| black_box(aggregator.cluster(points, &adapter))),
            );
        }
    }

    group.finish();
}

fn benchmark_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");

    let mut engine = ObfuscationEngine::new(ObfuscationConfig::default()).unwrap();
    let obfuscated = engine.obfuscate(&records(10_000));
    let bbox = BoundingBox::new(35.0, 32.0, 50.0, 46.0);

    group.bench_function("filter_by_bounds_10000", |b| {
        b.iter(|| black_box(filter_by_bounds(obfuscated.locations(), Some(black_box(&bbox)))))
    });

    let mut feed = ViewportFeed::new(&Config::default().feed);
    feed.set_dataset(Arc::clone(obfuscated.locations()));
    let boxes = [bbox, BoundingBox::new(36.0, 31.0, 51.0, 45.0)];
    let mut counter = 0;
    group.bench_function("feed_bounds_change_10000", |b| {
        b.iter(|| {
            feed.set_bounds(Some(boxes[counter % 2]));
            counter += 1;
            black_box(feed.page().rows.len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_obfuscation,
    benchmark_clustering,
    benchmark_viewport
);
criterion_main!(benches);
