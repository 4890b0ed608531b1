//! Benchmarks for the iconforge pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use iconforge::emit::{identifier, DartStub, LanguageStub, StylesheetEmitter};
use iconforge::registry::{IconEntry, IconRegistry, IconSource};

/// Synthetic source list with a realistic duplicate ratio.
fn sources(count: usize) -> Vec<IconSource> {
    (0..count)
        .map(|i| {
            let name = format!("icon-{:04}.svg", i % (count * 9 / 10).max(1));
            IconSource::new(name.clone(), format!("icons/{}", name))
        })
        .collect()
}

fn registered(count: usize) -> Vec<IconEntry> {
    IconRegistry::default().register_all(sources(count))
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    for count in [100, 1000, 10_000] {
        let input = sources(count);
        group.bench_function(format!("register_{}", count), |b| {
            b.iter(|| {
                let mut registry = IconRegistry::default();
                registry.register_all(black_box(input.clone()))
            })
        });
    }

    group.finish();
}

fn bench_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifiers");
    let reserved = DartStub.reserved_words();

    group.bench_function("identifier_plain", |b| {
        b.iter(|| identifier(black_box("fire-shield-east"), reserved))
    });

    group.bench_function("identifier_leading_digit", |b| {
        b.iter(|| identifier(black_box("3d-model-variant"), reserved))
    });

    group.finish();
}

fn bench_stylesheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("stylesheet");
    let entries = registered(1000);
    let emitter = StylesheetEmitter::new("Icons", "icon");

    group.bench_function("render_1000", |b| {
        b.iter(|| emitter.render(black_box(&entries)))
    });

    group.finish();
}

criterion_group!(benches, bench_registry, bench_identifiers, bench_stylesheet);
criterion_main!(benches);
