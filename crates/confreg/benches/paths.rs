use confreg::{Format, Options, Registry};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// A registry with `sections` sections of `keys` entries each, plus the same
/// number of top-level scalars.
fn sample(sections: usize, keys: usize) -> Registry {
    let mut registry = Registry::new();
    for k in 0..keys {
        registry.set(&format!("key{k}"), format!("value {k}"));
    }
    for s in 0..sections {
        for k in 0..keys {
            registry.set(&format!("section{s}.key{k}"), format!("value {s}/{k}"));
        }
    }
    registry
}

fn bench_paths(c: &mut Criterion) {
    let registry = sample(20, 20);

    c.bench_function("get_nested", |b| {
        b.iter(|| registry.get(black_box("section19.key19")))
    });
    c.bench_function("exists_missing", |b| {
        b.iter(|| registry.exists(black_box("section19.nope.deeper")))
    });
    c.bench_function("set_deep_fresh", |b| {
        b.iter(|| {
            let mut fresh = Registry::new();
            fresh.set(black_box("a.b.c.d.e"), 1);
            fresh
        })
    });
}

fn bench_codecs(c: &mut Criterion) {
    let registry = sample(20, 20);
    let sections = Options::default().process_sections(true);
    let json = registry.to_string_as(Format::Json, &sections).unwrap();
    let ini = registry.to_string_as(Format::Ini, &sections).unwrap();

    c.bench_function("json_parse", |b| {
        b.iter(|| Registry::from_text(black_box(&json), Format::Json, &sections).unwrap())
    });
    c.bench_function("ini_parse_sections", |b| {
        b.iter(|| Registry::from_text(black_box(&ini), Format::Ini, &sections).unwrap())
    });
    c.bench_function("merge_recursive", |b| {
        b.iter(|| {
            let mut target = registry.clone();
            target.merge(black_box(&registry), true);
            target
        })
    });
}

criterion_group!(benches, bench_paths, bench_codecs);
criterion_main!(benches);
