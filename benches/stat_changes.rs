//! Stat-change throughput: parsing and applying batches of changes.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use tabletop_effects::core::{Attributes, Constants, Fixed};
use tabletop_effects::effects::StatChangeEngine;
use tabletop_effects::rules::{parse_stat_change, StatChange};

const TEMPLATES: [&str; 8] = [
    "AC EARLY SET 10",
    "AC NORMAL ADD DEX_MOD",
    "AC LATE MAX 13",
    "SPEED NORMAL MULT 1.5",
    "HP NORMAL ADD CON_MOD",
    "HP LATEST MIN 300",
    "ATTACK EARLIEST ADD PROF_BONUS",
    "DAMAGE NORMAL DIV 2",
];

fn batch(size: usize) -> Vec<StatChange> {
    TEMPLATES
        .iter()
        .cycle()
        .take(size)
        .map(|t| parse_stat_change(t).unwrap())
        .collect()
}

fn base() -> Attributes {
    Attributes::new()
        .with("DEX_MOD", Fixed::from_int(3))
        .with("CON_MOD", Fixed::from_int(2))
        .with("SPEED", Fixed::from_int(30))
        .with("DAMAGE", Fixed::from_int(12))
}

fn bench_apply(c: &mut Criterion) {
    let constants = Constants::new().with("PROF_BONUS", Fixed::from_int(3));

    let mut group = c.benchmark_group("apply_all");
    for size in [8usize, 64, 512] {
        let changes = batch(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &changes, |b, changes| {
            b.iter_batched(
                base,
                |mut attrs| {
                    let report = StatChangeEngine::apply_all(changes, &mut attrs, &constants);
                    black_box((attrs, report))
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_stat_change", |b| {
        b.iter(|| {
            for template in TEMPLATES {
                black_box(parse_stat_change(black_box(template)).ok());
            }
        });
    });
}

criterion_group!(benches, bench_apply, bench_parse);
criterion_main!(benches);
