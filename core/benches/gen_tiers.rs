use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mineflood_core::*;

const TIERS: [(&str, Coord, Coord, CellCount); 4] = [
    ("beginner", 9, 9, 10),
    ("intermediate", 16, 16, 40),
    ("expert", 16, 30, 99),
    ("narrow", 40, 3, 30),
];

fn gen_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, rows, columns, mines) in TIERS {
        let config = GameConfig::new_unchecked(rows, columns, mines);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let grid = RowCappedGenerator::new(SeededRandom::new(seed))
                    .generate(black_box(config))
                    .unwrap();
                black_box(grid)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, gen_tiers);
criterion_main!(benches);
