/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use selinv_rs::factor::{BlockColumn, BlockFactorization, DiagonalBlock, Scaling};
use selinv_rs::selinv::{CostModel, SelInvConfig, SelectiveInversion};

fn wave(seed: usize) -> f64 {
    ((seed as f64) * 0.754_877_666_2 + 0.3).sin()
}

/// Banded block pattern: block k couples to the next `band` blocks.
/// With `sparse` every other coupled index is dropped, so the row sets of
/// neighbouring blocks only partly overlap.
fn banded(nblocks: usize, size: usize, band: usize, sparse: bool) -> (BlockFactorization, Scaling) {
    let n = nblocks * size;
    let mut bl = Vec::with_capacity(nblocks);
    let mut bd = Vec::with_capacity(nblocks);
    let mut but = Vec::with_capacity(nblocks);
    for k in 0..nblocks {
        let start = k * size;
        let end = ((k + 1 + band) * size).min(n);
        let j: Vec<usize> = (start..start + size).collect();
        let rows: Vec<usize> = (start + size..end)
            .filter(|row| !sparse || row % 2 == k % 2)
            .collect();
        let unit_lower = |seed: usize| {
            Array2::from_shape_fn((size, size), |(r, c)| {
                if r > c {
                    0.1 * wave(seed + r * size + c)
                } else if r == c {
                    1.0
                } else {
                    0.0
                }
            })
        };
        let coupling = |seed: usize| {
            Array2::from_shape_fn((rows.len(), size), |(r, c)| 0.2 * wave(seed + r * size + c))
        };

        let (bl_l, bl_d) = (coupling(7 * k + 1), unit_lower(7 * k + 2));
        bl.push(BlockColumn::new(j.clone(), rows.clone(), bl_l, bl_d));
        but.push(BlockColumn::new(j, rows.clone(), coupling(7 * k + 3), unit_lower(7 * k + 4)));
        bd.push(DiagonalBlock::new(Array1::from_shape_fn(size, |p| 3.0 + wave(7 * k + 5 + p))));
    }
    (BlockFactorization::new(bl, bd, but), Scaling::identity(n))
}

fn selective_inverse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Selective Inverse");
    group.sample_size(20);

    for &(nblocks, size) in &[(16, 8), (32, 16), (64, 32)] {
        let (factor, scaling) = banded(nblocks, size, 3, false);
        let inversion = SelectiveInversion::new();
        group.bench_with_input(
            BenchmarkId::new("banded", format!("{}x{}", nblocks, size)),
            &(factor, scaling),
            |b, (factor, scaling)| {
                b.iter(|| black_box(inversion.run(black_box(factor), scaling).unwrap()))
            },
        );
    }

    group.finish();
}

fn cost_model_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update Paths");
    group.sample_size(20);

    let (factor, scaling) = banded(32, 16, 4, true);
    let models = [
        ("element_count", CostModel::ElementCount),
        ("always_buffer", CostModel::AlwaysBuffer),
        ("always_scalar", CostModel::AlwaysScalar),
        ("weighted", CostModel::Weighted { copy_weight: 4.0 }),
    ];
    for (name, model) in models {
        let inversion = SelectiveInversion::with_config(
            SelInvConfig::default()
                .with_cost_model(model)
                .with_partition_check(false),
        );
        group.bench_function(name, |b| {
            b.iter(|| black_box(inversion.run(black_box(&factor), &scaling).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, selective_inverse_benchmark, cost_model_benchmark);
criterion_main!(benches);
