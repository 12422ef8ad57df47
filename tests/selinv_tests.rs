use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};
use rstest::rstest;
use selinv_rs::factor::{BlockColumn, BlockFactorization, DiagonalBlock, FactorError, Scaling};
use selinv_rs::selinv::{
    local_block, selective_inverse, CostModel, DiagonalCorrection, SelInvConfig, SelInvError,
    SelectiveInverse,
    SelectiveInversion,
};

/// Deterministic pseudo-random value in `[-scale, scale]`
fn wave(seed: usize, scale: f64) -> f64 {
    ((seed as f64) * 0.754_877_666_2 + 0.3).sin() * scale
}

/// Factorization with consecutive blocks of the given sizes and row sets
fn build(sizes: &[usize], bl_rows: &[Vec<usize>], but_rows: &[Vec<usize>]) -> BlockFactorization {
    let columns: Vec<Vec<usize>> = block_offsets(sizes)
        .iter()
        .zip(sizes)
        .map(|(&start, &size)| (start..start + size).collect())
        .collect();
    build_with_columns(&columns, bl_rows, but_rows)
}

/// Factorization with arbitrary column sets per block
fn build_with_columns(
    columns: &[Vec<usize>],
    bl_rows: &[Vec<usize>],
    but_rows: &[Vec<usize>],
) -> BlockFactorization {
    let mut bl = Vec::new();
    let mut bd = Vec::new();
    let mut but = Vec::new();
    for (k, j) in columns.iter().enumerate() {
        let size = j.len();
        let seed = 1000 * (k + 1);
        let unit_lower = |base: usize| {
            Array2::from_shape_fn((size, size), |(r, c)| match r.cmp(&c) {
                std::cmp::Ordering::Greater => wave(base + r * size + c, 0.3),
                std::cmp::Ordering::Equal => 1.0,
                std::cmp::Ordering::Less => 0.0,
            })
        };
        let bl_l = Array2::from_shape_fn((bl_rows[k].len(), size), |(r, c)| {
            wave(seed + 100 + r * size + c, 0.5)
        });
        let but_l = Array2::from_shape_fn((but_rows[k].len(), size), |(r, c)| {
            wave(seed + 400 + r * size + c, 0.5)
        });
        let diagonal = Array1::from_shape_fn(size, |p| {
            let value = 2.0 + wave(seed + 700 + p, 1.0);
            if p % 2 == 0 {
                value
            } else {
                -value
            }
        });

        bl.push(BlockColumn::new(j.clone(), bl_rows[k].clone(), bl_l, unit_lower(seed)));
        but.push(BlockColumn::new(j.clone(), but_rows[k].clone(), but_l, unit_lower(seed + 200)));
        bd.push(DiagonalBlock::new(diagonal));
    }
    BlockFactorization::new(bl, bd, but)
}

fn block_offsets(sizes: &[usize]) -> Vec<usize> {
    sizes
        .iter()
        .scan(0, |offset, &size| {
            let start = *offset;
            *offset += size;
            Some(start)
        })
        .collect()
}

/// Every block couples to every later index
fn full_coupling(sizes: &[usize]) -> BlockFactorization {
    let n: usize = sizes.iter().sum();
    let rows: Vec<Vec<usize>> = block_offsets(sizes)
        .iter()
        .zip(sizes)
        .map(|(&start, &size)| (start + size..n).collect())
        .collect();
    build(sizes, &rows, &rows)
}

/// Each block couples to a subset of the next block only
fn bidiagonal() -> BlockFactorization {
    let bl_rows = vec![vec![2, 4], vec![5, 7], vec![8, 9], vec![]];
    let but_rows = vec![vec![3, 4], vec![5, 6, 7], vec![9], vec![]];
    build(&[2, 3, 3, 2], &bl_rows, &but_rows)
}

/// Irregular pattern with gaps in every index set
fn irregular() -> BlockFactorization {
    let sizes = [2, 3, 2, 3, 2];
    let bl_rows = vec![
        vec![2, 4, 5, 8, 10, 11],
        vec![5, 6, 9, 11],
        vec![8, 9, 10],
        vec![10, 11],
        vec![],
    ];
    let but_rows = vec![vec![3, 4, 6, 7, 9], vec![5, 7, 8, 10], vec![7, 9, 11], vec![11], vec![]];
    build(&sizes, &bl_rows, &but_rows)
}

fn dense_inverse(a: &Array2<f64>) -> Array2<f64> {
    let n = a.nrows();
    let mut m = a.clone();
    let mut inv = Array2::<f64>::eye(n);
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&p, &q| m[[p, col]].abs().partial_cmp(&m[[q, col]].abs()).unwrap())
            .unwrap();
        for c in 0..n {
            m.swap([col, c], [pivot, c]);
            inv.swap([col, c], [pivot, c]);
        }
        let p = m[[col, col]];
        for c in 0..n {
            m[[col, c]] /= p;
            inv[[col, c]] /= p;
        }
        for r in 0..n {
            let factor = m[[r, col]];
            if r != col && factor != 0.0 {
                for c in 0..n {
                    m[[r, c]] -= factor * m[[col, c]];
                    inv[[r, c]] -= factor * inv[[col, c]];
                }
            }
        }
    }
    inv
}

/// Compare every stored entry of the selective inverse with `exact`
fn assert_matches_on_pattern(result: &SelectiveInverse, exact: &Array2<f64>, epsilon: f64) {
    for block in &result.bd_inv {
        for (p, &row) in block.j.iter().enumerate() {
            for (q, &col) in block.j.iter().enumerate() {
                assert_relative_eq!(block.d[[p, q]], exact[[row, col]], epsilon = epsilon);
            }
        }
    }
    for block in &result.but_inv {
        for (p, &row) in block.i.iter().enumerate() {
            for (q, &col) in block.j.iter().enumerate() {
                assert_relative_eq!(block.l[[p, q]], exact[[row, col]], epsilon = epsilon);
            }
        }
    }
    for block in &result.bl_inv {
        for (p, &col) in block.i.iter().enumerate() {
            for (q, &row) in block.j.iter().enumerate() {
                assert_relative_eq!(block.l[[p, q]], exact[[row, col]], epsilon = epsilon);
            }
        }
    }
}

fn assert_same_result(a: &SelectiveInverse, b: &SelectiveInverse, epsilon: f64) {
    for (x, y) in a.d.iter().zip(b.d.iter()) {
        assert_relative_eq!(*x, *y, epsilon = epsilon);
    }
    for (x, y) in a.to_dense().iter().zip(b.to_dense().iter()) {
        assert_relative_eq!(*x, *y, epsilon = epsilon);
    }
}

#[test]
fn test_single_block_reduces_to_dense_inverse() {
    let factor = full_coupling(&[3]);
    let scaling = Scaling::new(vec![0, 1, 2], array![1.5, 2.0, 0.5], array![1.0, -1.0, 4.0]);
    let result = selective_inverse(&factor, &scaling).unwrap();

    assert!(result.bl_inv[0].l.is_empty());
    assert!(result.but_inv[0].l.is_empty());

    let exact = dense_inverse(&factor.to_dense());
    assert_matches_on_pattern(&result, &exact, 1e-12);
    for i in 0..3 {
        assert_relative_eq!(
            result.d[i],
            scaling.deltar[i] * exact[[i, i]] * scaling.deltal[i],
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_block_diagonal_input() {
    let sizes = [2, 1, 3];
    let empty = vec![Vec::new(); 3];
    let factor = build(&sizes, &empty, &empty);
    let result = selective_inverse(&factor, &Scaling::identity(6)).unwrap();

    for (k, block) in result.bd_inv.iter().enumerate() {
        let product = local_block(&factor.bl[k], &factor.bd[k], &factor.but[k]).dot(&block.d);
        for ((i, j), value) in product.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(*value, expected, epsilon = 1e-12);
        }
    }
    assert_eq!(result.stats.total().executed(), 0);
    assert_eq!(result.stats.blocks, 3);
}

#[test]
fn test_two_block_end_to_end() {
    let bl = vec![
        BlockColumn::new(vec![0, 1], vec![2], array![[0.5, -1.0]], array![[1.0, 0.0], [0.25, 1.0]]),
        BlockColumn::uncoupled(vec![2, 3], array![[1.0, 0.0], [0.0, 1.0]]),
    ];
    let but = vec![
        BlockColumn::new(vec![0, 1], vec![2], array![[2.0, 1.0]], array![[1.0, 0.0], [-0.5, 1.0]]),
        BlockColumn::uncoupled(vec![2, 3], array![[1.0, 0.0], [0.0, 1.0]]),
    ];
    let bd = vec![
        DiagonalBlock::new(array![4.0, 5.0]),
        DiagonalBlock::new(array![2.0, 3.0]),
    ];
    let factor = BlockFactorization::new(bl, bd, but);
    let scaling = Scaling::new(
        vec![1, 0, 3, 2],
        array![1.0, 2.0, 0.5, 1.0],
        array![2.0, 1.0, 1.0, 4.0],
    );

    let result = selective_inverse(&factor, &scaling).unwrap();

    let last = &result.bd_inv[1].d;
    assert_relative_eq!(last[[0, 0]], 0.5, epsilon = 1e-15);
    assert_relative_eq!(last[[1, 1]], 1.0 / 3.0, epsilon = 1e-15);
    assert_eq!(last[[0, 1]], 0.0);

    // BUTinv{0}.L = -BDinv{1}.D(1,1) * BL{0}.L, BLinv{0}.L = -BDinv{1}.D(1,1) * BUT{0}.L
    assert_relative_eq!(result.but_inv[0].l[[0, 0]], -0.25, epsilon = 1e-15);
    assert_relative_eq!(result.but_inv[0].l[[0, 1]], 0.5, epsilon = 1e-15);
    assert_relative_eq!(result.bl_inv[0].l[[0, 0]], -1.0, epsilon = 1e-15);
    assert_relative_eq!(result.bl_inv[0].l[[0, 1]], -0.5, epsilon = 1e-15);

    let m = factor.to_dense();
    assert_matches_on_pattern(&result, &dense_inverse(&m), 1e-12);

    let a_inv = dense_inverse(&scaling.unscale(&m));
    for i in 0..4 {
        assert_relative_eq!(result.d[i], a_inv[[i, i]], epsilon = 1e-12);
    }
}

#[test]
fn test_full_coupling_matches_dense_inverse() {
    let sizes = [2, 3, 1, 2, 2];
    let factor = full_coupling(&sizes);
    let result = selective_inverse(&factor, &Scaling::identity(10)).unwrap();

    let exact = dense_inverse(&factor.to_dense());
    for (x, y) in result.to_dense().iter().zip(exact.iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-10);
    }
    assert!(result.stats.total().executed() > 0);
}

#[test]
fn test_block_bidiagonal_pattern_is_exact() {
    let factor = bidiagonal();
    let perm = vec![9, 3, 0, 7, 1, 5, 2, 8, 4, 6];
    let scaling = Scaling::new(perm, Array1::ones(10), Array1::ones(10));
    let result = selective_inverse(&factor, &scaling).unwrap();

    let m = factor.to_dense();
    let exact = dense_inverse(&m);
    assert_matches_on_pattern(&result, &exact, 1e-10);

    let a_inv = dense_inverse(&scaling.unscale(&m));
    for i in 0..10 {
        assert_relative_eq!(result.d[i], a_inv[[i, i]], epsilon = 1e-10);
    }
}

#[rstest]
#[case(CostModel::AlwaysBuffer)]
#[case(CostModel::AlwaysScalar)]
#[case(CostModel::Weighted { copy_weight: 0.25 })]
#[case(CostModel::Weighted { copy_weight: 8.0 })]
fn test_cost_models_agree(#[case] model: CostModel) {
    let factor = irregular();
    let scaling = Scaling::identity(12);
    let reference = selective_inverse(&factor, &scaling).unwrap();

    let config = SelInvConfig::default().with_cost_model(model);
    let result = SelectiveInversion::with_config(config).run(&factor, &scaling).unwrap();
    assert_same_result(&reference, &result, 1e-12);
    assert_eq!(reference.stats.total().executed(), result.stats.total().executed());
}

fn assert_bitwise_equal(a: &SelectiveInverse, b: &SelectiveInverse) {
    let differing = a
        .to_dense()
        .iter()
        .zip(b.to_dense().iter())
        .filter(|(x, y)| x.to_bits() != y.to_bits())
        .count();
    assert_eq!(differing, 0, "entries of the inverse differ bitwise");
    for (x, y) in a.d.iter().zip(b.d.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[rstest]
#[case(full_coupling(&[3, 4, 2, 5, 3]))]
#[case(irregular())]
fn test_paths_are_bitwise_identical(#[case] factor: BlockFactorization) {
    let n = factor.order();
    let perm: Vec<usize> = (0..n).map(|i| (i * 5 + 2) % n).collect();
    let deltal = Array1::from_shape_fn(n, |i| 1.0 + 0.1 * i as f64);
    let deltar = Array1::from_shape_fn(n, |i| 0.5 + wave(i, 0.25));
    let scaling = Scaling::new(perm, deltal, deltar);
    let reference = selective_inverse(&factor, &scaling).unwrap();

    for model in [
        CostModel::AlwaysScalar,
        CostModel::AlwaysBuffer,
        CostModel::Weighted { copy_weight: 0.25 },
        CostModel::Weighted { copy_weight: 8.0 },
    ] {
        let config = SelInvConfig::default().with_cost_model(model);
        let result = SelectiveInversion::with_config(config).run(&factor, &scaling).unwrap();
        assert_bitwise_equal(&reference, &result);
    }
}

#[rstest]
#[case(CostModel::ElementCount)]
#[case(CostModel::AlwaysBuffer)]
#[case(CostModel::AlwaysScalar)]
fn test_interleaved_column_sets(#[case] model: CostModel) {
    // block k owns the indices k and k + 3
    let columns = vec![vec![0, 3], vec![1, 4], vec![2, 5]];
    let rows = vec![vec![1, 2, 4, 5], vec![2, 5], vec![]];
    let factor = build_with_columns(&columns, &rows, &rows);
    let scaling = Scaling::new(
        vec![4, 2, 5, 0, 3, 1],
        array![1.0, 0.5, 2.0, 1.5, 1.0, 0.25],
        array![2.0, 1.0, 0.75, 1.0, 4.0, 1.0],
    );

    let config = SelInvConfig::default().with_cost_model(model);
    let result = SelectiveInversion::with_config(config).run(&factor, &scaling).unwrap();

    let m = factor.to_dense();
    assert_matches_on_pattern(&result, &dense_inverse(&m), 1e-10);

    let a_inv = dense_inverse(&scaling.unscale(&m));
    for i in 0..6 {
        assert_relative_eq!(result.d[i], a_inv[[i, i]], epsilon = 1e-10);
    }
}

#[test]
fn test_forced_paths_show_in_statistics() {
    let factor = irregular();
    let scaling = Scaling::identity(12);

    let config = SelInvConfig::default().with_cost_model(CostModel::AlwaysScalar);
    let scalar = SelectiveInversion::with_config(config).run(&factor, &scaling).unwrap();
    let total = scalar.stats.total();
    assert_eq!(total.direct + total.buffered, 0);
    assert!(total.scalar > 0);
    assert_eq!(scalar.stats.peak_arena, 0);

    let config = SelInvConfig::default().with_cost_model(CostModel::AlwaysBuffer);
    let buffered = SelectiveInversion::with_config(config).run(&factor, &scaling).unwrap();
    let total = buffered.stats.total();
    assert_eq!(total.scalar, 0);
    assert!(total.buffered > 0);
    assert!(buffered.stats.peak_arena > 0);
}

#[rstest]
#[case(full_coupling(&[2, 3, 1, 2]))]
#[case(bidiagonal())]
fn test_diagonal_correction_forms_agree(#[case] factor: BlockFactorization) {
    let scaling = Scaling::identity(factor.order());
    let upper = selective_inverse(&factor, &scaling).unwrap();

    let config = SelInvConfig::default().with_diagonal_correction(DiagonalCorrection::LowerFactor);
    let lower = SelectiveInversion::with_config(config).run(&factor, &scaling).unwrap();
    assert_same_result(&upper, &lower, 1e-10);
}

#[test]
fn test_singular_block_aborts() {
    let mut factor = full_coupling(&[2, 2, 2]);
    factor.bd[1] = DiagonalBlock::new(array![1.5, 0.0]);
    let err = selective_inverse(&factor, &Scaling::identity(6)).unwrap_err();
    assert_eq!(err, SelInvError::SingularBlock { block: 1, index: 1 });
}

#[test]
fn test_backward_coupling_is_invalid_input() {
    let mut factor = full_coupling(&[2, 2]);
    factor.but[1].i = vec![1];
    factor.but[1].l = Array2::zeros((1, 2));
    let err = selective_inverse(&factor, &Scaling::identity(4)).unwrap_err();
    assert!(matches!(
        err,
        SelInvError::InvalidInput(FactorError::BackwardCoupling { block: 1, owner: 0, .. })
    ));
}

#[test]
fn test_overlapping_blocks_are_reported_when_checked() {
    let mut factor = full_coupling(&[2, 2]);
    factor.bl[1].j = vec![1, 2];
    factor.but[1].j = vec![1, 2];

    let config = SelInvConfig::default().with_partition_check(true);
    let err = SelectiveInversion::with_config(config)
        .run(&factor, &Scaling::identity(4))
        .unwrap_err();
    assert_eq!(
        err,
        SelInvError::InvalidInput(FactorError::OverlappingBlocks {
            index: 1,
            first: 0,
            second: 1
        })
    );
}

#[test]
fn test_invalid_permutation() {
    let factor = full_coupling(&[1, 2]);
    let scaling = Scaling::new(vec![0, 0, 2], Array1::ones(3), Array1::ones(3));
    let err = selective_inverse(&factor, &scaling).unwrap_err();
    assert_eq!(
        err,
        SelInvError::InvalidInput(FactorError::InvalidPermutation { position: 1, value: 0 })
    );
}
