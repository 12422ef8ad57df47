/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Assembly and inversion of the local diagonal block `BL{k}.D * BD{k} * BUT{k}.D^T`

use super::errors::{Result, SelInvError, Stage};
use crate::dense::invert_from_lu;
use crate::factor::{BlockColumn, DiagonalBlock};
use ndarray::Array2;

/// Pack the local block as an unpivoted LU decomposition
///
/// The strict lower triangle is taken from `BL{k}.D`, the upper triangle is
/// `diag(BD{k}) * BUT{k}.D^T`, so that `L * U` is the local diagonal block.
pub fn assemble_local_lu(bl: &BlockColumn, bd: &DiagonalBlock, but: &BlockColumn) -> Array2<f64> {
    let n = bl.size();
    let d = bd.diagonal();
    let mut lu = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        lu[[j, j]] = d[j];
        for i in (j + 1)..n {
            lu[[j, i]] = d[j] * but.d[[i, j]];
            lu[[i, j]] = bl.d[[i, j]];
        }
    }
    lu
}

/// Invert the local diagonal block of block column `block`
pub fn invert_local_block(
    block: usize,
    bl: &BlockColumn,
    bd: &DiagonalBlock,
    but: &BlockColumn,
) -> Result<Array2<f64>> {
    let mut lu = assemble_local_lu(bl, bd, but);
    invert_from_lu(&mut lu)
        .map_err(|err| SelInvError::from_dense(block, Stage::DiagonalInverse, err))?;
    Ok(lu)
}

/// The dense local block itself, `BL{k}.D * diag(BD{k}) * BUT{k}.D^T`
pub fn local_block(bl: &BlockColumn, bd: &DiagonalBlock, but: &BlockColumn) -> Array2<f64> {
    let lu = assemble_local_lu(bl, bd, but);
    let n = lu.nrows();
    let lower = Array2::from_shape_fn((n, n), |(i, j)| match i.cmp(&j) {
        std::cmp::Ordering::Greater => lu[[i, j]],
        std::cmp::Ordering::Equal => 1.0,
        std::cmp::Ordering::Less => 0.0,
    });
    let upper = Array2::from_shape_fn((n, n), |(i, j)| if i <= j { lu[[i, j]] } else { 0.0 });
    lower.dot(&upper)
}
