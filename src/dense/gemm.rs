/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! General matrix multiply on strided views
//!
//! Operands are `ndarray` views over the block storage and are read in place,
//! so sub-views with arbitrary strides are multiplied without copying. Every
//! entry of the product is reduced in the same order, a left-to-right sum
//! over the inner dimension starting from zero, whatever the strides are.
//! Gathered copies and strided views of the same operands therefore give
//! bitwise identical results.

use super::errors::{DenseError, Result};
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut2};

/// Transpose flag of a GEMM operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Use the operand as stored
    NoTrans,
    /// Use the transpose of the operand
    Trans,
}

impl Op {
    /// View of the operand as it enters the product
    pub fn apply<'a>(self, view: ArrayView2<'a, f64>) -> ArrayView2<'a, f64> {
        match self {
            Op::NoTrans => view,
            Op::Trans => view.reversed_axes(),
        }
    }
}

/// How the product is combined with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beta {
    /// `C = alpha * op(A) * op(B)`
    Replace,
    /// `C = C + alpha * op(A) * op(B)`
    Accumulate,
}

/// Inner product `sum_p a[p] * b[p]`, accumulated from zero in index order
///
/// This is the reduction every update path of the selective inversion uses.
#[inline]
pub fn ordered_dot<'a, I>(terms: I) -> f64
where
    I: IntoIterator<Item = (&'a f64, &'a f64)>,
{
    terms.into_iter().fold(0.0, |acc, (a, b)| acc + a * b)
}

/// Compute `C = alpha * op(A) * op(B) (+ C)`
///
/// # Arguments
///
/// * `dst` - Destination view `C`
/// * `beta` - Whether to overwrite or accumulate into `C`
/// * `alpha` - Scale of the product
/// * `lhs`, `lhs_op` - Left operand and its transpose flag
/// * `rhs`, `rhs_op` - Right operand and its transpose flag
pub fn gemm(
    mut dst: ArrayViewMut2<'_, f64>,
    beta: Beta,
    alpha: f64,
    lhs: ArrayView2<'_, f64>,
    lhs_op: Op,
    rhs: ArrayView2<'_, f64>,
    rhs_op: Op,
) -> Result<()> {
    let lhs = lhs_op.apply(lhs);
    let rhs = rhs_op.apply(rhs);

    let (m, k) = lhs.dim();
    let (k2, n) = rhs.dim();
    if k != k2 {
        return Err(DenseError::DimensionMismatch(format!(
            "op(A) is {}x{} but op(B) is {}x{}",
            m, k, k2, n
        )));
    }
    if dst.dim() != (m, n) {
        return Err(DenseError::DimensionMismatch(format!(
            "C is {}x{} but op(A) * op(B) is {}x{}",
            dst.nrows(),
            dst.ncols(),
            m,
            n
        )));
    }

    let columns: Vec<ArrayView1<'_, f64>> = rhs.columns().into_iter().collect();
    for (lhs_row, mut dst_row) in lhs.rows().into_iter().zip(dst.rows_mut()) {
        for (target, column) in dst_row.iter_mut().zip(&columns) {
            let product = alpha * ordered_dot(lhs_row.iter().zip(column.iter()));
            match beta {
                Beta::Replace => *target = product,
                Beta::Accumulate => *target += product,
            }
        }
    }

    Ok(())
}
