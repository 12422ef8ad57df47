/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Matrix inversion from a packed, unpivoted LU decomposition

use super::errors::{DenseError, Result};
use faer::linalg::matmul::matmul;
use faer::linalg::triangular_inverse::{invert_unit_lower_triangular, invert_upper_triangular};
use faer::{Accum, Mat, Par};
use faer_ext::IntoFaer;
use ndarray::Array2;

/// Overwrite a packed LU decomposition with the inverse of `L * U`
///
/// The strict lower triangle of `lu` holds the unit lower triangular factor
/// `L`, the upper triangle including the diagonal holds `U`. No pivoting is
/// applied, i.e. the row permutation is the identity.
///
/// # Errors
///
/// * [`DenseError::IllegalArgument`] if `lu` is not square
/// * [`DenseError::Singular`] if `U` has an exactly zero diagonal entry; `lu`
///   is left untouched in that case
pub fn invert_from_lu(lu: &mut Array2<f64>) -> Result<()> {
    let (n, ncols) = lu.dim();
    if n != ncols {
        return Err(DenseError::IllegalArgument {
            argument: 1,
            reason: format!("expected a square matrix, got {}x{}", n, ncols),
        });
    }
    if let Some(index) = (0..n).find(|&j| lu[[j, j]] == 0.0) {
        return Err(DenseError::Singular { index });
    }
    if n == 0 {
        return Ok(());
    }

    let packed = lu.view().into_faer();

    // only the upper triangle of `packed` is read
    let mut u_inv = Mat::<f64>::zeros(n, n);
    invert_upper_triangular(u_inv.as_mut(), packed, Par::Seq);

    // strict lower triangle, unit diagonal implied
    let mut l_inv = Mat::<f64>::zeros(n, n);
    invert_unit_lower_triangular(l_inv.as_mut(), packed, Par::Seq);
    for j in 0..n {
        l_inv[(j, j)] = 1.0;
    }

    // inv(L U) = inv(U) inv(L)
    let mut inverse = Mat::<f64>::zeros(n, n);
    matmul(
        inverse.as_mut(),
        Accum::Replace,
        u_inv.as_ref(),
        l_inv.as_ref(),
        1.0,
        Par::Seq,
    );

    for i in 0..n {
        for j in 0..n {
            lu[[i, j]] = inverse[(i, j)];
        }
    }

    Ok(())
}
