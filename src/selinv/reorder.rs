/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Back-permutation and rescaling of the inverse diagonal

use crate::factor::Scaling;
use ndarray::Array1;
use rayon::prelude::*;

/// Inverse of a permutation, `inverse[perm[i]] = i`
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p] = i;
    }
    inverse
}

/// Map the diagonal of the permuted, scaled inverse back to `diag(A^-1)`
///
/// `D[i] = Deltar[i] * diagonal[invperm[i]] * Deltal[i]`. The pass runs in
/// parallel once the order reaches `parallel_threshold`.
///
/// # Arguments
///
/// * `diagonal` - Diagonal of `(P^T Deltal A Deltar P)^-1` in block order
/// * `scaling` - Validated permutation and scalings
/// * `parallel_threshold` - Minimum order for the parallel pass
pub fn reorder_diagonal(
    diagonal: &[f64],
    scaling: &Scaling,
    parallel_threshold: usize,
) -> Array1<f64> {
    let invperm = inverse_permutation(&scaling.perm);
    let entry = |i: usize| scaling.deltar[i] * diagonal[invperm[i]] * scaling.deltal[i];

    let n = diagonal.len();
    if n >= parallel_threshold {
        let values: Vec<f64> = (0..n).into_par_iter().map(entry).collect();
        Array1::from_vec(values)
    } else {
        Array1::from_shape_fn(n, entry)
    }
}
