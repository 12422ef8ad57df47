/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Block factorization `BL * BD * BUT^T` together with its permutation and
//! scalings, and the boundary checks run before any inversion starts

use super::block::{BlockColumn, DiagonalBlock};
use super::errors::{FactorError, Result};
use crate::index::BlockOwnership;
use ndarray::{s, Array1, Array2, Axis};

/// The three block factors of `P^T Deltal A Deltar P ~ BL * BD * BUT^T`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFactorization {
    /// Block lower triangular factor
    pub bl: Vec<BlockColumn>,
    /// Block diagonal factor
    pub bd: Vec<DiagonalBlock>,
    /// Block upper triangular factor, stored transposed
    pub but: Vec<BlockColumn>,
}

impl BlockFactorization {
    /// Bundle the three factors
    pub fn new(bl: Vec<BlockColumn>, bd: Vec<DiagonalBlock>, but: Vec<BlockColumn>) -> Self {
        Self { bl, bd, but }
    }

    /// Number of block columns
    pub fn nblocks(&self) -> usize {
        self.bl.len()
    }

    /// Order of the factored matrix, the sum of all block sizes
    pub fn order(&self) -> usize {
        self.bl.iter().map(BlockColumn::size).sum()
    }

    /// Check the structural invariants of the factorization
    ///
    /// Verifies block counts, identical column sets in BL and BUT, square
    /// diagonal factors, `L` shapes, strictly increasing index sets, row
    /// indices in range and coupling to later blocks only. With
    /// `check_partition` the column sets must also partition `0..n` exactly.
    ///
    /// # Returns
    ///
    /// The ownership map of the global indices
    pub fn validate(&self, check_partition: bool) -> Result<BlockOwnership> {
        let nblocks = self.nblocks();
        if self.bd.len() != nblocks || self.but.len() != nblocks {
            return Err(FactorError::BlockCountMismatch {
                bl: nblocks,
                bd: self.bd.len(),
                but: self.but.len(),
            });
        }

        let n = self.order();
        for (k, ((bl, bd), but)) in self.bl.iter().zip(&self.bd).zip(&self.but).enumerate() {
            if bl.j != but.j {
                return Err(FactorError::ColumnSetMismatch { block: k });
            }
            let size = bl.size();
            check_increasing(k, "BL.J", &bl.j)?;
            check_increasing(k, "BL.I", &bl.i)?;
            check_increasing(k, "BUT.I", &but.i)?;
            check_shape(k, "BL.D", bl.d.dim(), (size, size))?;
            check_shape(k, "BUT.D", but.d.dim(), (size, size))?;
            check_shape(k, "BD.D", (bd.size(), bd.size()), (size, size))?;
            check_shape(k, "BL.L", bl.l.dim(), (bl.coupling(), size))?;
            check_shape(k, "BUT.L", but.l.dim(), (but.coupling(), size))?;
            check_range(k, "BL.J", &bl.j, n)?;
            check_range(k, "BL.I", &bl.i, n)?;
            check_range(k, "BUT.I", &but.i, n)?;
        }

        let columns = self.bl.iter().map(|block| block.j.as_slice());
        let ownership = if check_partition {
            BlockOwnership::build_checked(n, columns)?
        } else {
            BlockOwnership::build(n, columns)
        };

        for (k, (bl, but)) in self.bl.iter().zip(&self.but).enumerate() {
            check_forward(k, "BL.I", &bl.i, &ownership)?;
            check_forward(k, "BUT.I", &but.i, &ownership)?;
        }

        Ok(ownership)
    }

    /// Reconstruct the dense factored matrix `M = L D U^T`
    ///
    /// `L` and `U` are the unit block triangular matrices carrying the
    /// off-diagonal blocks of BL and BUT, `D` is block diagonal with blocks
    /// `BL{k}.D * diag(BD{k}) * BUT{k}.D^T`. Intended for verification of
    /// small systems.
    pub fn to_dense(&self) -> Array2<f64> {
        let n = self.order();
        let mut lower = Array2::<f64>::eye(n);
        let mut upper = Array2::<f64>::eye(n);
        let mut diagonal = Array2::<f64>::zeros((n, n));

        for ((bl, bd), but) in self.bl.iter().zip(&self.bd).zip(&self.but) {
            scatter_block(&mut lower, bl);
            scatter_block(&mut upper, but);

            let scaled = &bl.unit_lower() * &bd.diagonal().view().insert_axis(Axis(0));
            let local = scaled.dot(&but.unit_lower().t());
            for (p, &row) in bl.j.iter().enumerate() {
                for (q, &col) in bl.j.iter().enumerate() {
                    diagonal[[row, col]] = local[[p, q]];
                }
            }
        }

        lower.dot(&diagonal).dot(&upper.t())
    }
}

fn scatter_block(target: &mut Array2<f64>, block: &BlockColumn) {
    for (p, &row) in block.i.iter().enumerate() {
        for (q, &col) in block.j.iter().enumerate() {
            target[[row, col]] = block.l[[p, q]];
        }
    }
}

fn check_increasing(block: usize, field: &'static str, indices: &[usize]) -> Result<()> {
    match indices.windows(2).position(|pair| pair[0] >= pair[1]) {
        Some(position) => Err(FactorError::NotIncreasing {
            block,
            field,
            position: position + 1,
        }),
        None => Ok(()),
    }
}

fn check_shape(
    block: usize,
    field: &'static str,
    (rows, cols): (usize, usize),
    (expected_rows, expected_cols): (usize, usize),
) -> Result<()> {
    if (rows, cols) != (expected_rows, expected_cols) {
        return Err(FactorError::ShapeMismatch {
            block,
            field,
            rows,
            cols,
            expected_rows,
            expected_cols,
        });
    }
    Ok(())
}

fn check_range(block: usize, field: &'static str, indices: &[usize], n: usize) -> Result<()> {
    // ascending, so the last entry is the largest
    match indices.last() {
        Some(&index) if index >= n => Err(FactorError::IndexOutOfRange { block, field, index, n }),
        _ => Ok(()),
    }
}

fn check_forward(
    block: usize,
    field: &'static str,
    indices: &[usize],
    ownership: &BlockOwnership,
) -> Result<()> {
    for &index in indices {
        let owner = ownership.owner(index);
        if owner <= block {
            return Err(FactorError::BackwardCoupling {
                block,
                field,
                index,
                owner,
            });
        }
    }
    Ok(())
}

/// Symmetric permutation and row/column scalings applied before factoring
#[derive(Debug, Clone, PartialEq)]
pub struct Scaling {
    /// 0-based permutation `P`
    pub perm: Vec<usize>,
    /// Left diagonal scaling `Deltal`
    pub deltal: Array1<f64>,
    /// Right diagonal scaling `Deltar`
    pub deltar: Array1<f64>,
}

impl Scaling {
    /// Bundle a permutation and both scalings
    pub fn new(perm: Vec<usize>, deltal: Array1<f64>, deltar: Array1<f64>) -> Self {
        Self { perm, deltal, deltar }
    }

    /// Identity permutation without scaling
    pub fn identity(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
            deltal: Array1::ones(n),
            deltar: Array1::ones(n),
        }
    }

    /// Check lengths against the order `n` and that `perm` is a bijection
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.perm.len() != n {
            return Err(FactorError::OrderMismatch {
                expected: n,
                actual: self.perm.len(),
            });
        }
        if self.deltal.len() != n {
            return Err(FactorError::VectorLength {
                name: "Deltal",
                expected: n,
                actual: self.deltal.len(),
            });
        }
        if self.deltar.len() != n {
            return Err(FactorError::VectorLength {
                name: "Deltar",
                expected: n,
                actual: self.deltar.len(),
            });
        }

        let mut seen = vec![false; n];
        for (position, &value) in self.perm.iter().enumerate() {
            match seen.get_mut(value) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(FactorError::InvalidPermutation { position, value }),
            }
        }
        Ok(())
    }

    /// The dense matrix `A` with `P^T Deltal A Deltar P = m`
    pub fn unscale(&self, m: &Array2<f64>) -> Array2<f64> {
        let n = self.perm.len();
        let mut a = Array2::<f64>::zeros((n, n));
        for r in 0..n {
            for c in 0..n {
                a[[self.perm[r], self.perm[c]]] = m[[r, c]];
            }
        }
        for r in 0..n {
            let mut row = a.slice_mut(s![r, ..]);
            row /= self.deltal[r];
            for c in 0..n {
                row[c] /= self.deltar[c];
            }
        }
        a
    }
}
