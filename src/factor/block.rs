/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Block column records of the factorization and of its selective inverse

use super::errors::{FactorError, Result};
use ndarray::{Array1, Array2};

/// One block column of BL or BUT
///
/// `j` lists the global columns of the block, `i` the global rows of later
/// blocks the column couples to. `l` is the dense `|i| x |j|` off-diagonal
/// part, `d` the dense `|j| x |j|` unit lower triangular diagonal factor of
/// which only the strict lower triangle is read.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockColumn {
    /// Ascending global column indices
    pub j: Vec<usize>,
    /// Ascending global row indices of later blocks
    pub i: Vec<usize>,
    /// Off-diagonal entries, `|i| x |j|`
    pub l: Array2<f64>,
    /// Unit lower triangular diagonal factor, `|j| x |j|`
    pub d: Array2<f64>,
}

impl BlockColumn {
    /// Create a block column from its four fields
    pub fn new(j: Vec<usize>, i: Vec<usize>, l: Array2<f64>, d: Array2<f64>) -> Self {
        Self { j, i, l, d }
    }

    /// Create a block column without off-diagonal coupling
    pub fn uncoupled(j: Vec<usize>, d: Array2<f64>) -> Self {
        let n = j.len();
        Self {
            j,
            i: Vec::new(),
            l: Array2::zeros((0, n)),
            d,
        }
    }

    /// Number of columns of the block
    pub fn size(&self) -> usize {
        self.j.len()
    }

    /// Number of coupled rows
    pub fn coupling(&self) -> usize {
        self.i.len()
    }

    /// The diagonal factor with its strict lower triangle and an explicit
    /// unit diagonal
    pub fn unit_lower(&self) -> Array2<f64> {
        let n = self.size();
        Array2::from_shape_fn((n, n), |(r, c)| match r.cmp(&c) {
            std::cmp::Ordering::Greater => self.d[[r, c]],
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        })
    }
}

/// Diagonal factor BD{k}: a sparse square matrix with diagonal entries only
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalBlock {
    diagonal: Array1<f64>,
}

impl DiagonalBlock {
    /// Create a diagonal block from its diagonal entries
    pub fn new(diagonal: Array1<f64>) -> Self {
        Self { diagonal }
    }

    /// Assemble a diagonal block from sparse triplets
    ///
    /// Repeated entries are summed. Explicitly stored zeros off the diagonal
    /// are tolerated, any other off-diagonal entry is rejected.
    ///
    /// # Arguments
    ///
    /// * `block` - Block number used in error reports
    /// * `size` - Order of the block
    /// * `rows`, `cols`, `values` - 0-based triplets
    pub fn from_triplets(
        block: usize,
        size: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
    ) -> Result<Self> {
        if cols.len() != rows.len() {
            return Err(FactorError::VectorLength {
                name: "BD.D column indices",
                expected: rows.len(),
                actual: cols.len(),
            });
        }
        if values.len() != rows.len() {
            return Err(FactorError::VectorLength {
                name: "BD.D values",
                expected: rows.len(),
                actual: values.len(),
            });
        }

        let mut diagonal = Array1::zeros(size);
        for ((&row, &col), &value) in rows.iter().zip(cols).zip(values) {
            if row >= size || col >= size {
                return Err(FactorError::IndexOutOfRange {
                    block,
                    field: "BD.D",
                    index: row.max(col),
                    n: size,
                });
            }
            if row != col {
                if value != 0.0 {
                    return Err(FactorError::OffDiagonalEntry { block, row, col });
                }
                continue;
            }
            diagonal[row] += value;
        }

        Ok(Self { diagonal })
    }

    /// Order of the block
    pub fn size(&self) -> usize {
        self.diagonal.len()
    }

    /// The diagonal entries
    pub fn diagonal(&self) -> &Array1<f64> {
        &self.diagonal
    }
}

/// One block column of BLinv or BUTinv
#[derive(Debug, Clone, PartialEq)]
pub struct InverseBlockColumn {
    /// Global column indices, copied from the factor
    pub j: Vec<usize>,
    /// Global row indices, copied from the factor
    pub i: Vec<usize>,
    /// Block of the approximate inverse, `|i| x |j|`
    pub l: Array2<f64>,
}

/// One block of BDinv: the dense inverse of the diagonal super-block
#[derive(Debug, Clone, PartialEq)]
pub struct InverseDiagonalBlock {
    /// Global indices of the block
    pub j: Vec<usize>,
    /// Dense `|j| x |j|` block of the approximate inverse
    pub d: Array2<f64>,
}
