/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Serialized form of the factorization and of the selective inverse
//!
//! Index sets are 1-based in files and 0-based in memory. Dense matrices are
//! stored as arrays of rows, the diagonal factors BD{k} as sparse triplets.

use super::errors::{InputError, Result};
use crate::factor::{
    BlockColumn, BlockFactorization, DiagonalBlock, FactorError, InverseBlockColumn, Scaling,
};
use crate::selinv::{SelInvStats, SelectiveInverse};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// One block column of BL or BUT as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockColumnRecord {
    #[serde(rename = "J")]
    pub j: Vec<usize>,
    #[serde(rename = "I", default)]
    pub i: Vec<usize>,
    #[serde(rename = "L", default)]
    pub l: Vec<Vec<f64>>,
    #[serde(rename = "D")]
    pub d: Vec<Vec<f64>>,
}

/// Sparse triplets of a diagonal factor BD{k}, 1-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagonalRecord {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<f64>,
}

/// A complete factorization file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorizationRecord {
    #[serde(rename = "BL")]
    pub bl: Vec<BlockColumnRecord>,
    #[serde(rename = "BD")]
    pub bd: Vec<DiagonalRecord>,
    #[serde(rename = "BUT")]
    pub but: Vec<BlockColumnRecord>,
    pub perm: Vec<usize>,
    #[serde(rename = "Deltal")]
    pub deltal: Vec<f64>,
    #[serde(rename = "Deltar")]
    pub deltar: Vec<f64>,
}

impl FactorizationRecord {
    /// Convert to the 0-based in-memory model
    ///
    /// Only the conversion itself is checked here; structural validation is
    /// left to [`BlockFactorization::validate`].
    pub fn into_model(self) -> Result<(BlockFactorization, Scaling)> {
        if self.bd.len() != self.bl.len() || self.but.len() != self.bl.len() {
            return Err(FactorError::BlockCountMismatch {
                bl: self.bl.len(),
                bd: self.bd.len(),
                but: self.but.len(),
            }
            .into());
        }

        let mut bl = Vec::with_capacity(self.bl.len());
        let mut bd = Vec::with_capacity(self.bd.len());
        let mut but = Vec::with_capacity(self.but.len());
        let records = self.bl.into_iter().zip(self.bd).zip(self.but);
        for (k, ((bl_record, bd_record), but_record)) in records.enumerate() {
            let size = bl_record.j.len();
            bl.push(block_column(k, "BL", bl_record)?);
            but.push(block_column(k, "BUT", but_record)?);
            let field = format!("BD{{{}}}.D", k + 1);
            let rows = zero_based(&field, &bd_record.rows)?;
            let cols = zero_based(&field, &bd_record.cols)?;
            bd.push(DiagonalBlock::from_triplets(k, size, &rows, &cols, &bd_record.values)?);
        }

        let scaling = Scaling::new(
            zero_based("perm", &self.perm)?,
            Array1::from_vec(self.deltal),
            Array1::from_vec(self.deltar),
        );
        Ok((BlockFactorization::new(bl, bd, but), scaling))
    }

    /// Convert an in-memory factorization back to its file form
    pub fn from_model(factor: &BlockFactorization, scaling: &Scaling) -> Self {
        let bd = factor
            .bd
            .iter()
            .map(|block| {
                let n = block.size();
                DiagonalRecord {
                    rows: (1..=n).collect(),
                    cols: (1..=n).collect(),
                    values: block.diagonal().to_vec(),
                }
            })
            .collect();
        Self {
            bl: factor.bl.iter().map(block_record).collect(),
            bd,
            but: factor.but.iter().map(block_record).collect(),
            perm: one_based(&scaling.perm),
            deltal: scaling.deltal.to_vec(),
            deltar: scaling.deltar.to_vec(),
        }
    }
}

/// One block of BLinv or BUTinv in an output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseBlockRecord {
    #[serde(rename = "J")]
    pub j: Vec<usize>,
    #[serde(rename = "I")]
    pub i: Vec<usize>,
    #[serde(rename = "L")]
    pub l: Vec<Vec<f64>>,
}

/// One block of BDinv in an output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseDiagonalRecord {
    #[serde(rename = "J")]
    pub j: Vec<usize>,
    #[serde(rename = "D")]
    pub d: Vec<Vec<f64>>,
}

/// Output file of a selective inversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectiveInverseRecord {
    #[serde(rename = "D")]
    pub d: Vec<f64>,
    #[serde(rename = "BLinv", default, skip_serializing_if = "Option::is_none")]
    pub bl_inv: Option<Vec<InverseBlockRecord>>,
    #[serde(rename = "BDinv", default, skip_serializing_if = "Option::is_none")]
    pub bd_inv: Option<Vec<InverseDiagonalRecord>>,
    #[serde(rename = "BUTinv", default, skip_serializing_if = "Option::is_none")]
    pub but_inv: Option<Vec<InverseBlockRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<SelInvStats>,
}

impl SelectiveInverseRecord {
    /// Build the output record
    ///
    /// # Arguments
    ///
    /// * `inverse` - Result of the selective inversion
    /// * `diagonal_only` - Omit the inverse blocks and keep only `D`
    /// * `with_stats` - Include the execution statistics
    pub fn from_inverse(inverse: &SelectiveInverse, diagonal_only: bool, with_stats: bool) -> Self {
        let blocks = |columns: &[InverseBlockColumn]| {
            columns
                .iter()
                .map(|block| InverseBlockRecord {
                    j: one_based(&block.j),
                    i: one_based(&block.i),
                    l: matrix_rows(&block.l),
                })
                .collect::<Vec<_>>()
        };

        let (bl_inv, bd_inv, but_inv) = if diagonal_only {
            (None, None, None)
        } else {
            let bd_inv = inverse
                .bd_inv
                .iter()
                .map(|block| InverseDiagonalRecord {
                    j: one_based(&block.j),
                    d: matrix_rows(&block.d),
                })
                .collect();
            (Some(blocks(&inverse.bl_inv)), Some(bd_inv), Some(blocks(&inverse.but_inv)))
        };

        Self {
            d: inverse.d.to_vec(),
            bl_inv,
            bd_inv,
            but_inv,
            stats: with_stats.then(|| inverse.stats.clone()),
        }
    }
}

fn block_column(k: usize, name: &str, record: BlockColumnRecord) -> Result<BlockColumn> {
    let size = record.j.len();
    let j = zero_based(&format!("{}{{{}}}.J", name, k + 1), &record.j)?;
    let i = zero_based(&format!("{}{{{}}}.I", name, k + 1), &record.i)?;
    let l = dense_matrix(&format!("{}{{{}}}.L", name, k + 1), record.l, size)?;
    let d = dense_matrix(&format!("{}{{{}}}.D", name, k + 1), record.d, size)?;
    Ok(BlockColumn::new(j, i, l, d))
}

fn block_record(block: &BlockColumn) -> BlockColumnRecord {
    BlockColumnRecord {
        j: one_based(&block.j),
        i: one_based(&block.i),
        l: matrix_rows(&block.l),
        d: matrix_rows(&block.d),
    }
}

fn zero_based(field: &str, indices: &[usize]) -> Result<Vec<usize>> {
    indices
        .iter()
        .map(|&idx| idx.checked_sub(1).ok_or_else(|| InputError::ZeroIndex(field.to_string())))
        .collect()
}

fn one_based(indices: &[usize]) -> Vec<usize> {
    indices.iter().map(|idx| idx + 1).collect()
}

// rows of equal length `ncols`; no rows gives a 0 x ncols matrix
fn dense_matrix(field: &str, rows: Vec<Vec<f64>>, ncols: usize) -> Result<Array2<f64>> {
    let nrows = rows.len();
    let mut values = Vec::with_capacity(nrows * ncols);
    for (row, entries) in rows.into_iter().enumerate() {
        if entries.len() != ncols {
            return Err(InputError::RaggedMatrix {
                field: field.to_string(),
                row: row + 1,
                expected: ncols,
                actual: entries.len(),
            });
        }
        values.extend(entries);
    }
    Ok(Array2::from_shape_vec((nrows, ncols), values)?)
}

fn matrix_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}
