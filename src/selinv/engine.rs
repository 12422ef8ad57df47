/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Backward block recursion computing the selective inverse
//!
//! Block columns are processed from the last to the first. Block `k` reads
//! the already finished inverse blocks of every later block `i > k` that its
//! row sets couple to, and is itself never modified once finished.

use super::config::{CostModel, DiagonalCorrection, SelInvConfig};
use super::diagonal::invert_local_block;
use super::errors::{Result, SelInvError, Stage};
use super::reorder::reorder_diagonal;
use super::stats::SelInvStats;
use super::update::{PairedAxis, Update};
use crate::dense::{gemm, Beta, GemmArena, Op};
use crate::factor::{BlockFactorization, InverseBlockColumn, InverseDiagonalBlock, Scaling};
use crate::index::{donor_runs, BlockOwnership};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayViewMut2};
use std::collections::VecDeque;

/// Block-structured approximation of `(P^T Deltal A Deltar P)^-1` and the
/// diagonal of `A^-1`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectiveInverse {
    /// Approximation of `diag(A^-1)` in the original ordering and scaling
    pub d: Array1<f64>,
    /// Transposed strict upper block part of the inverse
    pub bl_inv: Vec<InverseBlockColumn>,
    /// Diagonal blocks of the inverse
    pub bd_inv: Vec<InverseDiagonalBlock>,
    /// Strict lower block part of the inverse
    pub but_inv: Vec<InverseBlockColumn>,
    /// Execution statistics
    pub stats: SelInvStats,
}

impl SelectiveInverse {
    /// Assemble `BUTinv + BDinv + BLinv^T` as a dense matrix
    ///
    /// Entries outside the stored pattern are zero.
    pub fn to_dense(&self) -> Array2<f64> {
        let n = self.bd_inv.iter().map(|block| block.j.len()).sum();
        let mut x = Array2::<f64>::zeros((n, n));
        for block in &self.bd_inv {
            for (p, &row) in block.j.iter().enumerate() {
                for (q, &col) in block.j.iter().enumerate() {
                    x[[row, col]] = block.d[[p, q]];
                }
            }
        }
        for block in &self.but_inv {
            for (p, &row) in block.i.iter().enumerate() {
                for (q, &col) in block.j.iter().enumerate() {
                    x[[row, col]] = block.l[[p, q]];
                }
            }
        }
        for block in &self.bl_inv {
            for (p, &col) in block.i.iter().enumerate() {
                for (q, &row) in block.j.iter().enumerate() {
                    x[[row, col]] = block.l[[p, q]];
                }
            }
        }
        x
    }
}

// inverse blocks of one finished block column
struct FinishedBlock {
    bl_inv: InverseBlockColumn,
    bd_inv: InverseDiagonalBlock,
    but_inv: InverseBlockColumn,
}

// scratch owned by one inversion
struct Workspace {
    arena: GemmArena,
    stats: SelInvStats,
    model: CostModel,
}

impl Workspace {
    fn contribute(
        &mut self,
        kind: u8,
        block: usize,
        update: Update<'_>,
        dst: ArrayViewMut2<'_, f64>,
    ) -> Result<()> {
        let path = update
            .apply(dst, &mut self.arena, self.model)
            .map_err(|err| SelInvError::from_dense(block, Stage::Contribution(kind), err))?;
        self.stats.record(kind, path);
        Ok(())
    }
}

/// Selective block inversion driver
#[derive(Debug, Clone, Default)]
pub struct SelectiveInversion {
    config: SelInvConfig,
}

impl SelectiveInversion {
    /// Create a driver with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver with a custom configuration
    pub fn with_config(config: SelInvConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &SelInvConfig {
        &self.config
    }

    /// Compute the selective inverse of a block factorization
    ///
    /// # Arguments
    ///
    /// * `factor` - Block factorization `BL * BD * BUT^T`
    /// * `scaling` - Permutation and scalings that produced the factored matrix
    ///
    /// # Returns
    ///
    /// The inverse blocks and the reordered, rescaled inverse diagonal
    ///
    /// # Errors
    ///
    /// * [`SelInvError::InvalidInput`] if the input is malformed; nothing is
    ///   computed in that case
    /// * [`SelInvError::SingularBlock`] if a local diagonal block is singular
    /// * [`SelInvError::IllegalArgument`] if a dense kernel rejects its operands
    pub fn run(&self, factor: &BlockFactorization, scaling: &Scaling) -> Result<SelectiveInverse> {
        let ownership = factor.validate(self.config.check_partition)?;
        let n = factor.order();
        scaling.validate(n)?;

        let nblocks = factor.nblocks();
        info!("Selective inversion of {} block columns, n = {}", nblocks, n);

        let mut workspace = Workspace {
            arena: GemmArena::default(),
            stats: SelInvStats::default(),
            model: self.config.cost_model,
        };
        let mut finished: VecDeque<FinishedBlock> = VecDeque::with_capacity(nblocks);
        let mut dbuff = vec![0.0; n];

        for k in (0..nblocks).rev() {
            let block = self.invert_block(factor, &ownership, k, &finished, &mut workspace)?;
            for (p, &idx) in block.bd_inv.j.iter().enumerate() {
                dbuff[idx] = block.bd_inv.d[[p, p]];
            }
            finished.push_front(block);
        }

        workspace.stats.blocks = nblocks;
        workspace.stats.peak_arena = workspace.arena.len();
        let total = workspace.stats.total();
        info!(
            "Selective inversion done: {} direct, {} buffered, {} scalar updates, arena of {}",
            total.direct,
            total.buffered,
            total.scalar,
            workspace.stats.peak_arena
        );

        let d = reorder_diagonal(&dbuff, scaling, self.config.parallel_threshold);

        let mut bl_inv = Vec::with_capacity(nblocks);
        let mut bd_inv = Vec::with_capacity(nblocks);
        let mut but_inv = Vec::with_capacity(nblocks);
        for block in finished {
            bl_inv.push(block.bl_inv);
            bd_inv.push(block.bd_inv);
            but_inv.push(block.but_inv);
        }

        Ok(SelectiveInverse {
            d,
            bl_inv,
            bd_inv,
            but_inv,
            stats: workspace.stats,
        })
    }

    // `finished[i - k - 1]` holds the inverse blocks of block column i > k
    fn invert_block(
        &self,
        factor: &BlockFactorization,
        ownership: &BlockOwnership,
        k: usize,
        finished: &VecDeque<FinishedBlock>,
        workspace: &mut Workspace,
    ) -> Result<FinishedBlock> {
        let bl = &factor.bl[k];
        let bd = &factor.bd[k];
        let but = &factor.but[k];
        let size = bl.size();
        debug!(
            "Block {}: {} columns, |BL.I| = {}, |BUT.I| = {}",
            k,
            size,
            bl.coupling(),
            but.coupling()
        );

        let mut but_inv_l = Array2::<f64>::zeros((but.coupling(), size));
        let mut bl_inv_l = Array2::<f64>::zeros((bl.coupling(), size));

        // BUTinv{k}.L from the donors of BL{k}.I and of BUT{k}.I
        for run in donor_runs(&bl.i, ownership) {
            let donor = &finished[run.donor - k - 1];
            let inner = PairedAxis::run(&bl.i, run, &donor.bd_inv.j);

            let update = Update {
                rows: PairedAxis::new(&but.i, &donor.but_inv.i),
                inner,
                lhs: donor.but_inv.l.view(),
                lhs_op: Op::NoTrans,
                rhs: bl.l.view(),
            };
            workspace.contribute(1, k, update, but_inv_l.view_mut())?;

            let update = Update {
                rows: PairedAxis::new(&but.i, &donor.bd_inv.j),
                inner,
                lhs: donor.bd_inv.d.view(),
                lhs_op: Op::NoTrans,
                rhs: bl.l.view(),
            };
            workspace.contribute(2, k, update, but_inv_l.view_mut())?;
        }
        for run in donor_runs(&but.i, ownership) {
            let donor = &finished[run.donor - k - 1];
            let update = Update {
                rows: PairedAxis::run(&but.i, run, &donor.bl_inv.j),
                inner: PairedAxis::new(&bl.i, &donor.bl_inv.i),
                lhs: donor.bl_inv.l.view(),
                lhs_op: Op::Trans,
                rhs: bl.l.view(),
            };
            workspace.contribute(3, k, update, but_inv_l.view_mut())?;
        }

        // BLinv{k}.L, the same recursion mirrored onto BUT{k}.L
        for run in donor_runs(&but.i, ownership) {
            let donor = &finished[run.donor - k - 1];
            let update = Update {
                rows: PairedAxis::new(&bl.i, &donor.bl_inv.i),
                inner: PairedAxis::run(&but.i, run, &donor.bl_inv.j),
                lhs: donor.bl_inv.l.view(),
                lhs_op: Op::NoTrans,
                rhs: but.l.view(),
            };
            workspace.contribute(4, k, update, bl_inv_l.view_mut())?;
        }
        for run in donor_runs(&bl.i, ownership) {
            let donor = &finished[run.donor - k - 1];
            let rows = PairedAxis::run(&bl.i, run, &donor.bd_inv.j);

            let update = Update {
                rows,
                inner: PairedAxis::new(&but.i, &donor.but_inv.i),
                lhs: donor.but_inv.l.view(),
                lhs_op: Op::Trans,
                rhs: but.l.view(),
            };
            workspace.contribute(5, k, update, bl_inv_l.view_mut())?;

            let update = Update {
                rows,
                inner: PairedAxis::new(&but.i, &donor.bd_inv.j),
                lhs: donor.bd_inv.d.view(),
                lhs_op: Op::Trans,
                rhs: but.l.view(),
            };
            workspace.contribute(6, k, update, bl_inv_l.view_mut())?;
        }

        let mut bd_inv_d = invert_local_block(k, bl, bd, but)?;
        let correction = match self.config.diagonal_correction {
            DiagonalCorrection::UpperFactor => gemm(
                bd_inv_d.view_mut(),
                Beta::Accumulate,
                -1.0,
                but.l.view(),
                Op::Trans,
                but_inv_l.view(),
                Op::NoTrans,
            ),
            DiagonalCorrection::LowerFactor => gemm(
                bd_inv_d.view_mut(),
                Beta::Accumulate,
                -1.0,
                bl_inv_l.view(),
                Op::Trans,
                bl.l.view(),
                Op::NoTrans,
            ),
        };
        correction.map_err(|err| SelInvError::from_dense(k, Stage::DiagonalCorrection, err))?;

        Ok(FinishedBlock {
            bl_inv: InverseBlockColumn {
                j: bl.j.clone(),
                i: bl.i.clone(),
                l: bl_inv_l,
            },
            bd_inv: InverseDiagonalBlock {
                j: bl.j.clone(),
                d: bd_inv_d,
            },
            but_inv: InverseBlockColumn {
                j: but.j.clone(),
                i: but.i.clone(),
                l: but_inv_l,
            },
        })
    }
}

/// Selective inversion with the default configuration
pub fn selective_inverse(
    factor: &BlockFactorization,
    scaling: &Scaling,
) -> Result<SelectiveInverse> {
    SelectiveInversion::new().run(factor, scaling)
}
