/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Execution of a single block-pair update on the three possible paths

use super::config::CostModel;
use super::decision::{choose_path, BufferPlan, Contiguity, UpdatePath, UpdateShape};
use crate::dense::{gemm, ordered_dot, Beta, GemmArena, Op, Result};
use crate::index::{column_span, intersect, matched_pairs, DonorRun, Intersection};
use log::trace;
use ndarray::{s, ArrayView2, ArrayViewMut2};
use std::ops::Range;

/// Positions of the current block column matched with positions of a donor
///
/// The local side addresses rows of a matrix of block `k` (destination or
/// right operand), the donor side addresses one axis of `op(lhs)`.
#[derive(Debug, Clone, Copy)]
pub struct PairedAxis<'a> {
    local: &'a [usize],
    offset: usize,
    donor: &'a [usize],
    meet: Intersection,
}

impl<'a> PairedAxis<'a> {
    /// Pair the common entries of two ascending index sets
    pub fn new(local: &'a [usize], donor: &'a [usize]) -> Self {
        Self {
            local,
            offset: 0,
            donor,
            meet: intersect(local, donor),
        }
    }

    /// Pair a donor run of `indices` with the donor's column set
    ///
    /// The run occupies `indices[run.start..=run.end]`, which is contiguous
    /// on the local side. On the donor side it is contiguous when the run
    /// consists of consecutive global indices.
    pub fn run(indices: &'a [usize], run: DonorRun, donor_columns: &'a [usize]) -> Self {
        let local = run.slice(indices);
        let span = column_span(local, donor_columns);
        Self {
            local,
            offset: run.start,
            donor: donor_columns,
            meet: Intersection {
                count: span.len,
                a_first: 0,
                a_contiguous: span.len == local.len(),
                b_first: span.offset,
                b_contiguous: span.contiguous,
            },
        }
    }

    /// Number of matched positions
    pub fn len(&self) -> usize {
        self.meet.count
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.meet.is_empty()
    }

    /// Whether the local positions form one run
    pub fn local_contiguous(&self) -> bool {
        self.meet.a_contiguous
    }

    /// Whether the donor positions form one run
    pub fn donor_contiguous(&self) -> bool {
        self.meet.b_contiguous
    }

    /// Local storage range, valid when [`Self::local_contiguous`]
    pub fn local_range(&self) -> Range<usize> {
        let start = self.offset + self.meet.a_first;
        start..start + self.meet.count
    }

    /// Donor storage range, valid when [`Self::donor_contiguous`]
    pub fn donor_range(&self) -> Range<usize> {
        self.meet.b_first..self.meet.b_first + self.meet.count
    }

    /// Matched storage positions `(local, donor)` in increasing order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        let offset = self.offset;
        matched_pairs(self.local, self.donor).map(move |(p, q)| (p + offset, q))
    }
}

/// `dst(rows, :) -= op(lhs)(rows, inner) * rhs(inner, :)`
#[derive(Debug, Clone, Copy)]
pub struct Update<'a> {
    /// Destination rows paired with rows of `op(lhs)`
    pub rows: PairedAxis<'a>,
    /// Rows of `rhs` paired with columns of `op(lhs)`
    pub inner: PairedAxis<'a>,
    /// Donor block as stored
    pub lhs: ArrayView2<'a, f64>,
    /// Transpose flag of the donor block
    pub lhs_op: Op,
    /// Off-diagonal block of the current column
    pub rhs: ArrayView2<'a, f64>,
}

impl<'a> Update<'a> {
    /// Dimensions of the update
    pub fn shape(&self) -> UpdateShape {
        UpdateShape {
            m: self.rows.len(),
            k: self.inner.len(),
            n: self.rhs.ncols(),
        }
    }

    /// Storage contiguity of the operands
    pub fn contiguity(&self) -> Contiguity {
        Contiguity {
            lhs: self.rows.donor_contiguous() && self.inner.donor_contiguous(),
            rhs: self.inner.local_contiguous(),
            dst: self.rows.local_contiguous(),
        }
    }

    /// Subtract the product from `dst` on the path chosen by `model`
    ///
    /// # Returns
    ///
    /// The path that was taken
    pub fn apply(
        &self,
        dst: ArrayViewMut2<'_, f64>,
        arena: &mut GemmArena,
        model: CostModel,
    ) -> Result<UpdatePath> {
        let shape = self.shape();
        let path = choose_path(model, shape, self.contiguity());
        trace!("{}x{}x{} update, {} path", shape.m, shape.k, shape.n, path.label());

        match path {
            UpdatePath::Skip => {}
            UpdatePath::Direct => self.direct(dst)?,
            UpdatePath::Buffered(plan) => self.buffered(dst, arena, plan)?,
            UpdatePath::Scalar => self.scalar(dst),
        }
        Ok(path)
    }

    // donor sub-block in stored orientation, valid when both donor axes are contiguous
    fn stored_lhs(&self) -> ArrayView2<'a, f64> {
        let rows = self.rows.donor_range();
        let cols = self.inner.donor_range();
        match self.lhs_op {
            Op::NoTrans => self.lhs.slice_move(s![rows, cols]),
            Op::Trans => self.lhs.slice_move(s![cols, rows]),
        }
    }

    fn direct(&self, mut dst: ArrayViewMut2<'_, f64>) -> Result<()> {
        let target = dst.slice_mut(s![self.rows.local_range(), ..]);
        let rhs = self.rhs.slice(s![self.inner.local_range(), ..]);
        gemm(target, Beta::Accumulate, -1.0, self.stored_lhs(), self.lhs_op, rhs, Op::NoTrans)
    }

    fn buffered(
        &self,
        mut dst: ArrayViewMut2<'_, f64>,
        arena: &mut GemmArena,
        plan: BufferPlan,
    ) -> Result<()> {
        let UpdateShape { m, k, n } = self.shape();
        let lhs_len = if plan.gather_lhs { m * k } else { 0 };
        let rhs_len = if plan.gather_rhs { k * n } else { 0 };
        let dst_len = if plan.scatter_dst { m * n } else { 0 };
        let (lhs_buff, rhs_buff, dst_buff) = arena.split3(lhs_len, rhs_len, dst_len);

        let (lhs, lhs_op) = if plan.gather_lhs {
            let op_lhs = self.lhs_op.apply(self.lhs);
            for (chunk, (_, row)) in lhs_buff.chunks_exact_mut(k).zip(self.rows.pairs()) {
                for (value, (_, col)) in chunk.iter_mut().zip(self.inner.pairs()) {
                    *value = op_lhs[[row, col]];
                }
            }
            (ArrayView2::from_shape((m, k), &*lhs_buff)?, Op::NoTrans)
        } else {
            (self.stored_lhs().reborrow(), self.lhs_op)
        };

        let rhs = if plan.gather_rhs {
            for (chunk, (row, _)) in rhs_buff.chunks_exact_mut(n).zip(self.inner.pairs()) {
                for (value, source) in chunk.iter_mut().zip(self.rhs.row(row)) {
                    *value = *source;
                }
            }
            ArrayView2::from_shape((k, n), &*rhs_buff)?
        } else {
            self.rhs.slice(s![self.inner.local_range(), ..])
        };

        if plan.scatter_dst {
            let mut product = ArrayViewMut2::from_shape((m, n), dst_buff)?;
            gemm(product.view_mut(), Beta::Replace, 1.0, lhs, lhs_op, rhs, Op::NoTrans)?;
            for (row, (target, _)) in product.rows().into_iter().zip(self.rows.pairs()) {
                let mut target_row = dst.row_mut(target);
                target_row -= &row;
            }
            Ok(())
        } else {
            let target = dst.slice_mut(s![self.rows.local_range(), ..]);
            gemm(target, Beta::Accumulate, -1.0, lhs, lhs_op, rhs, Op::NoTrans)
        }
    }

    // same reduction as `gemm`: one ordered sum per entry, subtracted once
    fn scalar(&self, mut dst: ArrayViewMut2<'_, f64>) {
        let op_lhs = self.lhs_op.apply(self.lhs);
        for (target, row) in self.rows.pairs() {
            let mut target_row = dst.row_mut(target);
            for (c, value) in target_row.iter_mut().enumerate() {
                let terms = self
                    .inner
                    .pairs()
                    .map(|(source, col)| (&op_lhs[[row, col]], &self.rhs[[source, c]]));
                *value += -ordered_dot(terms);
            }
        }
    }
}
