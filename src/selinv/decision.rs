/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Choice of the execution path of a single block-pair update
//!
//! An update `C(R, :) -= A(R', K') * B(K, :)` can run as one GEMM on strided
//! views when all three operands are stored contiguously. Otherwise the
//! scattered operands either get gathered into the scratch arena first, or
//! the product is formed by explicit loops over the matched index pairs.

use super::config::CostModel;
use serde::{Deserialize, Serialize};

/// Dimensions `m x k` times `k x n` of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateShape {
    /// Rows of the destination
    pub m: usize,
    /// Inner dimension
    pub k: usize,
    /// Columns of the destination
    pub n: usize,
}

impl UpdateShape {
    /// Number of multiply-adds of the update
    pub fn flops(&self) -> usize {
        self.m * self.k * self.n
    }

    /// Whether the update is void
    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.k == 0 || self.n == 0
    }
}

/// Storage contiguity of the three operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contiguity {
    /// Left operand, both axes
    pub lhs: bool,
    /// Rows of the right operand
    pub rhs: bool,
    /// Rows of the destination
    pub dst: bool,
}

impl Contiguity {
    /// Whether every operand can be viewed in place
    pub fn all(&self) -> bool {
        self.lhs && self.rhs && self.dst
    }
}

/// Which operands pass through the arena on the buffered path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPlan {
    /// Copy the left operand into the arena
    pub gather_lhs: bool,
    /// Copy the right operand into the arena
    pub gather_rhs: bool,
    /// Form the product in the arena and scatter it into the destination
    pub scatter_dst: bool,
}

/// Execution path of one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePath {
    /// Nothing to do
    Skip,
    /// One GEMM on strided sub-views
    Direct,
    /// GEMM on operands partly gathered into the arena
    Buffered(BufferPlan),
    /// Nested loops over matched index pairs
    Scalar,
}

impl UpdatePath {
    /// Short label used in logs and statistics
    pub fn label(&self) -> &'static str {
        match self {
            UpdatePath::Skip => "skip",
            UpdatePath::Direct => "direct",
            UpdatePath::Buffered(_) => "buffered",
            UpdatePath::Scalar => "scalar",
        }
    }
}

/// Number of elements moved by the buffered path
pub fn copy_count(shape: UpdateShape, contiguity: Contiguity) -> usize {
    let mut count = 0;
    if !contiguity.lhs {
        count += shape.m * shape.k;
    }
    if !contiguity.rhs {
        count += shape.k * shape.n;
    }
    if !contiguity.dst {
        count += shape.m * shape.n;
    }
    count
}

/// Pick the execution path of an update
///
/// # Arguments
///
/// * `model` - Policy weighing copies against multiply-adds
/// * `shape` - Dimensions of the update
/// * `contiguity` - Which operands are stored contiguously
pub fn choose_path(model: CostModel, shape: UpdateShape, contiguity: Contiguity) -> UpdatePath {
    if shape.is_empty() {
        return UpdatePath::Skip;
    }
    if model == CostModel::AlwaysScalar {
        return UpdatePath::Scalar;
    }
    if contiguity.all() {
        return UpdatePath::Direct;
    }

    let copies = copy_count(shape, contiguity);
    let gather = match model {
        CostModel::ElementCount => copies < shape.flops(),
        CostModel::AlwaysBuffer => true,
        CostModel::Weighted { copy_weight } => copy_weight * (copies as f64) < shape.flops() as f64,
        CostModel::AlwaysScalar => false,
    };

    if gather {
        UpdatePath::Buffered(BufferPlan {
            gather_lhs: !contiguity.lhs,
            gather_rhs: !contiguity.rhs,
            scatter_dst: !contiguity.dst,
        })
    } else {
        UpdatePath::Scalar
    }
}

/// Number of updates per execution path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathCounts {
    pub skipped: usize,
    pub direct: usize,
    pub buffered: usize,
    pub scalar: usize,
}

impl PathCounts {
    /// Count one update
    pub fn record(&mut self, path: UpdatePath) {
        match path {
            UpdatePath::Skip => self.skipped += 1,
            UpdatePath::Direct => self.direct += 1,
            UpdatePath::Buffered(_) => self.buffered += 1,
            UpdatePath::Scalar => self.scalar += 1,
        }
    }

    /// Total number of updates that did some work
    pub fn executed(&self) -> usize {
        self.direct + self.buffered + self.scalar
    }
}
