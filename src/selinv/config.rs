/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Tunable parameters of the selective inversion

use serde::{Deserialize, Serialize};

/// Policy deciding whether gathering operands into the arena pays off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModel {
    /// Gather when the number of copied elements is below `m * k * n`
    #[default]
    ElementCount,
    /// Gather whenever an operand is not contiguous
    AlwaysBuffer,
    /// Never use dense kernels, always loop over matched index pairs
    AlwaysScalar,
    /// Gather when `copy_weight * copied` is below `m * k * n`
    Weighted { copy_weight: f64 },
}

/// Formula used to fold the off-diagonal inverse back into BDinv{k}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiagonalCorrection {
    /// `BDinv{k}.D -= BUT{k}.L^T * BUTinv{k}.L`
    #[default]
    UpperFactor,
    /// `BDinv{k}.D -= BLinv{k}.L^T * BL{k}.L`
    LowerFactor,
}

/// Configuration of one selective inversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelInvConfig {
    /// Gather-versus-scalar policy for the block-pair updates
    pub cost_model: CostModel,
    /// Correction formula for the diagonal blocks
    pub diagonal_correction: DiagonalCorrection,
    /// Verify that the column sets partition `0..n`
    pub check_partition: bool,
    /// Minimum order for the final diagonal pass to run in parallel
    pub parallel_threshold: usize,
}

impl Default for SelInvConfig {
    fn default() -> Self {
        Self {
            cost_model: CostModel::default(),
            diagonal_correction: DiagonalCorrection::default(),
            check_partition: cfg!(debug_assertions),
            parallel_threshold: 10_000,
        }
    }
}

impl SelInvConfig {
    /// Use a different cost model
    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Use a different diagonal correction
    pub fn with_diagonal_correction(mut self, correction: DiagonalCorrection) -> Self {
        self.diagonal_correction = correction;
        self
    }

    /// Enable or disable the partition check
    pub fn with_partition_check(mut self, check: bool) -> Self {
        self.check_partition = check;
        self
    }
}
