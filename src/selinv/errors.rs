/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the selective inversion

use crate::dense::DenseError;
use crate::factor::FactorError;
use std::fmt;
use thiserror::Error;

/// Result type for the selective inversion
pub type Result<T> = std::result::Result<T, SelInvError>;

/// Step of the recursion at which a dense kernel failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// One of the six block-pair contributions, numbered 1 to 6
    Contribution(u8),
    /// Inversion of the local diagonal block
    DiagonalInverse,
    /// Low-rank correction of the inverse diagonal block
    DiagonalCorrection,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Contribution(kind) => write!(f, "contribution {}", kind),
            Stage::DiagonalInverse => write!(f, "diagonal block inverse"),
            Stage::DiagonalCorrection => write!(f, "diagonal block correction"),
        }
    }
}

/// Errors raised by the selective inversion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelInvError {
    /// The block factorization, permutation or scalings are malformed
    #[error("invalid input: {0}")]
    InvalidInput(#[from] FactorError),

    /// A local diagonal block has an exactly zero pivot
    #[error("U({index},{index}) of block {block} is exactly zero; the block is singular")]
    SingularBlock { block: usize, index: usize },

    /// A dense kernel rejected its arguments
    #[error("block {block}, {stage}: {detail}")]
    IllegalArgument {
        block: usize,
        stage: Stage,
        detail: String,
    },
}

impl SelInvError {
    /// Attach block and stage to a dense kernel failure
    pub fn from_dense(block: usize, stage: Stage, err: DenseError) -> Self {
        match err {
            DenseError::Singular { index } => SelInvError::SingularBlock { block, index },
            other => SelInvError::IllegalArgument {
                block,
                stage,
                detail: other.to_string(),
            },
        }
    }
}
