/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the dense linear algebra primitives

use thiserror::Error;

/// Result type for dense kernels
pub type Result<T> = std::result::Result<T, DenseError>;

/// Errors raised by the dense kernels
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseError {
    /// An argument passed to a kernel violates its contract
    #[error("argument {argument} had an illegal value: {reason}")]
    IllegalArgument {
        /// 1-based position of the offending argument
        argument: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Zero pivot in the upper triangular factor
    #[error("U({index},{index}) is exactly zero; the matrix is singular")]
    Singular {
        /// 0-based position of the zero pivot
        index: usize,
    },

    /// Operand shapes do not conform
    #[error("Matrix dimension mismatch: {0}")]
    DimensionMismatch(String),
}

impl From<ndarray::ShapeError> for DenseError {
    fn from(err: ndarray::ShapeError) -> Self {
        DenseError::DimensionMismatch(err.to_string())
    }
}
