/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for reading and writing factorization files

use crate::factor::FactorError;
use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing JSON files
#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0} contains index 0; indices are 1-based")]
    ZeroIndex(String),

    #[error("row {row} of {field} has {actual} entries, expected {expected}")]
    RaggedMatrix {
        field: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Invalid factorization: {0}")]
    InvalidFactorization(#[from] FactorError),
}

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;
