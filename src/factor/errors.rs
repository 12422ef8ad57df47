/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the block factorization data model

use thiserror::Error;

/// Result type for factorization validation
pub type Result<T> = std::result::Result<T, FactorError>;

/// Malformed or inconsistent block factorization input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorError {
    /// BL, BD and BUT hold different numbers of block columns
    #[error("block count mismatch: BL has {bl}, BD has {bd}, BUT has {but} block columns")]
    BlockCountMismatch { bl: usize, bd: usize, but: usize },

    /// BL{k}.J and BUT{k}.J differ
    #[error("BL{{{block}}}.J and BUT{{{block}}}.J differ")]
    ColumnSetMismatch { block: usize },

    /// A matrix field has the wrong shape
    #[error("{field}{{{block}}} is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        block: usize,
        field: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// An index set is not strictly increasing
    #[error("{field}{{{block}}} is not strictly increasing at position {position}")]
    NotIncreasing {
        block: usize,
        field: &'static str,
        position: usize,
    },

    /// An index lies outside `0..n`
    #[error("index {index} in {field}{{{block}}} is out of range for n = {n}")]
    IndexOutOfRange {
        block: usize,
        field: &'static str,
        index: usize,
        n: usize,
    },

    /// Two block columns claim the same global index
    #[error("index {index} belongs to both block {first} and block {second}")]
    OverlappingBlocks {
        index: usize,
        first: usize,
        second: usize,
    },

    /// No block column claims a global index
    #[error("index {index} is not covered by any block column")]
    UncoveredIndex { index: usize },

    /// A row index refers to a block that is not eliminated after this one
    #[error("{field}{{{block}}} references index {index} of earlier block {owner}")]
    BackwardCoupling {
        block: usize,
        field: &'static str,
        index: usize,
        owner: usize,
    },

    /// The permutation length differs from the order covered by the block columns
    #[error("perm has length {actual}, but the block columns cover {expected} indices")]
    OrderMismatch { expected: usize, actual: usize },

    /// A vector argument has the wrong length
    #[error("{name} has length {actual}, expected {expected}")]
    VectorLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The permutation is not a bijection of `0..n`
    #[error("perm is not a permutation: entry {value} at position {position}")]
    InvalidPermutation { position: usize, value: usize },

    /// A diagonal factor carries an off-diagonal nonzero
    #[error("BD{{{block}}}.D has an off-diagonal entry at ({row}, {col})")]
    OffDiagonalEntry { block: usize, row: usize, col: usize },
}
