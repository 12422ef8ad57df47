/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Selective block sparse inversion
//!
//! Given `P^T Deltal A Deltar P ~ BL * BD * BUT^T`, this module computes
//! `BUTinv + BDinv + BLinv^T`, the approximate inverse restricted to the
//! block pattern of the factors, and the diagonal `D ~ diag(A^-1)` mapped
//! back to the original ordering and scaling.
//!
//! Every block-pair contribution is classified by [`decision::choose_path`]
//! and executed by [`update::Update`], either as one GEMM on strided views,
//! as a GEMM on operands gathered into the scratch arena, or as explicit
//! loops over matched index pairs.

pub mod config;
pub mod decision;
pub mod diagonal;
pub mod engine;
pub mod errors;
pub mod reorder;
pub mod stats;
pub mod update;

pub use config::{CostModel, DiagonalCorrection, SelInvConfig};
pub use decision::{
    choose_path, copy_count, BufferPlan, Contiguity, PathCounts, UpdatePath, UpdateShape,
};
pub use diagonal::{assemble_local_lu, invert_local_block, local_block};
pub use engine::{selective_inverse, SelectiveInverse, SelectiveInversion};
pub use errors::{Result, SelInvError, Stage};
pub use reorder::{inverse_permutation, reorder_diagonal};
pub use stats::SelInvStats;
pub use update::{PairedAxis, Update};
