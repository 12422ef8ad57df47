/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Dense linear algebra primitives
//!
//! GEMM with transpose flags on strided views, inversion from an unpivoted
//! LU decomposition, and the scratch arena used to gather non-contiguous
//! operands. Matrices live in `ndarray` containers; the inversion views them
//! as faer matrices.

pub mod arena;
pub mod errors;
pub mod gemm;
pub mod inverse;

pub use arena::GemmArena;
pub use errors::{DenseError, Result};
pub use gemm::{gemm, ordered_dot, Beta, Op};
pub use inverse::invert_from_lu;
