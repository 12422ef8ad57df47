/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Typed data model of the block factorization
//!
//! The factorization `P^T Deltal A Deltar P ~ BL * BD * BUT^T` is held as
//! three vectors of block records. Every record is validated once, before the
//! selective inversion touches it.

pub mod block;
pub mod errors;
pub mod factorization;

pub use block::{BlockColumn, DiagonalBlock, InverseBlockColumn, InverseDiagonalBlock};
pub use errors::{FactorError, Result};
pub use factorization::{BlockFactorization, Scaling};
