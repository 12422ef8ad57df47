/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! # selinv-rs
//!
//! Selective block sparse inversion of an incomplete block LU factorization.
//!
//! Given `P^T Deltal A Deltar P ~ BL * BD * BUT^T` with block lower
//! triangular `BL`, diagonal `BD` and block upper triangular `BUT` (stored
//! transposed), this crate computes the block-structured approximate inverse
//! `BUTinv + BDinv + BLinv^T` restricted to the pattern of the factors,
//! together with `D ~ diag(A^-1)` in the original ordering and scaling.
//!
//! ```no_run
//! use selinv_rs::input::load_factorization;
//! use selinv_rs::selinv::selective_inverse;
//!
//! let (factor, scaling) = load_factorization("factor.json")?;
//! let inverse = selective_inverse(&factor, &scaling)?;
//! println!("{:?}", inverse.d);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod dense;
pub mod factor;
pub mod index;
pub mod input;
pub mod selinv;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub use factor::{BlockColumn, BlockFactorization, DiagonalBlock, Scaling};
pub use selinv::{selective_inverse, SelInvConfig, SelectiveInverse, SelectiveInversion};
