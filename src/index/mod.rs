/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Index-set bookkeeping for the selective inversion
//!
//! This module provides the ownership map from global indices to block
//! columns, the sorted-set intersection with contiguity detection and the
//! grouping of row indices into donor runs.

pub mod intersect;
pub mod ownership;
pub mod runs;

pub use intersect::{column_span, intersect, matched_pairs, ColumnSpan, Intersection, MatchedPairs};
pub use ownership::BlockOwnership;
pub use runs::{donor_runs, DonorRun, DonorRuns};
