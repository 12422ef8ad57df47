/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Grouping of a block's row indices by owning donor block

use super::ownership::BlockOwnership;

/// A maximal run `indices[start..=end]` owned by the same block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonorRun {
    /// First position of the run
    pub start: usize,
    /// Last position of the run (inclusive)
    pub end: usize,
    /// Owning block of every index in the run
    pub donor: usize,
}

impl DonorRun {
    /// Number of indices in the run
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Runs are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Slice of `indices` covered by this run
    pub fn slice<'a>(&self, indices: &'a [usize]) -> &'a [usize] {
        &indices[self.start..=self.end]
    }
}

/// Iterate over the donor runs of an ascending row index array
///
/// A cursor advances while consecutive entries share the same owner.
pub fn donor_runs<'a>(indices: &'a [usize], ownership: &'a BlockOwnership) -> DonorRuns<'a> {
    DonorRuns {
        indices,
        ownership,
        cursor: 0,
    }
}

/// Iterator returned by [`donor_runs`]
#[derive(Debug, Clone)]
pub struct DonorRuns<'a> {
    indices: &'a [usize],
    ownership: &'a BlockOwnership,
    cursor: usize,
}

impl Iterator for DonorRuns<'_> {
    type Item = DonorRun;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor;
        let &first = self.indices.get(start)?;
        let donor = self.ownership.owner(first);

        let mut end = start;
        while end + 1 < self.indices.len() && self.ownership.owner(self.indices[end + 1]) == donor {
            end += 1;
        }
        self.cursor = end + 1;

        Some(DonorRun { start, end, donor })
    }
}
