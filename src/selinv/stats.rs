/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Counters collected during one selective inversion

use super::decision::{PathCounts, UpdatePath};
use serde::{Deserialize, Serialize};

/// Execution statistics of a selective inversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelInvStats {
    /// Number of block columns processed
    pub blocks: usize,
    /// Path counts of the six contribution types, in order
    pub contributions: [PathCounts; 6],
    /// Final size of the scratch arena in elements
    pub peak_arena: usize,
}

impl SelInvStats {
    /// Count one update of contribution type `kind` (1 to 6)
    pub fn record(&mut self, kind: u8, path: UpdatePath) {
        self.contributions[usize::from(kind) - 1].record(path);
    }

    /// Path counts of contribution type `kind` (1 to 6)
    pub fn contribution(&self, kind: u8) -> &PathCounts {
        &self.contributions[usize::from(kind) - 1]
    }

    /// Path counts summed over all contribution types
    pub fn total(&self) -> PathCounts {
        self.contributions.iter().fold(PathCounts::default(), |acc, counts| PathCounts {
            skipped: acc.skipped + counts.skipped,
            direct: acc.direct + counts.direct,
            buffered: acc.buffered + counts.buffered,
            scalar: acc.scalar + counts.scalar,
        })
    }
}
