/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Map from global index to owning block column

use crate::factor::{FactorError, Result};

/// Owner of every global index, built once from the block column sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOwnership {
    owner: Vec<usize>,
}

impl BlockOwnership {
    /// Build the map from the per-block column index sets
    ///
    /// The union of the sets is assumed to be exactly `0..n` without overlaps.
    /// Indices outside `0..n` are skipped; use [`BlockOwnership::build_checked`]
    /// to have malformed partitions reported.
    pub fn build<'a, I>(n: usize, columns: I) -> Self
    where
        I: IntoIterator<Item = &'a [usize]>,
    {
        let mut owner = vec![0; n];
        for (k, j) in columns.into_iter().enumerate() {
            for &idx in j {
                if let Some(slot) = owner.get_mut(idx) {
                    *slot = k;
                }
            }
        }
        Self { owner }
    }

    /// Build the map and verify that the column sets partition `0..n`
    pub fn build_checked<'a, I>(n: usize, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [usize]>,
    {
        let mut owner: Vec<Option<usize>> = vec![None; n];
        for (k, j) in columns.into_iter().enumerate() {
            for &idx in j {
                let slot = owner.get_mut(idx).ok_or(FactorError::IndexOutOfRange {
                    block: k,
                    field: "J",
                    index: idx,
                    n,
                })?;
                if let Some(first) = *slot {
                    return Err(FactorError::OverlappingBlocks {
                        index: idx,
                        first,
                        second: k,
                    });
                }
                *slot = Some(k);
            }
        }

        let owner = owner
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| slot.ok_or(FactorError::UncoveredIndex { index: idx }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { owner })
    }

    /// Owning block of a global index
    #[inline]
    pub fn owner(&self, idx: usize) -> usize {
        self.owner[idx]
    }

    /// Number of global indices covered by the map
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    /// The raw owner array
    pub fn as_slice(&self) -> &[usize] {
        &self.owner
    }
}
