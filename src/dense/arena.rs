/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Grow-only scratch buffer shared by all gathered GEMM updates

use log::trace;

/// Scratch arena for gathered operands and unscattered products
///
/// The buffer only ever grows during one inversion and is reused serially by
/// every update that cannot be expressed on strided views.
#[derive(Debug, Clone, Default)]
pub struct GemmArena {
    buff: Vec<f64>,
}

impl GemmArena {
    /// Create an arena with an initial capacity of `len` elements
    pub fn with_len(len: usize) -> Self {
        Self {
            buff: vec![0.0; len],
        }
    }

    /// Current size of the buffer in elements
    pub fn len(&self) -> usize {
        self.buff.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buff.is_empty()
    }

    /// Grow the buffer to hold at least `len` elements
    pub fn ensure(&mut self, len: usize) {
        if len > self.buff.len() {
            trace!("growing gemm buffer from {} to {} elements", self.buff.len(), len);
            self.buff.resize(len, 0.0);
        }
    }

    /// Borrow three disjoint slices of the requested lengths
    ///
    /// The contents are whatever the previous update left behind.
    pub fn split3(
        &mut self,
        first: usize,
        second: usize,
        third: usize,
    ) -> (&mut [f64], &mut [f64], &mut [f64]) {
        self.ensure(first + second + third);
        let (a, rest) = self.buff.split_at_mut(first);
        let (b, rest) = rest.split_at_mut(second);
        let (c, _) = rest.split_at_mut(third);
        (a, b, c)
    }
}
