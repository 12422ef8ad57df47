/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Intersection of sorted index sets with contiguity detection
//!
//! Every block-pair update of the selective inversion addresses sub-blocks
//! through the common indices of two sorted index arrays. Whether the matched
//! positions form a single run on either side decides if the storage can be
//! handed to the dense kernels as a strided view or has to be gathered first.

/// Result of merging two strictly increasing index arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intersection {
    /// Number of common values
    pub count: usize,
    /// Position in `a` of the first common value (0 when `count == 0`)
    pub a_first: usize,
    /// Whether the matched positions in `a` form one contiguous run
    pub a_contiguous: bool,
    /// Position in `b` of the first common value (0 when `count == 0`)
    pub b_first: usize,
    /// Whether the matched positions in `b` form one contiguous run
    pub b_contiguous: bool,
}

impl Intersection {
    /// Whether no common value exists
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether both sides are stored contiguously
    pub fn both_contiguous(&self) -> bool {
        self.a_contiguous && self.b_contiguous
    }
}

/// Intersect two strictly increasing index arrays
///
/// Classic two-pointer merge in O(|a| + |b|). A run breaks the first time a
/// matched position is not the immediate successor of the previously matched
/// position on that side. An empty intersection reports both sides as
/// contiguous.
///
/// # Arguments
///
/// * `a` - First ascending index array
/// * `b` - Second ascending index array
///
/// # Returns
///
/// Count, first positions and contiguity flags for both sides
pub fn intersect(a: &[usize], b: &[usize]) -> Intersection {
    let mut result = Intersection {
        count: 0,
        a_first: 0,
        a_contiguous: true,
        b_first: 0,
        b_contiguous: true,
    };

    let mut next_a = 0;
    let mut next_b = 0;
    for (p, q) in matched_pairs(a, b) {
        if result.count == 0 {
            result.a_first = p;
            result.b_first = q;
        } else {
            if p != next_a {
                result.a_contiguous = false;
            }
            if q != next_b {
                result.b_contiguous = false;
            }
        }
        next_a = p + 1;
        next_b = q + 1;
        result.count += 1;
    }

    result
}

/// Iterate over the positions `(p, q)` with `a[p] == b[q]`, in increasing order
pub fn matched_pairs<'a>(a: &'a [usize], b: &'a [usize]) -> MatchedPairs<'a> {
    MatchedPairs { a, b, p: 0, q: 0 }
}

/// Iterator over the matched positions of two sorted index arrays
#[derive(Debug, Clone)]
pub struct MatchedPairs<'a> {
    a: &'a [usize],
    b: &'a [usize],
    p: usize,
    q: usize,
}

impl Iterator for MatchedPairs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.p < self.a.len() && self.q < self.b.len() {
            let (x, y) = (self.a[self.p], self.b[self.q]);
            if x < y {
                self.p += 1;
            } else if x > y {
                self.q += 1;
            } else {
                let pair = (self.p, self.q);
                self.p += 1;
                self.q += 1;
                return Some(pair);
            }
        }
        None
    }
}

/// Location of a run of row indices inside a donor block's column set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Number of entries of the run found in the donor's column set
    pub len: usize,
    /// Starting offset within the donor's storage
    pub offset: usize,
    /// Whether the run is consecutive in value and stored consecutively
    pub contiguous: bool,
}

/// Locate a run `I(l..=j)` inside a target block's `J` array
///
/// The run is contiguous when its values are consecutive integers and the
/// donor stores them in consecutive positions, which lets the column
/// dimension of a product be addressed as pointer plus stride.
pub fn column_span(run: &[usize], target: &[usize]) -> ColumnSpan {
    let meet = intersect(run, target);
    let consecutive = run
        .first()
        .map(|&first| run.iter().enumerate().all(|(pos, &idx)| idx == first + pos))
        .unwrap_or(true);

    ColumnSpan {
        len: meet.count,
        offset: meet.b_first,
        contiguous: consecutive && meet.b_contiguous && meet.count == run.len(),
    }
}
