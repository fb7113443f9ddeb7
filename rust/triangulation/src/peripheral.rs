// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Peripheral curves on the cusps of an ideal triangulation.
//!
//! A triangulation that carries a [`PeripheralCurves`] provider is
//! *SnapPea-backed*: some external kernel has chosen a meridian and a
//! longitude on every cusp. The provider reports them as slope equations,
//! which is all the normal-surface code needs.

use std::fmt::Debug;

/// Slope equations: two rows per cusp (meridian, then longitude) and three
/// columns per tetrahedron.
///
/// Column `3t + k` multiplies the number of quadrilaterals of type `k` in
/// tetrahedron `t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlopeEquations {
    cusps: usize,
    tets: usize,
    entries: Vec<i64>,
}

impl SlopeEquations {
    /// Builds the matrix from row-major entries. Returns `None` if the entry
    /// count is not `2 * cusps * 3 * tets`.
    pub fn new(cusps: usize, tets: usize, entries: Vec<i64>) -> Option<Self> {
        (entries.len() == 2 * cusps * 3 * tets).then_some(Self {
            cusps,
            tets,
            entries,
        })
    }

    pub fn cusps(&self) -> usize {
        self.cusps
    }

    pub fn tets(&self) -> usize {
        self.tets
    }

    pub fn rows(&self) -> usize {
        2 * self.cusps
    }

    pub fn columns(&self) -> usize {
        3 * self.tets
    }

    pub fn entry(&self, row: usize, column: usize) -> i64 {
        self.entries[row * self.columns() + column]
    }

    /// The meridian row of `cusp`.
    pub fn meridian(&self, cusp: usize) -> &[i64] {
        let c = self.columns();
        &self.entries[2 * cusp * c..(2 * cusp + 1) * c]
    }

    /// The longitude row of `cusp`.
    pub fn longitude(&self, cusp: usize) -> &[i64] {
        let c = self.columns();
        &self.entries[(2 * cusp + 1) * c..(2 * cusp + 2) * c]
    }
}

/// Source of meridian/longitude data for the cusps of a triangulation.
pub trait PeripheralCurves: Debug + Send + Sync {
    fn cusp_count(&self) -> usize;

    /// Slope equations for the triangulation this provider is attached to,
    /// or `None` if the kernel could not compute them.
    fn slope_equations(&self) -> Option<SlopeEquations>;
}

/// A provider holding a fixed matrix, for data computed elsewhere.
#[derive(Debug, Clone)]
pub struct FixedPeripheralCurves {
    equations: SlopeEquations,
}

impl FixedPeripheralCurves {
    pub fn new(equations: SlopeEquations) -> Self {
        Self { equations }
    }
}

impl PeripheralCurves for FixedPeripheralCurves {
    fn cusp_count(&self) -> usize {
        self.equations.cusps()
    }

    fn slope_equations(&self) -> Option<SlopeEquations> {
        Some(self.equations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_split_by_cusp() {
        let eq = SlopeEquations::new(1, 2, (0..12).collect()).unwrap();
        assert_eq!(eq.rows(), 2);
        assert_eq!(eq.columns(), 6);
        assert_eq!(eq.meridian(0), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(eq.longitude(0), &[6, 7, 8, 9, 10, 11]);
        assert_eq!(eq.entry(1, 2), 8);
    }

    #[test]
    fn wrong_size_is_rejected() {
        assert!(SlopeEquations::new(1, 2, vec![0; 11]).is_none());
    }
}
