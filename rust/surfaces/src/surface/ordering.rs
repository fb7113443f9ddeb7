// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Equality and total order on surfaces.
//!
//! Surfaces compare by triangulation size first, then lexicographically by
//! disc counts tetrahedron by tetrahedron: four triangles, three
//! quadrilaterals and, when either side stores them, three octagons. The
//! encoding plays no part, so a surface built from quadrilateral
//! coordinates equals the same surface built from standard coordinates.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::NormalSurface;

impl NormalSurface {
    fn canonical_cmp(&self, other: &NormalSurface) -> Ordering {
        let n = self.tri.size();
        let by_size = n.cmp(&other.tri.size());
        if by_size != Ordering::Equal {
            return by_size;
        }
        let octs = self.enc.stores_octagons() || other.enc.stores_octagons();
        for t in 0..n {
            for v in 0..4 {
                let c = self.triangles(t, v).cmp(&other.triangles(t, v));
                if c != Ordering::Equal {
                    return c;
                }
            }
            for k in 0..3 {
                let c = self.quads(t, k).cmp(&other.quads(t, k));
                if c != Ordering::Equal {
                    return c;
                }
            }
            if octs {
                for k in 0..3 {
                    let c = self.octs(t, k).cmp(&other.octs(t, k));
                    if c != Ordering::Equal {
                        return c;
                    }
                }
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for NormalSurface {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_cmp(other) == Ordering::Equal
    }
}

impl Eq for NormalSurface {}

impl PartialOrd for NormalSurface {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalSurface {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_cmp(other)
    }
}

impl Hash for NormalSurface {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // octagons are left out so that a stored zero and an absent octagon
        // column hash alike
        self.tri.size().hash(state);
        for t in 0..self.tri.size() {
            for v in 0..4 {
                self.triangles(t, v).hash(state);
            }
            for k in 0..3 {
                self.quads(t, k).hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rustc_hash::FxHashSet;

    use crate::encoding::NormalCoords;
    use crate::surface::NormalSurface;
    use normal_triangulation::samples;

    #[test]
    fn quad_order_follows_reconstructed_triangles() {
        let tri = samples::folded_tetrahedron().snapshot();
        let a = NormalSurface::from_ints(tri.clone(), NormalCoords::Quad, &[0, 1, 0]).unwrap();
        let b = NormalSurface::from_ints(tri, NormalCoords::Quad, &[1, 0, 0]).unwrap();
        assert!(!(a < b));
        assert!(b < a);
        assert_ne!(a, b);
    }

    #[test]
    fn encodings_do_not_affect_equality() {
        let tri = samples::folded_tetrahedron().snapshot();
        let quad = NormalSurface::from_ints(tri.clone(), NormalCoords::Quad, &[0, 1, 0]).unwrap();
        let std =
            NormalSurface::from_ints(tri.clone(), NormalCoords::Standard, &[1, 1, 0, 0, 0, 1, 0])
                .unwrap();
        let almost = NormalSurface::from_ints(
            tri,
            NormalCoords::AlmostNormal,
            &[1, 1, 0, 0, 0, 1, 0, 0, 0, 0],
        )
        .unwrap();
        assert_eq!(quad, std);
        assert_eq!(std, almost);

        let mut set = FxHashSet::default();
        set.insert(quad);
        assert!(set.contains(&almost));
    }

    #[test]
    fn smaller_triangulations_sort_first() {
        let small = NormalSurface::empty(samples::ball().snapshot());
        let large = NormalSurface::empty(samples::figure_eight().snapshot());
        let set: BTreeSet<_> = [large.clone(), small.clone()].into_iter().collect();
        assert_eq!(set.into_iter().next(), Some(small));
        assert!(large > NormalSurface::empty(samples::closed_one_tet().snapshot()));
    }
}
