// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crushing a surface to a point.

use normal_triangulation::{Perm4, Triangulation};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::surface::NormalSurface;
use crate::tables::QUAD_PARTNER;

impl NormalSurface {
    /// Crushes the surface to a point and returns the resulting
    /// triangulation.
    ///
    /// Every tetrahedron holding a quadrilateral is flattened away: its
    /// faces are identified in pairs across the quadrilateral, and the
    /// tetrahedra on either side are glued straight through. Tetrahedra
    /// containing only triangles survive, in their original order.
    ///
    /// The result may differ from the true topological crush, but only by
    /// removing 3-balls, 3-spheres, lens spaces or copies of `S2 x S1`.
    ///
    /// # Errors
    ///
    /// [`Error::FailedPrecondition`] unless the surface is compact,
    /// embedded and free of octagons.
    pub fn crush(&self) -> Result<Triangulation> {
        self.require_compact_embedded("crushing")?;
        if !self.normal() {
            return Err(Error::FailedPrecondition(
                "crushing needs a surface without octagons".into(),
            ));
        }

        let n = self.tri.size();
        let quad_types: Vec<Option<usize>> = (0..n)
            .map(|t| (0..3).find(|&k| !self.quads(t, k).is_zero()))
            .collect();

        let mut out = (*self.tri).clone();
        for t in 0..n {
            if quad_types[t].is_some() {
                continue;
            }
            for face in 0..4 {
                let Some(first) = out.gluing(t, face) else {
                    continue;
                };
                if quad_types[first.tet].is_none() {
                    continue;
                }

                // walk through the crushed tetrahedra until a surviving one
                // or the boundary is reached
                let mut adj = Some(first.tet);
                let mut perm = first.perm;
                let mut adj_face = perm.image(face);
                while let Some(current) = adj {
                    let Some(k) = quad_types[current] else {
                        break;
                    };
                    let swap = Perm4::transposition(adj_face, QUAD_PARTNER[k][adj_face]);
                    adj_face = swap.image(adj_face);
                    match out.gluing(current, adj_face) {
                        Some(next) => {
                            perm = next.perm * swap * perm;
                            adj = Some(next.tet);
                            adj_face = perm.image(face);
                        }
                        None => adj = None,
                    }
                }

                out.unjoin(t, face)?;
                if let Some(other) = adj {
                    if other == t && adj_face == face {
                        continue;
                    }
                    out.unjoin(other, adj_face)?;
                    out.join(t, face, other, perm)?;
                }
            }
        }

        let crushed: Vec<usize> = (0..n).filter(|&t| quad_types[t].is_some()).collect();
        for &t in crushed.iter().rev() {
            out.remove_tetrahedron_at(t)?;
        }
        tracing::debug!(
            tets = n,
            removed = crushed.len(),
            "crushed surface"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::NormalCoords;
    use normal_triangulation::samples;

    fn chain() -> Triangulation {
        let mut tri = Triangulation::new();
        tri.new_tetrahedra(3);
        tri.join(0, 0, 1, Perm4::IDENTITY).unwrap();
        tri.join(1, 1, 2, Perm4::IDENTITY).unwrap();
        tri
    }

    #[test]
    fn quad_tetrahedron_is_flattened() {
        let tri = chain().snapshot();
        let disc = NormalSurface::from_ints(
            tri,
            NormalCoords::Standard,
            &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0],
        )
        .unwrap();
        let crushed = disc.crush().unwrap();
        assert_eq!(crushed.size(), 2);
        assert_eq!(crushed.adjacent_tetrahedron(0, 0), Some(1));
        assert_eq!(
            crushed.adjacent_gluing(0, 0),
            Some(Perm4::from_vertices(1, 0, 2, 3))
        );
        assert!(crushed.is_valid());
    }

    #[test]
    fn triangles_only_keep_everything() {
        let tri = samples::closed_one_tet();
        let link = NormalSurface::from_ints(
            tri.snapshot(),
            NormalCoords::Standard,
            &[1, 1, 1, 1, 0, 0, 0],
        )
        .unwrap();
        assert!(link.crush().unwrap().is_identical_to(&tri));
    }

    #[test]
    fn crushing_every_tetrahedron_leaves_nothing() {
        let tri = samples::closed_one_tet().snapshot();
        let torus = NormalSurface::from_ints(tri, NormalCoords::Quad, &[0, 2, 0]).unwrap();
        assert_eq!(torus.crush().unwrap().size(), 0);
    }

    #[test]
    fn octagons_are_rejected() {
        let tri = samples::ball().snapshot();
        let s = NormalSurface::from_ints(
            tri,
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        )
        .unwrap();
        assert!(matches!(s.crush(), Err(Error::FailedPrecondition(_))));
    }
}
