// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction and surgery on triangulations.
//!
//! Every gluing is stored from both sides, and every change invalidates the
//! cached skeleton and detaches any peripheral-curve provider.

use crate::error::{Error, Result};
use crate::graph::DualGraph;
use crate::perm::Perm4;
use crate::triangulation::*;

impl Triangulation {
    /// Adds a new tetrahedron with no gluings and returns its index.
    pub fn new_tetrahedron(&mut self) -> usize {
        self.invalidate();
        self.tets.push(TetrahedronData::default());
        self.tets.len() - 1
    }

    /// Adds `n` new tetrahedra and returns the index of the first.
    pub fn new_tetrahedra(&mut self, n: usize) -> usize {
        self.invalidate();
        let first = self.tets.len();
        self.tets
            .extend(std::iter::repeat_with(TetrahedronData::default).take(n));
        first
    }

    /// Glues face `face` of `tet` to face `perm[face]` of `other`, with
    /// vertex `v` of `tet` meeting vertex `perm[v]` of `other`.
    pub fn join(&mut self, tet: usize, face: usize, other: usize, perm: Perm4) -> Result<()> {
        self.check_tet(tet)?;
        self.check_tet(other)?;
        if face > 3 {
            return Err(Error::FaceOutOfRange(face));
        }
        let other_face = perm.image(face);
        if tet == other && other_face == face {
            return Err(Error::InvalidGluing { tet, face });
        }
        if self.tets[tet].adj[face].is_some() {
            return Err(Error::FaceAlreadyGlued { tet, face });
        }
        if self.tets[other].adj[other_face].is_some() {
            return Err(Error::FaceAlreadyGlued {
                tet: other,
                face: other_face,
            });
        }

        self.invalidate();
        self.tets[tet].adj[face] = Some(Gluing { tet: other, perm });
        self.tets[other].adj[other_face] = Some(Gluing {
            tet,
            perm: perm.inverse(),
        });
        Ok(())
    }

    /// Records a gluing whose validity is known in advance.
    pub(crate) fn glue_fixed(&mut self, tet: usize, face: usize, other: usize, perm: Perm4) {
        self.invalidate();
        self.tets[tet].adj[face] = Some(Gluing { tet: other, perm });
        self.tets[other].adj[perm.image(face)] = Some(Gluing {
            tet,
            perm: perm.inverse(),
        });
    }

    /// Unglues face `face` of `tet` (and its partner). Returns the tetrahedron
    /// it was glued to, if any.
    pub fn unjoin(&mut self, tet: usize, face: usize) -> Result<Option<usize>> {
        self.check_tet(tet)?;
        if face > 3 {
            return Err(Error::FaceOutOfRange(face));
        }
        let Some(gluing) = self.tets[tet].adj[face].take() else {
            return Ok(None);
        };
        self.invalidate();
        self.tets[gluing.tet].adj[gluing.perm.image(face)] = None;
        Ok(Some(gluing.tet))
    }

    /// Unglues every face of `tet`.
    pub fn isolate(&mut self, tet: usize) -> Result<()> {
        for face in 0..4 {
            self.unjoin(tet, face)?;
        }
        Ok(())
    }

    /// Removes tetrahedron `tet` after ungluing it; later tetrahedra move
    /// down by one.
    pub fn remove_tetrahedron_at(&mut self, tet: usize) -> Result<()> {
        self.isolate(tet)?;
        self.invalidate();
        self.tets.remove(tet);
        for data in &mut self.tets {
            for gluing in data.adj.iter_mut().flatten() {
                if gluing.tet > tet {
                    gluing.tet -= 1;
                }
            }
        }
        Ok(())
    }

    /// Appends a copy of `other`, renumbered to follow the existing
    /// tetrahedra. Returns the index of the first copied tetrahedron.
    pub fn insert_triangulation(&mut self, other: &Triangulation) -> usize {
        self.invalidate();
        let offset = self.tets.len();
        for data in &other.tets {
            let mut copy = data.clone();
            for gluing in copy.adj.iter_mut().flatten() {
                gluing.tet += offset;
            }
            self.tets.push(copy);
        }
        offset
    }

    /// Splits into connected components, each renumbered from zero in the
    /// BFS order of the dual graph.
    pub fn triangulate_components(&self) -> Vec<Triangulation> {
        let components = DualGraph::new(self).connected_components();
        let mut position = vec![0usize; self.tets.len()];
        for tets in &components {
            for (i, &t) in tets.iter().enumerate() {
                position[t] = i;
            }
        }
        components
            .iter()
            .map(|tets| {
                let mut piece = Triangulation::new();
                piece.tets = tets
                    .iter()
                    .map(|&t| {
                        let mut data = self.tets[t].clone();
                        for gluing in data.adj.iter_mut().flatten() {
                            gluing.tet = position[gluing.tet];
                        }
                        data
                    })
                    .collect();
                piece
            })
            .collect()
    }

    fn check_tet(&self, tet: usize) -> Result<()> {
        if tet >= self.tets.len() {
            return Err(Error::TetrahedronOutOfRange {
                index: tet,
                size: self.tets.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(images: [u8; 4]) -> Perm4 {
        Perm4::new(images).unwrap()
    }

    // --- Gluing tests ---

    #[test]
    fn join_records_both_sides() {
        let mut tri = Triangulation::new();
        let a = tri.new_tetrahedron();
        let b = tri.new_tetrahedron();
        let p = perm([1, 0, 3, 2]);
        tri.join(a, 2, b, p).unwrap();

        assert_eq!(tri.adjacent_tetrahedron(a, 2), Some(b));
        assert_eq!(tri.adjacent_tetrahedron(b, 3), Some(a));
        assert_eq!(tri.adjacent_gluing(b, 3), Some(p.inverse()));
    }

    #[test]
    fn join_rejects_conflicts() {
        let mut tri = Triangulation::new();
        let a = tri.new_tetrahedron();
        let b = tri.new_tetrahedron();
        tri.join(a, 0, b, Perm4::IDENTITY).unwrap();

        assert!(matches!(
            tri.join(a, 0, b, perm([1, 0, 2, 3])),
            Err(Error::FaceAlreadyGlued { tet: 0, face: 0 })
        ));
        assert!(matches!(
            tri.join(a, 1, a, Perm4::IDENTITY),
            Err(Error::InvalidGluing { .. })
        ));
        assert!(matches!(
            tri.join(a, 1, 7, Perm4::IDENTITY),
            Err(Error::TetrahedronOutOfRange { index: 7, size: 2 })
        ));
    }

    #[test]
    fn unjoin_clears_partner() {
        let mut tri = Triangulation::new();
        let a = tri.new_tetrahedron();
        tri.join(a, 0, a, perm([1, 3, 0, 2])).unwrap();
        assert_eq!(tri.unjoin(a, 1).unwrap(), Some(a));
        assert!(tri.tetrahedron(a).unwrap().is_boundary(0));
        assert!(tri.tetrahedron(a).unwrap().is_boundary(1));
        assert_eq!(tri.unjoin(a, 1).unwrap(), None);
    }

    // --- Removal tests ---

    #[test]
    fn remove_renumbers_later_tetrahedra() {
        let mut tri = Triangulation::new();
        tri.new_tetrahedra(3);
        tri.join(0, 0, 1, Perm4::IDENTITY).unwrap();
        tri.join(1, 1, 2, Perm4::IDENTITY).unwrap();
        tri.join(2, 2, 0, Perm4::IDENTITY).unwrap();

        tri.remove_tetrahedron_at(1).unwrap();
        assert_eq!(tri.size(), 2);
        // old tetrahedron 2 is now 1, still glued to 0
        assert_eq!(tri.adjacent_tetrahedron(1, 2), Some(0));
        assert_eq!(tri.adjacent_tetrahedron(0, 2), Some(1));
        assert_eq!(tri.adjacent_tetrahedron(0, 0), None);
    }

    #[test]
    fn insert_triangulation_offsets_gluings() {
        let mut one = Triangulation::new();
        let t = one.new_tetrahedron();
        one.join(t, 0, t, perm([1, 3, 0, 2])).unwrap();

        let mut both = one.clone();
        let offset = both.insert_triangulation(&one);
        assert_eq!(offset, 1);
        assert_eq!(both.adjacent_tetrahedron(1, 0), Some(1));
        assert_eq!(both.count_components(), 2);
    }

    #[test]
    fn components_are_renumbered() {
        let mut tri = Triangulation::new();
        tri.new_tetrahedra(3);
        tri.join(0, 0, 2, Perm4::IDENTITY).unwrap();

        let pieces = tri.triangulate_components();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].size(), 2);
        assert_eq!(pieces[0].adjacent_tetrahedron(0, 0), Some(1));
        assert_eq!(pieces[0].adjacent_tetrahedron(1, 0), Some(0));
        assert_eq!(pieces[1].size(), 1);
        assert!(pieces[1].tetrahedron(0).unwrap().is_boundary(0));
    }
}
