// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Replacing octagons by normal discs.
//!
//! A tetrahedron holding octagons of type `k` is split into three along two
//! parallel quadrilaterals of type `k`. The outer tetrahedra take over the
//! faces of the original that meet edge `5 - k` and edge `k` respectively;
//! the middle one keeps the octagons, which are now a quadrilateral plus two
//! triangles on each side.

use normal_triangulation::{Perm4, Triangulation, EDGE_VERTEX};
use num_traits::Zero;

use crate::error::Result;
use crate::integer::LargeInteger;
use crate::surface::NormalSurface;

/// Moves the gluings on faces `faces` of `from` over to `to`. A face glued
/// to the other face in `faces` stays glued to `to`; any other self-gluing
/// lands on `other`.
fn move_faces(
    tri: &mut Triangulation,
    from: usize,
    to: usize,
    other: usize,
    faces: [usize; 2],
) -> Result<()> {
    for j in 0..2 {
        let face = faces[j];
        let Some(gluing) = tri.gluing(from, face) else {
            continue;
        };
        tri.unjoin(from, face)?;
        let target = if gluing.tet != from {
            gluing.tet
        } else if gluing.perm.image(face) == faces[j ^ 1] {
            to
        } else {
            other
        };
        tri.join(to, face, target, gluing.perm)?;
    }
    Ok(())
}

impl NormalSurface {
    /// An isotopic normal surface inside a subdivision of the triangulation
    /// in which every octagon has been removed. Each tetrahedron with
    /// octagons gains two new neighbours, appended in order.
    ///
    /// Without octagons the result is a standard-coordinate copy in the same
    /// triangulation. Either way the result keeps the surface's name.
    pub fn remove_octs(&self) -> Result<NormalSurface> {
        let n = self.tri.size();
        let mut blocks: Vec<[LargeInteger; 10]> = (0..n)
            .map(|t| {
                std::array::from_fn(|i| match i {
                    0..=3 => self.triangles(t, i),
                    4..=6 => self.quads(t, i - 4),
                    _ => LargeInteger::zero(),
                })
            })
            .collect();

        let with_octs: Vec<(usize, usize, LargeInteger)> = (0..n)
            .filter_map(|t| {
                (0..3)
                    .map(|k| (k, self.octs(t, k)))
                    .find(|(_, c)| !c.is_zero())
                    .map(|(k, c)| (t, k, c))
            })
            .collect();
        if with_octs.is_empty() {
            let mut copy = NormalSurface::from_disc_counts(self.tri.clone(), &blocks, false);
            copy.name = self.name.clone();
            return Ok(copy);
        }

        let mut tri = (*self.tri).clone();
        for (b, k, count) in &with_octs {
            let (b, k) = (*b, *k);
            let a = tri.new_tetrahedron();
            let c = tri.new_tetrahedron();
            let a_faces = EDGE_VERTEX[5 - k];
            let c_faces = EDGE_VERTEX[k];

            move_faces(&mut tri, b, a, c, a_faces)?;
            move_faces(&mut tri, b, c, a, c_faces)?;
            let swap = Perm4::transposition(a_faces[0], a_faces[1]);
            tri.join(b, c_faces[0], a, swap)?;
            tri.join(b, c_faces[1], a, swap)?;
            tri.join(b, a_faces[0], c, swap)?;
            tri.join(b, a_faces[1], c, swap)?;

            let mut outer: [LargeInteger; 10] = Default::default();
            outer[..4].clone_from_slice(&blocks[b][..4]);
            let mut block_a = outer.clone();
            let mut block_c = outer;
            for v in c_faces {
                block_a[v] += count;
            }
            for v in a_faces {
                block_c[v] += count;
            }

            let middle = &mut blocks[b];
            middle.swap(a_faces[0], a_faces[1]);
            middle[4 + k] += count;
            blocks.push(block_a);
            blocks.push(block_c);
        }

        tracing::debug!(
            octagon_tets = with_octs.len(),
            tets = tri.size(),
            "removed octagons"
        );
        let mut normal = NormalSurface::from_disc_counts(tri.snapshot(), &blocks, false);
        normal.name = self.name.clone();
        Ok(normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::NormalCoords;
    use normal_triangulation::samples;

    #[test]
    fn single_octagon_in_a_ball() {
        let tri = samples::ball().snapshot();
        let s = NormalSurface::from_ints(
            tri,
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        )
        .unwrap();
        let normal = s.remove_octs().unwrap();
        let sub = normal.triangulation();
        assert_eq!(sub.size(), 3);
        assert!(sub.is_valid());
        assert!(!normal.encoding().stores_octagons());
        assert!(normal.normal());
        assert!(normal.embedded());
        assert_eq!(normal.euler_char(), LargeInteger::new(1));
        assert_eq!(normal.quads(0, 1), LargeInteger::new(1));
        // faces 1 and 3 of the old tetrahedron now belong to the first new
        // one, which is glued to the middle along faces 0 and 2
        let first = sub.tetrahedron(1).unwrap();
        assert!(first.is_boundary(1) && first.is_boundary(3));
        assert_eq!(sub.adjacent_tetrahedron(1, 0), Some(0));
        assert_eq!(sub.adjacent_tetrahedron(1, 2), Some(0));
        assert!((0..4).all(|f| !sub.tetrahedron(0).unwrap().is_boundary(f)));
    }

    #[test]
    fn subdivided_copy_keeps_name() {
        let tri = samples::ball().snapshot();
        let mut s = NormalSurface::from_ints(
            tri,
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        )
        .unwrap();
        s.set_name("octagonal disc");
        assert_eq!(s.remove_octs().unwrap().name(), "octagonal disc");
    }

    #[test]
    fn octagon_next_to_a_fold() {
        let tri = samples::folded_tetrahedron().snapshot();
        let s = NormalSurface::from_ints(
            tri.clone(),
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 1, 0, 0],
        )
        .unwrap();
        let normal = s.remove_octs().unwrap();
        assert_eq!(normal.triangulation().size(), 3);
        assert_eq!(
            normal.triangulation().count_components(),
            tri.count_components()
        );
        assert!(normal.normal());
    }

    #[test]
    fn normal_surfaces_are_copied() {
        let tri = samples::closed_one_tet().snapshot();
        let mut s =
            NormalSurface::from_ints(tri.clone(), NormalCoords::Standard, &[1, 1, 1, 1, 0, 0, 0])
                .unwrap();
        s.set_name("link");
        let copy = s.remove_octs().unwrap();
        assert!(std::sync::Arc::ptr_eq(copy.triangulation(), &tri));
        assert_eq!(copy, s);
        assert_eq!(copy.name(), "link");
    }
}
