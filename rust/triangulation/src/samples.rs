// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Small hand-built triangulations.

use crate::perm::Perm4;
use crate::triangulation::Triangulation;

/// A single tetrahedron with no gluings: a 3-ball with four vertices.
pub fn ball() -> Triangulation {
    let mut tri = Triangulation::new();
    tri.new_tetrahedron();
    tri
}

/// A closed orientable one-vertex triangulation with one tetrahedron and
/// edges of degree 4 and 2.
pub fn closed_one_tet() -> Triangulation {
    let mut tri = Triangulation::new();
    let t = tri.new_tetrahedron();
    let cycle = Perm4::from_images([1, 2, 3, 0]);
    tri.glue_fixed(t, 0, t, cycle);
    tri.glue_fixed(t, 2, t, cycle);
    tri
}

/// The figure-eight knot complement: two ideal tetrahedra, one torus cusp.
pub fn figure_eight() -> Triangulation {
    let mut tri = Triangulation::new();
    let r = tri.new_tetrahedron();
    let s = tri.new_tetrahedron();
    let gluings = [
        (0, [1, 3, 0, 2]),
        (1, [2, 0, 3, 1]),
        (2, [0, 3, 2, 1]),
        (3, [2, 1, 0, 3]),
    ];
    for (face, images) in gluings {
        tri.glue_fixed(r, face, s, Perm4::from_images(images));
    }
    tri
}

/// One tetrahedron with face 0 folded onto face 1, leaving faces 2 and 3 on
/// the boundary. All four vertices are identified.
pub fn folded_tetrahedron() -> Triangulation {
    let mut tri = Triangulation::new();
    let t = tri.new_tetrahedron();
    tri.glue_fixed(t, 0, t, Perm4::from_images([1, 3, 0, 2]));
    tri
}

/// Disjoint union of the given triangulations, in order.
pub fn disjoint_union(pieces: &[Triangulation]) -> Triangulation {
    let mut tri = Triangulation::new();
    for piece in pieces {
        tri.insert_triangulation(piece);
    }
    tri
}
