// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numbering of the edges and faces inside a single tetrahedron.
//!
//! Edges are numbered 0 = 01, 1 = 02, 2 = 03, 3 = 12, 4 = 13, 5 = 23, so
//! edge `i` is opposite edge `5 - i`. Face `f` is the face opposite vertex `f`.

use crate::perm::Perm4;

/// Endpoints of each tetrahedron edge, smaller vertex first.
pub const EDGE_VERTEX: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// The edge joining vertices `a` and `b` (`a != b`).
pub const fn edge_number(a: usize, b: usize) -> usize {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    match (lo, hi) {
        (0, 1) => 0,
        (0, 2) => 1,
        (0, 3) => 2,
        (1, 2) => 3,
        (1, 3) => 4,
        _ => 5,
    }
}

/// An even permutation sending 0, 1 to the endpoints of edge `e` (in
/// increasing order) and 2, 3 to the remaining vertices.
pub fn edge_ordering(e: usize) -> Perm4 {
    let [a, b] = EDGE_VERTEX[e];
    let [c, d] = EDGE_VERTEX[5 - e];
    let p = Perm4::from_vertices(a, b, c, d);
    if p.sign() == 1 {
        p
    } else {
        Perm4::from_vertices(a, b, d, c)
    }
}

/// A permutation sending 0, 1, 2 to the vertices of face `f` in increasing
/// order, and 3 to `f` itself.
pub fn face_ordering(f: usize) -> Perm4 {
    let mut images = [0usize; 4];
    let mut pos = 0;
    for v in 0..4 {
        if v != f {
            images[pos] = v;
            pos += 1;
        }
    }
    images[3] = f;
    Perm4::from_vertices(images[0], images[1], images[2], images[3])
}

/// The two faces containing edge `e`: the faces opposite its non-endpoints.
pub fn faces_of_edge(e: usize) -> [usize; 2] {
    EDGE_VERTEX[5 - e]
}
