// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disc-type numbering inside a tetrahedron.
//!
//! Quadrilateral (and octagon) type `k` separates edge `k` from edge `5 - k`:
//! type 0 splits {0,1} from {2,3}, type 1 splits {0,2} from {1,3}, type 2
//! splits {0,3} from {1,2}. Octagon type `k` meets the two edges that
//! quadrilateral type `k` misses twice each.

/// `QUAD_SEPARATING[a][b]` is the quadrilateral type that keeps vertices `a`
/// and `b` on the same side. The diagonal is meaningless.
pub const QUAD_SEPARATING: [[usize; 4]; 4] = [
    [usize::MAX, 0, 1, 2],
    [0, usize::MAX, 2, 1],
    [1, 2, usize::MAX, 0],
    [2, 1, 0, usize::MAX],
];

/// `QUAD_DEFN[k]` lists the vertices of quadrilateral type `k`: the first
/// two lie on one side, the last two on the other.
pub const QUAD_DEFN: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// `QUAD_PARTNER[k][v]` is the vertex on the same side as `v` for type `k`.
pub const QUAD_PARTNER: [[usize; 4]; 3] = [[1, 0, 3, 2], [2, 3, 0, 1], [3, 2, 1, 0]];

/// The two quadrilateral types that cut edge `ab`.
pub fn quad_meeting(a: usize, b: usize) -> [usize; 2] {
    match QUAD_SEPARATING[a][b] {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}

/// Whether vertex `v` lies on the same side as vertex 0 for disc type `k`.
pub fn on_vertex_zero_side(k: usize, v: usize) -> bool {
    v == 0 || v == QUAD_PARTNER[k][0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_triangulation::{edge_number, EDGE_VERTEX};

    #[test]
    fn separating_matches_edge_numbering() {
        for k in 0..3 {
            let [a, b] = EDGE_VERTEX[k];
            let [c, d] = EDGE_VERTEX[5 - k];
            assert_eq!(QUAD_SEPARATING[a][b], k);
            assert_eq!(QUAD_SEPARATING[c][d], k);
            assert_eq!(edge_number(QUAD_DEFN[k][0], QUAD_DEFN[k][1]), k);
        }
    }

    #[test]
    fn meeting_types_cut_the_edge() {
        for a in 0..4 {
            for b in 0..4 {
                if a == b {
                    continue;
                }
                for k in quad_meeting(a, b) {
                    assert_ne!(on_vertex_zero_side(k, a), on_vertex_zero_side(k, b));
                }
            }
        }
    }
}
