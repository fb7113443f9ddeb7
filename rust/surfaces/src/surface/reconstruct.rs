// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recovering triangle coordinates from quadrilateral (and octagon)
//! coordinates.
//!
//! Across a face glued between corner `(t, v)` and corner `(t', v')`, the
//! arcs at the two corners must agree. This fixes the difference between
//! the triangle counts at the two corners, so walking around a vertex link
//! determines every triangle count up to one additive constant per vertex.
//! The constant is chosen to make the smallest count zero.

use std::collections::VecDeque;

use dashu::integer::IBig;
use normal_triangulation::Triangulation;

use crate::encoding::NormalEncoding;
use crate::error::{Error, Result};
use crate::integer::LargeInteger;
use crate::tables::{quad_meeting, QUAD_SEPARATING};
use crate::vector::NormalVector;

/// Returns the vector in the layout of `enc.with_triangles()`.
pub(crate) fn reconstruct_triangles(
    tri: &Triangulation,
    enc: NormalEncoding,
    vector: &NormalVector,
) -> Result<NormalVector> {
    let n = tri.size();
    let width = enc.block_width();
    let octs = enc.stores_octagons();

    let finite = |i: usize| -> Result<&IBig> {
        vector[i].finite().ok_or_else(|| {
            Error::UnsupportedOperation("infinite quadrilateral or octagon coordinate".into())
        })
    };

    // Non-triangle discs at corner v of face f.
    let corner_weight = |t: usize, v: usize, f: usize| -> Result<IBig> {
        let base = t * width;
        let mut w = finite(base + QUAD_SEPARATING[v][f])?.clone();
        if octs {
            for k in quad_meeting(v, f) {
                w += finite(base + 3 + k)?;
            }
        }
        Ok(w)
    };

    let mut value: Vec<Option<IBig>> = vec![None; 4 * n];
    let mut infinite = vec![false; 4 * n];
    let mut queue = VecDeque::new();

    for start in 0..4 * n {
        if value[start].is_some() {
            continue;
        }
        value[start] = Some(IBig::ZERO);
        queue.push_back(start);
        let mut members = vec![start];
        let mut consistent = true;

        while let Some(corner) = queue.pop_front() {
            let (t, v) = (corner / 4, corner % 4);
            let here = value[corner].clone().unwrap_or_default();
            for f in (0..4).filter(|&f| f != v) {
                let Some(gluing) = tri.gluing(t, f) else {
                    continue;
                };
                let (o, ov, of) = (gluing.tet, gluing.perm.image(v), gluing.perm.image(f));
                let there = &here + corner_weight(t, v, f)? - corner_weight(o, ov, of)?;
                let other = 4 * o + ov;
                match &value[other] {
                    None => {
                        value[other] = Some(there);
                        members.push(other);
                        queue.push_back(other);
                    }
                    Some(existing) if *existing != there => consistent = false,
                    Some(_) => {}
                }
            }
        }

        if consistent {
            let min = members
                .iter()
                .filter_map(|&m| value[m].clone())
                .min()
                .unwrap_or_default();
            for &m in &members {
                if let Some(x) = value[m].as_mut() {
                    *x -= &min;
                }
            }
        } else {
            let vertex = tri.tetrahedron_vertex(start / 4, start % 4);
            if !(enc.could_be_non_compact() && tri.vertex(vertex).is_ideal()) {
                return Err(Error::UnsupportedOperation(format!(
                    "matching equations around vertex {vertex} are inconsistent"
                )));
            }
            tracing::debug!(vertex, "vertex link is non-compact, triangles are infinite");
            for &m in &members {
                infinite[m] = true;
            }
        }
    }

    let full_width = enc.with_triangles().block_width();
    let mut out = Vec::with_capacity(full_width * n);
    for t in 0..n {
        for v in 0..4 {
            let corner = 4 * t + v;
            out.push(if infinite[corner] {
                LargeInteger::Infinity
            } else {
                LargeInteger::Finite(value[corner].clone().unwrap_or_default())
            });
        }
        out.extend(vector.as_slice()[t * width..(t + 1) * width].iter().cloned());
    }
    Ok(NormalVector::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::NormalCoords;
    use normal_triangulation::samples;

    fn tris(v: &NormalVector, t: usize) -> Vec<i64> {
        (0..4).map(|i| v[7 * t + i].to_i64().unwrap()).collect()
    }

    #[test]
    fn folded_tetrahedron_quads() {
        let tri = samples::folded_tetrahedron();
        let enc = NormalEncoding::new(NormalCoords::Quad);

        let a = reconstruct_triangles(&tri, enc, &NormalVector::from_ints(&[0, 1, 0])).unwrap();
        assert_eq!(tris(&a, 0), [1, 1, 0, 0]);
        let b = reconstruct_triangles(&tri, enc, &NormalVector::from_ints(&[1, 0, 0])).unwrap();
        assert_eq!(tris(&b, 0), [0, 0, 1, 1]);
        assert_eq!(b[4], LargeInteger::new(1));
    }

    #[test]
    fn closed_surfaces_have_no_triangles() {
        let tri = samples::closed_one_tet();
        let enc = NormalEncoding::new(NormalCoords::QuadClosed);
        let v = reconstruct_triangles(&tri, enc, &NormalVector::from_ints(&[0, 2, 0])).unwrap();
        assert_eq!(tris(&v, 0), [0, 0, 0, 0]);
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn inconsistent_vector_is_unsupported() {
        let tri = samples::closed_one_tet();
        let enc = NormalEncoding::new(NormalCoords::QuadClosed);
        let r = reconstruct_triangles(&tri, enc, &NormalVector::from_ints(&[1, 0, 0]));
        assert!(matches!(r, Err(Error::UnsupportedOperation(_))));
    }
}
