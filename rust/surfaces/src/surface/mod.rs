// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The normal surface value type.
//!
//! A [`NormalSurface`] is a coordinate vector plus the encoding that
//! explains its layout, tied to a frozen snapshot of the triangulation it
//! lives in. Vectors supplied without triangle coordinates are completed on
//! construction, so every stored surface carries its triangles explicitly.

mod arith;
pub(crate) mod cache;
mod ordering;
mod props;
mod reconstruct;
mod xml;

use std::sync::Arc;

use normal_triangulation::Triangulation;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::encoding::{NormalCoords, NormalEncoding};
use crate::error::{Error, Result};
use crate::integer::LargeInteger;
use crate::tables::{quad_meeting, QUAD_SEPARATING};
use crate::vector::NormalVector;

use cache::SurfaceCache;

/// A disc type within a particular tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscType {
    pub tet: usize,
    pub disc_type: usize,
}

/// A normal or almost normal surface in a triangulation.
#[derive(Debug, Clone)]
pub struct NormalSurface {
    pub(crate) tri: Arc<Triangulation>,
    pub(crate) enc: NormalEncoding,
    pub(crate) vector: NormalVector,
    pub(crate) name: String,
    pub(crate) cache: SurfaceCache,
}

impl NormalSurface {
    /// Builds a surface from a coordinate vector.
    ///
    /// The vector is assumed to satisfy the matching equations and is not
    /// checked. If the encoding has no triangle coordinates they are
    /// reconstructed here and the encoding is upgraded.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the vector length does not fit the
    /// encoding, or [`Error::UnsupportedOperation`] if triangle coordinates
    /// cannot be reconstructed.
    pub fn new(tri: Arc<Triangulation>, enc: NormalEncoding, vector: NormalVector) -> Result<Self> {
        let expected = enc.block_width() * tri.size();
        if vector.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "vector has {} coordinates but {} tetrahedra need {expected}",
                vector.len(),
                tri.size()
            )));
        }
        if enc.stores_triangles() {
            return Ok(Self::assemble(tri, enc, vector));
        }

        let full = reconstruct::reconstruct_triangles(&tri, enc, &vector)?;
        tracing::debug!(
            tets = tri.size(),
            enc = enc.int_value(),
            "reconstructed triangle coordinates"
        );
        Ok(Self::assemble(tri, enc.with_triangles(), full))
    }

    /// Convenience constructor from small integers.
    pub fn from_ints(tri: Arc<Triangulation>, coords: NormalCoords, values: &[i64]) -> Result<Self> {
        Self::new(tri, coords.into(), NormalVector::from_ints(values))
    }

    /// The empty surface.
    pub fn empty(tri: Arc<Triangulation>) -> Self {
        let enc = NormalEncoding::standard();
        let vector = NormalVector::zeros(enc.block_width() * tri.size());
        Self {
            tri,
            enc,
            vector,
            name: String::new(),
            cache: SurfaceCache::empty(),
        }
    }

    /// Internal constructor for vectors that already store triangles.
    pub(crate) fn assemble(tri: Arc<Triangulation>, enc: NormalEncoding, vector: NormalVector) -> Self {
        debug_assert!(enc.stores_triangles());
        debug_assert_eq!(vector.len(), enc.block_width() * tri.size());
        Self {
            tri,
            enc,
            vector,
            name: String::new(),
            cache: SurfaceCache::default(),
        }
    }

    /// Builds a surface in standard or almost normal coordinates from
    /// per-tetrahedron disc counts (four triangles, three quadrilaterals,
    /// three octagons).
    pub(crate) fn from_disc_counts(
        tri: Arc<Triangulation>,
        counts: &[[LargeInteger; 10]],
        with_octagons: bool,
    ) -> Self {
        let enc = if with_octagons {
            NormalEncoding::new(NormalCoords::AlmostNormal)
        } else {
            NormalEncoding::standard()
        };
        let width = enc.block_width();
        let vector = counts
            .iter()
            .flat_map(|block| block[..width].iter().cloned())
            .collect();
        Self::assemble(tri, enc, vector)
    }

    /// A copy of this surface inside another triangulation with identical
    /// gluings. Cached properties carry over.
    pub fn relocate(&self, tri: Arc<Triangulation>) -> Result<Self> {
        if !tri.is_identical_to(&self.tri) {
            return Err(Error::InvalidArgument(
                "target triangulation is not combinatorially identical".into(),
            ));
        }
        Ok(Self {
            tri,
            ..self.clone()
        })
    }

    // --- Basic access ---

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.tri
    }

    pub fn encoding(&self) -> NormalEncoding {
        self.enc
    }

    pub fn vector(&self) -> &NormalVector {
        &self.vector
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn could_be_almost_normal(&self) -> bool {
        self.enc.could_be_almost_normal()
    }

    pub fn could_be_non_compact(&self) -> bool {
        self.enc.could_be_non_compact()
    }

    fn offset(&self, tet: usize) -> usize {
        tet * self.enc.block_width()
    }

    // --- Disc counts ---

    /// Triangular discs at corner `vertex` of tetrahedron `tet`.
    pub fn triangles(&self, tet: usize, vertex: usize) -> LargeInteger {
        self.vector[self.offset(tet) + vertex].clone()
    }

    /// Quadrilateral discs of type `quad_type` in tetrahedron `tet`.
    pub fn quads(&self, tet: usize, quad_type: usize) -> LargeInteger {
        self.vector[self.offset(tet) + 4 + quad_type].clone()
    }

    /// Octagonal discs of type `oct_type` in tetrahedron `tet`; zero when
    /// the encoding stores no octagons.
    pub fn octs(&self, tet: usize, oct_type: usize) -> LargeInteger {
        if self.enc.stores_octagons() {
            self.vector[self.offset(tet) + 7 + oct_type].clone()
        } else {
            LargeInteger::zero()
        }
    }

    /// Number of times the surface meets edge `edge`.
    pub fn edge_weight(&self, edge: usize) -> LargeInteger {
        let emb = self.tri.edge(edge).front();
        self.local_edge_weight(emb.tet, emb.vertices.image(0), emb.vertices.image(1))
    }

    pub(crate) fn local_edge_weight(&self, tet: usize, a: usize, b: usize) -> LargeInteger {
        let mut weight = &self.triangles(tet, a) + &self.triangles(tet, b);
        for k in quad_meeting(a, b) {
            weight += &self.quads(tet, k);
        }
        if self.enc.stores_octagons() {
            for k in 0..3 {
                weight += &self.octs(tet, k);
            }
            weight += &self.octs(tet, QUAD_SEPARATING[a][b]);
        }
        weight
    }

    /// Normal arcs in triangle `triangle` that cut off its vertex `vertex`.
    pub fn arcs(&self, triangle: usize, vertex: usize) -> LargeInteger {
        let emb = self.tri.triangle(triangle).front();
        let v = emb.vertices.image(vertex);
        let back = emb.vertices.image(3);
        let mut count = &self.triangles(emb.tet, v) + &self.quads(emb.tet, QUAD_SEPARATING[v][back]);
        if self.enc.stores_octagons() {
            for k in quad_meeting(v, back) {
                count += &self.octs(emb.tet, k);
            }
        }
        count
    }

    /// The first tetrahedron and type holding an octagon, if any.
    pub fn oct_position(&self) -> Option<DiscType> {
        if !self.enc.stores_octagons() {
            return None;
        }
        *self.cache.oct_position.get_or_init(|| {
            (0..self.tri.size()).find_map(|tet| {
                (0..3)
                    .find(|&k| !self.octs(tet, k).is_zero())
                    .map(|disc_type| DiscType { tet, disc_type })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_triangulation::samples;

    fn snap(tri: Triangulation) -> Arc<Triangulation> {
        tri.snapshot()
    }

    #[test]
    fn empty_surface_in_one_tetrahedron() {
        let s = NormalSurface::empty(snap(samples::closed_one_tet()));
        assert_eq!(s.vector().len(), 7);
        assert!(s.vector().is_zero());
        assert_eq!(s.encoding().block_width(), 7);
        assert_eq!(s.oct_position(), None);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let tri = snap(samples::closed_one_tet());
        let err = NormalSurface::from_ints(tri, NormalCoords::Standard, &[1, 1, 1, 1]);
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn quad_vectors_gain_triangles() {
        let tri = snap(samples::folded_tetrahedron());
        let s = NormalSurface::from_ints(tri, NormalCoords::Quad, &[0, 1, 0]).unwrap();
        assert!(s.encoding().stores_triangles());
        assert!(s.could_be_non_compact());
        assert_eq!(s.encoding().block_width(), 7);
        let tris: Vec<_> = (0..4).map(|v| s.triangles(0, v)).collect();
        assert_eq!(tris, [1, 1, 0, 0].map(LargeInteger::new));
    }

    #[test]
    fn edge_weights_and_arcs() {
        let tri = snap(samples::folded_tetrahedron());
        let s = NormalSurface::from_ints(tri.clone(), NormalCoords::Quad, &[0, 0, 2]).unwrap();
        let weights: Vec<_> = (0..tri.count_edges()).map(|e| s.edge_weight(e)).collect();
        assert_eq!(weights, [2, 2, 0].map(LargeInteger::new));

        let link = NormalSurface::from_ints(
            tri.clone(),
            NormalCoords::Standard,
            &[1, 1, 1, 1, 0, 0, 0],
        )
        .unwrap();
        for t in 0..tri.count_triangles() {
            for v in 0..3 {
                assert_eq!(link.arcs(t, v), LargeInteger::new(1));
            }
        }
    }

    #[test]
    fn octagon_position_is_found() {
        let tri = snap(samples::ball());
        let s = NormalSurface::from_ints(
            tri,
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        )
        .unwrap();
        assert_eq!(s.oct_position(), Some(DiscType { tet: 0, disc_type: 1 }));
        assert_eq!(s.octs(0, 1), LargeInteger::new(1));
    }

    #[test]
    fn relocate_requires_identical_gluings() {
        let s = NormalSurface::empty(snap(samples::ball()));
        let same = samples::ball().snapshot();
        let moved = s.relocate(same.clone()).unwrap();
        assert!(Arc::ptr_eq(moved.triangulation(), &same));
        assert!(s.relocate(snap(samples::closed_one_tet())).is_err());
    }
}
