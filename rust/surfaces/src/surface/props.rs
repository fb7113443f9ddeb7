// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural predicates and invariants.

use num_traits::{One, Zero};

use super::NormalSurface;
use crate::config::EngineConfig;
use crate::discs::{self, DiscAnalysis, DiscCounts};
use crate::error::{Error, Result};
use crate::integer::LargeInteger;

impl NormalSurface {
    pub fn is_empty(&self) -> bool {
        self.vector.is_zero()
    }

    /// No coordinate is infinite.
    pub fn is_compact(&self) -> bool {
        self.cache
            .compact
            .get_or(|| self.vector.iter().all(LargeInteger::is_finite))
    }

    /// At most one quadrilateral or octagon type in each tetrahedron, and at
    /// most one octagon type overall.
    pub fn embedded(&self) -> bool {
        let mut oct_types = 0;
        for t in 0..self.tri.size() {
            let mut types = (0..3).filter(|&k| !self.quads(t, k).is_zero()).count();
            let octs = (0..3).filter(|&k| !self.octs(t, k).is_zero()).count();
            types += octs;
            oct_types += octs;
            if types > 1 || oct_types > 1 {
                return false;
            }
        }
        true
    }

    /// Contains no octagons, whatever the encoding allows.
    pub fn normal(&self) -> bool {
        self.oct_position().is_none()
    }

    /// Whether the two surfaces together still satisfy the quadrilateral and
    /// octagon constraints.
    pub fn locally_compatible(&self, other: &NormalSurface) -> Result<bool> {
        self.check_same_triangulation(other)?;
        let mut oct_types = 0;
        for t in 0..self.tri.size() {
            let quads = (0..3)
                .filter(|&k| !self.quads(t, k).is_zero() || !other.quads(t, k).is_zero())
                .count();
            let octs = (0..3)
                .filter(|&k| !self.octs(t, k).is_zero() || !other.octs(t, k).is_zero())
                .count();
            oct_types += octs;
            if quads + octs > 1 || oct_types > 1 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether the surface meets the real boundary of the triangulation.
    pub fn has_real_boundary(&self) -> bool {
        self.cache.real_boundary.get_or(|| {
            if !self.tri.has_boundary_triangles() {
                return false;
            }
            for t in 0..self.tri.size() {
                let boundary: Vec<usize> = (0..4)
                    .filter(|&f| self.tri.gluing(t, f).is_none())
                    .collect();
                if boundary.is_empty() {
                    continue;
                }
                if (0..3).any(|k| !self.quads(t, k).is_zero() || !self.octs(t, k).is_zero()) {
                    return true;
                }
                // a triangle meets every face except the one opposite its
                // corner
                for v in 0..4 {
                    if !self.triangles(t, v).is_zero() && boundary.iter().any(|&f| f != v) {
                        return true;
                    }
                }
            }
            false
        })
    }

    /// Euler characteristic, or infinity for a non-compact surface.
    pub fn euler_char(&self) -> LargeInteger {
        self.cache
            .euler
            .get_or_init(|| {
                if !self.is_compact() {
                    return LargeInteger::Infinity;
                }
                let mut vertices = LargeInteger::zero();
                for e in 0..self.tri.count_edges() {
                    vertices += &self.edge_weight(e);
                }
                let mut edges = LargeInteger::zero();
                for f in 0..self.tri.count_triangles() {
                    for v in 0..3 {
                        edges += &self.arcs(f, v);
                    }
                }
                let mut faces = LargeInteger::zero();
                for x in self.vector.iter() {
                    faces += x;
                }
                match (vertices, edges, faces) {
                    (
                        LargeInteger::Finite(v),
                        LargeInteger::Finite(e),
                        LargeInteger::Finite(f),
                    ) => LargeInteger::Finite(v - e + f),
                    _ => LargeInteger::Infinity,
                }
            })
            .clone()
    }

    pub(crate) fn require_compact_embedded(&self, what: &str) -> Result<()> {
        if !self.is_compact() {
            return Err(Error::FailedPrecondition(format!(
                "{what} needs a compact surface"
            )));
        }
        if !self.embedded() {
            return Err(Error::FailedPrecondition(format!(
                "{what} needs an embedded surface"
            )));
        }
        Ok(())
    }

    pub(crate) fn disc_analysis(&self, config: &EngineConfig) -> Result<(DiscCounts, DiscAnalysis)> {
        let counts = DiscCounts::of(self, config.max_discs)?;
        let analysis = discs::analyse(&self.tri, &counts)?;
        self.cache.orientable.set(analysis.orientable);
        self.cache.two_sided.set(analysis.two_sided);
        self.cache.connected.set(analysis.components <= 1);
        Ok((counts, analysis))
    }

    fn disc_flag(&self, what: &str, pick: impl Fn(&DiscAnalysis) -> bool) -> Result<bool> {
        self.require_compact_embedded(what)?;
        let (_, analysis) = self.disc_analysis(EngineConfig::shared())?;
        Ok(pick(&analysis))
    }

    /// # Errors
    ///
    /// [`Error::FailedPrecondition`] unless the surface is compact and
    /// embedded.
    pub fn is_orientable(&self) -> Result<bool> {
        if let Some(v) = self.cache.orientable.get() {
            return Ok(v);
        }
        self.disc_flag("orientability", |a| a.orientable)
    }

    pub fn is_two_sided(&self) -> Result<bool> {
        if let Some(v) = self.cache.two_sided.get() {
            return Ok(v);
        }
        self.disc_flag("two-sidedness", |a| a.two_sided)
    }

    pub fn is_connected(&self) -> Result<bool> {
        if let Some(v) = self.cache.connected.get() {
            return Ok(v);
        }
        self.disc_flag("connectedness", |a| a.components <= 1)
    }

    /// Number of boundary curves of a compact embedded surface.
    pub fn count_boundaries(&self) -> Result<usize> {
        if let Some(n) = self.cache.boundaries() {
            return Ok(n);
        }
        self.require_compact_embedded("counting boundary curves")?;
        let count = if self.has_real_boundary() {
            let counts = DiscCounts::of(self, EngineConfig::shared().max_discs)?;
            discs::count_boundary_curves(&self.tri, &counts)
        } else {
            0
        };
        self.cache.set_boundaries(count);
        Ok(count)
    }

    /// Number of tetrahedra the surface meets, provided it meets each in at
    /// most one disc; zero otherwise.
    pub fn is_central(&self) -> usize {
        let width = self.enc.block_width();
        let mut total = 0;
        for block in self.vector.as_slice().chunks(width) {
            let mut found = false;
            for x in block.iter().filter(|x| !x.is_zero()) {
                if found || !x.is_one() {
                    return 0;
                }
                found = true;
            }
            if found {
                total += 1;
            }
        }
        total
    }

    /// Exactly one quadrilateral in every tetrahedron and nothing else.
    pub fn is_splitting(&self) -> bool {
        (0..self.tri.size()).all(|t| {
            (0..4).all(|v| self.triangles(t, v).is_zero())
                && (0..3).all(|k| self.octs(t, k).is_zero())
                && {
                    let mut quads = LargeInteger::zero();
                    for k in 0..3 {
                        quads += &self.quads(t, k);
                    }
                    quads.is_one()
                }
        })
    }

    /// More than one octagonal disc in total.
    pub fn has_multiple_oct_discs(&self) -> bool {
        if !self.enc.stores_octagons() {
            return false;
        }
        let mut seen = LargeInteger::zero();
        for t in 0..self.tri.size() {
            for k in 0..3 {
                seen += &self.octs(t, k);
            }
        }
        seen > LargeInteger::one()
    }
}
