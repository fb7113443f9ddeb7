// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compressing discs and incompressibility.
//!
//! Searching for a compressing disc means running through vertex normal
//! surfaces, which this crate does not enumerate itself. Callers plug an
//! enumerator in through [`VertexSurfaceSource`].

use std::sync::Arc;

use normal_triangulation::Triangulation;
use num_traits::One;

use crate::cancel::{CancelToken, ProgressTracker};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::integer::LargeInteger;
use crate::surface::NormalSurface;

/// Supplies the vertex normal surfaces of a triangulation in standard
/// coordinates.
///
/// Implementations should poll `cancel` during long enumerations and fail
/// with [`Error::Cancelled`] once it fires.
pub trait VertexSurfaceSource: Sync {
    fn vertex_surfaces(
        &self,
        tri: &Arc<Triangulation>,
        cancel: &CancelToken,
    ) -> Result<Vec<NormalSurface>>;
}

fn sphere_count(tri: &Triangulation) -> usize {
    tri.boundary_components()
        .iter()
        .filter(|b| b.euler_char() == 2)
        .count()
}

/// Whether a valid, non-ideal triangulation with real boundary contains a
/// compressing disc, found among the vertex surfaces `source` provides.
///
/// Triangulations without boundary triangles, invalid or ideal ones, and
/// those whose boundary is all spheres have none; the source is not
/// consulted for them.
pub fn has_compressing_disc<S: VertexSurfaceSource + ?Sized>(
    tri: &Arc<Triangulation>,
    source: &S,
    cancel: &CancelToken,
) -> Result<bool> {
    find_compressing_disc(tri, source, cancel, None)
}

/// Each vertex surface tried is one progress step; the stage grows as
/// the source hands surfaces out.
fn find_compressing_disc<S: VertexSurfaceSource + ?Sized>(
    tri: &Arc<Triangulation>,
    source: &S,
    cancel: &CancelToken,
    progress: Option<&ProgressTracker>,
) -> Result<bool> {
    if !tri.has_boundary_triangles() || !tri.is_valid() || tri.is_ideal() {
        return Ok(false);
    }
    if tri.boundary_components().iter().all(|b| b.is_sphere()) {
        return Ok(false);
    }
    cancel.check()?;

    let surfaces = source.vertex_surfaces(tri, cancel)?;
    if let Some(p) = progress {
        p.grow(surfaces.len());
    }
    tracing::debug!(
        tets = tri.size(),
        surfaces = surfaces.len(),
        "searching vertex surfaces for a compressing disc"
    );
    for (i, s) in surfaces.iter().enumerate() {
        cancel.check()?;
        if let Some(p) = progress {
            p.advance(1);
        }
        if !s.triangulation().is_identical_to(tri) {
            return Err(Error::InvalidArgument(format!(
                "vertex surface {i} belongs to another triangulation"
            )));
        }
        if !s.is_compact() || !s.embedded() || !s.normal() {
            continue;
        }
        // vertex surfaces are connected
        if s.is_compressing_disc(true)? {
            tracing::debug!(surface = i, "found compressing disc");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Runs `search` on each side of a cut and reports whether any side found
/// something. With two sides in parallel, a hit on one side cancels the
/// other.
fn search_sides<F>(
    sides: &[Arc<Triangulation>],
    parallel: bool,
    cancel: &CancelToken,
    search: F,
) -> Result<bool>
where
    F: Fn(&Arc<Triangulation>, &CancelToken) -> Result<bool> + Sync,
{
    if let ([first, second], true) = (sides, parallel) {
        let (first_token, second_token) = (cancel.child(), cancel.child());
        let run = |side: &Arc<Triangulation>, own: &CancelToken, sibling: &CancelToken| -> Result<bool> {
            let found = search(side, own)?;
            if found {
                sibling.cancel();
            }
            Ok(found)
        };
        let (a, b) = rayon::join(
            || run(first, &first_token, &second_token),
            || run(second, &second_token, &first_token),
        );
        cancel.check()?;
        return match (a, b) {
            (Ok(true), _) | (_, Ok(true)) => Ok(true),
            (Err(e), _) | (_, Err(e)) => Err(e),
            _ => Ok(false),
        };
    }

    for side in sides {
        if search(side, cancel)? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl NormalSurface {
    /// Whether this is a disc whose boundary does not bound a disc in the
    /// boundary of the triangulation.
    ///
    /// Pass `known_connected` to skip the connectivity check, for instance
    /// for vertex surfaces.
    ///
    /// # Errors
    ///
    /// [`Error::FailedPrecondition`] unless the surface is compact,
    /// embedded and free of octagons.
    pub fn is_compressing_disc(&self, known_connected: bool) -> Result<bool> {
        self.require_compact_embedded("testing for a compressing disc")?;
        if !self.normal() {
            return Err(Error::FailedPrecondition(
                "compressing discs have no octagons".into(),
            ));
        }
        if !self.has_real_boundary() || self.euler_char() != LargeInteger::one() {
            return Ok(false);
        }
        if !known_connected && !self.is_connected()? {
            return Ok(false);
        }
        if self.count_boundaries()? != 1 {
            return Ok(false);
        }

        let cut = self.cut_along()?;
        if cut.count_boundary_components() == self.tri.count_boundary_components() {
            // the disc boundary does not separate its boundary component
            return Ok(true);
        }
        // a separating curve compresses unless it cuts off a new sphere
        Ok(sphere_count(&cut) == sphere_count(&self.tri))
    }

    /// Whether the surface is incompressible in its triangulation, using
    /// the shared configuration and no cancellation.
    pub fn is_incompressible<S: VertexSurfaceSource + ?Sized>(&self, source: &S) -> Result<bool> {
        self.is_incompressible_with(source, EngineConfig::shared(), &CancelToken::new(), None)
    }

    /// Whether the surface is incompressible: it is not a sphere or
    /// projective plane, and neither side of the cut along it contains a
    /// compressing disc.
    ///
    /// The triangulation is assumed to be closed and irreducible; neither
    /// is checked. One-sided surfaces are not replaced by their double,
    /// since the extra twisted I-bundle never holds a compressing disc.
    ///
    /// Progress runs through a cutting stage of one step, then a search
    /// stage with one step per vertex surface tried on either side.
    ///
    /// # Errors
    ///
    /// [`Error::FailedPrecondition`] unless the surface is compact and
    /// embedded, [`Error::Cancelled`] if `cancel` fires, or whatever the
    /// source reports.
    pub fn is_incompressible_with<S: VertexSurfaceSource + ?Sized>(
        &self,
        source: &S,
        config: &EngineConfig,
        cancel: &CancelToken,
        progress: Option<&ProgressTracker>,
    ) -> Result<bool> {
        let incompressible = self.search_for_compression(source, config, cancel, progress)?;
        if let Some(p) = progress {
            p.finish();
        }
        Ok(incompressible)
    }

    fn search_for_compression<S: VertexSurfaceSource + ?Sized>(
        &self,
        source: &S,
        config: &EngineConfig,
        cancel: &CancelToken,
        progress: Option<&ProgressTracker>,
    ) -> Result<bool> {
        self.require_compact_embedded("testing incompressibility")?;
        let euler = self.euler_char();
        if euler == LargeInteger::new(2) || (euler.is_one() && !self.is_two_sided()?) {
            return Ok(false);
        }
        if !self.is_thin_edge_link().is_empty() {
            // links a loop, so bounds a solid torus or Klein bottle
            return Ok(false);
        }

        if let Some(p) = progress {
            p.begin("cutting along surface", 1);
        }
        let cut = self.cut_along_with(config, cancel, None)?;
        if let Some(p) = progress {
            p.advance(1);
        }
        let sides: Vec<Arc<Triangulation>> = cut
            .triangulate_components()
            .into_iter()
            .filter(|c| c.has_boundary_triangles())
            .map(|c| c.snapshot())
            .collect();
        if sides.len() > 2 {
            tracing::warn!(
                sides = sides.len(),
                "cut produced more than two pieces with boundary"
            );
            return Ok(false);
        }

        tracing::debug!(
            sides = sides.len(),
            parallel = config.parallel_sides,
            "searching both sides for compressing discs"
        );
        if let Some(p) = progress {
            p.begin("searching for compressing discs", 0);
        }
        let found = search_sides(&sides, config.parallel_sides, cancel, |tri, token| {
            find_compressing_disc(tri, source, token, progress)
        })?;
        Ok(!found)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::encoding::NormalCoords;
    use normal_triangulation::{samples, Perm4};

    /// Hands out fixed vectors in standard coordinates.
    struct Listed {
        vectors: Vec<Vec<i64>>,
        calls: AtomicUsize,
    }

    impl Listed {
        fn new(vectors: &[&[i64]]) -> Self {
            Self {
                vectors: vectors.iter().map(|v| v.to_vec()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl VertexSurfaceSource for Listed {
        fn vertex_surfaces(
            &self,
            tri: &Arc<Triangulation>,
            _cancel: &CancelToken,
        ) -> Result<Vec<NormalSurface>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vectors
                .iter()
                .map(|v| NormalSurface::from_ints(tri.clone(), NormalCoords::Standard, v))
                .collect()
        }
    }

    /// Hands out a fixed number of empty surfaces, none of which compresses.
    struct Empties(usize);

    impl VertexSurfaceSource for Empties {
        fn vertex_surfaces(&self, tri: &Arc<Triangulation>, _: &CancelToken) -> Result<Vec<NormalSurface>> {
            Ok(vec![NormalSurface::empty(tri.clone()); self.0])
        }
    }

    struct Unreachable;

    impl VertexSurfaceSource for Unreachable {
        fn vertex_surfaces(&self, _: &Arc<Triangulation>, _: &CancelToken) -> Result<Vec<NormalSurface>> {
            panic!("source should not be consulted");
        }
    }

    fn std(tri: &Arc<Triangulation>, values: &[i64]) -> NormalSurface {
        NormalSurface::from_ints(tri.clone(), NormalCoords::Standard, values).unwrap()
    }

    #[test]
    fn meridian_disc_compresses() {
        let tri = samples::folded_tetrahedron().snapshot();
        assert!(std(&tri, &[1, 1, 0, 0, 0, 1, 0]).is_compressing_disc(false).unwrap());
        assert!(!std(&tri, &[1, 1, 1, 1, 0, 0, 0]).is_compressing_disc(false).unwrap());
        assert!(!std(&tri, &[0, 0, 0, 0, 0, 0, 1]).is_compressing_disc(false).unwrap());
    }

    #[test]
    fn boundary_parallel_disc_does_not_compress() {
        let mut chain = Triangulation::new();
        chain.new_tetrahedra(3);
        chain.join(0, 0, 1, Perm4::IDENTITY).unwrap();
        chain.join(1, 1, 2, Perm4::IDENTITY).unwrap();
        let tri = chain.snapshot();
        let disc = std(
            &tri,
            &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0],
        );
        assert_eq!(disc.euler_char(), LargeInteger::one());
        assert!(!disc.is_compressing_disc(false).unwrap());
    }

    #[test]
    fn solid_torus_has_a_compressing_disc() {
        let tri = samples::folded_tetrahedron().snapshot();
        let cancel = CancelToken::new();
        let with_disc = Listed::new(&[&[1, 1, 1, 1, 0, 0, 0], &[1, 1, 0, 0, 0, 1, 0]]);
        assert!(has_compressing_disc(&tri, &with_disc, &cancel).unwrap());
        let without = Listed::new(&[&[1, 1, 1, 1, 0, 0, 0]]);
        assert!(!has_compressing_disc(&tri, &without, &cancel).unwrap());
    }

    #[test]
    fn sphere_boundary_needs_no_search() {
        let ball = samples::ball().snapshot();
        assert!(!has_compressing_disc(&ball, &Unreachable, &CancelToken::new()).unwrap());
        let closed = samples::closed_one_tet().snapshot();
        assert!(!has_compressing_disc(&closed, &Unreachable, &CancelToken::new()).unwrap());
    }

    #[test]
    fn spheres_and_thin_links_are_compressible() {
        let tri = samples::closed_one_tet().snapshot();
        assert!(!std(&tri, &[1, 1, 1, 1, 0, 0, 0]).is_incompressible(&Unreachable).unwrap());
        assert!(!std(&tri, &[0, 0, 0, 0, 0, 2, 0]).is_incompressible(&Unreachable).unwrap());
    }

    #[test]
    fn only_the_torus_side_is_searched() {
        let tri = samples::folded_tetrahedron().snapshot();
        let link = std(&tri, &[1, 1, 1, 1, 0, 0, 0]);
        for parallel in [false, true] {
            let config = EngineConfig {
                parallel_sides: parallel,
                ..EngineConfig::default()
            };
            let source = Listed::new(&[]);
            assert!(link
                .is_incompressible_with(&source, &config, &CancelToken::new(), None)
                .unwrap());
            assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn search_counts_every_candidate() {
        let tri = samples::folded_tetrahedron().snapshot();
        let link = std(&tri, &[1, 1, 1, 1, 0, 0, 0]);
        for parallel in [false, true] {
            let config = EngineConfig {
                parallel_sides: parallel,
                ..EngineConfig::default()
            };
            let progress = ProgressTracker::new();
            assert!(link
                .is_incompressible_with(&Empties(3), &config, &CancelToken::new(), Some(&progress))
                .unwrap());
            let snap = progress.snapshot();
            assert!(snap.finished);
            assert_eq!((snap.processed, snap.total), (3, 3));
            assert_eq!(snap.current, "searching for compressing discs");
        }
    }

    #[test]
    fn short_cut_still_finishes_progress() {
        let tri = samples::closed_one_tet().snapshot();
        let sphere = std(&tri, &[1, 1, 1, 1, 0, 0, 0]);
        let progress = ProgressTracker::new();
        assert!(!sphere
            .is_incompressible_with(&Unreachable, &EngineConfig::default(), &CancelToken::new(), Some(&progress))
            .unwrap());
        assert!(progress.is_finished());
    }

    #[test]
    fn cancelled_search_fails() {
        let tri = samples::folded_tetrahedron().snapshot();
        let link = std(&tri, &[1, 1, 1, 1, 0, 0, 0]);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            link.is_incompressible_with(&Listed::new(&[]), &EngineConfig::default(), &cancel, None),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn a_hit_cancels_the_other_side() {
        let sides = [samples::ball().snapshot(), samples::ball().snapshot()];
        let waited = AtomicUsize::new(0);
        let found = search_sides(&sides, true, &CancelToken::new(), |side, token| {
            if Arc::ptr_eq(side, &sides[0]) {
                return Ok(true);
            }
            for _ in 0..10_000 {
                token.check()?;
                waited.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(false)
        })
        .unwrap();
        assert!(found);
        assert!(waited.load(Ordering::SeqCst) < 10_000);
    }

    #[test]
    fn errors_surface_when_nothing_is_found() {
        let sides = [samples::ball().snapshot(), samples::ball().snapshot()];
        let result = search_sides(&sides, true, &CancelToken::new(), |side, _| {
            if Arc::ptr_eq(side, &sides[1]) {
                Err(Error::UnsupportedOperation("enumeration failed".into()))
            } else {
                Ok(false)
            }
        });
        assert!(matches!(result, Err(Error::UnsupportedOperation(_))));
    }
}
