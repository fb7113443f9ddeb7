// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage for a 3-manifold triangulation.
//!
//! A [`Triangulation`] owns a list of tetrahedra, each with up to four face
//! gluings. Everything derived from the gluings (vertices, edges, triangles,
//! boundary components, orientability) lives in a [`Skeleton`] that is
//! computed on first use and thrown away by any mutation.
//!
//! ## Snapshots
//!
//! Normal surfaces never point at a live triangulation. They hold an
//! `Arc<Triangulation>` produced by [`Triangulation::snapshot`], so later
//! edits to the original cannot change a surface behind its back.

use std::sync::{Arc, OnceLock};

use crate::peripheral::PeripheralCurves;
use crate::perm::Perm4;
use crate::skeleton::{BoundaryComponent, Edge, Skeleton, Triangle, Vertex};

/// Where a tetrahedron face is glued: the adjacent tetrahedron and the
/// permutation carrying this tetrahedron's vertices onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gluing {
    pub tet: usize,
    pub perm: Perm4,
}

/// Gluing data stored for a tetrahedron.
#[derive(Debug, Clone, Default)]
pub struct TetrahedronData {
    pub(crate) adj: [Option<Gluing>; 4],
}

impl TetrahedronData {
    /// Whether face `face` is unglued.
    pub fn is_boundary(&self, face: usize) -> bool {
        self.adj[face].is_none()
    }
}

/// A triangulation of a 3-manifold, possibly with boundary or ideal vertices.
///
/// # Example
///
/// ```
/// use normal_triangulation::{Perm4, Triangulation};
///
/// let mut tri = Triangulation::new();
/// let t = tri.new_tetrahedron();
/// tri.join(t, 0, t, Perm4::new([1, 3, 0, 2]).unwrap()).unwrap();
///
/// assert_eq!(tri.size(), 1);
/// assert_eq!(tri.count_vertices(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    pub(crate) tets: Vec<TetrahedronData>,
    pub(crate) skeleton: OnceLock<Skeleton>,
    pub(crate) peripheral: Option<Arc<dyn PeripheralCurves>>,
}

impl Triangulation {
    /// Creates a new, empty triangulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// A frozen, shareable copy of this triangulation.
    pub fn snapshot(&self) -> Arc<Triangulation> {
        Arc::new(self.clone())
    }

    // --- Tetrahedron access ---

    /// Number of tetrahedra.
    pub fn size(&self) -> usize {
        self.tets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tets.is_empty()
    }

    /// Gluing data of tetrahedron `tet`, or `None` if out of range.
    pub fn tetrahedron(&self, tet: usize) -> Option<&TetrahedronData> {
        self.tets.get(tet)
    }

    /// The tetrahedron glued to face `face` of `tet`.
    pub fn adjacent_tetrahedron(&self, tet: usize, face: usize) -> Option<usize> {
        self.tets[tet].adj[face].map(|g| g.tet)
    }

    /// The gluing permutation on face `face` of `tet`.
    pub fn adjacent_gluing(&self, tet: usize, face: usize) -> Option<Perm4> {
        self.tets[tet].adj[face].map(|g| g.perm)
    }

    /// Full gluing record on face `face` of `tet`.
    pub fn gluing(&self, tet: usize, face: usize) -> Option<Gluing> {
        self.tets[tet].adj[face]
    }

    /// Same size and identical gluings, tetrahedron by tetrahedron.
    pub fn is_identical_to(&self, other: &Triangulation) -> bool {
        self.tets.len() == other.tets.len()
            && self
                .tets
                .iter()
                .zip(&other.tets)
                .all(|(a, b)| a.adj == b.adj)
    }

    // --- Skeleton access ---

    /// The skeleton, computed on first use.
    pub fn skeleton(&self) -> &Skeleton {
        self.skeleton.get_or_init(|| Skeleton::compute(self))
    }

    pub fn count_vertices(&self) -> usize {
        self.skeleton().vertices.len()
    }

    pub fn count_edges(&self) -> usize {
        self.skeleton().edges.len()
    }

    pub fn count_triangles(&self) -> usize {
        self.skeleton().triangles.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.skeleton().vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.skeleton().edges
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.skeleton().triangles
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.skeleton().vertices[index]
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.skeleton().edges[index]
    }

    pub fn triangle(&self, index: usize) -> &Triangle {
        &self.skeleton().triangles[index]
    }

    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        &self.skeleton().boundary_components
    }

    /// Real and ideal boundary components together.
    pub fn count_boundary_components(&self) -> usize {
        self.skeleton().boundary_components.len()
    }

    /// Global index of vertex `v` of tetrahedron `tet`.
    pub fn tetrahedron_vertex(&self, tet: usize, v: usize) -> usize {
        self.skeleton().tet_vertices[tet][v]
    }

    /// Global index of edge `e` of tetrahedron `tet`.
    pub fn tetrahedron_edge(&self, tet: usize, e: usize) -> usize {
        self.skeleton().tet_edges[tet][e]
    }

    /// Permutation sending the global edge's vertices 0, 1 onto the local
    /// endpoints of edge `e` of `tet`.
    pub fn tetrahedron_edge_mapping(&self, tet: usize, e: usize) -> Perm4 {
        self.skeleton().tet_edge_maps[tet][e]
    }

    /// Global index of face `f` of tetrahedron `tet`.
    pub fn tetrahedron_triangle(&self, tet: usize, f: usize) -> usize {
        self.skeleton().tet_triangles[tet][f]
    }

    /// `+1` or `-1`; consistent across gluings when the triangulation is
    /// orientable.
    pub fn tetrahedron_orientation(&self, tet: usize) -> i8 {
        self.skeleton().tet_orientation[tet]
    }

    // --- Global properties ---

    /// No boundary triangles and no ideal vertices.
    pub fn is_closed(&self) -> bool {
        self.skeleton().boundary_components.is_empty()
    }

    pub fn is_orientable(&self) -> bool {
        self.skeleton().orientable
    }

    /// Orientable, and every gluing reverses the standard orientation, so
    /// that all tetrahedra are positively oriented.
    pub fn is_oriented(&self) -> bool {
        let sk = self.skeleton();
        sk.orientable && sk.tet_orientation.iter().all(|&o| o == 1)
    }

    pub fn is_connected(&self) -> bool {
        self.skeleton().component_count <= 1
    }

    pub fn count_components(&self) -> usize {
        self.skeleton().component_count
    }

    /// Every vertex link is a sphere, disc or closed surface, and no edge is
    /// identified with itself in reverse.
    pub fn is_valid(&self) -> bool {
        let sk = self.skeleton();
        sk.vertices.iter().all(|v| v.is_valid()) && sk.edges.iter().all(|e| e.is_valid())
    }

    pub fn is_ideal(&self) -> bool {
        self.skeleton().vertices.iter().any(|v| v.is_ideal())
    }

    pub fn has_boundary_triangles(&self) -> bool {
        self.skeleton().triangles.iter().any(|t| t.is_boundary())
    }

    // --- Peripheral curves ---

    /// Attaches a peripheral-curve provider, turning this into a
    /// SnapPea-backed triangulation.
    pub fn with_peripheral_curves(mut self, provider: Arc<dyn PeripheralCurves>) -> Self {
        self.peripheral = Some(provider);
        self
    }

    /// The attached peripheral-curve provider, if any.
    pub fn peripheral_curves(&self) -> Option<&Arc<dyn PeripheralCurves>> {
        self.peripheral.as_ref()
    }

    /// Drops cached skeletal data and any peripheral-curve provider.
    pub(crate) fn invalidate(&mut self) {
        self.skeleton = OnceLock::new();
        self.peripheral = None;
    }
}
