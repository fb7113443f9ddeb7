// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertices, edges, triangles and boundary components of a triangulation.
//!
//! The skeleton is derived entirely from the face gluings. Each face of
//! each dimension records its embeddings in tetrahedra; each tetrahedron
//! records which global face sits at each of its local positions.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::graph::DualGraph;
use crate::numbering::{edge_number, edge_ordering, face_ordering};
use crate::perm::Perm4;
use crate::triangulation::Triangulation;
use crate::unionfind::DisjointSets;

/// A tetrahedron vertex belonging to a global vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexEmbedding {
    pub tet: usize,
    pub vertex: usize,
}

/// A tetrahedron edge belonging to a global edge. `vertices` sends the
/// global edge's vertices 0, 1 to the tetrahedron vertices at its ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEmbedding {
    pub tet: usize,
    pub edge: usize,
    pub vertices: Perm4,
}

/// A tetrahedron face belonging to a global triangle. `vertices` sends the
/// triangle's vertices 0, 1, 2 to the tetrahedron, and 3 to `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleEmbedding {
    pub tet: usize,
    pub face: usize,
    pub vertices: Perm4,
}

/// A vertex of the triangulation.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub(crate) index: usize,
    pub(crate) embeddings: Vec<VertexEmbedding>,
    pub(crate) boundary: bool,
    pub(crate) link_euler: i64,
    pub(crate) link_orientable: bool,
}

impl Vertex {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn embeddings(&self) -> &[VertexEmbedding] {
        &self.embeddings
    }

    pub fn front(&self) -> VertexEmbedding {
        self.embeddings[0]
    }

    /// Number of tetrahedron corners at this vertex.
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    /// Lies on a boundary triangle.
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    /// Euler characteristic of the vertex link.
    pub fn link_euler_char(&self) -> i64 {
        self.link_euler
    }

    pub fn is_link_orientable(&self) -> bool {
        self.link_orientable
    }

    /// The link is a closed surface.
    pub fn is_link_closed(&self) -> bool {
        !self.boundary
    }

    /// The link is closed but not a sphere.
    pub fn is_ideal(&self) -> bool {
        !self.boundary && self.link_euler != 2
    }

    /// The link is a sphere, a disc, or (for ideal vertices) any closed
    /// surface.
    pub fn is_valid(&self) -> bool {
        !self.boundary || self.link_euler == 1
    }
}

/// An edge of the triangulation.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) index: usize,
    pub(crate) embeddings: Vec<EdgeEmbedding>,
    pub(crate) vertices: [usize; 2],
    pub(crate) boundary: bool,
    pub(crate) valid: bool,
}

impl Edge {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn embeddings(&self) -> &[EdgeEmbedding] {
        &self.embeddings
    }

    pub fn front(&self) -> EdgeEmbedding {
        self.embeddings[0]
    }

    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    /// Global index of endpoint `i` (0 or 1).
    pub fn vertex(&self, i: usize) -> usize {
        self.vertices[i]
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    /// Not identified with itself in reverse.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// A triangle of the triangulation.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub(crate) index: usize,
    pub(crate) embeddings: Vec<TriangleEmbedding>,
    pub(crate) vertices: [usize; 3],
    pub(crate) edges: [usize; 3],
}

impl Triangle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn embeddings(&self) -> &[TriangleEmbedding] {
        &self.embeddings
    }

    pub fn front(&self) -> TriangleEmbedding {
        self.embeddings[0]
    }

    pub fn is_boundary(&self) -> bool {
        self.embeddings.len() == 1
    }

    /// Global index of triangle vertex `i`.
    pub fn vertex(&self, i: usize) -> usize {
        self.vertices[i]
    }

    /// Global index of the triangle edge opposite triangle vertex `i`.
    pub fn edge(&self, i: usize) -> usize {
        self.edges[i]
    }
}

/// A boundary component: either a connected union of boundary triangles,
/// or a single ideal vertex.
#[derive(Debug, Clone)]
pub struct BoundaryComponent {
    pub(crate) triangles: Vec<usize>,
    pub(crate) edges: Vec<usize>,
    pub(crate) vertices: Vec<usize>,
    pub(crate) ideal_vertex: Option<usize>,
    pub(crate) euler: i64,
}

impl BoundaryComponent {
    pub fn triangles(&self) -> &[usize] {
        &self.triangles
    }

    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn is_ideal(&self) -> bool {
        self.ideal_vertex.is_some()
    }

    pub fn ideal_vertex(&self) -> Option<usize> {
        self.ideal_vertex
    }

    pub fn euler_char(&self) -> i64 {
        self.euler
    }

    pub fn is_sphere(&self) -> bool {
        self.euler == 2
    }
}

/// Everything derived from the gluings of a triangulation.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) boundary_components: Vec<BoundaryComponent>,
    pub(crate) tet_vertices: Vec<[usize; 4]>,
    pub(crate) tet_edges: Vec<[usize; 6]>,
    pub(crate) tet_edge_maps: Vec<[Perm4; 6]>,
    pub(crate) tet_triangles: Vec<[usize; 4]>,
    pub(crate) tet_orientation: Vec<i8>,
    pub(crate) tet_component: Vec<usize>,
    pub(crate) component_count: usize,
    pub(crate) orientable: bool,
}

impl Skeleton {
    pub(crate) fn compute(tri: &Triangulation) -> Self {
        let n = tri.size();
        let mut sk = Skeleton {
            tet_vertices: vec![[0; 4]; n],
            tet_edges: vec![[usize::MAX; 6]; n],
            tet_edge_maps: vec![[Perm4::IDENTITY; 6]; n],
            tet_triangles: vec![[usize::MAX; 4]; n],
            tet_component: vec![0; n],
            ..Default::default()
        };

        let graph = DualGraph::new(tri);
        let components = graph.connected_components();
        for (c, tets) in components.iter().enumerate() {
            for &t in tets {
                sk.tet_component[t] = c;
            }
        }
        sk.component_count = components.len();
        let (orient, orientable) = graph.orientations();
        sk.tet_orientation = orient;
        sk.orientable = orientable;

        sk.compute_vertices(tri);
        sk.compute_edges(tri);
        sk.compute_triangles(tri);
        sk.compute_vertex_links(tri);
        sk.compute_boundary_components();

        tracing::trace!(
            tets = n,
            vertices = sk.vertices.len(),
            edges = sk.edges.len(),
            boundary_components = sk.boundary_components.len(),
            "Computed skeleton"
        );
        sk
    }

    fn compute_vertices(&mut self, tri: &Triangulation) {
        let n = tri.size();
        let mut sets = DisjointSets::new(4 * n);
        for (t, data) in tri.tets.iter().enumerate() {
            for (face, gluing) in data.adj.iter().enumerate() {
                if let Some(g) = gluing {
                    for v in (0..4).filter(|&v| v != face) {
                        sets.union(4 * t + v, 4 * g.tet + g.perm.image(v));
                    }
                }
            }
        }
        let (labels, count) = sets.labels();
        self.vertices = (0..count)
            .map(|index| Vertex {
                index,
                embeddings: Vec::new(),
                boundary: false,
                link_euler: 0,
                link_orientable: true,
            })
            .collect();
        for t in 0..n {
            for v in 0..4 {
                let idx = labels[4 * t + v];
                self.tet_vertices[t][v] = idx;
                self.vertices[idx]
                    .embeddings
                    .push(VertexEmbedding { tet: t, vertex: v });
            }
        }
    }

    fn compute_edges(&mut self, tri: &Triangulation) {
        let n = tri.size();
        for t in 0..n {
            for e in 0..6 {
                if self.tet_edges[t][e] != usize::MAX {
                    continue;
                }
                let index = self.edges.len();
                let start = edge_ordering(e);
                let mut edge = Edge {
                    index,
                    embeddings: Vec::new(),
                    vertices: [
                        self.tet_vertices[t][start.image(0)],
                        self.tet_vertices[t][start.image(1)],
                    ],
                    boundary: false,
                    valid: true,
                };
                self.tet_edges[t][e] = index;
                self.tet_edge_maps[t][e] = start;

                let mut queue = VecDeque::new();
                queue.push_back((t, e, start));
                while let Some((tt, ee, p)) = queue.pop_front() {
                    edge.embeddings.push(EdgeEmbedding {
                        tet: tt,
                        edge: ee,
                        vertices: p,
                    });
                    for k in [2, 3] {
                        let face = p.image(k);
                        let Some(g) = tri.tets[tt].adj[face] else {
                            edge.boundary = true;
                            continue;
                        };
                        let q = g.perm * p;
                        let next = edge_number(q.image(0), q.image(1));
                        if self.tet_edges[g.tet][next] == usize::MAX {
                            self.tet_edges[g.tet][next] = index;
                            self.tet_edge_maps[g.tet][next] = q;
                            queue.push_back((g.tet, next, q));
                        } else if self.tet_edge_maps[g.tet][next].image(0) != q.image(0) {
                            edge.valid = false;
                        }
                    }
                }
                self.edges.push(edge);
            }
        }
    }

    fn compute_triangles(&mut self, tri: &Triangulation) {
        let n = tri.size();
        for t in 0..n {
            for f in 0..4 {
                if self.tet_triangles[t][f] != usize::MAX {
                    continue;
                }
                let index = self.triangles.len();
                let ord = face_ordering(f);
                let mut embeddings = vec![TriangleEmbedding {
                    tet: t,
                    face: f,
                    vertices: ord,
                }];
                self.tet_triangles[t][f] = index;
                if let Some(g) = tri.tets[t].adj[f] {
                    let other_face = g.perm.image(f);
                    self.tet_triangles[g.tet][other_face] = index;
                    embeddings.push(TriangleEmbedding {
                        tet: g.tet,
                        face: other_face,
                        vertices: g.perm * ord,
                    });
                }
                let vertices = [0, 1, 2].map(|i| self.tet_vertices[t][ord.image(i)]);
                let edges = [0, 1, 2].map(|i| {
                    let a = ord.image((i + 1) % 3);
                    let b = ord.image((i + 2) % 3);
                    self.tet_edges[t][edge_number(a, b)]
                });
                self.triangles.push(Triangle {
                    index,
                    embeddings,
                    vertices,
                    edges,
                });
            }
        }
    }

    /// Euler characteristic, closedness and orientability of each vertex
    /// link, counted as (edge ends) - (triangle corners) + (tetrahedron
    /// corners).
    fn compute_vertex_links(&mut self, tri: &Triangulation) {
        let nv = self.vertices.len();
        let mut euler = vec![0i64; nv];
        for edge in &self.edges {
            euler[edge.vertices[0]] += 1;
            euler[edge.vertices[1]] += 1;
        }
        for triangle in &self.triangles {
            for &v in &triangle.vertices {
                euler[v] -= 1;
                if triangle.is_boundary() {
                    self.vertices[v].boundary = true;
                }
            }
        }
        for (v, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.link_euler = euler[v] + vertex.embeddings.len() as i64;
        }

        // Orient the link triangles: adjacent link triangles agree exactly
        // when the gluing permutation is odd.
        let n = tri.size();
        let mut sign = vec![0i8; 4 * n];
        for t in 0..n {
            for v in 0..4 {
                if sign[4 * t + v] != 0 {
                    continue;
                }
                sign[4 * t + v] = 1;
                let vertex = self.tet_vertices[t][v];
                let mut queue = VecDeque::new();
                queue.push_back((t, v));
                while let Some((tt, vv)) = queue.pop_front() {
                    let s = sign[4 * tt + vv];
                    for face in (0..4).filter(|&f| f != vv) {
                        let Some(g) = tri.tets[tt].adj[face] else {
                            continue;
                        };
                        let slot = 4 * g.tet + g.perm.image(vv);
                        let expected = if g.perm.sign() < 0 { s } else { -s };
                        if sign[slot] == 0 {
                            sign[slot] = expected;
                            queue.push_back((g.tet, g.perm.image(vv)));
                        } else if sign[slot] != expected {
                            self.vertices[vertex].link_orientable = false;
                        }
                    }
                }
            }
        }
    }

    fn compute_boundary_components(&mut self) {
        let nt = self.triangles.len();
        let mut sets = DisjointSets::new(nt);
        let mut first_on_edge: FxHashMap<usize, usize> = FxHashMap::default();
        for triangle in self.triangles.iter().filter(|t| t.is_boundary()) {
            for &e in &triangle.edges {
                match first_on_edge.get(&e) {
                    Some(&other) => {
                        sets.union(other, triangle.index);
                    }
                    None => {
                        first_on_edge.insert(e, triangle.index);
                    }
                }
            }
        }

        let mut by_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut components: Vec<BoundaryComponent> = Vec::new();
        for t in 0..nt {
            if !self.triangles[t].is_boundary() {
                continue;
            }
            let root = sets.find(t);
            let slot = *by_root.entry(root).or_insert_with(|| {
                components.push(BoundaryComponent {
                    triangles: Vec::new(),
                    edges: Vec::new(),
                    vertices: Vec::new(),
                    ideal_vertex: None,
                    euler: 0,
                });
                components.len() - 1
            });
            let comp = &mut components[slot];
            comp.triangles.push(t);
            comp.edges.extend_from_slice(&self.triangles[t].edges);
            comp.vertices.extend_from_slice(&self.triangles[t].vertices);
        }
        for comp in &mut components {
            comp.edges.sort_unstable();
            comp.edges.dedup();
            comp.vertices.sort_unstable();
            comp.vertices.dedup();
            comp.euler = comp.vertices.len() as i64 - comp.edges.len() as i64
                + comp.triangles.len() as i64;
        }

        for vertex in self.vertices.iter().filter(|v| v.is_ideal()) {
            components.push(BoundaryComponent {
                triangles: Vec::new(),
                edges: Vec::new(),
                vertices: vec![vertex.index],
                ideal_vertex: Some(vertex.index),
                euler: vertex.link_euler,
            });
        }
        self.boundary_components = components;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    #[test]
    fn single_tetrahedron_is_a_ball() {
        let tri = samples::ball();
        assert_eq!(tri.count_vertices(), 4);
        assert_eq!(tri.count_edges(), 6);
        assert_eq!(tri.count_triangles(), 4);
        assert_eq!(tri.count_boundary_components(), 1);
        let bc = &tri.boundary_components()[0];
        assert_eq!(bc.euler_char(), 2);
        assert!(bc.is_sphere());
        assert!(tri.vertices().iter().all(|v| v.link_euler_char() == 1));
        assert!(tri.is_valid());
        assert!(!tri.is_closed());
        assert!(!tri.is_ideal());
        assert!(tri.is_oriented());
    }

    #[test]
    fn closed_one_tetrahedron() {
        let tri = samples::closed_one_tet();
        assert_eq!(tri.count_vertices(), 1);
        assert_eq!(tri.count_edges(), 2);
        assert_eq!(tri.count_triangles(), 2);
        assert_eq!(tri.vertex(0).link_euler_char(), 2);
        assert!(tri.vertex(0).is_link_orientable());
        assert!(tri.is_closed());
        assert!(tri.is_valid());
        assert!(tri.is_orientable());

        let mut degrees: Vec<usize> = tri.edges().iter().map(|e| e.degree()).collect();
        degrees.sort_unstable();
        assert_eq!(degrees, vec![2, 4]);
    }

    #[test]
    fn figure_eight_has_one_torus_cusp() {
        let tri = samples::figure_eight();
        assert_eq!(tri.size(), 2);
        assert_eq!(tri.count_vertices(), 1);
        assert_eq!(tri.count_edges(), 2);
        let v = tri.vertex(0);
        assert!(v.is_ideal());
        assert_eq!(v.link_euler_char(), 0);
        assert!(v.is_link_orientable());
        assert!(tri.is_ideal());
        assert!(tri.is_oriented());
        assert_eq!(tri.count_boundary_components(), 1);
        assert!(tri.boundary_components()[0].is_ideal());
        assert!(tri.edges().iter().all(|e| e.degree() == 6));
    }

    #[test]
    fn triangle_embeddings_agree_on_vertices() {
        let tri = samples::figure_eight();
        for triangle in tri.triangles() {
            assert_eq!(triangle.embeddings().len(), 2);
            for emb in triangle.embeddings() {
                assert_eq!(emb.vertices.image(3), emb.face);
                for i in 0..3 {
                    assert_eq!(
                        tri.tetrahedron_vertex(emb.tet, emb.vertices.image(i)),
                        triangle.vertex(i)
                    );
                }
            }
        }
    }

    #[test]
    fn reversed_edge_is_invalid() {
        let mut tri = crate::Triangulation::new();
        let t = tri.new_tetrahedron();
        // face 2 (vertices 0,1,3) onto face 3 (vertices 0,1,2) swapping 0 and 1
        tri.join(t, 2, t, Perm4::new([1, 0, 3, 2]).unwrap()).unwrap();
        assert!(!tri.edge(tri.tetrahedron_edge(t, 0)).is_valid());
        assert!(!tri.is_valid());
    }
}
