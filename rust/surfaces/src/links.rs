// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recognising vertex, edge and triangle links.
//!
//! The link of a face is the frontier of a small regular neighbourhood of
//! it. For an edge or triangle this frontier need not be normal; its
//! *normalised* form is the frontier of the smallest subcomplex containing
//! the face that meets every tetrahedron in isolated vertices, isolated
//! edges, whole faces or the whole tetrahedron. A link is *thin* when the
//! face itself already has that property.

use std::sync::Arc;

use normal_triangulation::{edge_number, DisjointSets, Triangulation};
use num_traits::Zero;
use rustc_hash::FxHashSet;

use crate::discs::{ParitySets, QUAD_SLOT};
use crate::error::{Error, Result};
use crate::integer::LargeInteger;
use crate::surface::NormalSurface;
use crate::tables::{QUAD_DEFN, QUAD_SEPARATING};

#[derive(Debug, Clone, Copy)]
enum Seed {
    Edge(usize),
    Triangle(usize),
}

/// The subcomplex grown around a face while normalising its link.
struct Closure<'a> {
    tri: &'a Triangulation,
    vertices: Vec<bool>,
    edges: Vec<bool>,
    triangles: Vec<bool>,
}

impl<'a> Closure<'a> {
    fn new(tri: &'a Triangulation) -> Self {
        Self {
            tri,
            vertices: vec![false; tri.count_vertices()],
            edges: vec![false; tri.count_edges()],
            triangles: vec![false; tri.count_triangles()],
        }
    }

    fn add_edge(&mut self, e: usize) {
        let edge = self.tri.edge(e);
        self.edges[e] = true;
        self.vertices[edge.vertex(0)] = true;
        self.vertices[edge.vertex(1)] = true;
    }

    fn add_triangle(&mut self, f: usize) {
        self.triangles[f] = true;
        for i in 0..3 {
            let e = self.tri.triangle(f).edge(i);
            self.add_edge(e);
        }
    }
}

fn linking_surface(tri: &Arc<Triangulation>, seed: Seed) -> (NormalSurface, bool) {
    let n = tri.size();
    let mut closure = Closure::new(tri);
    match seed {
        Seed::Edge(e) => closure.add_edge(e),
        Seed::Triangle(f) => closure.add_triangle(f),
    }
    let mut whole = vec![false; n];
    let mut thin = true;

    loop {
        let mut grew = false;
        let mut blocks = vec![[0usize; 10]; n];
        for (t, block) in blocks.iter_mut().enumerate() {
            if whole[t] {
                continue;
            }
            let mut joined = DisjointSets::new(4);
            for e in 0..6 {
                if closure.edges[tri.tetrahedron_edge(t, e)] {
                    let [a, b] = normal_triangulation::EDGE_VERTEX[e];
                    joined.union(a, b);
                }
            }
            let mut groups: [Vec<usize>; 4] = Default::default();
            for v in 0..4 {
                if closure.vertices[tri.tetrahedron_vertex(t, v)] {
                    groups[joined.find(v)].push(v);
                }
            }
            for group in groups.iter().filter(|g| !g.is_empty()) {
                match group.as_slice() {
                    &[v] => block[v] += 1,
                    &[a, b] => block[QUAD_SLOT + QUAD_SEPARATING[a][b]] += 1,
                    &[a, b, c] => {
                        let f = 6 - a - b - c;
                        let face = tri.tetrahedron_triangle(t, f);
                        if closure.triangles[face] {
                            block[f] += 1;
                        } else {
                            closure.add_triangle(face);
                            grew = true;
                        }
                    }
                    _ => {
                        whole[t] = true;
                        for f in 0..4 {
                            closure.add_triangle(tri.tetrahedron_triangle(t, f));
                        }
                        grew = true;
                    }
                }
            }
        }

        if !grew {
            let counts: Vec<[LargeInteger; 10]> = blocks
                .iter()
                .map(|b| std::array::from_fn(|i| LargeInteger::from(b[i])))
                .collect();
            return (
                NormalSurface::from_disc_counts(tri.clone(), &counts, false),
                thin,
            );
        }
        thin = false;
    }
}

impl NormalSurface {
    /// The normalised link of edge `edge`, and whether it is thin.
    pub fn edge_linking_surface(
        tri: &Arc<Triangulation>,
        edge: usize,
    ) -> Result<(NormalSurface, bool)> {
        if edge >= tri.count_edges() {
            return Err(Error::InvalidArgument(format!("no edge {edge}")));
        }
        Ok(linking_surface(tri, Seed::Edge(edge)))
    }

    /// The normalised link of triangle `triangle`, and whether it is thin.
    pub fn triangle_linking_surface(
        tri: &Arc<Triangulation>,
        triangle: usize,
    ) -> Result<(NormalSurface, bool)> {
        if triangle >= tri.count_triangles() {
            return Err(Error::InvalidArgument(format!("no triangle {triangle}")));
        }
        Ok(linking_surface(tri, Seed::Triangle(triangle)))
    }

    fn has_quads_or_octs(&self) -> bool {
        (0..self.tri.size())
            .any(|t| (0..3).any(|k| !self.quads(t, k).is_zero() || !self.octs(t, k).is_zero()))
    }

    /// A union of vertex links: triangles only.
    pub fn is_vertex_linking(&self) -> bool {
        self.enc.could_be_vertex_link() && !self.has_quads_or_octs()
    }

    /// The single vertex this surface is a multiple of the link of.
    pub fn is_vertex_link(&self) -> Option<usize> {
        if !self.is_vertex_linking() {
            return None;
        }
        let mut found = None;
        for t in 0..self.tri.size() {
            for v in (0..4).filter(|&v| !self.triangles(t, v).is_zero()) {
                let vertex = self.tri.tetrahedron_vertex(t, v);
                match found {
                    None => found = Some(vertex),
                    Some(w) if w != vertex => return None,
                    Some(_) => {}
                }
            }
        }
        found
    }

    /// Edges (at most two) whose thin link is a positive rational multiple
    /// of this surface.
    pub fn is_thin_edge_link(&self) -> Vec<usize> {
        if !self.normal() {
            return Vec::new();
        }
        let tri = &*self.tri;
        let mut ruled_out = FxHashSet::default();
        let mut found = false;
        let mut ans: [Option<usize>; 2] = [None, None];
        // twice the multiple of the link
        let mut double = LargeInteger::zero();

        for t in 0..tri.size() {
            for k in 0..3 {
                let coord = self.quads(t, k);
                let d = QUAD_DEFN[k];
                let edge = |i: usize, j: usize| tri.tetrahedron_edge(t, edge_number(d[i], d[j]));
                // the two edges the quad avoids, then the four it crosses
                let e = [
                    edge(0, 1),
                    edge(2, 3),
                    edge(0, 2),
                    edge(0, 3),
                    edge(1, 2),
                    edge(1, 3),
                ];

                if coord.is_zero() {
                    if found {
                        for a in &mut ans {
                            if matches!(*a, Some(x) if x == e[0] || x == e[1]) {
                                *a = None;
                            }
                        }
                    } else {
                        ruled_out.insert(e[0]);
                        ruled_out.insert(e[1]);
                    }
                } else {
                    if found {
                        if e[0] == e[1] {
                            if ans[0] == Some(e[0]) {
                                ans[1] = None;
                            } else if ans[1] == Some(e[0]) {
                                ans = [ans[1], None];
                            } else {
                                return Vec::new();
                            }
                            if double != coord {
                                return Vec::new();
                            }
                        } else {
                            for a in &mut ans {
                                if !matches!(*a, Some(x) if x == e[0] || x == e[1]) {
                                    *a = None;
                                }
                            }
                            if double != &coord + &coord {
                                return Vec::new();
                            }
                        }
                    } else {
                        if e[0] == e[1] {
                            if ruled_out.contains(&e[0]) {
                                return Vec::new();
                            }
                            ans = [Some(e[0]), None];
                            double = coord.clone();
                        } else {
                            for i in 0..2 {
                                if ruled_out.contains(&e[i]) {
                                    ans[i] = None;
                                } else {
                                    ans[i] = Some(e[i]);
                                    double = &coord + &coord;
                                }
                            }
                        }
                        found = true;
                    }
                    for a in &mut ans {
                        if matches!(*a, Some(x) if e[2..].contains(&x)) {
                            *a = None;
                        }
                    }
                }

                if found && ans == [None, None] {
                    return Vec::new();
                }
            }
        }
        if !found {
            return Vec::new();
        }

        for t in 0..tri.size() {
            for corner in 0..4 {
                let v = tri.tetrahedron_vertex(t, corner);
                let coord = self.triangles(t, corner);
                for a in &mut ans {
                    let Some(candidate) = *a else {
                        continue;
                    };
                    let ends = tri.edge(candidate);
                    let expect_zero = (v != ends.vertex(0) && v != ends.vertex(1))
                        || (1..4).any(|j| {
                            tri.tetrahedron_edge(t, edge_number(corner, (corner + j) % 4))
                                == candidate
                        });
                    let fits = if expect_zero {
                        coord.is_zero()
                    } else {
                        double == &coord + &coord
                    };
                    if !fits {
                        *a = None;
                    }
                }
                if ans == [None, None] {
                    return Vec::new();
                }
            }
        }
        ans.into_iter().flatten().collect()
    }

    /// Whether the odd-cycle test over weight-one edges forces the
    /// scaled-down surface to be doubled.
    fn needs_doubling(&self) -> bool {
        let mut parity = ParitySets::new(self.tri.count_vertices());
        for e in 0..self.tri.count_edges() {
            let edge = self.tri.edge(e);
            let odd = !self.edge_weight(e).is_zero();
            if !parity.union(edge.vertex(0), edge.vertex(1), odd) {
                return true;
            }
        }
        false
    }

    /// The multiple of this surface that could be the normalised link of an
    /// edge or triangle, or `None` if no multiple can be.
    ///
    /// Edge weights must take values in `{0, k, 2k}` with at least one zero.
    pub fn could_link_face(&self) -> Option<NormalSurface> {
        if !self.normal() {
            return None;
        }
        let mut k = LargeInteger::zero();
        let mut kk = LargeInteger::zero();
        let mut saw_zero = false;
        for e in 0..self.tri.count_edges() {
            let w = self.edge_weight(e);
            if w.is_zero() {
                saw_zero = true;
            } else if w.is_infinite() {
                return None;
            } else if k.is_zero() {
                k = w;
            } else if kk.is_zero() {
                if w != k {
                    if w == &k + &k {
                        kk = w;
                    } else if &w + &w == k {
                        kk = std::mem::replace(&mut k, w);
                    } else {
                        return None;
                    }
                }
            } else if w != k && w != kk {
                return None;
            }
        }
        if !saw_zero {
            return None;
        }

        let mut mult = self.clone();
        mult.name.clear();
        let scale = mult.scale_down().ok()?;
        if !kk.is_zero() {
            if scale != k {
                return None;
            }
        } else if scale == k {
            if mult.needs_doubling() {
                mult *= 2;
            }
        } else if &scale + &scale != k {
            return None;
        }
        Some(mult)
    }

    /// Edges whose normalised link equals a multiple of this surface, thin
    /// links first, with the number of thin links.
    pub fn is_normal_edge_link(&self) -> (Vec<usize>, usize) {
        let edges = 0..self.tri.count_edges();
        self.normal_links(edges, Seed::Edge, |_| Vec::new())
    }

    /// Triangles whose normalised link equals a multiple of this surface,
    /// thin links first, with the number of thin links.
    pub fn is_normal_triangle_link(&self) -> (Vec<usize>, usize) {
        let triangles = 0..self.tri.count_triangles();
        self.normal_links(triangles, Seed::Triangle, |f| {
            (0..3).map(|i| self.tri.triangle(f).edge(i)).collect()
        })
    }

    /// Triangles (at most two) whose thin link is a multiple of this
    /// surface.
    pub fn is_thin_triangle_link(&self) -> Vec<usize> {
        if self.is_empty() {
            return Vec::new();
        }
        let Some(mult) = self.could_link_face() else {
            return Vec::new();
        };
        let mut ans = Vec::new();
        for f in 0..self.tri.count_triangles() {
            if !self.misses_triangle_edges(f) {
                continue;
            }
            let (link, thin) = linking_surface(&self.tri, Seed::Triangle(f));
            if thin && link == mult {
                ans.push(f);
                if ans.len() == 2 {
                    break;
                }
            }
        }
        ans
    }

    fn misses_triangle_edges(&self, f: usize) -> bool {
        (0..3).all(|i| self.edge_weight(self.tri.triangle(f).edge(i)).is_zero())
    }

    fn normal_links(
        &self,
        faces: std::ops::Range<usize>,
        seed: fn(usize) -> Seed,
        extra_edges: impl Fn(usize) -> Vec<usize>,
    ) -> (Vec<usize>, usize) {
        if self.is_empty() {
            let empty = faces
                .filter(|&i| linking_surface(&self.tri, seed(i)).0.is_empty())
                .collect();
            return (empty, 0);
        }
        let Some(mult) = self.could_link_face() else {
            return (Vec::new(), 0);
        };

        let mut ans = Vec::new();
        let mut thin_count = 0;
        for i in faces {
            let mut own = extra_edges(i);
            if let Seed::Edge(e) = seed(i) {
                own.push(e);
            }
            if own.iter().any(|&e| !self.edge_weight(e).is_zero()) {
                continue;
            }
            let (link, thin) = linking_surface(&self.tri, seed(i));
            if link == mult {
                if thin {
                    ans.insert(thin_count, i);
                    thin_count += 1;
                } else {
                    ans.push(i);
                }
            }
        }
        tracing::trace!(found = ans.len(), thin = thin_count, "matched normalised links");
        (ans, thin_count)
    }
}
