// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutting a triangulation along a surface.
//!
//! The discs of the surface slice each tetrahedron into convex *blocks*:
//! a corner block at each vertex, slabs between parallel discs, and a
//! central region (split in two by any quadrilaterals). Each block is
//! bounded by polygons whose corners are tetrahedron vertices or points
//! where discs cross edges. A block is triangulated by coning from its
//! centre to a centre in each boundary polygon, one tetrahedron per polygon
//! edge:
//!
//! - vertex 0 is the block centre, vertex 1 the polygon centre, vertices 2
//!   and 3 the ends of the polygon edge;
//! - face 0 lies in the polygon and is glued across the tetrahedron face,
//!   or left as boundary when the polygon is part of a disc;
//! - face 1 is shared with the polygon on the other side of the edge;
//! - faces 2 and 3 are shared with the neighbours around the polygon.

use normal_triangulation::{edge_number, Perm4, Triangulation, EDGE_VERTEX};
use rustc_hash::FxHashMap;

use crate::cancel::{CancelToken, ProgressTracker};
use crate::config::EngineConfig;
use crate::discs::{DiscCounts, QUAD_SLOT};
use crate::error::{Error, Result};
use crate::surface::NormalSurface;
use crate::tables::{on_vertex_zero_side, QUAD_PARTNER, QUAD_SEPARATING};

/// A polygon corner: a tetrahedron vertex, or the `pos`-th crossing along
/// edge `edge`, counted from its lower-numbered endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Point {
    Vertex(usize),
    Edge { edge: usize, pos: usize },
}

#[derive(Debug)]
struct Polygon {
    corners: Vec<Point>,
    on_disc: bool,
}

impl Polygon {
    fn disc(corners: Vec<Point>) -> Self {
        Self {
            corners,
            on_disc: true,
        }
    }

    fn face(corners: Vec<Point>) -> Self {
        Self {
            corners,
            on_disc: false,
        }
    }
}

/// Polygon corners as a sorted set, plus the sorted edge of that polygon.
type FaceKey = (Vec<Point>, [Point; 2]);

/// Small tetrahedra lying on each face of a sliced tetrahedron, keyed by
/// the polygon and polygon edge they sit on.
type FacePieces = [FxHashMap<FaceKey, (usize, Point)>; 4];

fn sorted_pair(a: Point, b: Point) -> [Point; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

/// Disc layout of one tetrahedron.
struct Slicing {
    triangles: [usize; 4],
    quad: Option<(usize, usize)>,
}

impl Slicing {
    fn new(counts: &DiscCounts, tet: usize) -> Self {
        let triangles = std::array::from_fn(|v| counts.count(tet, v));
        let quad = (0..3)
            .map(|k| (k, counts.count(tet, QUAD_SLOT + k)))
            .find(|&(_, q)| q > 0);
        Self { triangles, quad }
    }

    fn quads_on(&self, v: usize, w: usize) -> usize {
        match self.quad {
            Some((k, q)) if k != QUAD_SEPARATING[v][w] => q,
            _ => 0,
        }
    }

    /// Crossings along edge `vw`.
    fn weight(&self, v: usize, w: usize) -> usize {
        self.triangles[v] + self.quads_on(v, w) + self.triangles[w]
    }

    /// The `pos`-th crossing along edge `vw` counted from `v`.
    fn point(&self, v: usize, w: usize, pos: usize) -> Point {
        let edge = edge_number(v, w);
        let pos = if v < w {
            pos
        } else {
            self.weight(v, w) - 1 - pos
        };
        Point::Edge { edge, pos }
    }

    /// Where quadrilateral copy `i` crosses edge `xy`.
    fn quad_point(&self, i: usize, x: usize, y: usize) -> Point {
        let (k, q) = self.quad.unwrap_or((0, 0));
        let along = if on_vertex_zero_side(k, x) { i } else { q - 1 - i };
        self.point(x, y, self.triangles[x] + along)
    }

    /// The corner of a face polygon at vertex `a`, between its neighbours
    /// `prev` and `next`.
    fn corner(&self, a: usize, prev: usize, next: usize) -> Vec<Point> {
        match self.triangles[a] {
            0 => vec![Point::Vertex(a)],
            n => vec![self.point(a, prev, n - 1), self.point(a, next, n - 1)],
        }
    }

    fn last_triangle(&self, v: usize) -> Option<Polygon> {
        let n = self.triangles[v];
        (n > 0).then(|| {
            Polygon::disc(
                (0..4)
                    .filter(|&w| w != v)
                    .map(|w| self.point(v, w, n - 1))
                    .collect(),
            )
        })
    }

    fn blocks(&self) -> Vec<Vec<Polygon>> {
        let mut blocks = Vec::new();
        for v in 0..4 {
            let others: Vec<usize> = (0..4).filter(|&w| w != v).collect();
            let at = |j: usize| -> Vec<Point> { others.iter().map(|&w| self.point(v, w, j)).collect() };
            let sides = |f: usize| -> (usize, usize) {
                let mut rest = others.iter().copied().filter(|&w| w != f);
                (rest.next().unwrap_or(v), rest.next().unwrap_or(v))
            };
            if self.triangles[v] > 0 {
                let mut polys = vec![Polygon::disc(at(0))];
                for &f in &others {
                    let (a, b) = sides(f);
                    polys.push(Polygon::face(vec![
                        Point::Vertex(v),
                        self.point(v, a, 0),
                        self.point(v, b, 0),
                    ]));
                }
                blocks.push(polys);
            }
            for j in 1..self.triangles[v] {
                let mut polys = vec![Polygon::disc(at(j - 1)), Polygon::disc(at(j))];
                for &f in &others {
                    let (a, b) = sides(f);
                    polys.push(Polygon::face(vec![
                        self.point(v, a, j - 1),
                        self.point(v, a, j),
                        self.point(v, b, j),
                        self.point(v, b, j - 1),
                    ]));
                }
                blocks.push(polys);
            }
        }

        match self.quad {
            None => {
                let mut polys: Vec<Polygon> = (0..4).filter_map(|v| self.last_triangle(v)).collect();
                for f in 0..4 {
                    let c: Vec<usize> = (0..4).filter(|&w| w != f).collect();
                    let mut corners = Vec::new();
                    for i in 0..3 {
                        corners.extend(self.corner(c[i], c[(i + 2) % 3], c[(i + 1) % 3]));
                    }
                    polys.push(Polygon::face(corners));
                }
                blocks.push(polys);
            }
            Some((k, q)) => {
                let near = [0, QUAD_PARTNER[k][0]];
                let far: Vec<usize> = (0..4).filter(|w| !near.contains(w)).collect();
                let far = [far[0], far[1]];
                let ring = [
                    (near[0], far[0]),
                    (near[0], far[1]),
                    (near[1], far[1]),
                    (near[1], far[0]),
                ];
                let quad = |i: usize| -> Vec<Point> {
                    ring.iter().map(|&(x, y)| self.quad_point(i, x, y)).collect()
                };

                for i in 1..q {
                    let mut polys = vec![Polygon::disc(quad(i - 1)), Polygon::disc(quad(i))];
                    for m in 0..4 {
                        let (x, y) = (ring[m], ring[(m + 1) % 4]);
                        polys.push(Polygon::face(vec![
                            self.quad_point(i - 1, x.0, x.1),
                            self.quad_point(i - 1, y.0, y.1),
                            self.quad_point(i, y.0, y.1),
                            self.quad_point(i, x.0, x.1),
                        ]));
                    }
                    blocks.push(polys);
                }

                for (own, opposite, i) in [(near, far, 0), (far, near, q - 1)] {
                    let mut polys = vec![Polygon::disc(quad(i))];
                    polys.extend(own.iter().filter_map(|&a| self.last_triangle(a)));
                    let [a1, a2] = own;
                    for b in opposite {
                        let mut corners = self.corner(a1, b, a2);
                        corners.extend(self.corner(a2, a1, b));
                        corners.push(self.quad_point(i, a2, b));
                        corners.push(self.quad_point(i, a1, b));
                        polys.push(Polygon::face(corners));
                    }
                    let [b1, b2] = opposite;
                    for a in own {
                        let mut corners = self.corner(a, b2, b1);
                        corners.push(self.quad_point(i, a, b1));
                        corners.push(self.quad_point(i, a, b2));
                        polys.push(Polygon::face(corners));
                    }
                    blocks.push(polys);
                }
            }
        }
        blocks
    }
}

/// The tetrahedron face a polygon lies in.
fn containing_face(corners: &[Point]) -> Option<usize> {
    let mut faces = (0..4).filter(|&f| {
        corners.iter().all(|p| match *p {
            Point::Vertex(v) => v != f,
            Point::Edge { edge, .. } => !EDGE_VERTEX[edge].contains(&f),
        })
    });
    let face = faces.next()?;
    faces.next().is_none().then_some(face)
}

/// Which of vertices 2, 3 of a cone tetrahedron carries `point`, given the
/// points at its vertices 2 and 3.
fn slot(first: Point, point: Point) -> usize {
    if first == point {
        2
    } else {
        3
    }
}

fn cone_perm(other_first: Point, u: Point, w: Point) -> Perm4 {
    Perm4::from_vertices(0, 1, slot(other_first, u), slot(other_first, w))
}

fn triangulate_blocks(out: &mut Triangulation, blocks: &[Vec<Polygon>]) -> Result<FacePieces> {
    let mut pieces: FacePieces = Default::default();
    for polys in blocks {
        let mut open_edges: FxHashMap<[Point; 2], (usize, Point)> = FxHashMap::default();
        for poly in polys {
            let m = poly.corners.len();
            let first = out.new_tetrahedra(m);
            for i in 0..m {
                let tet = first + i;
                let (u, w) = (poly.corners[i], poly.corners[(i + 1) % m]);
                match open_edges.remove(&sorted_pair(u, w)) {
                    Some((other, other_u)) => out.join(tet, 1, other, cone_perm(other_u, u, w))?,
                    None => {
                        open_edges.insert(sorted_pair(u, w), (tet, u));
                    }
                }
            }
            for i in 0..m {
                out.join(first + i, 2, first + (i + 1) % m, Perm4::from_vertices(0, 1, 3, 2))?;
            }
            if poly.on_disc {
                continue;
            }
            let face = containing_face(&poly.corners).ok_or_else(|| {
                Error::UnsupportedOperation("sliced polygon does not lie in one face".into())
            })?;
            let mut set = poly.corners.clone();
            set.sort();
            for i in 0..m {
                let (u, w) = (poly.corners[i], poly.corners[(i + 1) % m]);
                pieces[face].insert((set.clone(), sorted_pair(u, w)), (first + i, u));
            }
        }
        if !open_edges.is_empty() {
            return Err(Error::UnsupportedOperation(
                "sliced block is not closed".into(),
            ));
        }
    }
    Ok(pieces)
}

impl NormalSurface {
    /// Cuts the triangulation open along this surface.
    ///
    /// Octagons are removed first, so the result is built from
    /// [`remove_octs`](Self::remove_octs). Requires a compact embedded
    /// surface.
    pub fn cut_along(&self) -> Result<Triangulation> {
        self.cut_along_with(EngineConfig::shared(), &CancelToken::new(), None)
    }

    pub fn cut_along_with(
        &self,
        config: &EngineConfig,
        cancel: &CancelToken,
        progress: Option<&ProgressTracker>,
    ) -> Result<Triangulation> {
        self.require_compact_embedded("cutting")?;
        let surface = self.remove_octs()?;
        let tri = surface.triangulation();
        let counts = DiscCounts::of(&surface, config.max_discs)?;
        let n = tri.size();
        if let Some(p) = progress {
            p.begin("slicing tetrahedra", 2 * n);
        }

        let mut out = Triangulation::new();
        let mut slicings = Vec::with_capacity(n);
        let mut pieces = Vec::with_capacity(n);
        for t in 0..n {
            cancel.check()?;
            let slicing = Slicing::new(&counts, t);
            pieces.push(triangulate_blocks(&mut out, &slicing.blocks())?);
            slicings.push(slicing);
            if let Some(p) = progress {
                p.advance(1);
            }
        }

        if let Some(p) = progress {
            p.set_description("gluing slices");
        }
        for t in 0..n {
            cancel.check()?;
            for f in 0..4 {
                let Some(g) = tri.gluing(t, f) else {
                    continue;
                };
                let other_face = g.perm.image(f);
                if (g.tet, other_face) < (t, f) {
                    continue;
                }
                let map = |p: Point| match p {
                    Point::Vertex(v) => Point::Vertex(g.perm.image(v)),
                    Point::Edge { edge, pos } => {
                        let [x, y] = EDGE_VERTEX[edge];
                        let (px, py) = (g.perm.image(x), g.perm.image(y));
                        let pos = if px < py {
                            pos
                        } else {
                            slicings[t].weight(x, y) - 1 - pos
                        };
                        Point::Edge {
                            edge: edge_number(px, py),
                            pos,
                        }
                    }
                };
                for ((set, [u, w]), &(tet, start)) in &pieces[t][f] {
                    let mut image: Vec<Point> = set.iter().map(|&p| map(p)).collect();
                    image.sort();
                    let key = (image, sorted_pair(map(*u), map(*w)));
                    let &(other, other_first) = pieces[g.tet][other_face].get(&key).ok_or_else(|| {
                        Error::UnsupportedOperation(format!(
                            "surface does not match across face {f} of tetrahedron {t}"
                        ))
                    })?;
                    let end = if start == *u { *w } else { *u };
                    let (mu, mw) = (map(start), map(end));
                    out.join(tet, 0, other, cone_perm(other_first, mu, mw))?;
                }
            }
            if let Some(p) = progress {
                p.advance(1);
            }
        }

        if let Some(p) = progress {
            p.finish();
        }
        tracing::debug!(
            tets = n,
            discs = counts.total(),
            result = out.size(),
            "cut triangulation along surface"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::NormalCoords;
    use normal_triangulation::samples;

    fn boundary_eulers(tri: &Triangulation) -> Vec<i64> {
        let mut e: Vec<i64> = tri
            .boundary_components()
            .iter()
            .map(|b| b.euler_char())
            .collect();
        e.sort_unstable();
        e
    }

    fn cut(tri: Triangulation, coords: NormalCoords, values: &[i64]) -> Triangulation {
        NormalSurface::from_ints(tri.snapshot(), coords, values)
            .unwrap()
            .cut_along()
            .unwrap()
    }

    #[test]
    fn empty_surface_keeps_the_manifold() {
        let out = cut(samples::closed_one_tet(), NormalCoords::Standard, &[0; 7]);
        assert_eq!(out.size(), 12);
        assert!(out.is_valid());
        assert!(out.is_closed());
        assert_eq!(out.count_components(), 1);
    }

    #[test]
    fn vertex_link_splits_off_a_ball() {
        let out = cut(samples::closed_one_tet(), NormalCoords::Standard, &[1, 1, 1, 1, 0, 0, 0]);
        assert!(out.is_valid());
        assert_eq!(out.count_components(), 2);
        assert_eq!(boundary_eulers(&out), [2, 2]);
    }

    #[test]
    fn cuts_in_the_solid_torus() {
        let mobius = cut(samples::folded_tetrahedron(), NormalCoords::Standard, &[0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(mobius.count_components(), 1);

        let disc = cut(samples::folded_tetrahedron(), NormalCoords::Standard, &[1, 1, 0, 0, 0, 1, 0]);
        assert_eq!(disc.count_components(), 1);
        assert_eq!(boundary_eulers(&disc), [2]);

        let link = cut(samples::folded_tetrahedron(), NormalCoords::Standard, &[1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(link.count_components(), 2);
        assert_eq!(boundary_eulers(&link), [0, 2]);
    }

    #[test]
    fn octagons_are_removed_before_cutting() {
        let out = cut(
            samples::ball(),
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        );
        assert!(out.is_valid());
        assert_eq!(out.count_components(), 2);
    }

    #[test]
    fn cancellation_stops_the_cut() {
        let s = NormalSurface::from_ints(
            samples::closed_one_tet().snapshot(),
            NormalCoords::Standard,
            &[1, 1, 1, 1, 0, 0, 0],
        )
        .unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let progress = ProgressTracker::new();
        assert!(matches!(
            s.cut_along_with(&EngineConfig::default(), &cancel, Some(&progress)),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn non_embedded_surfaces_are_rejected() {
        let s = NormalSurface::from_ints(
            samples::ball().snapshot(),
            NormalCoords::Standard,
            &[0, 0, 0, 0, 1, 1, 0],
        )
        .unwrap();
        assert!(matches!(s.cut_along(), Err(Error::FailedPrecondition(_))));
    }
}
