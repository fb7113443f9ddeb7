// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The disc graph of an embedded surface.
//!
//! - **Nodes** = individual disc copies (triangles, quadrilaterals and
//!   octagons in each tetrahedron)
//! - **Edges** = normal arcs shared across a glued face
//!
//! Discs of one type in one tetrahedron are numbered outward from the
//! vertex-0 side. At corner `v` of a face, the arcs run outward from `v`:
//! triangle copies first, then the arcs of quadrilaterals and octagons. Each
//! arc records whether its disc's copy numbering runs *towards* the corner,
//! which is what decides sidedness when two arcs are identified.

use normal_triangulation::{edge_number, DisjointSets, Triangulation};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::surface::NormalSurface;
use crate::tables::{on_vertex_zero_side, quad_meeting, QUAD_SEPARATING};

/// Slot of a disc type in a per-tetrahedron block: triangles `0..4`,
/// quadrilaterals `4..7`, octagons `7..10`.
pub(crate) const QUAD_SLOT: usize = 4;
pub(crate) const OCT_SLOT: usize = 7;

/// Machine-sized disc counts of a compact surface, with node numbering.
#[derive(Debug, Clone)]
pub(crate) struct DiscCounts {
    counts: Vec<[usize; 10]>,
    first: Vec<[usize; 10]>,
    total: usize,
}

impl DiscCounts {
    /// Fails if a coordinate is infinite or if there are more than
    /// `max_discs` discs in total.
    pub(crate) fn of(surface: &NormalSurface, max_discs: usize) -> Result<Self> {
        let n = surface.triangulation().size();
        let mut counts = Vec::with_capacity(n);
        let mut first = Vec::with_capacity(n);
        let mut total = 0usize;
        for t in 0..n {
            let mut block = [0usize; 10];
            let mut starts = [0usize; 10];
            for (slot, count) in block.iter_mut().enumerate() {
                let value = match slot {
                    0..=3 => surface.triangles(t, slot),
                    4..=6 => surface.quads(t, slot - QUAD_SLOT),
                    _ => surface.octs(t, slot - OCT_SLOT),
                };
                let c = value
                    .finite()
                    .and_then(|v| usize::try_from(v.clone()).ok())
                    .ok_or_else(|| {
                        Error::FailedPrecondition("surface has infinitely many discs".into())
                    })?;
                starts[slot] = total;
                total = total.saturating_add(c);
                if total > max_discs {
                    return Err(Error::FailedPrecondition(format!(
                        "surface has more than {max_discs} discs"
                    )));
                }
                *count = c;
            }
            counts.push(block);
            first.push(starts);
        }
        Ok(Self {
            counts,
            first,
            total,
        })
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn count(&self, tet: usize, slot: usize) -> usize {
        self.counts[tet][slot]
    }

    pub(crate) fn node(&self, tet: usize, slot: usize, copy: usize) -> usize {
        self.first[tet][slot] + copy
    }

    /// The node owning each disc copy: `(tet, slot)` per node.
    pub(crate) fn node_types(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.total);
        for (t, block) in self.counts.iter().enumerate() {
            for (slot, &c) in block.iter().enumerate() {
                out.extend(std::iter::repeat((t, slot)).take(c));
            }
        }
        out
    }

    /// Weight of edge `ab` inside tetrahedron `tet`.
    pub(crate) fn local_edge_weight(&self, tet: usize, a: usize, b: usize) -> usize {
        let c = &self.counts[tet];
        let [k1, k2] = quad_meeting(a, b);
        c[a] + c[b]
            + c[QUAD_SLOT + k1]
            + c[QUAD_SLOT + k2]
            + c[OCT_SLOT..].iter().sum::<usize>()
            + c[OCT_SLOT + QUAD_SEPARATING[a][b]]
    }

    /// Arcs at corner `v` of face `f` of `tet`, from `v` outward, as
    /// `(node, towards)` pairs.
    pub(crate) fn corner_arcs(&self, tet: usize, v: usize, f: usize, out: &mut Vec<(usize, bool)>) {
        out.clear();
        for j in 0..self.counts[tet][v] {
            out.push((self.node(tet, v, j), true));
        }
        let [m1, m2] = quad_meeting(v, f);
        let types = [
            QUAD_SLOT + QUAD_SEPARATING[v][f],
            OCT_SLOT + m1,
            OCT_SLOT + m2,
        ];
        for slot in types {
            let n = self.counts[tet][slot];
            let k = if slot >= OCT_SLOT {
                slot - OCT_SLOT
            } else {
                slot - QUAD_SLOT
            };
            let towards = on_vertex_zero_side(k, v);
            for pos in 0..n {
                let copy = if towards { pos } else { n - 1 - pos };
                out.push((self.node(tet, slot, copy), towards));
            }
        }
    }

    pub(crate) fn corner_arc_count(&self, tet: usize, v: usize, f: usize) -> usize {
        let [m1, m2] = quad_meeting(v, f);
        let c = &self.counts[tet];
        c[v] + c[QUAD_SLOT + QUAD_SEPARATING[v][f]] + c[OCT_SLOT + m1] + c[OCT_SLOT + m2]
    }
}

/// Union-find that also tracks the parity of the path to the root.
#[derive(Debug, Clone)]
pub(crate) struct ParitySets {
    parent: Vec<usize>,
    parity: Vec<bool>,
}

impl ParitySets {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            parity: vec![false; n],
        }
    }

    fn find(&mut self, i: usize) -> (usize, bool) {
        let mut root = i;
        let mut total = false;
        while self.parent[root] != root {
            total ^= self.parity[root];
            root = self.parent[root];
        }
        let mut cur = i;
        let mut cur_parity = total;
        while cur != root {
            let next = self.parent[cur];
            let next_parity = cur_parity ^ self.parity[cur];
            self.parent[cur] = root;
            self.parity[cur] = cur_parity;
            cur = next;
            cur_parity = next_parity;
        }
        (root, total)
    }

    /// Records that `a` and `b` differ by `flip`. Returns `false` if this
    /// contradicts what is already known.
    pub(crate) fn union(&mut self, a: usize, b: usize, flip: bool) -> bool {
        let (ra, pa) = self.find(a);
        let (rb, pb) = self.find(b);
        if ra == rb {
            return (pa ^ pb) == flip;
        }
        self.parent[ra] = rb;
        self.parity[ra] = pa ^ pb ^ flip;
        true
    }
}

/// Connectivity and sidedness of a disc graph.
#[derive(Debug, Clone)]
pub(crate) struct DiscAnalysis {
    /// Component of each node, numbered by first node.
    pub(crate) labels: Vec<usize>,
    pub(crate) components: usize,
    pub(crate) two_sided: bool,
    pub(crate) orientable: bool,
}

pub(crate) fn analyse(tri: &Triangulation, counts: &DiscCounts) -> Result<DiscAnalysis> {
    let mut sides = ParitySets::new(counts.total());
    let mut orient = ParitySets::new(counts.total());
    let mut two_sided = true;
    let mut orientable = true;
    let mut here = Vec::new();
    let mut there = Vec::new();

    for t in 0..tri.size() {
        for f in 0..4 {
            let Some(g) = tri.gluing(t, f) else {
                continue;
            };
            let of = g.perm.image(f);
            if (g.tet, of) < (t, f) {
                continue;
            }
            let preserves = g.perm.sign() == 1;
            for v in (0..4).filter(|&v| v != f) {
                counts.corner_arcs(t, v, f, &mut here);
                counts.corner_arcs(g.tet, g.perm.image(v), of, &mut there);
                if here.len() != there.len() {
                    return Err(Error::UnsupportedOperation(format!(
                        "arc counts differ across face {f} of tetrahedron {t}"
                    )));
                }
                for (&(a, ta), &(b, tb)) in here.iter().zip(&there) {
                    let flip = ta != tb;
                    two_sided &= sides.union(a, b, flip);
                    orientable &= orient.union(a, b, flip ^ preserves);
                }
            }
        }
    }

    let mut labels = vec![0; counts.total()];
    let mut root_label = FxHashMap::default();
    for (node, label) in labels.iter_mut().enumerate() {
        let (root, _) = sides.find(node);
        let next = root_label.len();
        *label = *root_label.entry(root).or_insert(next);
    }
    Ok(DiscAnalysis {
        labels,
        components: root_label.len(),
        two_sided,
        orientable,
    })
}

/// Number of boundary curves: arcs on boundary faces, joined where they
/// meet the same point of a boundary edge.
pub(crate) fn count_boundary_curves(tri: &Triangulation, counts: &DiscCounts) -> usize {
    let mut points: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut arcs = 0usize;
    let mut pending: Vec<(usize, usize)> = Vec::new();

    for t in 0..tri.size() {
        for f in (0..4).filter(|&f| tri.gluing(t, f).is_none()) {
            for v in (0..4).filter(|&v| v != f) {
                for j in 0..counts.corner_arc_count(t, v, f) {
                    let arc = arcs;
                    arcs += 1;
                    for w in (0..4).filter(|&w| w != v && w != f) {
                        let local = edge_number(v, w);
                        let edge = tri.tetrahedron_edge(t, local);
                        let from_v = tri.tetrahedron_edge_mapping(t, local).image(0) == v;
                        let pos = if from_v {
                            j
                        } else {
                            counts.local_edge_weight(t, v, w) - 1 - j
                        };
                        match points.get(&(edge, pos)) {
                            Some(&other) => pending.push((other, arc)),
                            None => {
                                points.insert((edge, pos), arc);
                            }
                        }
                    }
                }
            }
        }
    }

    let mut sets = DisjointSets::new(arcs);
    for (a, b) in pending {
        sets.union(a, b);
    }
    sets.labels().1
}
