// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dual graph of a triangulation.
//!
//! - **Nodes** = tetrahedra
//! - **Edges** = glued face pairs, carrying the gluing permutation
//!
//! Used for connected components and for propagating orientations.

use std::collections::VecDeque;

use crate::perm::Perm4;
use crate::triangulation::Triangulation;

/// An arc of the dual graph, seen from its source tetrahedron.
#[derive(Debug, Clone, Copy)]
pub struct DualArc {
    /// Face of the source tetrahedron.
    pub face: usize,
    /// Adjacent tetrahedron.
    pub target: usize,
    pub perm: Perm4,
}

/// The dual graph of a triangulation.
#[derive(Debug, Clone)]
pub struct DualGraph {
    /// Adjacency list: tetrahedron → arcs through each glued face.
    adjacency: Vec<Vec<DualArc>>,
}

impl DualGraph {
    /// Builds the dual graph of `tri`.
    pub fn new(tri: &Triangulation) -> Self {
        let adjacency = tri
            .tets
            .iter()
            .map(|data| {
                data.adj
                    .iter()
                    .enumerate()
                    .filter_map(|(face, g)| {
                        g.map(|g| DualArc {
                            face,
                            target: g.tet,
                            perm: g.perm,
                        })
                    })
                    .collect()
            })
            .collect();
        Self { adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Arcs leaving tetrahedron `node`.
    pub fn arcs(&self, node: usize) -> &[DualArc] {
        &self.adjacency[node]
    }

    // =========================================================================
    // Connected components
    // =========================================================================

    /// Returns connected components as lists of tetrahedron indices, each in
    /// BFS order from its smallest member.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.node_count();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            visited[start] = true;
            queue.push_back(start);

            while let Some(node) = queue.pop_front() {
                component.push(node);
                for arc in &self.adjacency[node] {
                    if !visited[arc.target] {
                        visited[arc.target] = true;
                        queue.push_back(arc.target);
                    }
                }
            }

            components.push(component);
        }

        components
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Assigns `+1`/`-1` to each tetrahedron so that tetrahedra glued by an
    /// odd permutation agree and those glued by an even one disagree. The
    /// first tetrahedron of each component is `+1`.
    ///
    /// Returns the orientations and whether the assignment is consistent.
    pub fn orientations(&self) -> (Vec<i8>, bool) {
        let n = self.node_count();
        let mut orient = vec![0i8; n];
        let mut consistent = true;

        for start in 0..n {
            if orient[start] != 0 {
                continue;
            }
            orient[start] = 1;
            let mut queue = VecDeque::new();
            queue.push_back(start);

            while let Some(node) = queue.pop_front() {
                for arc in &self.adjacency[node] {
                    let expected = if arc.perm.sign() < 0 {
                        orient[node]
                    } else {
                        -orient[node]
                    };
                    if orient[arc.target] == 0 {
                        orient[arc.target] = expected;
                        queue.push_back(arc.target);
                    } else if orient[arc.target] != expected {
                        consistent = false;
                    }
                }
            }
        }

        (orient, consistent)
    }
}
