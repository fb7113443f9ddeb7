// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Normal Triangulation
//!
//! Triangulations of 3-manifolds built from tetrahedra with glued faces.
//!
//! A [`Triangulation`] stores only the face gluings. Vertices, edges,
//! triangles, boundary components, vertex links and orientability are
//! derived on demand into a cached [`Skeleton`], which is discarded by any
//! mutation.
//!
//! ## Snapshots and peripheral curves
//!
//! Consumers that must not observe later edits take an `Arc` snapshot with
//! [`Triangulation::snapshot`]. A triangulation may carry a
//! [`PeripheralCurves`] provider describing meridians and longitudes on its
//! cusps; such a triangulation is called SnapPea-backed.

pub mod construction;
pub mod error;
pub mod graph;
pub mod numbering;
pub mod peripheral;
pub mod perm;
pub mod samples;
pub mod serialization;
pub mod skeleton;
pub mod triangulation;
pub mod unionfind;

pub use error::{Error, Result};
pub use graph::{DualArc, DualGraph};
pub use numbering::{edge_number, edge_ordering, face_ordering, EDGE_VERTEX};
pub use peripheral::{FixedPeripheralCurves, PeripheralCurves, SlopeEquations};
pub use perm::Perm4;
pub use serialization::{GluingData, TriangulationData};
pub use skeleton::{
    BoundaryComponent, Edge, EdgeEmbedding, Skeleton, Triangle, TriangleEmbedding, Vertex,
    VertexEmbedding,
};
pub use triangulation::{Gluing, TetrahedronData, Triangulation};
pub use unionfind::DisjointSets;
