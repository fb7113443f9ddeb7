// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Normal Surfaces
//!
//! Normal and almost normal surfaces inside 3-manifold triangulations.
//!
//! A [`NormalSurface`] is a vector of disc counts (triangles,
//! quadrilaterals and optionally octagons in every tetrahedron) tied to an
//! immutable snapshot of a [`Triangulation`](normal_triangulation::Triangulation).
//! Coordinates are arbitrary precision and may be infinite for spun-normal
//! surfaces in ideal triangulations.
//!
//! ## Quick Start
//!
//! ```rust
//! use normal_surfaces::{NormalCoords, NormalSurface, LargeInteger};
//! use normal_triangulation::samples;
//!
//! let tri = samples::closed_one_tet().snapshot();
//! let link = NormalSurface::from_ints(tri, NormalCoords::Standard, &[1, 1, 1, 1, 0, 0, 0])?;
//!
//! assert_eq!(link.euler_char(), LargeInteger::new(2));
//! assert_eq!(link.is_vertex_link(), Some(0));
//! assert_eq!(link.components()?.len(), 1);
//! # Ok::<(), normal_surfaces::Error>(())
//! ```
//!
//! ## Operations
//!
//! - **Invariants**: Euler characteristic, orientability, sidedness,
//!   connectedness, boundary curves, all memoised per surface
//! - **Arithmetic**: sums, scalar multiples, scaling down
//! - **Links**: vertex, edge and triangle links, thin and normal
//! - **Surgery**: cutting along, crushing, removing octagons, splitting
//!   into components
//! - **Topology**: compressing discs and incompressibility, with vertex
//!   surfaces supplied through [`VertexSurfaceSource`]
//! - **Persistence**: the XML `<surface>` element and a compact text form
//!
//! Long-running operations have `*_with` variants taking an
//! [`EngineConfig`], a [`CancelToken`] and optionally a [`ProgressTracker`].

pub mod cancel;
pub mod config;
pub mod encoding;
pub mod error;
pub mod integer;
pub mod surface;
pub mod tables;
pub mod vector;

mod boundary;
mod components;
mod compress;
mod crush;
mod cut;
pub(crate) mod discs;
mod links;
mod octagons;

pub use cancel::{CancelToken, ProgressSnapshot, ProgressTracker};
pub use compress::{has_compressing_disc, VertexSurfaceSource};
pub use config::EngineConfig;
pub use encoding::{NormalCoords, NormalEncoding};
pub use error::{Error, Result};
pub use integer::LargeInteger;
pub use surface::{DiscType, NormalSurface};
pub use vector::NormalVector;
