// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for triangulation operations.

/// Result type alias for triangulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reading a triangulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tetrahedron index was past the end of the triangulation.
    #[error("tetrahedron {index} out of range (size {size})")]
    TetrahedronOutOfRange { index: usize, size: usize },

    /// A face number was not in 0..4.
    #[error("face {0} out of range")]
    FaceOutOfRange(usize),

    /// The face is already glued to something else.
    #[error("face {face} of tetrahedron {tet} is already glued")]
    FaceAlreadyGlued { tet: usize, face: usize },

    /// The gluing would identify a face with itself.
    #[error("cannot glue face {face} of tetrahedron {tet} to itself")]
    InvalidGluing { tet: usize, face: usize },

    /// Four images that do not form a permutation of {0,1,2,3}.
    #[error("not a permutation of 0..4: {0:?}")]
    InvalidPermutation([u8; 4]),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
