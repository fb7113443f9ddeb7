// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for normal surface operations.

/// Result type alias for normal surface operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by surfaces and the operations built on them.
///
/// A failed operation leaves the surface, its cached properties and its
/// triangulation snapshot untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input from the caller, such as a vector of the wrong length.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation does not apply to this surface or triangulation.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// The coordinates are structurally inconsistent.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A fixed-width intermediate result did not fit.
    #[error("integer overflow in {0}")]
    Overflow(&'static str),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Error from the underlying triangulation.
    #[error(transparent)]
    Triangulation(#[from] normal_triangulation::Error),
}
