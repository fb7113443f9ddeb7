// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate encodings.
//!
//! A [`NormalEncoding`] describes how a coordinate vector is laid out: which
//! disc types each tetrahedron block stores and what the vector may contain.
//! The packed integer form is what appears in the `enc` attribute of saved
//! surfaces:
//!
//! | bits        | meaning                          |
//! |-------------|----------------------------------|
//! | `0x000F`    | block width (3, 6, 7 or 10)      |
//! | `0x0010`    | stores triangles                 |
//! | `0x0020`    | stores octagons                  |
//! | `0x0100`    | could contain a vertex link      |
//! | `0x0200`    | could contain infinite entries   |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SIZE_MASK: i32 = 0x000F;
const PROPERTY_MASK: i32 = 0x7FF0;
const STORES_TRIANGLES: i32 = 0x0010;
const STORES_OCTAGONS: i32 = 0x0020;
const COULD_BE_VERTEX_LINK: i32 = 0x0100;
const COULD_BE_NON_COMPACT: i32 = 0x0200;

/// Coordinate systems an encoding can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NormalCoords {
    /// Triangles and quadrilaterals.
    Standard,
    /// Quadrilaterals only; non-compact surfaces allowed.
    Quad,
    /// Quadrilaterals only; closed surfaces in closed triangulations.
    QuadClosed,
    /// Triangles, quadrilaterals and octagons.
    AlmostNormal,
    /// Quadrilaterals and octagons; non-compact surfaces allowed.
    QuadOct,
    /// Quadrilaterals and octagons for closed surfaces.
    QuadOctClosed,
}

/// Layout of a coordinate vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalEncoding {
    flags: i32,
}

impl NormalEncoding {
    pub const fn new(coords: NormalCoords) -> Self {
        let flags = match coords {
            NormalCoords::Standard => 7 | COULD_BE_VERTEX_LINK | STORES_TRIANGLES,
            NormalCoords::Quad => 3 | COULD_BE_NON_COMPACT,
            NormalCoords::QuadClosed => 3,
            NormalCoords::AlmostNormal => {
                10 | COULD_BE_VERTEX_LINK | STORES_TRIANGLES | STORES_OCTAGONS
            }
            NormalCoords::QuadOct => 6 | COULD_BE_NON_COMPACT | STORES_OCTAGONS,
            NormalCoords::QuadOctClosed => 6 | STORES_OCTAGONS,
        };
        Self { flags }
    }

    /// The encoding used for the empty surface and for surfaces built from
    /// disc counts.
    pub const fn standard() -> Self {
        Self::new(NormalCoords::Standard)
    }

    /// Coordinates per tetrahedron.
    pub const fn block_width(&self) -> usize {
        (self.flags & SIZE_MASK) as usize
    }

    pub const fn stores_triangles(&self) -> bool {
        self.flags & STORES_TRIANGLES != 0
    }

    pub const fn stores_octagons(&self) -> bool {
        self.flags & STORES_OCTAGONS != 0
    }

    pub const fn could_be_almost_normal(&self) -> bool {
        self.stores_octagons()
    }

    pub const fn could_be_non_compact(&self) -> bool {
        self.flags & COULD_BE_NON_COMPACT != 0
    }

    pub const fn could_be_vertex_link(&self) -> bool {
        self.flags & COULD_BE_VERTEX_LINK != 0
    }

    /// Same encoding, but guaranteed to store triangles.
    pub const fn with_triangles(self) -> Self {
        if self.stores_triangles() {
            return self;
        }
        Self {
            flags: (self.flags | STORES_TRIANGLES) + 4,
        }
    }

    /// Same encoding with octagon storage dropped.
    pub const fn without_octagons(self) -> Self {
        if !self.stores_octagons() {
            return self;
        }
        Self {
            flags: (self.flags & !STORES_OCTAGONS) - 3,
        }
    }

    /// Smallest encoding able to hold vectors from both encodings.
    pub const fn join(self, other: Self) -> Self {
        let props = (self.flags | other.flags) & PROPERTY_MASK;
        let mut size = 3;
        if props & STORES_TRIANGLES != 0 {
            size += 4;
        }
        if props & STORES_OCTAGONS != 0 {
            size += 3;
        }
        Self {
            flags: props | size,
        }
    }

    /// Packed form, stable across versions.
    pub const fn int_value(&self) -> i32 {
        self.flags
    }

    /// Unpacks an encoding, rejecting values whose size does not match the
    /// stored disc types.
    pub fn from_int_value(value: i32) -> Result<Self> {
        let enc = Self { flags: value };
        let expected = 3
            + if enc.stores_triangles() { 4 } else { 0 }
            + if enc.stores_octagons() { 3 } else { 0 };
        if value < 0 || value & !(SIZE_MASK | PROPERTY_MASK) != 0 || enc.block_width() != expected
        {
            return Err(Error::InvalidArgument(format!(
                "{value} is not a valid normal encoding"
            )));
        }
        Ok(enc)
    }
}

impl Default for NormalEncoding {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<NormalCoords> for NormalEncoding {
    fn from(coords: NormalCoords) -> Self {
        Self::new(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_widths() {
        assert_eq!(NormalEncoding::new(NormalCoords::Quad).block_width(), 3);
        assert_eq!(NormalEncoding::new(NormalCoords::Standard).block_width(), 7);
        assert_eq!(NormalEncoding::new(NormalCoords::QuadOct).block_width(), 6);
        assert_eq!(
            NormalEncoding::new(NormalCoords::AlmostNormal).block_width(),
            10
        );
    }

    #[test]
    fn packed_values_are_stable() {
        assert_eq!(NormalEncoding::new(NormalCoords::Standard).int_value(), 0x117);
        assert_eq!(NormalEncoding::new(NormalCoords::Quad).int_value(), 0x203);
        assert_eq!(NormalEncoding::new(NormalCoords::AlmostNormal).int_value(), 0x13A);
        assert_eq!(NormalEncoding::new(NormalCoords::QuadOct).int_value(), 0x226);
    }

    #[test]
    fn with_triangles_keeps_other_properties() {
        let quad = NormalEncoding::new(NormalCoords::Quad).with_triangles();
        assert_eq!(quad.block_width(), 7);
        assert!(quad.stores_triangles());
        assert!(quad.could_be_non_compact());
        assert!(!quad.could_be_vertex_link());

        let qo = NormalEncoding::new(NormalCoords::QuadOctClosed).with_triangles();
        assert_eq!(qo.block_width(), 10);
        assert!(qo.stores_octagons());
        assert_eq!(qo.without_octagons().block_width(), 7);
    }

    #[test]
    fn join_unions_properties() {
        let a = NormalEncoding::new(NormalCoords::Standard);
        let b = NormalEncoding::new(NormalCoords::QuadOct);
        let j = a.join(b);
        assert_eq!(j.block_width(), 10);
        assert!(j.stores_triangles() && j.stores_octagons());
        assert!(j.could_be_non_compact() && j.could_be_vertex_link());
        assert_eq!(a.join(a), a);
    }

    #[test]
    fn from_int_value_validates() {
        for coords in [
            NormalCoords::Standard,
            NormalCoords::Quad,
            NormalCoords::QuadClosed,
            NormalCoords::AlmostNormal,
            NormalCoords::QuadOct,
            NormalCoords::QuadOctClosed,
        ] {
            let enc = NormalEncoding::new(coords);
            assert_eq!(NormalEncoding::from_int_value(enc.int_value()).unwrap(), enc);
        }
        assert!(NormalEncoding::from_int_value(0x118).is_err());
        assert!(NormalEncoding::from_int_value(-1).is_err());
        assert!(NormalEncoding::from_int_value(0x10007).is_err());
    }
}
