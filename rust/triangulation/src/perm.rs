// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Permutations of the four vertices of a tetrahedron.

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A permutation of {0, 1, 2, 3}, stored as the list of images.
///
/// Composition follows function notation: `(p * q).image(i)` is
/// `p.image(q.image(i))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; 4]", into = "[u8; 4]")]
pub struct Perm4([u8; 4]);

impl Perm4 {
    /// The identity permutation.
    pub const IDENTITY: Perm4 = Perm4([0, 1, 2, 3]);

    /// Builds a permutation from its images, rejecting anything that is not
    /// a bijection on {0, 1, 2, 3}.
    pub fn new(images: [u8; 4]) -> Result<Self> {
        let mut seen = [false; 4];
        for &img in &images {
            if img > 3 || seen[img as usize] {
                return Err(Error::InvalidPermutation(images));
            }
            seen[img as usize] = true;
        }
        Ok(Perm4(images))
    }

    /// Builds a permutation from images known to be valid.
    ///
    /// Only for the fixed tables inside this crate and its dependents.
    pub const fn from_images(images: [u8; 4]) -> Self {
        Perm4(images)
    }

    /// The transposition swapping `a` and `b` (the identity if `a == b`).
    pub fn transposition(a: usize, b: usize) -> Self {
        let mut images = [0u8, 1, 2, 3];
        images.swap(a, b);
        Perm4(images)
    }

    /// The permutation sending `0, 1, 2, 3` to `a, b, c, d`.
    ///
    /// Panics in debug builds if the images repeat.
    pub fn from_vertices(a: usize, b: usize, c: usize, d: usize) -> Self {
        let p = Perm4([a as u8, b as u8, c as u8, d as u8]);
        debug_assert!(Perm4::new(p.0).is_ok(), "bad images {:?}", p.0);
        p
    }

    /// The image of `i`.
    #[inline]
    pub fn image(&self, i: usize) -> usize {
        self.0[i] as usize
    }

    /// The element that maps to `i`.
    #[inline]
    pub fn pre_image(&self, i: usize) -> usize {
        self.0.iter().position(|&x| x as usize == i).unwrap_or(i)
    }

    /// The list of images.
    pub fn images(&self) -> [u8; 4] {
        self.0
    }

    pub fn inverse(&self) -> Self {
        let mut inv = [0u8; 4];
        for (i, &img) in self.0.iter().enumerate() {
            inv[img as usize] = i as u8;
        }
        Perm4(inv)
    }

    /// `+1` for even permutations, `-1` for odd ones.
    pub fn sign(&self) -> i8 {
        let mut inversions = 0;
        for i in 0..4 {
            for j in (i + 1)..4 {
                if self.0[i] > self.0[j] {
                    inversions += 1;
                }
            }
        }
        if inversions % 2 == 0 {
            1
        } else {
            -1
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Perm4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Perm4 {
    type Output = Perm4;

    fn mul(self, rhs: Perm4) -> Perm4 {
        Perm4([
            self.0[rhs.0[0] as usize],
            self.0[rhs.0[1] as usize],
            self.0[rhs.0[2] as usize],
            self.0[rhs.0[3] as usize],
        ])
    }
}

impl TryFrom<[u8; 4]> for Perm4 {
    type Error = Error;

    fn try_from(images: [u8; 4]) -> Result<Self> {
        Perm4::new(images)
    }
}

impl From<Perm4> for [u8; 4] {
    fn from(p: Perm4) -> Self {
        p.0
    }
}

impl fmt::Display for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for img in self.0 {
            write!(f, "{}", img)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_bijections() {
        assert!(Perm4::new([0, 1, 2, 3]).is_ok());
        assert!(matches!(
            Perm4::new([0, 0, 2, 3]),
            Err(Error::InvalidPermutation(_))
        ));
        assert!(Perm4::new([0, 1, 2, 4]).is_err());
    }

    #[test]
    fn composition_applies_right_first() {
        let p = Perm4::new([1, 2, 3, 0]).unwrap();
        let q = Perm4::transposition(0, 1);
        // q sends 0 -> 1, then p sends 1 -> 2
        assert_eq!((p * q).image(0), 2);
        assert_eq!((q * p).image(0), 0);
    }

    #[test]
    fn inverse_and_sign() {
        let p = Perm4::new([1, 3, 0, 2]).unwrap();
        assert!((p * p.inverse()).is_identity());
        assert!((p.inverse() * p).is_identity());
        assert_eq!(p.sign(), -1);
        assert_eq!(Perm4::transposition(1, 3).sign(), -1);
        assert_eq!(Perm4::new([1, 2, 0, 3]).unwrap().sign(), 1);
        assert_eq!(p.pre_image(3), 1);
    }

    #[test]
    fn display_lists_images() {
        assert_eq!(Perm4::new([2, 0, 3, 1]).unwrap().to_string(), "2031");
    }

    #[test]
    fn serde_rejects_bad_images() {
        let p: Perm4 = serde_json::from_str("[3,2,1,0]").unwrap();
        assert_eq!(p.image(0), 3);
        assert!(serde_json::from_str::<Perm4>("[1,1,2,3]").is_err());
    }
}
