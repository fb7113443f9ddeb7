// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate vectors.

use std::fmt;
use std::ops::Index;

use num_traits::Zero;

use crate::integer::LargeInteger;

/// A sequence of normal coordinates, laid out block by block according to
/// a [`NormalEncoding`](crate::NormalEncoding).
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalVector {
    entries: Vec<LargeInteger>,
}

impl NormalVector {
    /// A vector of `len` zeroes.
    pub fn zeros(len: usize) -> Self {
        Self {
            entries: vec![LargeInteger::zero(); len],
        }
    }

    pub fn from_ints(values: &[i64]) -> Self {
        values.iter().map(|&v| LargeInteger::new(v)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LargeInteger> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[LargeInteger] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [LargeInteger] {
        &mut self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(Zero::is_zero)
    }
}

impl Index<usize> for NormalVector {
    type Output = LargeInteger;

    fn index(&self, index: usize) -> &LargeInteger {
        &self.entries[index]
    }
}

impl FromIterator<LargeInteger> for NormalVector {
    fn from_iter<I: IntoIterator<Item = LargeInteger>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<LargeInteger>> for NormalVector {
    fn from(entries: Vec<LargeInteger>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a NormalVector {
    type Item = &'a LargeInteger;
    type IntoIter = std::slice::Iter<'a, LargeInteger>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for NormalVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}
