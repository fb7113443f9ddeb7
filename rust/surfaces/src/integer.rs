// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arbitrary precision coordinates with a distinguished infinity.
//!
//! Wraps `dashu::IBig`. Infinity only ever arises for non-compact surfaces
//! in ideal triangulations; it absorbs addition, compares greater than every
//! finite value, and is sent to zero by multiplication with zero.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use dashu::base::Gcd;
use dashu::integer::IBig;
use num_traits::{One, Zero};

/// A normal coordinate: a finite integer or infinity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum LargeInteger {
    Finite(IBig),
    Infinity,
}

impl LargeInteger {
    pub fn new(value: i64) -> Self {
        Self::Finite(IBig::from(value))
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    pub fn is_finite(&self) -> bool {
        !self.is_infinite()
    }

    /// The finite value, or `None` for infinity.
    pub fn finite(&self) -> Option<&IBig> {
        match self {
            Self::Finite(v) => Some(v),
            Self::Infinity => None,
        }
    }

    /// Converts to `i64` when finite and in range.
    pub fn to_i64(&self) -> Option<i64> {
        self.finite().and_then(|v| v.clone().try_into().ok())
    }

    /// Greatest common divisor of two finite values; `None` if either is
    /// infinite. The result is non-negative.
    pub fn gcd(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => {
                Some(Self::Finite(IBig::from(a.clone().gcd(b.clone()))))
            }
            _ => None,
        }
    }

    /// Division that is known to leave no remainder. Infinity stays
    /// infinite.
    pub fn div_exact(&self, divisor: &IBig) -> Self {
        match self {
            Self::Finite(v) => Self::Finite(v / divisor),
            Self::Infinity => Self::Infinity,
        }
    }
}

impl Default for LargeInteger {
    fn default() -> Self {
        Self::zero()
    }
}

impl Zero for LargeInteger {
    fn zero() -> Self {
        Self::Finite(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        matches!(self, Self::Finite(v) if v.is_zero())
    }
}

impl One for LargeInteger {
    fn one() -> Self {
        Self::Finite(IBig::ONE)
    }
}

impl From<i64> for LargeInteger {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<usize> for LargeInteger {
    fn from(value: usize) -> Self {
        Self::Finite(IBig::from(value))
    }
}

impl From<IBig> for LargeInteger {
    fn from(value: IBig) -> Self {
        Self::Finite(value)
    }
}

impl PartialOrd for LargeInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LargeInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.cmp(b),
            (Self::Finite(_), Self::Infinity) => Ordering::Less,
            (Self::Infinity, Self::Finite(_)) => Ordering::Greater,
            (Self::Infinity, Self::Infinity) => Ordering::Equal,
        }
    }
}

// --- Arithmetic ---

impl Add for &LargeInteger {
    type Output = LargeInteger;

    fn add(self, rhs: Self) -> LargeInteger {
        match (self, rhs) {
            (LargeInteger::Finite(a), LargeInteger::Finite(b)) => LargeInteger::Finite(a + b),
            _ => LargeInteger::Infinity,
        }
    }
}

impl Add for LargeInteger {
    type Output = LargeInteger;

    fn add(self, rhs: Self) -> LargeInteger {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a + b),
            _ => Self::Infinity,
        }
    }
}

impl AddAssign<&LargeInteger> for LargeInteger {
    fn add_assign(&mut self, rhs: &LargeInteger) {
        match (&mut *self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => *a += b,
            _ => *self = Self::Infinity,
        }
    }
}

impl Mul for &LargeInteger {
    type Output = LargeInteger;

    fn mul(self, rhs: Self) -> LargeInteger {
        if self.is_zero() || rhs.is_zero() {
            return LargeInteger::zero();
        }
        match (self, rhs) {
            (LargeInteger::Finite(a), LargeInteger::Finite(b)) => LargeInteger::Finite(a * b),
            _ => LargeInteger::Infinity,
        }
    }
}

impl Mul for LargeInteger {
    type Output = LargeInteger;

    fn mul(self, rhs: Self) -> LargeInteger {
        &self * &rhs
    }
}

// --- Text ---

impl fmt::Display for LargeInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v}"),
            Self::Infinity => f.write_str("inf"),
        }
    }
}

impl fmt::Debug for LargeInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for LargeInteger {
    type Err = dashu::base::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "inf" {
            return Ok(Self::Infinity);
        }
        IBig::from_str(s).map(Self::Finite)
    }
}
