// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sums, multiples and scaling down.

use std::ops::{Add, Mul, MulAssign};
use std::sync::Arc;

use dashu::integer::IBig;
use num_traits::{One, Zero};

use super::cache::SurfaceCache;
use super::NormalSurface;
use crate::error::{Error, Result};
use crate::integer::LargeInteger;
use crate::vector::NormalVector;

impl NormalSurface {
    /// Fails unless both surfaces live in the same triangulation, either the
    /// same snapshot or one with identical gluings.
    pub(crate) fn check_same_triangulation(&self, other: &NormalSurface) -> Result<()> {
        if Arc::ptr_eq(&self.tri, &other.tri) || self.tri.is_identical_to(&other.tri) {
            Ok(())
        } else {
            Err(Error::InvalidArgument(
                "surfaces belong to different triangulations".into(),
            ))
        }
    }

    /// `self * 2`.
    pub fn double_surface(&self) -> NormalSurface {
        self * 2
    }

    /// Divides every coordinate by their greatest common divisor and returns
    /// that divisor. Infinite coordinates are left alone.
    ///
    /// # Errors
    ///
    /// [`Error::FailedPrecondition`] if there is no non-zero finite
    /// coordinate.
    pub fn scale_down(&mut self) -> Result<LargeInteger> {
        let mut gcd = LargeInteger::zero();
        for x in self.vector.iter().filter(|x| x.is_finite() && !x.is_zero()) {
            gcd = gcd.gcd(x).unwrap_or_else(LargeInteger::one);
            if gcd.is_one() {
                return Ok(gcd);
            }
        }
        let Some(divisor) = gcd.finite().filter(|g| !g.is_zero()).cloned() else {
            return Err(Error::FailedPrecondition(
                "cannot scale down the empty surface".into(),
            ));
        };

        for x in self.vector.entries_mut() {
            *x = x.div_exact(&divisor);
        }
        let euler = self.cache.euler.get().map(|e| e.div_exact(&divisor));
        self.cache = self.cache.scaled(euler);
        tracing::trace!(%divisor, "scaled surface down");
        Ok(gcd)
    }
}

impl Add for &NormalSurface {
    type Output = Result<NormalSurface>;

    /// Sums two surfaces in the same triangulation. The result stores every
    /// disc type either summand stores.
    fn add(self, rhs: &NormalSurface) -> Result<NormalSurface> {
        self.check_same_triangulation(rhs)?;
        let enc = self.enc.join(rhs.enc);
        let octs = enc.stores_octagons();
        let mut out = Vec::with_capacity(enc.block_width() * self.tri.size());
        for t in 0..self.tri.size() {
            for v in 0..4 {
                out.push(&self.triangles(t, v) + &rhs.triangles(t, v));
            }
            for k in 0..3 {
                out.push(&self.quads(t, k) + &rhs.quads(t, k));
            }
            if octs {
                for k in 0..3 {
                    out.push(&self.octs(t, k) + &rhs.octs(t, k));
                }
            }
        }
        Ok(NormalSurface::assemble(
            self.tri.clone(),
            enc,
            NormalVector::from(out),
        ))
    }
}

impl Mul<u64> for &NormalSurface {
    type Output = NormalSurface;

    fn mul(self, k: u64) -> NormalSurface {
        let mut out = self.clone();
        out *= k;
        out.name.clear();
        out
    }
}

impl MulAssign<u64> for NormalSurface {
    /// Multiplies every coordinate by `k`. Multiplying by zero gives the
    /// empty surface, even when some coordinates are infinite.
    fn mul_assign(&mut self, k: u64) {
        if k == 1 {
            return;
        }
        let factor = LargeInteger::Finite(IBig::from(k));
        for x in self.vector.entries_mut() {
            *x = &*x * &factor;
        }
        if k == 0 {
            self.cache = SurfaceCache::empty();
        } else {
            let euler = self.cache.euler.get().map(|e| e * &factor);
            self.cache = self.cache.scaled(euler);
        }
    }
}
