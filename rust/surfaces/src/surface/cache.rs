// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Memoised properties of a surface.
//!
//! Small flags live in atomic cells: any reader may compute a value, and the
//! first to finish publishes it. Two threads racing on the same flag both
//! compute, but only one store wins and both stores carry the same value.
//! The boundary curve count is expensive enough to sit behind a mutex.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::integer::LargeInteger;
use crate::surface::DiscType;

const UNKNOWN: u8 = 0;
const COMPUTING: u8 = 1;
const FALSE: u8 = 2;
const TRUE: u8 = 3;

/// A boolean that is unknown until first computed.
#[derive(Debug, Default)]
pub(crate) struct FlagCell(AtomicU8);

impl FlagCell {
    pub(crate) fn known(value: bool) -> Self {
        Self(AtomicU8::new(if value { TRUE } else { FALSE }))
    }

    pub(crate) fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Acquire) {
            TRUE => Some(true),
            FALSE => Some(false),
            _ => None,
        }
    }

    pub(crate) fn set(&self, value: bool) {
        self.0
            .store(if value { TRUE } else { FALSE }, Ordering::Release);
    }

    /// Returns the cached value, computing it first if needed. An error
    /// leaves the cell unknown.
    pub(crate) fn get_or_try<E>(&self, compute: impl FnOnce() -> Result<bool, E>) -> Result<bool, E> {
        if let Some(v) = self.get() {
            return Ok(v);
        }
        let claimed = self
            .0
            .compare_exchange(UNKNOWN, COMPUTING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        match compute() {
            Ok(v) => {
                self.set(v);
                Ok(v)
            }
            Err(e) => {
                if claimed {
                    let _ = self.0.compare_exchange(
                        COMPUTING,
                        UNKNOWN,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    );
                }
                Err(e)
            }
        }
    }

    pub(crate) fn get_or(&self, compute: impl FnOnce() -> bool) -> bool {
        match self.get_or_try::<std::convert::Infallible>(|| Ok(compute())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

impl Clone for FlagCell {
    fn clone(&self) -> Self {
        match self.get() {
            Some(v) => Self::known(v),
            None => Self::default(),
        }
    }
}

/// Everything a surface remembers about itself.
#[derive(Debug, Default)]
pub(crate) struct SurfaceCache {
    pub(crate) euler: OnceLock<LargeInteger>,
    pub(crate) oct_position: OnceLock<Option<DiscType>>,
    pub(crate) compact: FlagCell,
    pub(crate) real_boundary: FlagCell,
    pub(crate) orientable: FlagCell,
    pub(crate) two_sided: FlagCell,
    pub(crate) connected: FlagCell,
    pub(crate) boundaries: Mutex<Option<usize>>,
}

impl SurfaceCache {
    pub(crate) fn boundaries(&self) -> Option<usize> {
        *self
            .boundaries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn set_boundaries(&self, count: usize) {
        *self
            .boundaries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(count);
    }

    /// Cache for a surface known to have no discs at all.
    pub(crate) fn empty() -> Self {
        let cache = Self {
            compact: FlagCell::known(true),
            real_boundary: FlagCell::known(false),
            orientable: FlagCell::known(true),
            two_sided: FlagCell::known(true),
            connected: FlagCell::known(true),
            boundaries: Mutex::new(Some(0)),
            ..Self::default()
        };
        let _ = cache.euler.set(LargeInteger::new(0));
        let _ = cache.oct_position.set(None);
        cache
    }

    /// Keeps only what survives multiplication by a positive integer: the
    /// octagon position, compactness and real boundary. The Euler
    /// characteristic is supplied by the caller.
    pub(crate) fn scaled(&self, euler: Option<LargeInteger>) -> Self {
        let cache = Self {
            compact: self.compact.clone(),
            real_boundary: self.real_boundary.clone(),
            ..Self::default()
        };
        if let Some(&pos) = self.oct_position.get() {
            let _ = cache.oct_position.set(pos);
        }
        if let Some(e) = euler {
            let _ = cache.euler.set(e);
        }
        cache
    }
}

impl Clone for SurfaceCache {
    fn clone(&self) -> Self {
        Self {
            euler: self.euler.clone(),
            oct_position: self.oct_position.clone(),
            compact: self.compact.clone(),
            real_boundary: self.real_boundary.clone(),
            orientable: self.orientable.clone(),
            two_sided: self.two_sided.clone(),
            connected: self.connected.clone(),
            boundaries: Mutex::new(self.boundaries()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_cell_publishes_once_computed() {
        let cell = FlagCell::default();
        assert_eq!(cell.get(), None);
        assert!(cell.get_or(|| true));
        // a second computation is never run once the value is known
        assert!(cell.get_or(|| false));
        assert_eq!(cell.clone().get(), Some(true));
    }

    #[test]
    fn failed_computation_leaves_cell_unknown() {
        let cell = FlagCell::default();
        let r: Result<bool, &str> = cell.get_or_try(|| Err("boom"));
        assert!(r.is_err());
        assert_eq!(cell.get(), None);
        assert_eq!(cell.get_or_try::<&str>(|| Ok(false)), Ok(false));
    }

    #[test]
    fn empty_cache_is_fully_known() {
        let cache = SurfaceCache::empty();
        assert_eq!(cache.connected.get(), Some(true));
        assert_eq!(cache.boundaries(), Some(0));
        assert_eq!(cache.euler.get(), Some(&LargeInteger::new(0)));
        assert_eq!(cache.clone().oct_position.get(), Some(&None));
    }
}
