// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cooperative cancellation and progress reporting for long operations.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    parent: Option<CancelToken>,
}

/// A shareable cancellation flag.
///
/// Child tokens observe their parent's cancellation but can also be
/// cancelled on their own, which is how sibling searches stop each other
/// without touching the caller's token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is cancelled whenever this one is.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        let mut token = Some(self);
        while let Some(t) = token {
            if t.inner.cancelled.load(Ordering::Acquire) {
                return true;
            }
            token = t.inner.parent.as_ref();
        }
        false
    }

    /// Fails with [`Error::Cancelled`] once cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            tracing::debug!("operation cancelled");
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

/// Point-in-time view of a [`ProgressTracker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub current: String,
    pub finished: bool,
}

#[derive(Debug, Default)]
struct ProgressInner {
    processed: AtomicUsize,
    total: AtomicUsize,
    finished: AtomicBool,
    current: Mutex<String>,
}

/// Progress counters that one thread updates and another reads.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    inner: Arc<ProgressInner>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new stage of `total` steps.
    pub fn begin(&self, description: &str, total: usize) {
        self.inner.processed.store(0, Ordering::Relaxed);
        self.inner.total.store(total, Ordering::Relaxed);
        self.set_description(description);
    }

    pub fn set_description(&self, description: &str) {
        let mut current = self
            .inner
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.clear();
        current.push_str(description);
    }

    /// Adds `steps` to the current stage, for stages whose size is only
    /// learnt as they run.
    pub fn grow(&self, steps: usize) {
        self.inner.total.fetch_add(steps, Ordering::Relaxed);
    }

    /// Records `steps` completed steps.
    pub fn advance(&self, steps: usize) {
        self.inner.processed.fetch_add(steps, Ordering::Relaxed);
    }

    pub fn finish(&self) {
        self.inner.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.inner.finished.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let current = self
            .inner
            .current
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        ProgressSnapshot {
            processed: self.inner.processed.load(Ordering::Relaxed),
            total: self.inner.total.load(Ordering::Relaxed),
            current,
            finished: self.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_sees_parent_cancellation() {
        let parent = CancelToken::new();
        let child = parent.child();
        let sibling = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
        assert!(!sibling.is_cancelled());

        parent.cancel();
        assert!(sibling.is_cancelled());
        assert!(matches!(sibling.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn progress_snapshot_reflects_updates() {
        let progress = ProgressTracker::new();
        let reader = progress.clone();
        progress.begin("searching side 1", 10);
        progress.advance(3);
        progress.advance(2);

        let snap = reader.snapshot();
        assert_eq!(snap.processed, 5);
        assert_eq!(snap.total, 10);
        assert_eq!(snap.current, "searching side 1");
        assert!(!snap.finished);

        progress.finish();
        assert!(reader.snapshot().finished);
        let json = serde_json::to_string(&reader.snapshot()).unwrap();
        assert!(json.contains("\"processed\":5"));
    }

    #[test]
    fn growing_stage_keeps_processed_steps() {
        let progress = ProgressTracker::new();
        progress.begin("searching", 0);
        progress.grow(4);
        progress.advance(1);
        progress.grow(2);
        let snap = progress.snapshot();
        assert_eq!((snap.processed, snap.total), (1, 6));
    }
}
