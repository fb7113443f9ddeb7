// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration loaded from environment variables.

use std::sync::OnceLock;

/// Limits and switches for the expensive surface operations.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of disc copies the disc-graph algorithms will
    /// materialise (`NORMAL_MAX_DISCS`).
    pub max_discs: usize,
    /// Search both sides of a cut concurrently in `is_incompressible`
    /// (`NORMAL_PARALLEL_SIDES`).
    pub parallel_sides: bool,
}

const DEFAULT_MAX_DISCS: usize = 5_000_000;
const DEFAULT_PARALLEL_SIDES: bool = true;

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for unset or unparsable ones.
    pub fn from_env() -> Self {
        Self {
            max_discs: std::env::var("NORMAL_MAX_DISCS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_DISCS),
            parallel_sides: std::env::var("NORMAL_PARALLEL_SIDES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PARALLEL_SIDES),
        }
    }

    /// Process-wide configuration, read from the environment once. Used by
    /// the operations that take no explicit configuration.
    pub fn shared() -> &'static EngineConfig {
        static SHARED: OnceLock<EngineConfig> = OnceLock::new();
        SHARED.get_or_init(Self::from_env)
    }
}

/// Built-in defaults, whatever the environment says.
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_discs: DEFAULT_MAX_DISCS,
            parallel_sides: DEFAULT_PARALLEL_SIDES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ignores_environment() {
        let config = EngineConfig::default();
        assert_eq!(config.max_discs, 5_000_000);
        assert!(config.parallel_sides);
    }

    #[test]
    fn shared_is_read_once() {
        assert!(std::ptr::eq(EngineConfig::shared(), EngineConfig::shared()));
    }
}
