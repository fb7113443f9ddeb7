// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connected components and global disjointness.

use rustc_hash::FxHashMap;

use crate::cancel::{CancelToken, ProgressTracker};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::integer::LargeInteger;
use crate::surface::NormalSurface;

impl NormalSurface {
    /// Splits the surface into its connected components, in order of the
    /// first disc each contains.
    ///
    /// Components use standard coordinates, or almost normal coordinates
    /// when this surface stores octagons. The empty surface has no
    /// components.
    pub fn components(&self) -> Result<Vec<NormalSurface>> {
        self.components_with(EngineConfig::shared())
    }

    pub fn components_with(&self, config: &EngineConfig) -> Result<Vec<NormalSurface>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        self.require_compact_embedded("splitting into components")?;
        let (counts, analysis) = self.disc_analysis(config)?;

        let n = self.tri.size();
        let mut blocks = vec![vec![[0usize; 10]; n]; analysis.components];
        for (node, (t, slot)) in counts.node_types().into_iter().enumerate() {
            blocks[analysis.labels[node]][t][slot] += 1;
        }

        let with_octagons = self.enc.stores_octagons();
        let pieces: Vec<NormalSurface> = blocks
            .iter()
            .map(|component| {
                let counts: Vec<[LargeInteger; 10]> = component
                    .iter()
                    .map(|block| std::array::from_fn(|i| LargeInteger::from(block[i])))
                    .collect();
                let piece = NormalSurface::from_disc_counts(self.tri.clone(), &counts, with_octagons);
                piece.cache.connected.set(true);
                piece
            })
            .collect();
        tracing::debug!(components = pieces.len(), discs = counts.total(), "split surface");
        Ok(pieces)
    }

    /// Whether the two surfaces can be isotoped, within their normal
    /// isotopy classes, to be disjoint.
    ///
    /// Either surface may be disconnected. Runs in time proportional to the
    /// number of discs in both surfaces. An empty surface is disjoint from
    /// everything; non-compact or locally incompatible surfaces never are.
    pub fn disjoint(&self, other: &NormalSurface) -> Result<bool> {
        self.disjoint_with(other, EngineConfig::shared(), &CancelToken::new(), None)
    }

    /// [`disjoint`](Self::disjoint) with explicit limits. Progress counts
    /// the three component splits: the sum, then each surface on its own.
    pub fn disjoint_with(
        &self,
        other: &NormalSurface,
        config: &EngineConfig,
        cancel: &CancelToken,
        progress: Option<&ProgressTracker>,
    ) -> Result<bool> {
        self.check_same_triangulation(other)?;
        let disjoint = self.separable_from(other, config, cancel, progress)?;
        if let Some(p) = progress {
            p.finish();
        }
        Ok(disjoint)
    }

    fn separable_from(
        &self,
        other: &NormalSurface,
        config: &EngineConfig,
        cancel: &CancelToken,
        progress: Option<&ProgressTracker>,
    ) -> Result<bool> {
        if self.is_empty() || other.is_empty() {
            return Ok(true);
        }
        if !self.is_compact() || !other.is_compact() {
            return Ok(false);
        }
        if !self.locally_compatible(other)? {
            return Ok(false);
        }
        cancel.check()?;
        if let Some(p) = progress {
            p.begin("splitting surfaces into components", 3);
        }

        // disjoint surfaces sum to their union, so the components of the sum
        // are exactly those of both surfaces together
        let sum = (self + other)?;
        let mut unmatched: FxHashMap<NormalSurface, usize> = FxHashMap::default();
        for piece in sum.components_with(config)? {
            *unmatched.entry(piece).or_insert(0) += 1;
        }
        if let Some(p) = progress {
            p.advance(1);
        }
        for part in [self, other] {
            cancel.check()?;
            for piece in part.components_with(config)? {
                match unmatched.get_mut(&piece) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => return Ok(false),
                }
            }
            if let Some(p) = progress {
                p.advance(1);
            }
        }
        Ok(unmatched.values().all(|&count| count == 0))
    }
}
