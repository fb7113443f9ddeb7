// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disjoint set forest used to identify vertices, boundary pieces and disc
//! components.
//!
//! Uses path halving; the larger root always absorbs the smaller one so that
//! results are reproducible without rank bookkeeping.

#[derive(Debug, Clone)]
pub struct DisjointSets {
    parents: Vec<usize>,
}

impl DisjointSets {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parents: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Representative of the set containing `i`.
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parents[i] != i {
            let grandparent = self.parents[self.parents[i]];
            self.parents[i] = grandparent;
            i = grandparent;
        }
        i
    }

    /// Merges the sets containing `a` and `b`. Returns `false` if they were
    /// already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        if ra < rb {
            self.parents[ra] = rb;
        } else {
            self.parents[rb] = ra;
        }
        true
    }

    /// Dense labels `0..k` for the sets, numbered in order of their first
    /// member. Returns the labels and `k`.
    pub fn labels(&mut self) -> (Vec<usize>, usize) {
        let n = self.parents.len();
        let mut root_label = vec![usize::MAX; n];
        let mut labels = vec![0; n];
        let mut count = 0;
        for i in 0..n {
            let r = self.find(i);
            if root_label[r] == usize::MAX {
                root_label[r] = count;
                count += 1;
            }
            labels[i] = root_label[r];
        }
        (labels, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_labels() {
        let mut sets = DisjointSets::new(6);
        assert!(sets.union(0, 3));
        assert!(sets.union(4, 3));
        assert!(!sets.union(0, 4));
        sets.union(1, 5);
        let (labels, count) = sets.labels();
        assert_eq!(count, 3);
        assert_eq!(labels, vec![0, 1, 2, 0, 0, 1]);
    }
}
