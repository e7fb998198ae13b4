// Hotschema - Conditional Schema Compile-Cost Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structural statistics over a document.
//!
//! A [`Snapshot`] is computed in one read-only traversal and never cached:
//! callers recompute it whenever they need numbers for a document.

use crate::document::{Document, Mapping, Scalar};
use crate::keywords::{CONDITIONAL_KEYWORDS, PATTERN, REF, TRACKED_KEYWORDS};
use crate::walk::{traverse, DocumentVisitor, VisitorContext};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Structural statistics for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of mapping nodes.
    pub object_count: usize,
    /// Number of mappings carrying each tracked keyword. Every tracked keyword
    /// is present, absent ones with zero.
    pub keyword_counts: BTreeMap<String, usize>,
    /// Number of mappings carrying `$ref`.
    pub ref_count: usize,
    /// Number of distinct string `$ref` targets.
    pub unique_ref_targets: usize,
    /// Number of `$ref` occurrences lying inside a conditional branch.
    pub conditional_ref_count: usize,
    /// Number of mappings carrying `pattern`.
    pub pattern_count: usize,
    /// Longest `pattern` string in characters (zero when none).
    pub max_pattern_length: usize,
}

impl Snapshot {
    /// Has-key count for `keyword`; zero for untracked or absent keywords.
    pub fn keyword(&self, keyword: &str) -> usize {
        self.keyword_counts.get(keyword).copied().unwrap_or(0)
    }

    /// Sum of `if`, `then` and `else` has-key counts.
    pub fn conditional_count(&self) -> usize {
        CONDITIONAL_KEYWORDS.iter().map(|k| self.keyword(k)).sum()
    }
}

/// Compute the structural snapshot of `doc`.
pub fn snapshot(doc: &Document) -> Snapshot {
    let mut collector = SnapshotCollector::default();
    traverse(doc, &mut collector);
    collector.finish()
}

#[derive(Default)]
struct SnapshotCollector {
    object_count: usize,
    keyword_counts: BTreeMap<String, usize>,
    ref_count: usize,
    ref_targets: HashSet<String>,
    conditional_ref_count: usize,
    pattern_count: usize,
    max_pattern_length: usize,
}

impl SnapshotCollector {
    fn finish(self) -> Snapshot {
        let mut keyword_counts = self.keyword_counts;
        for keyword in TRACKED_KEYWORDS {
            keyword_counts.entry((*keyword).to_string()).or_insert(0);
        }
        Snapshot {
            object_count: self.object_count,
            keyword_counts,
            ref_count: self.ref_count,
            unique_ref_targets: self.ref_targets.len(),
            conditional_ref_count: self.conditional_ref_count,
            pattern_count: self.pattern_count,
            max_pattern_length: self.max_pattern_length,
        }
    }
}

impl DocumentVisitor for SnapshotCollector {
    fn visit_mapping(&mut self, map: &Mapping, ctx: &VisitorContext) {
        self.object_count += 1;

        for keyword in TRACKED_KEYWORDS {
            if map.contains_key(*keyword) {
                *self.keyword_counts.entry((*keyword).to_string()).or_insert(0) += 1;
            }
        }

        if let Some(target) = map.get(REF) {
            self.ref_count += 1;
            if ctx.in_conditional {
                self.conditional_ref_count += 1;
            }
            if let Document::Scalar(Scalar::String(s)) = target {
                if !self.ref_targets.contains(s) {
                    self.ref_targets.insert(s.clone());
                }
            }
        }

        if let Some(pattern) = map.get(PATTERN) {
            self.pattern_count += 1;
            let len = pattern.as_str().map(|s| s.chars().count()).unwrap_or(0);
            self.max_pattern_length = self.max_pattern_length.max(len);
        }
    }
}
