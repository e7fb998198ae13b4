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

//! Measurement records for compiler invocations.
//!
//! Every metric is optional: `None` marks a value the probe could not
//! obtain, and is rendered as "unavailable" (or `NA` in the timing table).

use crate::core::config::InvocationMode;
use serde::{Deserialize, Serialize};

/// Resource usage of one process, as reported by a probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Elapsed wall-clock seconds.
    pub wall_seconds: Option<f64>,
    /// User CPU seconds.
    pub user_seconds: Option<f64>,
    /// System CPU seconds.
    pub sys_seconds: Option<f64>,
    /// Peak resident set size in kilobytes.
    pub max_rss_kb: Option<u64>,
}

impl ResourceUsage {
    /// Usage with every field unavailable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Names of the fields the probe could not fill.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.wall_seconds.is_none() {
            missing.push("wall");
        }
        if self.user_seconds.is_none() {
            missing.push("user");
        }
        if self.sys_seconds.is_none() {
            missing.push("sys");
        }
        if self.max_rss_kb.is_none() {
            missing.push("max_rss");
        }
        missing
    }

    /// Total CPU seconds, when both components are known.
    pub fn cpu_seconds(&self) -> Option<f64> {
        Some(self.user_seconds? + self.sys_seconds?)
    }

    /// Peak resident memory in megabytes.
    pub fn max_rss_mb(&self) -> Option<f64> {
        self.max_rss_kb.map(|kb| kb as f64 / 1024.0)
    }
}

/// One compiler invocation: which document, which mode, what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Variant name (`bundle` for the baseline).
    pub variant: String,
    /// Invocation mode.
    pub mode: InvocationMode,
    /// Resource usage.
    #[serde(flatten)]
    pub usage: ResourceUsage,
    /// Exit status of the compiler; `None` when killed by a signal or unknown.
    pub exit_code: Option<i32>,
}

impl MeasurementRecord {
    /// Creates a record.
    pub fn new(
        variant: impl Into<String>,
        mode: InvocationMode,
        usage: ResourceUsage,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            variant: variant.into(),
            mode,
            usage,
            exit_code,
        }
    }

    /// True when the compiler exited with status zero.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Append-only, ordered list of measurement records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementTable {
    records: Vec<MeasurementRecord>,
}

impl MeasurementTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: MeasurementRecord) {
        self.records.push(record);
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record was appended.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one variant, in insertion order.
    pub fn for_variant<'a>(
        &'a self,
        variant: &'a str,
    ) -> impl Iterator<Item = &'a MeasurementRecord> + 'a {
        self.records.iter().filter(move |r| r.variant == variant)
    }

    /// The record for a variant and mode, if measured.
    pub fn find(&self, variant: &str, mode: InvocationMode) -> Option<&MeasurementRecord> {
        self.records
            .iter()
            .find(|r| r.variant == variant && r.mode == mode)
    }

    /// Variant names in first-seen order.
    pub fn variants(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.variant.as_str()) {
                names.push(&record.variant);
            }
        }
        names
    }
}

impl<'a> IntoIterator for &'a MeasurementTable {
    type Item = &'a MeasurementRecord;
    type IntoIter = std::slice::Iter<'a, MeasurementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
