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

//! Report types and structures.

use crate::core::config::InvocationMode;
use crate::core::measurement::{MeasurementRecord, MeasurementTable};
use hotschema_core::Snapshot;
use serde::{Deserialize, Serialize};

/// Variant name of the unmodified bundled document.
pub const BASELINE_VARIANT: &str = "bundle";

/// Outcome of the metaschema check on the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MetaschemaStatus {
    /// The source validates against its metaschema.
    Passed,
    /// The checker rejected the source or could not run.
    Failed {
        /// Checker diagnostics.
        detail: String,
    },
    /// The check was disabled.
    Skipped,
}

impl MetaschemaStatus {
    /// Short label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            MetaschemaStatus::Passed => "passed",
            MetaschemaStatus::Failed { .. } => "FAILED",
            MetaschemaStatus::Skipped => "skipped",
        }
    }
}

/// Size and structure of one serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Serialized size in bytes.
    pub bytes: usize,
    /// Structural statistics.
    pub snapshot: Snapshot,
}

/// One ablation variant as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummary {
    /// Rule name, also the variant name.
    pub rule: String,
    /// One-line rule description.
    pub description: String,
    /// File the variant was written to.
    pub path: String,
    /// Size and structure.
    #[serde(flatten)]
    pub summary: DocumentSummary,
}

/// Complete ablation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AblationReport {
    /// Report title.
    pub title: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Schema path or URL.
    pub source_location: String,
    /// Compiler program.
    pub compiler: String,
    /// Resource probe name.
    pub probe: String,
    /// Measured modes in order.
    pub modes: Vec<InvocationMode>,
    /// Metaschema check outcome.
    pub metaschema: MetaschemaStatus,
    /// Source document before bundling.
    pub source: DocumentSummary,
    /// Bundled baseline.
    pub bundle: DocumentSummary,
    /// Variants in generation order.
    pub variants: Vec<VariantSummary>,
    /// Measurement table.
    pub measurements: MeasurementTable,
    /// Free-form notes.
    pub notes: Vec<String>,
}

impl AblationReport {
    /// Creates a report stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        source_location: impl Into<String>,
        source: DocumentSummary,
        bundle: DocumentSummary,
    ) -> Self {
        Self {
            title: title.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source_location: source_location.into(),
            compiler: String::new(),
            probe: String::new(),
            modes: Vec::new(),
            metaschema: MetaschemaStatus::Skipped,
            source,
            bundle,
            variants: Vec::new(),
            measurements: MeasurementTable::new(),
            notes: Vec::new(),
        }
    }

    /// Adds a note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Variant names in report order, baseline first.
    pub fn variant_names(&self) -> Vec<&str> {
        std::iter::once(BASELINE_VARIANT)
            .chain(self.variants.iter().map(|v| v.rule.as_str()))
            .collect()
    }

    /// Measurement of `variant` in `mode`.
    pub fn record(&self, variant: &str, mode: InvocationMode) -> Option<&MeasurementRecord> {
        self.measurements.find(variant, mode)
    }

    /// Wall time of `variant` relative to the baseline in the same mode.
    pub fn wall_ratio(&self, variant: &str, mode: InvocationMode) -> Option<f64> {
        let wall = self.record(variant, mode)?.usage.wall_seconds?;
        let base = self.record(BASELINE_VARIANT, mode)?.usage.wall_seconds?;
        (base > 0.0).then(|| wall / base)
    }

    /// Variant with the lowest wall time in `mode`, excluding the baseline.
    pub fn fastest_variant(&self, mode: InvocationMode) -> Option<(&str, f64)> {
        self.variants
            .iter()
            .filter_map(|v| {
                let wall = self.record(&v.rule, mode)?.usage.wall_seconds?;
                Some((v.rule.as_str(), wall))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::ResourceUsage;
    use hotschema_core::{json, snapshot};

    fn summary() -> DocumentSummary {
        let doc = json::from_json_str(r#"{"allOf": [{"if": {}, "then": {}}]}"#).unwrap();
        DocumentSummary {
            bytes: 32,
            snapshot: snapshot(&doc),
        }
    }

    fn timed(variant: &str, wall: Option<f64>) -> MeasurementRecord {
        MeasurementRecord::new(
            variant,
            InvocationMode::Normal,
            ResourceUsage {
                wall_seconds: wall,
                ..ResourceUsage::unavailable()
            },
            Some(0),
        )
    }

    fn variant(rule: &str) -> VariantSummary {
        VariantSummary {
            rule: rule.to_string(),
            description: String::new(),
            path: format!("variants/{}.json", rule),
            summary: summary(),
        }
    }

    #[test]
    fn test_metaschema_status_serialization() {
        let failed = MetaschemaStatus::Failed {
            detail: "bad".to_string(),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["detail"], "bad");
        assert_eq!(
            serde_json::to_value(MetaschemaStatus::Passed).unwrap()["status"],
            "passed"
        );
    }

    #[test]
    fn test_ratios_and_fastest() {
        let mut report = AblationReport::new("T", "schema.json", summary(), summary());
        report.variants = vec![variant("no-allof"), variant("refs-only")];
        report.measurements.push(timed("bundle", Some(10.0)));
        report.measurements.push(timed("no-allof", Some(4.0)));
        report.measurements.push(timed("refs-only", None));

        assert_eq!(report.variant_names(), vec!["bundle", "no-allof", "refs-only"]);
        assert_eq!(report.wall_ratio("no-allof", InvocationMode::Normal), Some(0.4));
        assert_eq!(report.wall_ratio("refs-only", InvocationMode::Normal), None);
        assert_eq!(
            report.fastest_variant(InvocationMode::Normal),
            Some(("no-allof", 4.0))
        );
        assert_eq!(report.fastest_variant(InvocationMode::Fast), None);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let report = AblationReport::new("T", "schema.json", summary(), summary());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }
}
