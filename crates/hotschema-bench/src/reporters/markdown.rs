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

//! Markdown export for ablation reports.

use crate::error::{BenchError, Result};
use crate::reporters::types::{AblationReport, MetaschemaStatus, BASELINE_VARIANT};
use hotschema_core::keywords::TRACKED_KEYWORDS;
use hotschema_core::Snapshot;
use std::fs;
use std::path::Path;

/// Marker for metrics the probe could not obtain.
pub const UNAVAILABLE: &str = "unavailable";

/// Renders the report as Markdown. Pure: no I/O, no clock.
pub fn render_markdown(report: &AblationReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", report.title));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    md.push_str(&format!("**Source:** `{}`\n\n", report.source_location));
    md.push_str(&format!(
        "**Compiler:** `{}` | **Probe:** {} | **Modes:** {}\n\n",
        report.compiler,
        report.probe,
        report
            .modes
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    md.push_str(&format!("**Metaschema:** {}\n\n", report.metaschema.label()));

    if let MetaschemaStatus::Failed { detail } = &report.metaschema {
        md.push_str("```text\n");
        md.push_str(detail);
        md.push_str("\n```\n\n");
    }

    if !report.notes.is_empty() {
        md.push_str("## Notes\n\n");
        for note in &report.notes {
            md.push_str(&format!("- {}\n", note));
        }
        md.push('\n');
    }

    render_source_vs_bundle(&mut md, report);
    render_bundle_keywords(&mut md, &report.bundle.snapshot);
    render_measurements(&mut md, report);
    render_variants(&mut md, report);

    md
}

/// Writes [`render_markdown`] output to `path`.
pub fn export_markdown(report: &AblationReport, path: &Path) -> Result<()> {
    fs::write(path, render_markdown(report)).map_err(|e| BenchError::io_error(path, e))
}

fn render_source_vs_bundle(md: &mut String, report: &AblationReport) {
    let (src, bundle) = (&report.source, &report.bundle);

    md.push_str("## Source vs Bundle\n\n");
    md.push_str("| Metric | Source | Bundle |\n");
    md.push_str("|--------|--------|--------|\n");
    let rows = [
        ("Bytes", src.bytes, bundle.bytes),
        ("Objects", src.snapshot.object_count, bundle.snapshot.object_count),
        ("`$ref` occurrences", src.snapshot.ref_count, bundle.snapshot.ref_count),
        (
            "Distinct `$ref` targets",
            src.snapshot.unique_ref_targets,
            bundle.snapshot.unique_ref_targets,
        ),
        (
            "`$ref` inside conditionals",
            src.snapshot.conditional_ref_count,
            bundle.snapshot.conditional_ref_count,
        ),
        ("Patterns", src.snapshot.pattern_count, bundle.snapshot.pattern_count),
        (
            "Longest pattern (chars)",
            src.snapshot.max_pattern_length,
            bundle.snapshot.max_pattern_length,
        ),
    ];
    for (label, a, b) in rows {
        md.push_str(&format!("| {} | {} | {} |\n", label, a, b));
    }
    md.push('\n');
}

fn render_bundle_keywords(md: &mut String, snapshot: &Snapshot) {
    md.push_str("## Bundle Keyword Counts\n\n");
    md.push_str("| Keyword | Count |\n");
    md.push_str("|---------|-------|\n");
    for keyword in TRACKED_KEYWORDS {
        md.push_str(&format!("| `{}` | {} |\n", keyword, snapshot.keyword(keyword)));
    }
    md.push('\n');
}

fn render_measurements(md: &mut String, report: &AblationReport) {
    md.push_str("## Measurements\n\n");
    md.push_str("| Variant | Mode | Wall (s) | vs bundle | User (s) | Sys (s) | Max RSS (MB) | Exit |\n");
    md.push_str("|---------|------|----------|-----------|----------|---------|--------------|------|\n");

    for variant in report.variant_names() {
        for &mode in &report.modes {
            let record = report.record(variant, mode);
            let usage = record.map(|r| r.usage).unwrap_or_default();
            let ratio = if variant == BASELINE_VARIANT {
                "-".to_string()
            } else {
                report
                    .wall_ratio(variant, mode)
                    .map(|r| format!("x{:.2}", r))
                    .unwrap_or_else(|| UNAVAILABLE.to_string())
            };
            let exit = record
                .and_then(|r| r.exit_code)
                .map(|c| c.to_string())
                .unwrap_or_else(|| UNAVAILABLE.to_string());

            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                variant,
                mode,
                seconds(usage.wall_seconds),
                ratio,
                seconds(usage.user_seconds),
                seconds(usage.sys_seconds),
                usage
                    .max_rss_mb()
                    .map(|mb| format!("{:.1}", mb))
                    .unwrap_or_else(|| UNAVAILABLE.to_string()),
                exit
            ));
        }
    }
    md.push('\n');
}

fn render_variants(md: &mut String, report: &AblationReport) {
    if report.variants.is_empty() {
        return;
    }
    let base = &report.bundle.snapshot;

    md.push_str("## Variants\n\n");
    for variant in &report.variants {
        let snap = &variant.summary.snapshot;
        md.push_str(&format!("### {}\n\n", variant.rule));
        md.push_str(&format!("{}\n\n", variant.description));
        md.push_str(&format!("File: `{}` ({} bytes)\n\n", variant.path, variant.summary.bytes));
        md.push_str("| Metric | Value | Change |\n");
        md.push_str("|--------|-------|--------|\n");
        md.push_str(&delta_row("Objects", snap.object_count, base.object_count));
        md.push_str(&delta_row("`$ref`", snap.ref_count, base.ref_count));
        for keyword in TRACKED_KEYWORDS {
            md.push_str(&delta_row(
                &format!("`{}`", keyword),
                snap.keyword(keyword),
                base.keyword(keyword),
            ));
        }
        md.push('\n');
    }
}

fn delta_row(label: &str, value: usize, baseline: usize) -> String {
    let change = value as i64 - baseline as i64;
    let change = if change == 0 {
        "0".to_string()
    } else {
        format!("{:+}", change)
    };
    format!("| {} | {} | {} |\n", label, value, change)
}

fn seconds(value: Option<f64>) -> String {
    value
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}
