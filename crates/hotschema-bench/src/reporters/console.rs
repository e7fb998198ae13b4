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

//! Console summary printed after a run.

use crate::reporters::markdown::UNAVAILABLE;
use crate::reporters::types::{AblationReport, MetaschemaStatus, BASELINE_VARIANT};

/// Formats a short plain-text summary of the report.
pub fn format_summary(report: &AblationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", report.title));
    out.push_str(&format!("{}\n", "=".repeat(report.title.chars().count().max(1))));
    out.push_str(&format!(
        "source: {} ({} bytes, bundle {} bytes)\n",
        report.source_location, report.source.bytes, report.bundle.bytes
    ));
    out.push_str(&format!(
        "bundle: {} objects, {} $ref ({} in conditionals), {} allOf, {} if\n",
        report.bundle.snapshot.object_count,
        report.bundle.snapshot.ref_count,
        report.bundle.snapshot.conditional_ref_count,
        report.bundle.snapshot.keyword("allOf"),
        report.bundle.snapshot.keyword("if"),
    ));
    if let MetaschemaStatus::Failed { detail } = &report.metaschema {
        let first = detail.lines().next().unwrap_or_default();
        out.push_str(&format!("metaschema: FAILED ({})\n", first));
    }

    for &mode in &report.modes {
        out.push_str(&format!("\n[{}]\n", mode));
        for variant in report.variant_names() {
            let wall = report
                .record(variant, mode)
                .and_then(|r| r.usage.wall_seconds)
                .map(|s| format!("{:>10.3}s", s))
                .unwrap_or_else(|| format!("{:>11}", UNAVAILABLE));
            let ratio = if variant == BASELINE_VARIANT {
                String::new()
            } else {
                report
                    .wall_ratio(variant, mode)
                    .map(|r| format!("  x{:.2}", r))
                    .unwrap_or_default()
            };
            out.push_str(&format!("  {:<28}{}{}\n", variant, wall, ratio));
        }
        if let Some((variant, wall)) = report.fastest_variant(mode) {
            out.push_str(&format!("  fastest variant: {} ({:.3}s)\n", variant, wall));
        }
    }

    out
}
