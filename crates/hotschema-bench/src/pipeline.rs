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

//! Run orchestration: fetch, bundle, derive variants, measure, report.

use crate::core::config::BenchConfig;
use crate::core::measurement::MeasurementTable;
use crate::error::{BenchError, Result};
use crate::fetch;
use crate::harness::{build_probe, Harness, MeasurementJob, Toolchain};
use crate::reporters::types::{
    AblationReport, DocumentSummary, MetaschemaStatus, VariantSummary, BASELINE_VARIANT,
};
use crate::reporters::{export_json, export_markdown, export_timings};
use hotschema_core::{generate_variants, json, snapshot, Document};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File layout of an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalized copy of the fetched schema.
    pub fn source_json(&self) -> PathBuf {
        self.root.join("source.json")
    }

    /// Bundled baseline.
    pub fn bundle_json(&self) -> PathBuf {
        self.root.join("bundle.json")
    }

    /// Directory holding every variant.
    pub fn variants_dir(&self) -> PathBuf {
        self.root.join("variants")
    }

    /// File for the variant named `name`.
    pub fn variant_json(&self, name: &str) -> PathBuf {
        self.variants_dir().join(format!("{}.json", name))
    }

    /// Timing table.
    pub fn timings_tsv(&self) -> PathBuf {
        self.root.join("timings.tsv")
    }

    /// Markdown report.
    pub fn report_md(&self) -> PathBuf {
        self.root.join("report.md")
    }

    /// JSON report.
    pub fn report_json(&self) -> PathBuf {
        self.root.join("report.json")
    }

    /// Compiler stderr log.
    pub fn run_log(&self) -> PathBuf {
        self.root.join("run.log")
    }

    /// Creates the directories and truncates the run log.
    pub fn prepare(&self) -> Result<()> {
        let variants = self.variants_dir();
        fs::create_dir_all(&variants).map_err(|e| BenchError::io_error(&variants, e))?;
        let log = self.run_log();
        fs::write(&log, "").map_err(|e| BenchError::io_error(&log, e))
    }
}

/// Serializes `doc` as pretty JSON to `path`, returning the byte count.
pub fn write_document(doc: &Document, path: &Path) -> Result<usize> {
    let text = json::to_json_string_pretty(doc)?;
    fs::write(path, &text).map_err(|e| BenchError::io_error(path, e))?;
    Ok(text.len())
}

/// Runs the full ablation pipeline for the schema at `location`.
///
/// Stages run strictly in order; only variant derivation is parallel. Writes
/// every artifact into `config.out_dir` and returns the report.
///
/// # Errors
///
/// Fatal conditions only: invalid configuration, a missing collaborator, a
/// failed fetch or bundle, an unlaunchable compiler, or unwritable outputs.
pub fn run(config: &BenchConfig, location: &str) -> Result<AblationReport> {
    config.validate()?;
    let toolchain = Toolchain::preflight(config)?;
    let probe = build_probe(config, &toolchain)?;

    let layout = OutputLayout::new(&config.out_dir);
    layout.prepare()?;
    info!(out_dir = %layout.root().display(), "prepared output directory");

    let source = fetch::fetch_document(location)?;
    let source_path = layout.source_json();
    let source_bytes = write_document(&source, &source_path)?;

    let metaschema = if config.check_metaschema {
        let status = toolchain.metaschema(&source_path);
        info!(status = status.label(), "metaschema check");
        status
    } else {
        MetaschemaStatus::Skipped
    };

    let bundle = toolchain.bundle(&source_path)?;
    let bundle_path = layout.bundle_json();
    let bundle_bytes = write_document(&bundle, &bundle_path)?;
    info!(bytes = bundle_bytes, nodes = bundle.node_count(), "bundled schema");

    let mut report = AblationReport::new(
        &config.title,
        location,
        DocumentSummary {
            bytes: source_bytes,
            snapshot: snapshot(&source),
        },
        DocumentSummary {
            bytes: bundle_bytes,
            snapshot: snapshot(&bundle),
        },
    );
    report.compiler = toolchain.compiler().display().to_string();
    report.modes = config.modes.clone();
    report.metaschema = metaschema;

    let variants = generate_variants(&bundle, &config.rules);
    info!(count = variants.len(), "generated variants");

    let mut jobs = vec![MeasurementJob::new(BASELINE_VARIANT, &bundle_path)];
    for variant in &variants {
        let path = layout.variant_json(variant.name());
        let bytes = write_document(&variant.document, &path)?;
        if variant.document == bundle {
            report.add_note(format!(
                "`{}` left the bundle unchanged",
                variant.name()
            ));
        }
        report.variants.push(VariantSummary {
            rule: variant.name().to_string(),
            description: variant.rule.description().to_string(),
            path: relative_to(&path, layout.root()),
            summary: DocumentSummary {
                bytes,
                snapshot: snapshot(&variant.document),
            },
        });
        jobs.push(MeasurementJob::new(variant.name(), path));
    }

    let mut harness = Harness::new(toolchain, probe).with_log(layout.run_log());
    report.probe = harness.probe_name().to_string();
    info!(
        jobs = jobs.len(),
        modes = config.modes.len(),
        probe = %report.probe,
        "measuring"
    );
    harness.run_all(&jobs, &config.modes)?;
    report.measurements = harness.into_table();

    if let Some(note) = failure_note(&report.measurements) {
        report.add_note(note);
    }

    export_timings(&report.measurements, &layout.timings_tsv())?;
    export_json(&report, &layout.report_json())?;
    export_markdown(&report, &layout.report_md())?;
    info!(report = %layout.report_md().display(), "wrote report");

    Ok(report)
}

/// Summarizes unsuccessful invocations per variant, e.g.
/// `2 compiler invocation(s) exited unsuccessfully (no-allof: normal, fast); see run.log`.
fn failure_note(table: &MeasurementTable) -> Option<String> {
    let mut failures = 0;
    let mut parts = Vec::new();
    for variant in table.variants() {
        let modes: Vec<String> = table
            .for_variant(variant)
            .filter(|r| !r.succeeded())
            .map(|r| match r.exit_code {
                Some(_) => r.mode.to_string(),
                None => format!("{} (signal)", r.mode),
            })
            .collect();
        if !modes.is_empty() {
            failures += modes.len();
            parts.push(format!("{}: {}", variant, modes.join(", ")));
        }
    }
    if failures == 0 {
        return None;
    }
    warn!(failures, "some compiler invocations failed");
    Some(format!(
        "{} compiler invocation(s) exited unsuccessfully ({}); see run.log",
        failures,
        parts.join("; ")
    ))
}

fn relative_to(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
