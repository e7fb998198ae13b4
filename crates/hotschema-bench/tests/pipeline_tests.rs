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

//! End-to-end pipeline tests against a scripted stand-in for the compiler.

#![cfg(unix)]

use hotschema_bench::core::config::{BenchConfig, InvocationMode, ProbeKind, TimeFlavor};
use hotschema_bench::reporters::import_json;
use hotschema_bench::{pipeline, BenchError, MetaschemaStatus};
use hotschema_core::AblationRule;
use serde_json::json;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bundles by echoing the source, rejects the metaschema, and fails to
/// compile anything named `no-allof`.
const FAKE_COMPILER: &str = r#"#!/bin/sh
cmd="$1"
shift
case "$cmd" in
  bundle) cat "$1" ;;
  metaschema) echo "unknown keyword: frobnicate" >&2; exit 1 ;;
  compile)
    echo "compiling $*" >&2
    case "$1" in
      *no-allof*) exit 2 ;;
    esac
    exit 0
    ;;
  *) exit 64 ;;
esac
"#;

/// Runs the command, then writes a report with wall time but no memory line.
const FAKE_TIME: &str = r#"#!/bin/sh
shift
shift
out="$1"
shift
"$@"
status=$?
printf '\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:00.42\n\tExit status: %s\n' "$status" > "$out"
exit $status
"#;

/// Like `FAKE_COMPILER`, but the `no-allof` compile dies from SIGKILL.
const KILLED_COMPILER: &str = r#"#!/bin/sh
cmd="$1"
shift
case "$cmd" in
  bundle) cat "$1" ;;
  compile)
    case "$1" in
      *no-allof*) kill -9 $$ ;;
    esac
    exit 0
    ;;
  *) exit 0 ;;
esac
"#;

/// Mimics GNU time: a signalled child still gets `Exit status: 0` in the report.
const FAKE_GNU_TIME: &str = r#"#!/bin/sh
shift
shift
out="$1"
shift
"$@"
status=$?
if [ "$status" -gt 128 ]; then
  printf '\tCommand terminated by signal %s\n\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:00.05\n\tExit status: 0\n' "$((status - 128))" > "$out"
else
  printf '\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:00.05\n\tExit status: %s\n' "$status" > "$out"
fi
exit $status
"#;

const FAILING_BUNDLER: &str = r#"#!/bin/sh
echo "cannot resolve https://example.com/remote.json" >&2
exit 1
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_schema(dir: &Path) -> PathBuf {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {"Leaf": {"type": "integer"}, "Alt": {"type": "string"}},
        "properties": {
            "p1": {
                "allOf": [
                    {"type": "object"},
                    {
                        "if": {"properties": {"kind": {"const": "p1_K1"}}},
                        "then": {"$ref": "#/$defs/Leaf"},
                        "else": {"$ref": "#/$defs/Alt"}
                    }
                ]
            },
            "p2": {"$ref": "#/$defs/Leaf"}
        }
    });
    let path = dir.join("schema.json");
    fs::write(&path, serde_json::to_string(&schema).unwrap()).unwrap();
    path
}

struct Fixture {
    dir: TempDir,
    compiler: PathBuf,
    schema: PathBuf,
}

impl Fixture {
    fn new(compiler_body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let compiler = write_script(dir.path(), "fake-jsonschema", compiler_body);
        let schema = write_schema(dir.path());
        Self {
            dir,
            compiler,
            schema,
        }
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn config(&self) -> BenchConfig {
        BenchConfig::new()
            .with_compiler(&self.compiler)
            .with_probe(ProbeKind::Rusage)
            .with_out_dir(self.out())
    }

    fn location(&self) -> &str {
        self.schema.to_str().unwrap()
    }
}

#[test]
fn test_full_run_writes_every_artifact() {
    let fx = Fixture::new(FAKE_COMPILER);
    let report = pipeline::run(&fx.config(), fx.location()).unwrap();
    let out = fx.out();

    for file in [
        "source.json",
        "bundle.json",
        "timings.tsv",
        "report.md",
        "report.json",
        "run.log",
    ] {
        assert!(out.join(file).is_file(), "missing {}", file);
    }
    for rule in AblationRule::ALL {
        assert!(out.join("variants").join(format!("{}.json", rule.name())).is_file());
    }

    // Baseline first, then variants in registry order, modes in configured order.
    let expected_rows = (1 + AblationRule::ALL.len()) * InvocationMode::ALL.len();
    assert_eq!(report.measurements.len(), expected_rows);
    let first = &report.measurements.records()[0];
    assert_eq!((first.variant.as_str(), first.mode), ("bundle", InvocationMode::Normal));
    let second = &report.measurements.records()[1];
    assert_eq!((second.variant.as_str(), second.mode), ("bundle", InvocationMode::Fast));
    let third = &report.measurements.records()[2];
    assert_eq!(third.variant, AblationRule::ALL[0].name());

    let timings = fs::read_to_string(out.join("timings.tsv")).unwrap();
    assert_eq!(timings.lines().count(), expected_rows + 1);
    assert!(timings.starts_with("variant\tmode\twall_s\tuser_s\tsys_s\tmax_rss_kb\texit_code\n"));

    assert_eq!(import_json(&out.join("report.json")).unwrap(), report);
}

#[test]
fn test_nonzero_exit_is_recorded_not_fatal() {
    let fx = Fixture::new(FAKE_COMPILER);
    let report = pipeline::run(&fx.config(), fx.location()).unwrap();

    for record in report.measurements.records() {
        let expected = if record.variant == "no-allof" { 2 } else { 0 };
        assert_eq!(record.exit_code, Some(expected), "{}", record.variant);
    }
    assert!(report.notes.iter().any(|n| n.contains("exited unsuccessfully")));

    let log = fs::read_to_string(fx.out().join("run.log")).unwrap();
    assert!(log.contains("compiling"));
    assert!(log.contains("--fast"));
}

#[test]
fn test_metaschema_failure_is_a_warning() {
    let fx = Fixture::new(FAKE_COMPILER);
    let report = pipeline::run(&fx.config(), fx.location()).unwrap();
    match &report.metaschema {
        MetaschemaStatus::Failed { detail } => assert!(detail.contains("frobnicate")),
        other => panic!("unexpected status: {:?}", other),
    }

    let skipped = pipeline::run(
        &fx.config().with_metaschema_check(false),
        fx.location(),
    )
    .unwrap();
    assert_eq!(skipped.metaschema, MetaschemaStatus::Skipped);
}

#[test]
fn test_variant_statistics_in_report() {
    let fx = Fixture::new(FAKE_COMPILER);
    let config = fx
        .config()
        .with_rules(vec![
            AblationRule::StripRefsInConditionals,
            AblationRule::NoAnyOf,
        ])
        .with_modes(vec![InvocationMode::Fast]);
    let report = pipeline::run(&config, fx.location()).unwrap();

    assert_eq!(report.bundle.snapshot.ref_count, 3);
    assert_eq!(report.bundle.snapshot.conditional_ref_count, 2);
    assert_eq!(report.variants.len(), 2);
    assert_eq!(report.variants[0].summary.snapshot.ref_count, 1);
    // No anyOf in the bundle: the variant equals the baseline and says so.
    assert_eq!(report.variants[1].summary.snapshot, report.bundle.snapshot);
    assert!(report.notes.iter().any(|n| n.contains("no-anyof")));

    let md = fs::read_to_string(fx.out().join("report.md")).unwrap();
    assert!(md.contains("### strip-refs-in-conditionals"));
    assert!(md.contains("| bundle | fast |"));
}

#[test]
fn test_gnu_time_without_memory_line() {
    let fx = Fixture::new(FAKE_COMPILER);
    let time = write_script(fx.dir.path(), "fake-time", FAKE_TIME);
    let config = fx
        .config()
        .with_probe(ProbeKind::GnuTime)
        .with_time_binary(&time)
        .with_rules(vec![AblationRule::NoAllOf, AblationRule::NoOneOf])
        .with_modes(vec![InvocationMode::Normal]);
    let report = pipeline::run(&config, fx.location()).unwrap();

    assert_eq!(report.probe, "gnu-time");
    assert_eq!(report.measurements.len(), 3);
    for record in report.measurements.records() {
        assert_eq!(record.usage.wall_seconds, Some(0.42));
        assert_eq!(record.usage.max_rss_kb, None);
    }
    assert_eq!(report.measurements.records()[1].exit_code, Some(2));
    assert_eq!(report.measurements.records()[2].exit_code, Some(0));

    let timings = fs::read_to_string(fx.out().join("timings.tsv")).unwrap();
    assert!(timings.contains("bundle\tnormal\t0.420\tNA\tNA\tNA\t0"));
}

#[test]
fn test_bundle_failure_is_fatal() {
    let fx = Fixture::new(FAILING_BUNDLER);
    let err = pipeline::run(&fx.config().with_metaschema_check(false), fx.location()).unwrap_err();
    match err {
        BenchError::Bundle(message) => assert!(message.contains("cannot resolve")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!fx.out().join("report.md").exists());
}

#[test]
fn test_missing_compiler_is_fatal() {
    let fx = Fixture::new(FAKE_COMPILER);
    let config = fx.config().with_compiler(fx.dir.path().join("not-installed"));
    let err = pipeline::run(&config, fx.location()).unwrap_err();
    assert!(matches!(err, BenchError::MissingDependency { .. }));
}

#[test]
fn test_missing_source_is_fetch_error() {
    let fx = Fixture::new(FAKE_COMPILER);
    let missing = fx.dir.path().join("nope.json");
    let err = pipeline::run(&fx.config(), missing.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, BenchError::Fetch { .. }));
}

fn assert_killed_variant_recorded(report: &hotschema_bench::AblationReport) {
    for record in report.measurements.records() {
        if record.variant == "no-allof" {
            assert_eq!(record.exit_code, None, "{:?}", record);
            assert!(!record.succeeded());
        } else {
            assert_eq!(record.exit_code, Some(0), "{:?}", record);
        }
    }
    let note = report
        .notes
        .iter()
        .find(|n| n.contains("exited unsuccessfully"))
        .expect("failure note");
    assert!(note.contains("no-allof: normal (signal)"), "{}", note);
}

#[test]
fn test_signal_killed_compile_under_rusage() {
    let fx = Fixture::new(KILLED_COMPILER);
    let config = fx
        .config()
        .with_rules(vec![AblationRule::NoAllOf, AblationRule::NoAnyOf])
        .with_modes(vec![InvocationMode::Normal]);
    let report = pipeline::run(&config, fx.location()).unwrap();
    assert_eq!(report.measurements.len(), 3);
    assert_killed_variant_recorded(&report);
}

#[test]
fn test_signal_killed_compile_under_gnu_time() {
    let fx = Fixture::new(KILLED_COMPILER);
    let time = write_script(fx.dir.path(), "fake-gnu-time", FAKE_GNU_TIME);
    let config = fx
        .config()
        .with_probe(ProbeKind::GnuTime)
        .with_time_binary(&time)
        .with_time_flavor(TimeFlavor::Gnu)
        .with_rules(vec![AblationRule::NoAllOf, AblationRule::NoAnyOf])
        .with_modes(vec![InvocationMode::Normal]);
    let report = pipeline::run(&config, fx.location()).unwrap();
    assert_eq!(report.measurements.len(), 3);
    assert_killed_variant_recorded(&report);
    for record in report.measurements.records() {
        assert_eq!(record.usage.wall_seconds, Some(0.05));
    }
}

#[test]
fn test_deeply_nested_schema_runs_end_to_end() {
    let fx = Fixture::new(FAKE_COMPILER);
    let depth = 80;
    let mut node = r##"{"$ref": "#/$defs/Leaf"}"##.to_string();
    for level in 0..depth {
        node = format!(
            r##"{{"allOf": [{{"type": "object"}}, {{"if": {{"required": ["k{}"]}}, "then": {}}}]}}"##,
            level, node
        );
    }
    let schema = fx.dir.path().join("deep.json");
    fs::write(
        &schema,
        format!(r##"{{"$defs": {{"Leaf": {{"type": "integer"}}}}, "properties": {{"p": {}}}}}"##, node),
    )
    .unwrap();

    let config = fx
        .config()
        .with_metaschema_check(false)
        .with_rules(vec![AblationRule::StripRefsInConditionals, AblationRule::StripConditionals])
        .with_modes(vec![InvocationMode::Fast]);
    let report = pipeline::run(&config, schema.to_str().unwrap()).unwrap();

    assert_eq!(report.bundle.snapshot.keyword("allOf"), depth);
    assert_eq!(report.bundle.snapshot.keyword("then"), depth);
    assert_eq!(report.bundle.snapshot.conditional_ref_count, 1);
    assert_eq!(report.variants[0].summary.snapshot.ref_count, 0);
    assert_eq!(report.variants[1].summary.snapshot.keyword("then"), 0);
    assert_eq!(report.variants[1].summary.snapshot.keyword("allOf"), 1);
}
