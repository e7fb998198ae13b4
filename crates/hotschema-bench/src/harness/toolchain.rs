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

//! External collaborators: bundler, compiler and metaschema checker.
//!
//! All three are subcommands of one program (the `jsonschema` CLI by
//! default): `bundle <source>`, `compile <schema> [--fast]` and
//! `metaschema <source>`.

use crate::core::config::{BenchConfig, InvocationMode, ProbeKind};
use crate::error::{BenchError, Result};
use crate::reporters::types::MetaschemaStatus;
use hotschema_core::{json, Document};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

/// Longest stderr excerpt carried into error messages and reports.
const MAX_DETAIL_CHARS: usize = 2_000;

/// Resolved collaborator programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    compiler: PathBuf,
    time_binary: Option<PathBuf>,
}

impl Toolchain {
    /// Resolves every program the configured run needs.
    ///
    /// # Errors
    ///
    /// `MissingDependency` when the compiler, or the `time` program for the
    /// `gnu-time` probe, cannot be found.
    pub fn preflight(config: &BenchConfig) -> Result<Self> {
        let compiler = find_program(&config.compiler).ok_or_else(|| BenchError::MissingDependency {
            name: config.compiler.display().to_string(),
            detail: "compiler not found (set --compiler or HOTSCHEMA_COMPILER)".to_string(),
        })?;
        debug!(compiler = %compiler.display(), "resolved compiler");

        let time_binary = match config.probe {
            ProbeKind::GnuTime => {
                let time = find_program(&config.time_binary).ok_or_else(|| {
                    BenchError::MissingDependency {
                        name: config.time_binary.display().to_string(),
                        detail: "time program not found (set --time or HOTSCHEMA_TIME)"
                            .to_string(),
                    }
                })?;
                debug!(time = %time.display(), "resolved time program");
                Some(time)
            }
            ProbeKind::Rusage => None,
        };

        Ok(Self {
            compiler,
            time_binary,
        })
    }

    /// Uses `compiler` as-is, without lookup.
    pub fn with_compiler(compiler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
            time_binary: None,
        }
    }

    /// Resolved compiler path.
    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    /// Resolved `time` program, when the probe needs one.
    pub fn time_binary(&self) -> Option<&Path> {
        self.time_binary.as_deref()
    }

    /// Runs the bundler on `source` and parses its stdout.
    ///
    /// # Errors
    ///
    /// `Bundle` on spawn failure, nonzero exit, or unparsable output.
    pub fn bundle(&self, source: &Path) -> Result<Document> {
        let output = self
            .run(&["bundle".into(), source.as_os_str().to_owned()])
            .map_err(|e| BenchError::Bundle(format!("cannot run bundler: {}", e)))?;

        if !output.status.success() {
            return Err(BenchError::Bundle(format!(
                "bundler exited with {}: {}",
                describe_status(&output),
                excerpt(&output.stderr)
            )));
        }

        json::from_json_slice(&output.stdout)
            .map_err(|e| BenchError::Bundle(format!("unparsable bundler output: {}", e)))
    }

    /// Runs the metaschema checker on `source`. Never fails the run.
    pub fn metaschema(&self, source: &Path) -> MetaschemaStatus {
        match self.run(&["metaschema".into(), source.as_os_str().to_owned()]) {
            Ok(output) if output.status.success() => MetaschemaStatus::Passed,
            Ok(output) => {
                let mut detail = excerpt(&output.stderr);
                if detail.is_empty() {
                    detail = excerpt(&output.stdout);
                }
                let detail = format!("exited with {}: {}", describe_status(&output), detail);
                warn!(%detail, "metaschema check failed");
                MetaschemaStatus::Failed { detail }
            }
            Err(e) => {
                let detail = format!("cannot run metaschema checker: {}", e);
                warn!(%detail, "metaschema check failed");
                MetaschemaStatus::Failed { detail }
            }
        }
    }

    fn run(&self, args: &[OsString]) -> std::io::Result<Output> {
        debug!(program = %self.compiler.display(), ?args, "running collaborator");
        Command::new(&self.compiler)
            .args(args)
            .stdin(Stdio::null())
            .output()
    }
}

/// Compiler arguments for one measurement.
pub fn compile_args(schema: &Path, mode: InvocationMode) -> Vec<OsString> {
    let mut args = vec![OsString::from("compile"), schema.as_os_str().to_owned()];
    if let Some(flag) = mode.flag() {
        args.push(OsString::from(flag));
    }
    args
}

/// Resolves `program` to an executable file.
///
/// Names containing a path separator are checked directly; bare names are
/// searched on `PATH`.
pub fn find_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return is_executable(program).then(|| program.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

fn describe_status(output: &Output) -> String {
    match output.status.code() {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.chars().count() > MAX_DETAIL_CHARS {
        let cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
