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

//! Measurement harness: one instrumented compiler run per (variant, mode).

use crate::core::config::InvocationMode;
use crate::core::measurement::{MeasurementRecord, MeasurementTable};
use crate::error::Result;
use crate::harness::probe::{Invocation, ResourceProbe};
use crate::harness::toolchain::{compile_args, Toolchain};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A document to measure: its variant name and the file holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementJob {
    /// Variant name (`bundle` for the baseline).
    pub variant: String,
    /// Serialized document passed to the compiler.
    pub path: PathBuf,
}

impl MeasurementJob {
    /// Creates a job.
    pub fn new(variant: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            variant: variant.into(),
            path: path.into(),
        }
    }
}

/// Drives the compiler under a resource probe, strictly one invocation at a time.
pub struct Harness {
    toolchain: Toolchain,
    probe: Box<dyn ResourceProbe>,
    log: Option<PathBuf>,
    table: MeasurementTable,
}

impl Harness {
    /// Creates a harness with an empty table.
    pub fn new(toolchain: Toolchain, probe: Box<dyn ResourceProbe>) -> Self {
        Self {
            toolchain,
            probe,
            log: None,
            table: MeasurementTable::new(),
        }
    }

    /// Appends every compiler's stderr to `log`.
    pub fn with_log(mut self, log: impl Into<PathBuf>) -> Self {
        self.log = Some(log.into());
        self
    }

    /// Name of the active probe.
    pub fn probe_name(&self) -> &'static str {
        self.probe.name()
    }

    /// Measures one compiler invocation and appends the record.
    ///
    /// A nonzero exit or a missing metric is recorded, not raised.
    ///
    /// # Errors
    ///
    /// Only when the compiler (or its wrapper) cannot be launched.
    pub fn measure(
        &mut self,
        variant_path: &Path,
        variant_name: &str,
        mode: InvocationMode,
    ) -> Result<MeasurementRecord> {
        let mut invocation = Invocation::new(
            self.toolchain.compiler(),
            compile_args(variant_path, mode),
        );
        if let Some(log) = &self.log {
            invocation = invocation.with_log(log);
        }

        debug!(
            variant = variant_name,
            %mode,
            probe = self.probe.name(),
            path = %variant_path.display(),
            "compiling"
        );
        let outcome = self.probe.measure(&invocation)?;

        if outcome.exit_code != Some(0) {
            warn!(
                variant = variant_name,
                %mode,
                exit_code = ?outcome.exit_code,
                "compiler exited unsuccessfully"
            );
        }
        let missing = outcome.usage.missing_fields();
        if !missing.is_empty() {
            warn!(
                variant = variant_name,
                %mode,
                missing = ?missing,
                "resource metrics unavailable"
            );
        }

        let record = MeasurementRecord::new(variant_name, mode, outcome.usage, outcome.exit_code);
        info!(
            variant = variant_name,
            %mode,
            wall_s = ?record.usage.wall_seconds,
            max_rss_kb = ?record.usage.max_rss_kb,
            "measured"
        );
        self.table.push(record.clone());
        Ok(record)
    }

    /// Measures every job in every mode: jobs in order, modes in order within each job.
    pub fn run_all(&mut self, jobs: &[MeasurementJob], modes: &[InvocationMode]) -> Result<()> {
        for job in jobs {
            for &mode in modes {
                self.measure(&job.path, &job.variant, mode)?;
            }
        }
        Ok(())
    }

    /// Records so far.
    pub fn table(&self) -> &MeasurementTable {
        &self.table
    }

    /// Consumes the harness, returning its table.
    pub fn into_table(self) -> MeasurementTable {
        self.table
    }
}
