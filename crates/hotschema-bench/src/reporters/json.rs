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

//! JSON export for ablation reports.

use crate::error::{BenchError, Result};
use crate::reporters::types::AblationReport;
use std::fs;
use std::path::Path;

/// Exports the full report as pretty-printed JSON.
pub fn export_json(report: &AblationReport, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| BenchError::io_error(path, e))
}

/// Reads a report previously written by [`export_json`].
pub fn import_json(path: &Path) -> Result<AblationReport> {
    let text = fs::read_to_string(path).map_err(|e| BenchError::io_error(path, e))?;
    Ok(serde_json::from_str(&text)?)
}
