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

//! Ablate command - applies one rule to a document.

use super::write_output;
use crate::error::CliError;
use hotschema_bench::fetch::fetch_document;
use hotschema_core::{json, AblationRule};
use std::path::Path;
use tracing::info;

/// Apply `rule` to the document at `file` and write the pretty JSON result.
///
/// # Errors
///
/// Returns `Err` if the rule is unknown, the document cannot be read or
/// parsed, or the output cannot be written.
pub fn ablate(file: &str, rule: &str, output: Option<&Path>) -> Result<(), CliError> {
    let rule: AblationRule = rule.parse()?;
    let doc = fetch_document(file)?;
    let variant = rule.apply(&doc);
    info!(
        rule = rule.name(),
        nodes_before = doc.node_count(),
        nodes_after = variant.node_count(),
        "applied rule"
    );
    write_output(&json::to_json_string_pretty(&variant)?, output)
}
