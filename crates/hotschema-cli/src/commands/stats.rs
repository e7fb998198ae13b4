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

//! Stats command - structural snapshot of a document.

use crate::error::CliError;
use hotschema_bench::fetch::fetch_document;
use hotschema_core::keywords::TRACKED_KEYWORDS;
use hotschema_core::{snapshot, Snapshot};

/// Print the structural snapshot of the document at `file`.
pub fn stats(file: &str, json: bool) -> Result<(), CliError> {
    let doc = fetch_document(file)?;
    let snap = snapshot(&doc);
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        print!("{}", format_snapshot(file, &snap));
    }
    Ok(())
}

fn format_snapshot(file: &str, snap: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("Structure of {}\n\n", file));
    out.push_str(&format!("  {:<26}{:>10}\n", "objects", snap.object_count));
    out.push_str(&format!("  {:<26}{:>10}\n", "$ref", snap.ref_count));
    out.push_str(&format!("  {:<26}{:>10}\n", "distinct $ref targets", snap.unique_ref_targets));
    out.push_str(&format!("  {:<26}{:>10}\n", "$ref inside conditionals", snap.conditional_ref_count));
    out.push_str(&format!("  {:<26}{:>10}\n", "pattern", snap.pattern_count));
    out.push_str(&format!("  {:<26}{:>10}\n", "longest pattern (chars)", snap.max_pattern_length));
    out.push_str("\nKeywords\n\n");
    for keyword in TRACKED_KEYWORDS {
        out.push_str(&format!("  {:<26}{:>10}\n", keyword, snap.keyword(keyword)));
    }
    out
}
