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

//! Tab-separated timing table.
//!
//! Columns: `variant mode wall_s user_s sys_s max_rss_kb exit_code`, with
//! `NA` for unavailable values.

use crate::core::measurement::MeasurementTable;
use crate::error::{BenchError, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row of the timing table.
pub const TIMING_COLUMNS: [&str; 7] = [
    "variant",
    "mode",
    "wall_s",
    "user_s",
    "sys_s",
    "max_rss_kb",
    "exit_code",
];

/// Marker for unavailable values.
pub const NA: &str = "NA";

/// Writes the table as TSV to `writer`.
pub fn write_timings<W: Write>(table: &MeasurementTable, writer: W) -> Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    tsv.write_record(TIMING_COLUMNS).map_err(csv_error)?;
    for record in table {
        let usage = &record.usage;
        tsv.write_record([
            record.variant.clone(),
            record.mode.to_string(),
            or_na(usage.wall_seconds.map(|s| format!("{:.3}", s))),
            or_na(usage.user_seconds.map(|s| format!("{:.3}", s))),
            or_na(usage.sys_seconds.map(|s| format!("{:.3}", s))),
            or_na(usage.max_rss_kb.map(|kb| kb.to_string())),
            or_na(record.exit_code.map(|c| c.to_string())),
        ])
        .map_err(csv_error)?;
    }
    tsv.flush().map_err(|e| BenchError::Io {
        path: "timings".to_string(),
        message: e.to_string(),
    })
}

/// Writes the table as TSV to `path`.
pub fn export_timings(table: &MeasurementTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| BenchError::io_error(path, e))?;
    write_timings(table, file).map_err(|e| match e {
        BenchError::Io { message, .. } => BenchError::Io {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NA.to_string())
}

fn csv_error(err: csv::Error) -> BenchError {
    BenchError::Io {
        path: "timings".to_string(),
        message: err.to_string(),
    }
}
