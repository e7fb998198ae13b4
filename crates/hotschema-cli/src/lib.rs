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

//! Hotschema CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **run**: fetch, bundle, ablate, measure and report
//! - **ablate**: apply one ablation rule to a document
//! - **stats**: print the structural snapshot of a document
//! - **rules**: list the ablation rules
//!
//! # Environment
//!
//! - `HOTSCHEMA_COMPILER`: compiler program (default `jsonschema`)
//! - `HOTSCHEMA_TIME`: `time` program for the `gnu-time` probe
//! - `RUST_LOG`: log filter (default `hotschema=info`), logs go to stderr

pub mod cli;
pub mod commands;
pub mod error;

pub use error::CliError;

use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "hotschema=info";

/// Builds the log filter from `RUST_LOG`-style directives.
///
/// Directives given by the user replace the default entirely, so
/// `hotschema=debug` turns on per-invocation logging.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
