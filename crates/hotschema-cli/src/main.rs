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

//! Hotschema Command Line Interface

use clap::Parser;
use hotschema_cli::cli::Commands;
use hotschema_cli::log_filter;
use std::process::ExitCode;

/// Hotschema - conditional schema compile-cost analysis
///
/// Bundles a JSON Schema, derives structural ablation variants, times an
/// external compiler on each one and writes a comparative report.
///
/// # Examples
///
/// ```bash
/// # Full ablation run
/// hotschema run schema.json --out results/
///
/// # Inspect one rewrite
/// hotschema ablate bundle.json --rule strip-conditionals
/// ```
#[derive(Parser)]
#[command(name = "hotschema")]
#[command(author, version, about = "Hotschema - conditional schema compile-cost analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
