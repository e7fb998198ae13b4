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

//! CLI command definitions and argument parsing.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full ablation pipeline on a schema
    ///
    /// Fetches the schema, checks it against its metaschema, bundles it,
    /// derives one variant per ablation rule, times the compiler on the
    /// bundle and on every variant, and writes report.md, report.json and
    /// timings.tsv into the output directory.
    Run {
        /// Schema path or http(s) URL
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Output directory (created if absent)
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Compiler program [env: HOTSCHEMA_COMPILER] [default: jsonschema]
        #[arg(long, value_name = "BIN")]
        compiler: Option<PathBuf>,

        /// time program for the gnu-time probe [env: HOTSCHEMA_TIME]
        #[arg(long, value_name = "BIN")]
        time: Option<PathBuf>,

        /// Report layout of the time program: gnu (-v) or bsd (-l)
        #[arg(long, value_name = "FLAVOR")]
        time_flavor: Option<String>,

        /// Resource probe: rusage or gnu-time
        #[arg(long, value_name = "PROBE")]
        probe: Option<String>,

        /// Comma-separated modes to measure
        #[arg(long, value_name = "MODES", default_value = "normal,fast")]
        modes: String,

        /// Comma-separated rules to apply (default: all)
        #[arg(long, value_name = "RULES")]
        rules: Option<String>,

        /// Skip the metaschema check
        #[arg(long)]
        skip_metaschema: bool,

        /// Report title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
    },

    /// Apply one ablation rule to a JSON document
    Ablate {
        /// Input file path or URL
        #[arg(value_name = "FILE")]
        file: String,

        /// Rule name (see `hotschema rules`)
        #[arg(short, long, value_name = "RULE")]
        rule: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Print the structural snapshot of a JSON document
    Stats {
        /// Input file path or URL
        #[arg(value_name = "FILE")]
        file: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the ablation rules
    Rules,
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` on invalid arguments, a missing collaborator, a failed
    /// fetch or bundle, or unwritable outputs.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Run {
                source,
                out,
                compiler,
                time,
                time_flavor,
                probe,
                modes,
                rules,
                skip_metaschema,
                title,
            } => commands::run(commands::RunArgs {
                source,
                out,
                compiler,
                time,
                time_flavor,
                probe,
                modes,
                rules,
                skip_metaschema,
                title,
            }),
            Commands::Ablate { file, rule, output } => {
                commands::ablate(&file, &rule, output.as_deref())
            }
            Commands::Stats { file, json } => commands::stats(&file, json),
            Commands::Rules => commands::rules(),
        }
    }
}
