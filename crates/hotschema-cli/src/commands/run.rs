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

//! Run command - the full ablation pipeline.

use crate::error::CliError;
use hotschema_bench::core::config::{parse_list, TimeFlavor};
use hotschema_bench::reporters::format_summary;
use hotschema_bench::{pipeline, BenchConfig, InvocationMode, ProbeKind};
use hotschema_core::AblationRule;
use std::path::PathBuf;

/// Arguments of `hotschema run`.
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Schema path or URL.
    pub source: String,
    /// Output directory.
    pub out: PathBuf,
    /// Compiler override.
    pub compiler: Option<PathBuf>,
    /// `time` program override.
    pub time: Option<PathBuf>,
    /// `time` report layout override.
    pub time_flavor: Option<String>,
    /// Probe name.
    pub probe: Option<String>,
    /// Comma-separated modes.
    pub modes: String,
    /// Comma-separated rules; all rules when absent.
    pub rules: Option<String>,
    /// Skip the metaschema check.
    pub skip_metaschema: bool,
    /// Report title.
    pub title: Option<String>,
}

impl RunArgs {
    /// Layers the flags over defaults and environment overrides.
    pub fn into_config(self) -> Result<(BenchConfig, String), CliError> {
        let mut config = BenchConfig::from_env()
            .with_out_dir(self.out)
            .with_modes(parse_list::<InvocationMode>(&self.modes)?)
            .with_metaschema_check(!self.skip_metaschema);

        if let Some(compiler) = self.compiler {
            config = config.with_compiler(compiler);
        }
        if let Some(time) = self.time {
            config = config.with_time_binary(time);
        }
        if let Some(flavor) = self.time_flavor {
            config = config.with_time_flavor(flavor.parse::<TimeFlavor>()?);
        }
        if let Some(probe) = self.probe {
            config = config.with_probe(probe.parse::<ProbeKind>()?);
        }
        if let Some(rules) = self.rules {
            config = config.with_rules(parse_list::<AblationRule>(&rules)?);
        }
        if let Some(title) = self.title {
            config = config.with_title(title);
        }
        Ok((config, self.source))
    }
}

/// Run the pipeline and print a summary.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let (config, source) = args.into_config()?;
    let out_dir = config.out_dir.clone();
    let report = pipeline::run(&config, &source)?;

    println!("{}", format_summary(&report));
    println!("Report written to {}", out_dir.join("report.md").display());
    Ok(())
}
