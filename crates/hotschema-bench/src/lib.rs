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

//! Hotschema Benchmark Harness
//!
//! Drives an external JSON Schema compiler against structural variants of a
//! bundled schema and reports what each variant costs.
//!
//! ## Features
//!
//! - **Toolchain**: bundler, compiler and metaschema checker as subprocesses
//! - **Resource probes**: `wait4` accounting or an external `time` program
//! - **Measurement harness**: one invocation at a time, append-only table
//! - **Reports**: Markdown, JSON and a tab-separated timing table
//!
//! ## Usage
//!
//! ```no_run
//! use hotschema_bench::{pipeline, BenchConfig};
//!
//! let config = BenchConfig::from_env().with_out_dir("target/hotschema");
//! let report = pipeline::run(&config, "schemas/hot.json")?;
//! println!("{}", hotschema_bench::reporters::format_summary(&report));
//! # Ok::<(), hotschema_bench::BenchError>(())
//! ```

pub mod core;
pub mod error;
pub mod fetch;
pub mod harness;
pub mod pipeline;
pub mod reporters;

pub use crate::core::{
    BenchConfig, InvocationMode, MeasurementRecord, MeasurementTable, ProbeKind, ResourceUsage,
};
pub use error::{BenchError, Result};
pub use harness::{Harness, ResourceProbe, Toolchain};
pub use reporters::{AblationReport, MetaschemaStatus};
