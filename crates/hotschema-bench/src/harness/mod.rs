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

//! Measurement harness.
//!
//! - `toolchain`: bundler, compiler and metaschema checker
//! - `probe`: resource probes (`wait4` accounting, external `time`)
//! - `runner`: sequential measurement loop

pub mod probe;
pub mod runner;
pub mod toolchain;

pub use probe::{build_probe, parse_time_report, GnuTime, Invocation, ProbeOutcome, ResourceProbe};
#[cfg(unix)]
pub use probe::Rusage;
pub use runner::{Harness, MeasurementJob};
pub use toolchain::{compile_args, find_program, Toolchain};
