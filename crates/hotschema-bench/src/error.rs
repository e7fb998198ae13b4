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

//! Error types for Hotschema benchmarking operations.
//!
//! Fatal conditions stop a run: a collaborator missing at preflight, a failed
//! fetch, a failed bundle, or a process that cannot be spawned. Everything
//! else (nonzero compiler exit, metaschema failure, missing instrumentation
//! fields) is recorded and the run continues.

use hotschema_core::CoreError;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Maximum size of a schema source, local file or URL response (256 MB).
pub const MAX_SOURCE_SIZE: u64 = 256 * 1024 * 1024;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur during a Hotschema run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// A required external program is not available.
    #[error("Missing dependency '{name}': {detail}")]
    MissingDependency {
        /// Program name as configured
        name: String,
        /// What was tried
        detail: String,
    },

    /// The schema could not be fetched from its location.
    #[error("Failed to fetch '{location}': {message}")]
    Fetch {
        /// Path or URL
        location: String,
        /// Error message
        message: String,
    },

    /// The bundler failed or produced unusable output.
    #[error("Bundling failed: {0}")]
    Bundle(String),

    /// A subprocess could not be launched.
    #[error("Failed to spawn '{program}': {message}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Error message
        message: String,
    },

    /// Filesystem operation failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Path involved
        path: String,
        /// Error message
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration parameter
    #[error("Invalid configuration for '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl BenchError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io_error(path: impl AsRef<Path>, err: io::Error) -> Self {
        BenchError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Builds a spawn error for `program`.
    pub fn spawn(program: impl AsRef<Path>, err: io::Error) -> Self {
        BenchError::Spawn {
            program: program.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Builds an invalid configuration error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        BenchError::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for BenchError {
    fn from(err: CoreError) -> Self {
        BenchError::Json(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Json(err.to_string())
    }
}
