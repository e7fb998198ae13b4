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

//! Hotschema Core
//!
//! Document model and structural tooling for investigating compile-time
//! blow-ups in JSON Schema compilers.
//!
//! ## Features
//!
//! - **Document tree**: JSON-like [`Document`] (mapping / sequence / scalar)
//! - **Transformer**: bottom-up, side-effect-free [`walk`] under a node function
//! - **Ablation rules**: named rewrites such as `strip-conditionals` or `no-allof`
//! - **Structural statistics**: keyword, reference and pattern counts
//!
//! ## Usage
//!
//! ```
//! use hotschema_core::{json, snapshot, AblationRule};
//!
//! let baseline = json::from_json_str(
//!     r##"{"allOf": [{"if": {"required": ["k"]}, "then": {"$ref": "#/$defs/Leaf"}}]}"##,
//! ).unwrap();
//!
//! let variant = AblationRule::StripRefsInConditionals.apply(&baseline);
//! assert_eq!(snapshot(&baseline).ref_count, 1);
//! assert_eq!(snapshot(&variant).ref_count, 0);
//! ```

mod document;
mod error;
pub mod json;
pub mod keywords;
pub mod rules;
pub mod snapshot;
pub mod walk;

pub use document::{Document, Mapping, NodeKind, Scalar};
pub use error::{CoreError, Result};
pub use rules::{generate_variants, AblationRule, Variant};
pub use snapshot::{snapshot, Snapshot};
pub use walk::{
    rewrite_mappings_under, rewrite_mappings_where, traverse, walk, DocumentVisitor, VisitorContext,
};
