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

//! Schema keyword names used by rules and statistics.

/// Reference keyword.
pub const REF: &str = "$ref";
/// Pattern keyword.
pub const PATTERN: &str = "pattern";


/// Conjunction of subschemas.
pub const ALL_OF: &str = "allOf";
/// Disjunction of subschemas.
pub const ANY_OF: &str = "anyOf";
/// Exclusive disjunction of subschemas.
pub const ONE_OF: &str = "oneOf";
/// Negated subschema.
pub const NOT: &str = "not";
/// Condition of a conditional.
pub const IF: &str = "if";
/// Branch applied when `if` holds.
pub const THEN: &str = "then";
/// Branch applied when `if` fails.
pub const ELSE: &str = "else";
/// Subschemas keyed by property presence.
pub const DEPENDENT_SCHEMAS: &str = "dependentSchemas";
/// Schema for properties no other keyword evaluated.
pub const UNEVALUATED_PROPERTIES: &str = "unevaluatedProperties";
/// Schema for items no other keyword evaluated.
pub const UNEVALUATED_ITEMS: &str = "unevaluatedItems";
/// Subschemas keyed by property-name regex.
pub const PATTERN_PROPERTIES: &str = "patternProperties";
/// Dynamic-scope reference.
pub const DYNAMIC_REF: &str = "$dynamicRef";

/// Keys whose values are conditional branches.
pub const CONDITIONAL_KEYWORDS: &[&str] = &[IF, THEN, ELSE];

/// Keywords whose has-key counts appear in every snapshot, in report order.
pub const TRACKED_KEYWORDS: &[&str] = &[
    ALL_OF,
    ANY_OF,
    ONE_OF,
    NOT,
    IF,
    THEN,
    ELSE,
    DEPENDENT_SCHEMAS,
    UNEVALUATED_PROPERTIES,
    UNEVALUATED_ITEMS,
    PATTERN_PROPERTIES,
    DYNAMIC_REF,
];
