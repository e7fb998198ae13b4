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

//! Ablation rule registry.
//!
//! Each [`AblationRule`] is a named structural rewrite, one application of
//! [`rewrite_mappings_where`] or [`rewrite_mappings_under`]. Rules only ever
//! look at mapping nodes;
//! sequences and scalars pass through. Rules are applied independently to the
//! same baseline, producing sibling [`Variant`]s. They are never chained.

use crate::document::{Document, Mapping};
use crate::error::CoreError;
use crate::keywords::{
    ALL_OF, ANY_OF, CONDITIONAL_KEYWORDS, DEPENDENT_SCHEMAS, ELSE, IF, NOT, ONE_OF, REF, THEN,
    UNEVALUATED_PROPERTIES,
};
use crate::walk::{rewrite_mappings_under, rewrite_mappings_where};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Keywords removed by [`AblationRule::RefsOnly`].
const REFS_ONLY_REMOVED: &[&str] = &[
    ALL_OF,
    ANY_OF,
    ONE_OF,
    NOT,
    IF,
    THEN,
    ELSE,
    DEPENDENT_SCHEMAS,
    UNEVALUATED_PROPERTIES,
];

/// Keywords removed by [`AblationRule::OnlyAllOf`].
const ONLY_ALLOF_REMOVED: &[&str] = &[IF, THEN, ELSE, DEPENDENT_SCHEMAS, UNEVALUATED_PROPERTIES];

/// A named structural rewrite of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AblationRule {
    /// Delete `if`/`then`/`else` everywhere.
    StripConditionals,
    /// Replace each conditional branch with `{}`, keeping the key.
    EmptyConditionals,
    /// Delete `$ref` inside conditional branches only.
    StripRefsInConditionals,
    /// Delete composition, conditional, dependent and unevaluated keywords.
    RefsOnly,
    /// Delete conditional, dependent and unevaluated keywords.
    OnlyAllOf,
    /// Delete `anyOf` everywhere.
    NoAnyOf,
    /// Delete `oneOf` everywhere.
    NoOneOf,
    /// Delete `allOf` everywhere.
    NoAllOf,
    /// Delete `dependentSchemas` everywhere.
    NoDependentSchemas,
    /// Delete `unevaluatedProperties` everywhere.
    NoUnevaluated,
}

impl AblationRule {
    /// Every rule, in generation order.
    pub const ALL: [AblationRule; 10] = [
        AblationRule::StripConditionals,
        AblationRule::EmptyConditionals,
        AblationRule::StripRefsInConditionals,
        AblationRule::RefsOnly,
        AblationRule::OnlyAllOf,
        AblationRule::NoAnyOf,
        AblationRule::NoOneOf,
        AblationRule::NoAllOf,
        AblationRule::NoDependentSchemas,
        AblationRule::NoUnevaluated,
    ];

    /// Stable rule name, also used for variant file names.
    pub fn name(&self) -> &'static str {
        match self {
            AblationRule::StripConditionals => "strip-conditionals",
            AblationRule::EmptyConditionals => "empty-conditionals",
            AblationRule::StripRefsInConditionals => "strip-refs-in-conditionals",
            AblationRule::RefsOnly => "refs-only",
            AblationRule::OnlyAllOf => "only-allof",
            AblationRule::NoAnyOf => "no-anyof",
            AblationRule::NoOneOf => "no-oneof",
            AblationRule::NoAllOf => "no-allof",
            AblationRule::NoDependentSchemas => "no-depschemas",
            AblationRule::NoUnevaluated => "no-uneval",
        }
    }

    /// One-line description of the hypothesis the rule tests.
    pub fn description(&self) -> &'static str {
        match self {
            AblationRule::StripConditionals => "remove if/then/else entirely",
            AblationRule::EmptyConditionals => {
                "keep if/then/else keys with empty bodies (wrapper cost vs payload cost)"
            }
            AblationRule::StripRefsInConditionals => "remove $ref inside conditional branches only",
            AblationRule::RefsOnly => {
                "remove composition, conditionals, dependentSchemas and unevaluatedProperties"
            }
            AblationRule::OnlyAllOf => {
                "remove conditionals, dependentSchemas and unevaluatedProperties; keep composition"
            }
            AblationRule::NoAnyOf => "remove anyOf",
            AblationRule::NoOneOf => "remove oneOf",
            AblationRule::NoAllOf => "remove allOf",
            AblationRule::NoDependentSchemas => "remove dependentSchemas",
            AblationRule::NoUnevaluated => "remove unevaluatedProperties",
        }
    }

    /// Apply the rule to `doc`, returning a new document.
    pub fn apply(&self, doc: &Document) -> Document {
        match self {
            AblationRule::StripConditionals => delete_keys(doc, CONDITIONAL_KEYWORDS),
            AblationRule::EmptyConditionals => empty_conditionals(doc),
            AblationRule::StripRefsInConditionals => strip_refs_in_conditionals(doc),
            AblationRule::RefsOnly => delete_keys(doc, REFS_ONLY_REMOVED),
            AblationRule::OnlyAllOf => delete_keys(doc, ONLY_ALLOF_REMOVED),
            AblationRule::NoAnyOf => delete_keys(doc, &[ANY_OF]),
            AblationRule::NoOneOf => delete_keys(doc, &[ONE_OF]),
            AblationRule::NoAllOf => delete_keys(doc, &[ALL_OF]),
            AblationRule::NoDependentSchemas => delete_keys(doc, &[DEPENDENT_SCHEMAS]),
            AblationRule::NoUnevaluated => delete_keys(doc, &[UNEVALUATED_PROPERTIES]),
        }
    }

    /// Comma-separated list of every rule name.
    pub fn names() -> String {
        Self::ALL.iter().map(|r| r.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for AblationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AblationRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|rule| rule.name() == s.trim())
            .ok_or_else(|| CoreError::UnknownRule {
                name: s.to_string(),
                expected: Self::names(),
            })
    }
}

/// A document derived from the baseline by exactly one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// The rule that produced this variant.
    pub rule: AblationRule,
    /// The rewritten document.
    pub document: Document,
}

impl Variant {
    /// Variant name (the rule name).
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }
}

/// Apply each rule to `baseline`, returning variants in the order of `rules`.
///
/// Rules run in parallel; each only reads the shared baseline.
pub fn generate_variants(baseline: &Document, rules: &[AblationRule]) -> Vec<Variant> {
    rules
        .par_iter()
        .map(|&rule| Variant {
            rule,
            document: rule.apply(baseline),
        })
        .collect()
}

fn delete_keys(doc: &Document, keys: &[&str]) -> Document {
    rewrite_mappings_where(
        doc,
        |map| keys.iter().any(|k| map.contains_key(*k)),
        |mut map| {
            for key in keys {
                map.remove(*key);
            }
            map
        },
    )
}

fn carries_conditional(map: &Mapping) -> bool {
    CONDITIONAL_KEYWORDS.iter().any(|k| map.contains_key(*k))
}

fn empty_conditionals(doc: &Document) -> Document {
    rewrite_mappings_where(doc, carries_conditional, |mut map| {
        for key in CONDITIONAL_KEYWORDS {
            if let Some(branch) = map.get_mut(*key) {
                *branch = Document::empty_mapping();
            }
        }
        map
    })
}

fn strip_refs_in_conditionals(doc: &Document) -> Document {
    rewrite_mappings_under(doc, CONDITIONAL_KEYWORDS, |mut map| {
        map.remove(REF);
        map
    })
}
