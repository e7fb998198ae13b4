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

//! Shared fixtures for hotschema-core integration tests.

#![allow(dead_code)]

use hotschema_core::keywords::CONDITIONAL_KEYWORDS;
use hotschema_core::{json, traverse, Document, DocumentVisitor, Mapping, VisitorContext};
use serde_json::json;

/// One property block: an `allOf` chain of `depth` levels where each `then`
/// nests the previous level and each `else` points at `Alt`.
pub fn nested_block(name: &str, depth: usize) -> serde_json::Value {
    let mut node = json!({"$ref": "#/$defs/Leaf"});
    for level in 1..=depth {
        node = json!({
            "allOf": [
                {"type": "object"},
                {
                    "if": {
                        "required": ["kind"],
                        "properties": {"kind": {"const": format!("{}_K{}", name, level)}}
                    },
                    "then": node,
                    "else": {"$ref": "#/$defs/Alt"}
                }
            ]
        });
    }
    node
}

/// A schema with `width` properties, each a nested block of `depth` levels.
pub fn hot_schema(width: usize, depth: usize) -> Document {
    let mut properties = serde_json::Map::new();
    for i in 1..=width {
        let name = format!("p{}", i);
        properties.insert(name.clone(), nested_block(&name, depth));
    }
    json::from_json_value(json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {
            "Leaf": {
                "type": "object",
                "properties": {"x": {"type": "integer"}},
                "required": ["x"],
                "additionalProperties": false
            },
            "Alt": {
                "type": "object",
                "properties": {"y": {"type": "string", "pattern": "^[a-z]+$"}},
                "additionalProperties": false
            }
        },
        "type": "object",
        "properties": properties,
        "additionalProperties": false
    }))
}

/// A schema with `plain` references outside conditionals and `conditional`
/// references inside `then` branches.
pub fn reference_mix(plain: usize, conditional: usize) -> Document {
    let mut properties = serde_json::Map::new();
    for i in 0..plain {
        properties.insert(format!("p{}", i), json!({"$ref": "#/$defs/Leaf"}));
    }
    for i in 0..conditional {
        properties.insert(
            format!("c{}", i),
            json!({
                "if": {"required": ["kind"]},
                "then": {"$ref": format!("#/$defs/Branch{}", i)}
            }),
        );
    }
    json::from_json_value(json!({
        "$defs": {"Leaf": {"type": "integer"}},
        "properties": properties
    }))
}

/// JSON pointers of every mapping carrying `key`.
pub fn pointers_with_key(doc: &Document, key: &str) -> Vec<String> {
    struct Collect<'k> {
        key: &'k str,
        found: Vec<String>,
    }
    impl DocumentVisitor for Collect<'_> {
        fn visit_mapping(&mut self, map: &Mapping, ctx: &VisitorContext) {
            if map.contains_key(self.key) {
                self.found.push(ctx.pointer());
            }
        }
    }
    let mut v = Collect {
        key,
        found: Vec::new(),
    };
    traverse(doc, &mut v);
    v.found
}

/// Mappings carrying a conditional keyword that are not themselves inside a
/// conditional branch.
pub fn outermost_conditionals(doc: &Document) -> usize {
    #[derive(Default)]
    struct Count(usize);
    impl DocumentVisitor for Count {
        fn visit_mapping(&mut self, map: &Mapping, ctx: &VisitorContext) {
            let carries = CONDITIONAL_KEYWORDS.iter().any(|k| map.contains_key(*k));
            if carries && !ctx.under_any_key(CONDITIONAL_KEYWORDS) {
                self.0 += 1;
            }
        }
    }
    let mut v = Count::default();
    traverse(doc, &mut v);
    v.0
}

/// Mapping keys found anywhere inside a conditional branch.
pub fn keys_inside_conditionals(doc: &Document) -> usize {
    #[derive(Default)]
    struct Count(usize);
    impl DocumentVisitor for Count {
        fn visit_mapping(&mut self, map: &Mapping, ctx: &VisitorContext) {
            if ctx.under_any_key(CONDITIONAL_KEYWORDS) {
                self.0 += map.len();
            }
        }
    }
    let mut v = Count::default();
    traverse(doc, &mut v);
    v.0
}
