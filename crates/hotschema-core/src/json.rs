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

//! Conversion between [`Document`] and JSON.
//!
//! Parsing goes through [`serde_json::Value`] and is then lowered into the
//! tree model. Output is emitted from the sorted mappings, which makes the
//! serialized form of a document canonical with respect to key order.
//!
//! The parser's nesting limit is lifted: deeply nested schemas are exactly
//! the inputs this crate exists to study. Depth is bounded by the stack only.

use crate::document::{Document, Mapping, Scalar};
use crate::error::{CoreError, Result};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// Parse a JSON string into a document.
pub fn from_json_str(input: &str) -> Result<Document> {
    parse_unbounded(serde_json::Deserializer::from_str(input))
}

/// Parse JSON bytes into a document.
pub fn from_json_slice(input: &[u8]) -> Result<Document> {
    parse_unbounded(serde_json::Deserializer::from_slice(input))
}

fn parse_unbounded<'de, R>(mut de: serde_json::Deserializer<R>) -> Result<Document>
where
    R: serde_json::de::Read<'de>,
{
    de.disable_recursion_limit();
    let value = JsonValue::deserialize(&mut de)?;
    de.end()?;
    Ok(from_json_value(value))
}

/// Lower an owned JSON value into a document.
pub fn from_json_value(value: JsonValue) -> Document {
    match value {
        JsonValue::Null => Document::Scalar(Scalar::Null),
        JsonValue::Bool(b) => Document::Scalar(Scalar::Bool(b)),
        JsonValue::Number(n) => Document::Scalar(Scalar::Number(n)),
        JsonValue::String(s) => Document::Scalar(Scalar::String(s)),
        JsonValue::Array(items) => {
            Document::Sequence(items.into_iter().map(from_json_value).collect())
        }
        JsonValue::Object(obj) => {
            let mut map = Mapping::new();
            for (key, child) in obj {
                map.insert(key, from_json_value(child));
            }
            Document::Mapping(map)
        }
    }
}

/// Raise a document into a JSON value.
pub fn to_json_value(doc: &Document) -> JsonValue {
    match doc {
        Document::Scalar(Scalar::Null) => JsonValue::Null,
        Document::Scalar(Scalar::Bool(b)) => JsonValue::Bool(*b),
        Document::Scalar(Scalar::Number(n)) => JsonValue::Number(n.clone()),
        Document::Scalar(Scalar::String(s)) => JsonValue::String(s.clone()),
        Document::Sequence(items) => JsonValue::Array(items.iter().map(to_json_value).collect()),
        Document::Mapping(map) => {
            let mut obj = Map::new();
            for (key, child) in map {
                obj.insert(key.clone(), to_json_value(child));
            }
            JsonValue::Object(obj)
        }
    }
}

/// Serialize a document as compact JSON.
pub fn to_json_string(doc: &Document) -> Result<String> {
    serde_json::to_string(&to_json_value(doc)).map_err(|e| CoreError::Serialize(e.to_string()))
}

/// Serialize a document as indented JSON with a trailing newline.
pub fn to_json_string_pretty(doc: &Document) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&to_json_value(doc))
        .map_err(|e| CoreError::Serialize(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

impl serde::Serialize for Document {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        to_json_value(self).serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Document {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(from_json_value)
    }
}
