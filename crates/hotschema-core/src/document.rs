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

//! Document tree model.
//!
//! A [`Document`] is a JSON-like tree of three node kinds: mappings with
//! unique string keys, ordered sequences, and scalar leaves. Mappings are
//! stored in a [`BTreeMap`], so key iteration is sorted and stable across
//! calls and serialized output is normalized.

use serde_json::Number;
use std::collections::BTreeMap;

/// Children of a mapping node, keyed by property name.
pub type Mapping = BTreeMap<String, Document>;

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Number, kept in its exact JSON representation.
    Number(Number),
    /// String value.
    String(String),
}

impl Scalar {
    /// Try to get as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// The kind of a document node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A mapping node.
    Mapping,
    /// A sequence node.
    Sequence,
    /// A scalar leaf.
    Scalar,
}

/// A node in a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Unique string keys bound to child documents.
    Mapping(Mapping),
    /// Ordered list of child documents.
    Sequence(Vec<Document>),
    /// Leaf value.
    Scalar(Scalar),
}

impl Document {
    /// Create an empty mapping.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Create a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Create a `null` scalar.
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Scalar(_) => NodeKind::Scalar,
        }
    }

    /// Try to get as a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get as a sequence.
    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as a scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Look up a key if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Whether this node is a mapping carrying `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether this node is a mapping carrying any of `keys`.
    pub fn has_any_key(&self, keys: &[&str]) -> bool {
        match self {
            Self::Mapping(m) => keys.iter().any(|k| m.contains_key(*k)),
            _ => false,
        }
    }

    /// Total number of nodes in this tree, including the root.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::Mapping(m) => m.values().map(Document::node_count).sum(),
            Self::Sequence(items) => items.iter().map(Document::node_count).sum(),
            Self::Scalar(_) => 0,
        }
    }

    /// Maximum depth of this tree; a lone scalar has depth 1.
    pub fn depth(&self) -> usize {
        1 + match self {
            Self::Mapping(m) => m.values().map(Document::depth).max().unwrap_or(0),
            Self::Sequence(items) => items.iter().map(Document::depth).max().unwrap_or(0),
            Self::Scalar(_) => 0,
        }
    }
}

impl From<Scalar> for Document {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Self::Sequence(value)
    }
}
