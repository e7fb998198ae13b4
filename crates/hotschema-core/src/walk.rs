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

//! Tree transformation and read-only traversal.
//!
//! Two entry points share the recursive structure of a [`Document`]:
//!
//! - [`walk`] rebuilds a tree bottom-up under a node function. Children are
//!   rewritten before their parent is handed to the function, so a function
//!   looking at a mapping always sees already-rewritten descendants.
//! - [`traverse`] drives a [`DocumentVisitor`] over a borrowed tree without
//!   building anything, for analysis passes.
//!
//! # Example
//!
//! ```
//! use hotschema_core::{json, walk::walk, Document};
//!
//! let doc = json::from_json_str(r##"{"a": {"b": 1}, "c": [true]}"##).unwrap();
//! let upper = walk(&doc, |node| match node {
//!     Document::Mapping(m) => Document::Mapping(
//!         m.into_iter().map(|(k, v)| (k.to_uppercase(), v)).collect(),
//!     ),
//!     other => other,
//! });
//! assert!(upper.get("A").and_then(|a| a.get("B")).is_some());
//! ```

use crate::document::{Document, Mapping, Scalar};
use crate::keywords::CONDITIONAL_KEYWORDS;

/// Rewrite `doc` bottom-up, returning a new tree.
///
/// Mappings rebuild every value under the same key, sequences rebuild every
/// element in order, scalars are cloned. `f` then receives the rebuilt node
/// and its return value takes that node's place. `f` is called exactly once
/// per node and never before all of the node's children were rewritten.
///
/// The input is only borrowed. A panic in `f` propagates to the caller.
pub fn walk<F>(doc: &Document, mut f: F) -> Document
where
    F: FnMut(Document) -> Document,
{
    walk_node(doc, &mut f)
}

fn walk_node<F>(doc: &Document, f: &mut F) -> Document
where
    F: FnMut(Document) -> Document,
{
    let rebuilt = match doc {
        Document::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, child) in map {
                out.insert(key.clone(), walk_node(child, f));
            }
            Document::Mapping(out)
        }
        Document::Sequence(items) => {
            Document::Sequence(items.iter().map(|child| walk_node(child, f)).collect())
        }
        Document::Scalar(value) => Document::Scalar(value.clone()),
    };
    f(rebuilt)
}

/// Apply `edit` to every mapping matching `predicate`, bottom-up.
///
/// Sequences, scalars and non-matching mappings pass through unchanged.
pub fn rewrite_mappings_where<P, E>(doc: &Document, predicate: P, mut edit: E) -> Document
where
    P: Fn(&Mapping) -> bool,
    E: FnMut(Mapping) -> Mapping,
{
    walk(doc, |node| match node {
        Document::Mapping(map) if predicate(&map) => Document::Mapping(edit(map)),
        other => other,
    })
}

/// Apply `edit` to every mapping lying inside the value of one of `keys`,
/// bottom-up. A mapping that is itself such a value counts as inside.
///
/// Whether a node is inside is decided on the way down, so the whole rewrite
/// is one pass however deeply the keys nest.
pub fn rewrite_mappings_under<E>(doc: &Document, keys: &[&str], mut edit: E) -> Document
where
    E: FnMut(Mapping) -> Mapping,
{
    rewrite_under(doc, keys, false, &mut edit)
}

fn rewrite_under<E>(doc: &Document, keys: &[&str], inside: bool, edit: &mut E) -> Document
where
    E: FnMut(Mapping) -> Mapping,
{
    match doc {
        Document::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, child) in map {
                let below = inside || keys.contains(&key.as_str());
                out.insert(key.clone(), rewrite_under(child, keys, below, edit));
            }
            if inside {
                Document::Mapping(edit(out))
            } else {
                Document::Mapping(out)
            }
        }
        Document::Sequence(items) => Document::Sequence(
            items
                .iter()
                .map(|child| rewrite_under(child, keys, inside, edit))
                .collect(),
        ),
        Document::Scalar(value) => Document::Scalar(value.clone()),
    }
}

/// Path segment from a parent to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// Key inside a mapping.
    Key(&'a str),
    /// Index inside a sequence.
    Index(usize),
}

/// Context provided to visitors during traversal.
///
/// Contexts form a chain through their parents, so descending one level is
/// constant work regardless of depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisitorContext<'a, 'p> {
    /// Current nesting depth (0 = root).
    pub depth: usize,
    /// Whether a conditional keyword (`if`/`then`/`else`) lies on the path.
    pub in_conditional: bool,
    segment: Option<PathSegment<'a>>,
    parent: Option<&'p VisitorContext<'a, 'p>>,
}

impl<'a, 'p> VisitorContext<'a, 'p> {
    /// Create a context for the root node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child context one level deeper.
    pub fn child(&'p self, segment: PathSegment<'a>) -> VisitorContext<'a, 'p> {
        let entering = matches!(segment, PathSegment::Key(k) if CONDITIONAL_KEYWORDS.contains(&k));
        VisitorContext {
            depth: self.depth + 1,
            in_conditional: self.in_conditional || entering,
            segment: Some(segment),
            parent: Some(self),
        }
    }

    /// Path segments from the root to the current node.
    pub fn path(&self) -> Vec<PathSegment<'a>> {
        let mut out = Vec::with_capacity(self.depth);
        let mut node = Some(self);
        while let Some(ctx) = node {
            if let Some(segment) = ctx.segment {
                out.push(segment);
            }
            node = ctx.parent;
        }
        out.reverse();
        out
    }

    /// Whether any mapping key on the path equals one of `keys`.
    pub fn under_any_key(&self, keys: &[&str]) -> bool {
        let mut node = Some(self);
        while let Some(ctx) = node {
            if let Some(PathSegment::Key(k)) = ctx.segment {
                if keys.contains(&k) {
                    return true;
                }
            }
            node = ctx.parent;
        }
        false
    }

    /// The current path as a JSON pointer (`""` for the root).
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for seg in self.path() {
            out.push('/');
            match seg {
                PathSegment::Key(k) => out.push_str(&k.replace('~', "~0").replace('/', "~1")),
                PathSegment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }
}

/// Read-only visitor over a document tree.
///
/// All methods default to doing nothing, so implementations override only the
/// node kinds they care about. Nodes are visited parent before children.
pub trait DocumentVisitor {
    /// Called for every mapping node.
    fn visit_mapping(&mut self, _map: &Mapping, _ctx: &VisitorContext) {}

    /// Called for every sequence node.
    fn visit_sequence(&mut self, _items: &[Document], _ctx: &VisitorContext) {}

    /// Called for every scalar node.
    fn visit_scalar(&mut self, _value: &Scalar, _ctx: &VisitorContext) {}
}

/// Traverse `doc`, calling visitor methods for each node.
pub fn traverse<V: DocumentVisitor>(doc: &Document, visitor: &mut V) {
    traverse_node(doc, visitor, &VisitorContext::new());
}

fn traverse_node<'a, V: DocumentVisitor>(
    doc: &'a Document,
    visitor: &mut V,
    ctx: &VisitorContext<'a, '_>,
) {
    match doc {
        Document::Mapping(map) => {
            visitor.visit_mapping(map, ctx);
            for (key, child) in map {
                traverse_node(child, visitor, &ctx.child(PathSegment::Key(key)));
            }
        }
        Document::Sequence(items) => {
            visitor.visit_sequence(items, ctx);
            for (i, child) in items.iter().enumerate() {
                traverse_node(child, visitor, &ctx.child(PathSegment::Index(i)));
            }
        }
        Document::Scalar(value) => visitor.visit_scalar(value, ctx),
    }
}
