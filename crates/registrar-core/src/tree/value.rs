//! The generic attributed tree that every EPP element decodes into.
//!
//! # Shape (for beginners)
//!
//! One [`TreeValue`] stands for one markup element.  It carries three kinds of
//! data, mirroring what an element can hold on the wire:
//!
//! ```text
//! <domain:contact type="admin">justine</domain:contact>
//!                 ^^^^^^^^^^^^ ^^^^^^^
//!                 attribute    text
//! ```
//!
//! - **text** – present only when the element had non-whitespace text and no
//!   child elements.
//! - **attributes** – one entry per markup attribute.  Rendered with an `@`
//!   prefix (`@type`) whenever the tree is shown as JSON or addressed by a
//!   field path.
//! - **children** – one entry per distinct child element name, in order of
//!   first appearance.  A name seen once maps to [`Node::Single`]; a name seen
//!   more than once maps to [`Node::Repeated`] holding every occurrence in
//!   document order.
//!
//! A *document* is a `TreeValue` with exactly one child (the root element) and
//! nothing else.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// JSON key used for element text when a tree is rendered with serde.
pub const TEXT_KEY: &str = "#text";

/// Prefix that marks attribute keys in JSON renderings and field paths.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Decoded representation of one markup element.
///
/// Equality compares attributes and children as maps (key order does not
/// matter), but repeated children compare element by element in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeValue {
    text: Option<String>,
    attributes: IndexMap<String, String>,
    children: IndexMap<String, Node>,
}

/// The value stored under one child element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The name occurred exactly once among the direct children.
    Single(TreeValue),
    /// The name occurred two or more times; order is document order.
    Repeated(Vec<TreeValue>),
}

impl TreeValue {
    /// Creates an empty value (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a value holding only `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Wraps `root` as the single top-level element of a document.
    pub fn document(root_name: impl Into<String>, root: TreeValue) -> Self {
        let mut doc = Self::new();
        doc.children.insert(root_name.into(), Node::Single(root));
        doc
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`append_child`](Self::append_child).
    pub fn child_with(mut self, name: impl Into<String>, value: TreeValue) -> Self {
        self.append_child(name, value);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Returns the attribute called `name` (without the `@` prefix).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Iterates attributes in source order as `(name, value)` pairs.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// Returns the first element stored under `name`, if any.
    pub fn first(&self, name: &str) -> Option<&TreeValue> {
        self.child(name).and_then(Node::first)
    }

    /// Iterates children in order of first appearance.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds `value` as another `name` child.
    ///
    /// The first call stores a [`Node::Single`]; any later call with the same
    /// name turns the entry into a [`Node::Repeated`] that also contains the
    /// earlier element.
    pub fn append_child(&mut self, name: impl Into<String>, value: TreeValue) {
        let name = name.into();
        match self.children.get_mut(&name) {
            Some(node) => node.push(value),
            None => {
                self.children.insert(name, Node::Single(value));
            }
        }
    }

    /// Replaces whatever is stored under `name`.
    pub fn set_child(&mut self, name: impl Into<String>, node: Node) {
        self.children.insert(name.into(), node);
    }

    /// Removes the entry for `name`, keeping the order of the others.
    pub fn remove_child(&mut self, name: &str) -> Option<Node> {
        self.children.shift_remove(name)
    }

    /// `true` for `{}`: no text, no attributes, no children.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.attributes.is_empty() && self.children.is_empty()
    }

    /// `true` when both text and child elements are set.
    ///
    /// Decoding never produces such a value and encoding refuses it.
    pub fn has_mixed_content(&self) -> bool {
        self.text.is_some() && !self.children.is_empty()
    }

    /// Returns the root element of a document value.
    ///
    /// `None` unless the value has exactly one child (which must be a single
    /// element) and neither text nor attributes.
    pub fn root(&self) -> Option<(&str, &TreeValue)> {
        if self.text.is_some() || !self.attributes.is_empty() || self.children.len() != 1 {
            return None;
        }
        match self.children.get_index(0) {
            Some((name, Node::Single(root))) => Some((name.as_str(), root)),
            _ => None,
        }
    }

    /// Follows a chain of single-or-first children, e.g.
    /// `["epp", "response", "result"]`.
    pub fn descend(&self, names: &[&str]) -> Option<&TreeValue> {
        names
            .iter()
            .try_fold(self, |current, name| current.first(name))
    }
}

impl Node {
    /// All elements under this name as a slice (length 1 for `Single`).
    pub fn as_slice(&self) -> &[TreeValue] {
        match self {
            Node::Single(value) => std::slice::from_ref(value),
            Node::Repeated(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn first(&self) -> Option<&TreeValue> {
        self.as_slice().first()
    }

    pub fn get(&self, index: usize) -> Option<&TreeValue> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TreeValue> {
        match self {
            Node::Single(value) if index == 0 => Some(value),
            Node::Single(_) => None,
            Node::Repeated(values) => values.get_mut(index),
        }
    }

    /// Appends `value`, promoting a `Single` to `Repeated`.
    pub fn push(&mut self, value: TreeValue) {
        match self {
            Node::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Node::Repeated(vec![first, value]);
            }
            Node::Repeated(values) => values.push(value),
        }
    }

    /// Builds the node shape decoding would produce for `values`.
    ///
    /// Returns `None` for an empty list: an absent element has no entry.
    pub fn from_values(mut values: Vec<TreeValue>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Node::Single),
            _ => Some(Node::Repeated(values)),
        }
    }

    pub fn into_values(self) -> Vec<TreeValue> {
        match self {
            Node::Single(value) => vec![value],
            Node::Repeated(values) => values,
        }
    }
}

impl Serialize for TreeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.attributes.len() + self.children.len() + usize::from(self.text.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(&format!("{ATTRIBUTE_PREFIX}{name}"), value)?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry(TEXT_KEY, text)?;
        }
        for (name, node) in &self.children {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Single(value) => value.serialize(serializer),
            Node::Repeated(values) => values.serialize(serializer),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
