//! Dotted, indexed paths that address data inside a [`TreeValue`].
//!
//! Form fields are named after the tree location they edit:
//!
//! ```text
//! domain:registrant                   text of <domain:registrant>
//! domain:authInfo.domain:pw           text of <domain:pw> inside <domain:authInfo>
//! domain:contact[1].@type             "type" attribute of the second <domain:contact>
//! domain:ns.domain:hostObj[0].value   text of the first <domain:hostObj>
//! ```
//!
//! Segments are separated by `.`.  An element segment may carry a `[n]`
//! index into a repeated child; without one the first element is used.  The
//! last segment may instead be `@name` (an attribute) or the keyword `value`
//! (the element's text, which is also what a path ending in an element
//! means).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::tree::value::{Node, TreeValue, ATTRIBUTE_PREFIX};

/// Keyword segment that names an element's text.
pub const TEXT_SEGMENT: &str = "value";

/// Errors raised while parsing or writing through a [`FieldPath`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,

    #[error("invalid segment \"{segment}\" in field path \"{path}\"")]
    InvalidSegment { path: String, segment: String },

    #[error("\"{segment}\" must be the last segment of field path \"{path}\"")]
    TerminalNotLast { path: String, segment: String },

    #[error("index {index} of <{element}> is past the {len} existing elements")]
    IndexOutOfRange {
        element: String,
        index: usize,
        len: usize,
    },

    #[error("<{0}> already has child elements and cannot hold text")]
    TextOnParent(String),

    #[error("field path \"{0}\" does not end in an element")]
    NotAnElement(String),
}

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A child element, optionally indexed into a repeated group.
    Element { name: String, index: Option<usize> },
    /// An attribute of the current element (name without `@`).
    Attribute(String),
    /// The current element's text.
    Text,
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns a new path with `other`'s segments after this path's.
    ///
    /// # Errors
    ///
    /// Fails if this path already ends in an attribute or text segment.
    pub fn join(&self, other: &FieldPath) -> Result<FieldPath, PathError> {
        if let Some(last @ (Segment::Attribute(_) | Segment::Text)) = self.segments.last() {
            return Err(PathError::TerminalNotLast {
                path: format!("{self}.{other}"),
                segment: segment_to_string(last),
            });
        }
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Ok(FieldPath { segments })
    }

    /// Returns a copy whose last element segment carries `index`.
    pub fn with_last_index(&self, index: usize) -> FieldPath {
        let mut segments = self.segments.clone();
        if let Some(Segment::Element { index: slot, .. }) = segments
            .iter_mut()
            .rev()
            .find(|s| matches!(s, Segment::Element { .. }))
        {
            *slot = Some(index);
        }
        FieldPath { segments }
    }

    /// Reads the string this path points at.
    ///
    /// Returns `None` when any element along the way is missing or the
    /// addressed text/attribute is absent.
    pub fn read<'a>(&self, tree: &'a TreeValue) -> Option<&'a str> {
        let mut current = tree;
        for segment in &self.segments {
            match segment {
                Segment::Element { name, index } => {
                    current = current.child(name)?.get(index.unwrap_or(0))?;
                }
                Segment::Attribute(name) => return current.attribute(name),
                Segment::Text => return current.text(),
            }
        }
        current.text()
    }

    /// Returns every element stored under the path's last element segment.
    ///
    /// Indexes on earlier segments are honoured; an index on the last element
    /// segment is ignored.  Missing elements yield an empty slice.
    pub fn elements<'a>(&self, tree: &'a TreeValue) -> &'a [TreeValue] {
        let Some(last) = self
            .segments
            .iter()
            .rposition(|s| matches!(s, Segment::Element { .. }))
        else {
            return &[];
        };
        let mut current = tree;
        for segment in &self.segments[..last] {
            if let Segment::Element { name, index } = segment {
                match current.child(name).and_then(|n| n.get(index.unwrap_or(0))) {
                    Some(next) => current = next,
                    None => return &[],
                }
            }
        }
        match &self.segments[last] {
            Segment::Element { name, .. } => current.child(name).map(Node::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Writes `value` at this path, creating missing elements on the way.
    ///
    /// An index may point at an existing element or one past the end (which
    /// appends a new element).
    ///
    /// # Errors
    ///
    /// [`PathError::IndexOutOfRange`] for an index further past the end, and
    /// [`PathError::TextOnParent`] when text would land on an element that
    /// already has children.
    pub fn write(&self, tree: &mut TreeValue, value: impl Into<String>) -> Result<(), PathError> {
        let mut current = tree;
        for segment in &self.segments {
            match segment {
                Segment::Element { name, index } => {
                    current = element_slot(current, name, index.unwrap_or(0))?;
                }
                Segment::Attribute(name) => {
                    current.set_attribute(name.clone(), value);
                    return Ok(());
                }
                Segment::Text => break,
            }
        }
        if let Some((child, _)) = current.children().next() {
            return Err(PathError::TextOnParent(child.to_string()));
        }
        current.set_text(Some(value.into()));
        Ok(())
    }

    /// Replaces every element stored under the path with `rows`.
    ///
    /// Missing parents are created.  An empty `rows` removes the entry, and
    /// a single row is stored unwrapped, matching the shape [`decode`] gives.
    ///
    /// [`decode`]: crate::tree::decode
    pub fn set_elements(&self, tree: &mut TreeValue, rows: Vec<TreeValue>) -> Result<(), PathError> {
        let (name, parents) = match self.segments.split_last() {
            Some((Segment::Element { name, .. }, parents)) => (name, parents),
            Some(_) => return Err(PathError::NotAnElement(self.to_string())),
            None => return Err(PathError::Empty),
        };
        let mut current = tree;
        for segment in parents {
            if let Segment::Element { name, index } = segment {
                current = element_slot(current, name, index.unwrap_or(0))?;
            }
        }
        match Node::from_values(rows) {
            Some(node) => current.set_child(name.clone(), node),
            None => {
                current.remove_child(name);
            }
        }
        Ok(())
    }
}

fn element_slot<'a>(
    parent: &'a mut TreeValue,
    name: &str,
    index: usize,
) -> Result<&'a mut TreeValue, PathError> {
    let len = parent.child(name).map_or(0, Node::len);
    if index > len {
        return Err(PathError::IndexOutOfRange {
            element: name.to_string(),
            index,
            len,
        });
    }
    if index == len {
        parent.append_child(name, TreeValue::new());
    }
    parent
        .child_mut(name)
        .and_then(|node| node.get_mut(index))
        .ok_or_else(|| PathError::IndexOutOfRange {
            element: name.to_string(),
            index,
            len,
        })
}

fn parse_segment(path: &str, raw: &str) -> Result<Segment, PathError> {
    let invalid = || PathError::InvalidSegment {
        path: path.to_string(),
        segment: raw.to_string(),
    };
    if raw.is_empty() {
        return Err(invalid());
    }
    if raw == TEXT_SEGMENT {
        return Ok(Segment::Text);
    }
    if let Some(attribute) = raw.strip_prefix(ATTRIBUTE_PREFIX) {
        if attribute.is_empty() || attribute.contains(['[', ']']) {
            return Err(invalid());
        }
        return Ok(Segment::Attribute(attribute.to_string()));
    }
    match raw.split_once('[') {
        None if raw.contains(']') => Err(invalid()),
        None => Ok(Segment::Element {
            name: raw.to_string(),
            index: None,
        }),
        Some((name, rest)) => {
            let digits = rest.strip_suffix(']').ok_or_else(invalid)?;
            let index = digits.parse::<usize>().map_err(|_| invalid())?;
            if name.is_empty() {
                return Err(invalid());
            }
            Ok(Segment::Element {
                name: name.to_string(),
                index: Some(index),
            })
        }
    }
}

fn segment_to_string(segment: &Segment) -> String {
    match segment {
        Segment::Element { name, index: None } => name.clone(),
        Segment::Element {
            name,
            index: Some(i),
        } => format!("{name}[{i}]"),
        Segment::Attribute(name) => format!("{ATTRIBUTE_PREFIX}{name}"),
        Segment::Text => TEXT_SEGMENT.to_string(),
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = path
            .split('.')
            .map(|raw| parse_segment(path, raw))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(pos) = segments[..segments.len() - 1]
            .iter()
            .position(|s| !matches!(s, Segment::Element { .. }))
        {
            return Err(PathError::TerminalNotLast {
                path: path.to_string(),
                segment: segment_to_string(&segments[pos]),
            });
        }
        Ok(FieldPath { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment_to_string(segment))?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
