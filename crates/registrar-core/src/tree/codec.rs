//! Markup codec: EPP documents to [`TreeValue`] and back.
//!
//! # Decoding rules
//!
//! | Markup                                   | Decoded value                          |
//! |------------------------------------------|----------------------------------------|
//! | `<epp/>` or `<epp></epp>`                | `{epp: {}}`                            |
//! | `<epp>  \r\n </epp>`                     | `{epp: {}}` (whitespace is ignored)    |
//! | `<epp> hello </epp>`                     | `{epp: {#text: "hello"}}`              |
//! | `<epp ohmy="goth"/>`                     | `{epp: {@ohmy: "goth"}}`               |
//! | `<epp><a>1</a><a>2</a></epp>`            | `{epp: {a: [{#text: "1"}, {#text: "2"}]}}` |
//! | `<epp> hello <omg/> there </epp>`        | error: interspersed text               |
//!
//! Qualified names such as `domain:name` are kept verbatim.  Namespace
//! declarations are ordinary attributes (`@xmlns:domain`); nothing is
//! resolved or canonicalised here.
//!
//! # Encoding
//!
//! [`encode`] is the structural inverse of [`decode`]: text becomes a text
//! node, attributes become attributes, a repeated child becomes sibling
//! elements in order.  The output is not byte-identical to whatever was
//! decoded, but `decode(encode(v)) == v` holds for every value `decode`
//! produces.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::tree::value::{Node, TreeValue};

/// Errors raised by [`decode`] and [`encode`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Two separate non-whitespace text runs inside one element.
    #[error("XML text \"{before}\" interspersed with \"{after}\"")]
    Interspersed { before: String, after: String },

    /// Non-whitespace text next to child elements.
    #[error("XML text \"{text}\" mixed with element <{element}>")]
    MixedContent { text: String, element: String },

    /// The markup is not well formed.
    #[error("unparsable XML: {0}")]
    Parse(String),

    /// The input contained no root element.
    #[error("XML document has no root element")]
    EmptyDocument,

    /// A second top-level element followed the root.
    #[error("XML document has a second root element <{0}>")]
    MultipleRoots(String),

    /// [`encode`] was given something other than a single-root document.
    #[error("value to encode must hold exactly one root element")]
    NotADocument,

    /// [`encode`] was given an element with both text and children.
    #[error("element <{0}> has both text and child elements")]
    MixedValue(String),

    /// The writer failed.
    #[error("failed to write XML: {0}")]
    Write(String),
}

impl From<quick_xml::Error> for CodecError {
    fn from(err: quick_xml::Error) -> Self {
        CodecError::Parse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for CodecError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        CodecError::Parse(err.to_string())
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes a markup document into a document [`TreeValue`].
///
/// The result has exactly one entry, keyed by the root element's qualified
/// name.
///
/// # Errors
///
/// Fails without a partial result on malformed markup or on mixed content
/// (see [`CodecError::Interspersed`] and [`CodecError::MixedContent`]).
///
/// # Examples
///
/// ```rust
/// use registrar_core::tree::{decode, TreeValue};
///
/// let doc = decode("<epp ohmy=\"goth\"/>").unwrap();
/// assert_eq!(doc, TreeValue::document("epp", TreeValue::new().attr("ohmy", "goth")));
/// ```
pub fn decode(markup: &str) -> Result<TreeValue, CodecError> {
    let mut reader = Reader::from_str(markup);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, TreeValue)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let (name, value) = open_element(&start)?;
                stack.push(OpenElement::new(name, value));
            }
            Event::Empty(start) => {
                let (name, value) = open_element(&start)?;
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::End(_) => {
                // quick-xml has already checked that the end tag matches.
                let open = stack
                    .pop()
                    .ok_or_else(|| CodecError::Parse("unbalanced end tag".to_string()))?;
                let (name, value) = open.finish()?;
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|err| CodecError::Parse(err.to_string()))?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no data for the tree.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CodecError::Parse(format!(
            "document ended inside <{}>",
            open.name
        )));
    }
    let (name, value) = root.ok_or(CodecError::EmptyDocument)?;
    Ok(TreeValue::document(name, value))
}

/// Encodes a document [`TreeValue`] as markup with an XML declaration.
///
/// # Errors
///
/// Returns [`CodecError::NotADocument`] when `document` does not hold exactly
/// one root element, and [`CodecError::MixedValue`] for any element that has
/// both text and children.
pub fn encode(document: &TreeValue) -> Result<String, CodecError> {
    write_document(Writer::new(Vec::new()), document)
}

/// Like [`encode`], but indents nested elements by two spaces.
///
/// Indentation is whitespace-only text, so the output decodes to the same
/// value.  Used for human-readable dumps.
pub fn encode_pretty(document: &TreeValue) -> Result<String, CodecError> {
    write_document(Writer::new_with_indent(Vec::new(), b' ', 2), document)
}

// ── Decoding helpers ──────────────────────────────────────────────────────────

/// An element whose end tag has not been seen yet.
struct OpenElement {
    name: String,
    value: TreeValue,
    /// Text runs in document order, untrimmed.  A run is everything between
    /// two child elements, so comments and CDATA sections do not split it.
    texts: Vec<String>,
    /// Whether new text continues the last run.
    in_text_run: bool,
}

impl OpenElement {
    fn new(name: String, value: TreeValue) -> Self {
        Self {
            name,
            value,
            texts: Vec::new(),
            in_text_run: false,
        }
    }

    /// Applies the text rules and returns the finished element.
    fn finish(mut self) -> Result<(String, TreeValue), CodecError> {
        let mut texts = self
            .texts
            .into_iter()
            .map(|run| run.trim().to_string())
            .filter(|run| !run.is_empty());
        let first = texts.next();
        if let (Some(before), Some(after)) = (first.as_ref(), texts.next()) {
            return Err(CodecError::Interspersed {
                before: before.clone(),
                after,
            });
        }
        if let Some(text) = first {
            if let Some((element, _)) = self.value.children().next() {
                return Err(CodecError::MixedContent {
                    text,
                    element: element.to_string(),
                });
            }
            self.value.set_text(Some(text));
        }
        Ok((self.name, self.value))
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<(String, TreeValue), CodecError> {
    let name = utf8(start.name().as_ref())?.to_string();
    let mut value = TreeValue::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = utf8(attribute.key.as_ref())?.to_string();
        let unescaped = attribute.unescape_value()?;
        value.set_attribute(key, unescaped.into_owned());
    }
    Ok((name, value))
}

fn push_text(stack: &mut [OpenElement], raw: &str) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(open) => {
            let continues = open.in_text_run;
            match open.texts.last_mut() {
                Some(run) if continues => run.push_str(raw),
                _ => open.texts.push(raw.to_string()),
            }
            open.in_text_run = true;
            Ok(())
        }
        None if raw.trim().is_empty() => Ok(()),
        None => Err(CodecError::Parse(format!(
            "text \"{}\" outside the root element",
            raw.trim()
        ))),
    }
}

fn attach(
    stack: &mut [OpenElement],
    root: &mut Option<(String, TreeValue)>,
    name: String,
    value: TreeValue,
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.value.append_child(name, value);
            parent.in_text_run = false;
            Ok(())
        }
        None if root.is_some() => Err(CodecError::MultipleRoots(name)),
        None => {
            *root = Some((name, value));
            Ok(())
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, CodecError> {
    std::str::from_utf8(bytes).map_err(|err| CodecError::Parse(err.to_string()))
}

// ── Encoding helpers ──────────────────────────────────────────────────────────

fn write_document(mut writer: Writer<Vec<u8>>, document: &TreeValue) -> Result<String, CodecError> {
    let (name, root) = document.root().ok_or(CodecError::NotADocument)?;
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, name, root)?;
    String::from_utf8(writer.into_inner()).map_err(|err| CodecError::Write(err.to_string()))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &TreeValue,
) -> Result<(), CodecError> {
    if value.has_mixed_content() {
        return Err(CodecError::MixedValue(name.to_string()));
    }

    let mut start = BytesStart::new(name);
    for (key, attr_value) in value.attributes() {
        start.push_attribute((key, attr_value));
    }

    let has_children = value.children().next().is_some();
    if value.text().is_none() && !has_children {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = value.text() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for (child_name, node) in value.children() {
        write_node(writer, child_name, node)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, name: &str, node: &Node) -> Result<(), CodecError> {
    for element in node.as_slice() {
        write_element(writer, name, element)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
