//! # registrar-core
//!
//! Wire-level building blocks for the registrar console: the markup codec,
//! the generic tree value it produces, field paths into those trees, and the
//! EPP command/response envelope.
//!
//! Nothing in this crate knows about sessions, pages or forms, and it does
//! no I/O.
//!
//! # Architecture overview (for beginners)
//!
//! A registrar talks to the registry with EPP: each request and response is
//! a small XML document.  Instead of one Rust struct per EPP message, the
//! console works on a generic tree:
//!
//! - **`tree`** – [`TreeValue`] holds one element's text, attributes and
//!   children.  [`decode`] turns markup into a tree with exact, documented
//!   rules and [`encode`] turns it back.  [`FieldPath`] names one spot in a
//!   tree (`domain:contact[1].@type`) so form fields can read and write it.
//!
//! - **`protocol`** – Builds the `<epp><command>` envelope around a payload
//!   tree ([`Command`]), reads `<epp><response>` back ([`EppResponse`]), and
//!   numbers commands with client transaction ids.

// Rust looks for each module in a subdirectory with the same name
// (e.g., src/tree/mod.rs).
pub mod protocol;
pub mod tree;

pub use protocol::{
    Command, EppResponse, ObjectNamespace, ResponseError, ResultCode, TransactionIdGenerator, Verb,
};
pub use tree::{decode, encode, encode_pretty, CodecError, FieldPath, Node, PathError, TreeValue};
