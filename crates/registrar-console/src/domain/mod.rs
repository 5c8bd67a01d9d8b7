//! Domain layer for registrar-console.
//!
//! Pure types with no I/O: configuration, locations, object kinds, form
//! values, page state and errors.  Everything here can be exercised in
//! plain unit tests without a runtime or a network.

pub mod config;
pub mod error;
pub mod form;
pub mod location;
pub mod objects;
pub mod page;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, Notice, Severity};
pub use form::{FieldSpec, FormError, FormSnapshot, FormValues, GroupValues};
pub use location::{Route, StaticPage, UnknownLocation};
pub use objects::ObjectKind;
pub use page::{ConsoleState, Page, PageMode, PageState};
