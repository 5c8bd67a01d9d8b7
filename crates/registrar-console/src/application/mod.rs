//! Application layer for registrar-console.
//!
//! The application layer knows *what* the console does: log in once, load
//! an object, let the user edit it, send the changes.  It talks to the
//! registrar only through the [`Transport`] trait, so everything here runs
//! in tests against mocks and scripted transports.
//!
//! # Responsibilities
//!
//! - Projecting decoded trees into form fields and back ([`FormBinder`])
//! - Tracking EPP authentication and coalescing logins ([`SessionManager`])
//! - Sending commands and reading responses ([`EppClient`])
//! - The per-page state machine ([`ConsoleController`])
//!
//! # What does NOT belong here?
//!
//! - HTTP, files and the terminal (that is the infrastructure layer)
//! - Markup rules (those live in `registrar-core`)

pub mod console_controller;
pub mod epp_client;
pub mod form_binder;
pub mod session_manager;
pub mod transport;

pub use console_controller::ConsoleController;
pub use epp_client::EppClient;
pub use form_binder::FormBinder;
pub use session_manager::{AuthState, SessionManager};
pub use transport::{Transport, TransportError, TransportRequest, TransportResponse};
