//! registrar-console library crate.
//!
//! The state machine behind a registrar's EPP console: it logs in once per
//! session, loads domains, contacts and hosts, lets the user edit them as
//! forms, and sends the changes back as EPP `create`/`update` commands.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! terminal (stdin / stdout)
//!         ↕
//! [registrar-console]
//!   ├── domain/           Pure types: config, locations, forms, pages, errors
//!   ├── application/      Session, EPP client, form binding, page controller
//!   └── infrastructure/
//!         ├── http_transport/  POST to /registrar-xhr (reqwest)
//!         ├── config_file/     optional TOML config
//!         └── repl/            line-based front end
//!         ↕
//! registrar front end  (EPP markup over HTTP)
//! ```
//!
//! # Layer rules
//!
//! - `domain` does no I/O.
//! - `application` depends on `domain` and `registrar-core` only, and
//!   reaches the network through the `Transport` trait.
//! - `infrastructure` owns HTTP, files and the terminal.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: session, commands, forms and the page state machine.
pub mod application;

/// Infrastructure layer: HTTP transport, config file and terminal front end.
pub mod infrastructure;
