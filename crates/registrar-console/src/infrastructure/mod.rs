//! Infrastructure layer for registrar-console.
//!
//! Everything that touches the outside world lives here:
//!
//! - [`http_transport`]: POSTs EPP markup to the registrar front end
//! - [`config_file`]: reads the optional TOML config file
//! - [`repl`]: the line-based terminal front end

pub mod config_file;
pub mod http_transport;
pub mod repl;

pub use config_file::{ConfigError, ConfigFile};
pub use http_transport::HttpTransport;
pub use repl::run_repl;
