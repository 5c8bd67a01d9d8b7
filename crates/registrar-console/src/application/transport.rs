//! The transport port: how EPP markup reaches the registrar front end.
//!
//! The application layer only knows this trait.  Production code plugs in
//! the reqwest-based transport from the infrastructure layer; tests plug in
//! a mock or a scripted in-memory transport.

use async_trait::async_trait;
use thiserror::Error;

/// One outbound HTTP POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Path and query relative to the server, e.g.
    /// `/registrar-xhr?clientId=jartine`.
    pub uri: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    /// Returns the first header called `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The HTTP answer to a [`TransportRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Network-level failures.  Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("could not reach {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Sends one request and waits for its response.
///
/// No timeout is applied at this layer: a call that never completes leaves
/// its caller waiting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
