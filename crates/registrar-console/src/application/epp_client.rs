//! Sends EPP commands through the transport and reads the responses.
//!
//! Every request is a POST of the encoded command to
//! `/registrar-xhr?clientId=<clientId>` carrying the session's anti-forgery
//! token in `X-CSRF-Token`.  Result codes are not interpreted here; callers
//! decide what a code means for their command.

use std::sync::Arc;

use registrar_core::protocol::{Command, EppResponse, TransactionIdGenerator};
use tracing::{debug, warn};

use crate::application::transport::{Transport, TransportRequest};
use crate::domain::error::ConsoleError;

/// Path of the registrar XHR endpoint.
pub const XHR_PATH: &str = "/registrar-xhr";

/// Header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Content type of EPP request bodies.
pub const EPP_CONTENT_TYPE: &str = "application/epp+xml";

pub struct EppClient {
    transport: Arc<dyn Transport>,
    client_id: String,
    xsrf_token: String,
    ids: TransactionIdGenerator,
}

impl EppClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        client_id: impl Into<String>,
        xsrf_token: impl Into<String>,
        ids: TransactionIdGenerator,
    ) -> Self {
        Self {
            transport,
            client_id: client_id.into(),
            xsrf_token: xsrf_token.into(),
            ids,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Endpoint URI for this client, relative to the server.
    pub fn endpoint(&self) -> String {
        format!("{XHR_PATH}?clientId={}", self.client_id)
    }

    /// Next client transaction id for a command.
    pub fn next_cl_trid(&self) -> String {
        self.ids.next_id()
    }

    /// Sends `command` and decodes the answer.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::TransportFailure`] when the transport fails or the
    ///   HTTP status is not 2xx.
    /// - [`ConsoleError::MalformedMarkup`] when the body is not a readable
    ///   EPP response.
    pub async fn execute(&self, command: &Command) -> Result<EppResponse, ConsoleError> {
        let body = command.encode()?;
        let request = TransportRequest {
            uri: self.endpoint(),
            body,
            headers: vec![
                (CSRF_HEADER.to_string(), self.xsrf_token.clone()),
                ("Content-Type".to_string(), EPP_CONTENT_TYPE.to_string()),
            ],
        };
        debug!(verb = %command.verb(), cl_trid = command.cl_trid(), "sending EPP command");

        let reply = self
            .transport
            .send(request)
            .await
            .map_err(|e| ConsoleError::TransportFailure(e.to_string()))?;
        if !(200..300).contains(&reply.status) {
            return Err(ConsoleError::TransportFailure(format!(
                "HTTP status {}",
                reply.status
            )));
        }

        let response = EppResponse::parse(&reply.body)?;
        debug!(
            verb = %command.verb(),
            code = %response.code,
            sv_trid = response.sv_trid.as_deref().unwrap_or(""),
            "received EPP response"
        );
        if let Some(echoed) = response.cl_trid.as_deref() {
            if echoed != command.cl_trid() {
                warn!(
                    sent = command.cl_trid(),
                    echoed, "response carries a different client transaction id"
                );
            }
        }
        Ok(response)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
