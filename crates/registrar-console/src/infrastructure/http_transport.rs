//! HTTP transport backed by `reqwest`.
//!
//! Each [`TransportRequest`] becomes one POST to `<server_url><uri>`.  The
//! status code and body are handed back untouched; deciding what a non-2xx
//! status means is the EPP client's job.

use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;

use crate::application::transport::{
    Transport, TransportError, TransportRequest, TransportResponse,
};

pub struct HttpTransport {
    client: Client,
    server_url: String,
}

impl HttpTransport {
    /// Creates a transport for the registrar front end at `server_url`.
    /// A trailing `/` is ignored.
    pub fn new(server_url: &str) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(client: Client, server_url: &str) -> Self {
        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a request `uri` such as `/registrar-xhr?clientId=x`.
    pub fn url_for(&self, uri: &str) -> String {
        format!("{}{uri}", self.server_url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(&request.uri);
        trace!(url, bytes = request.body.len(), "POST");

        let mut builder = self.client.post(&url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connection {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
