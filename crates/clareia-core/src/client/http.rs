//! HTTP transport using reqwest.

use std::time::Duration;

use tracing::trace;

use super::{GenerateRequest, HttpReply, Result, Transport};
use crate::error::ExtractionError;

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &GenerateRequest,
        timeout: Duration,
    ) -> Result<HttpReply> {
        let mut request = self.client.post(url).timeout(timeout).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        trace!("HTTP {} with {} byte body", status, body.len());

        Ok(HttpReply { status, body })
    }
}

fn transport_error(e: reqwest::Error) -> ExtractionError {
    let kind = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_builder() {
        "invalid request"
    } else {
        "request failed"
    };

    // Endpoint URL stays out of error messages.
    ExtractionError::Transport(format!("{}: {}", kind, e.without_url()))
}
