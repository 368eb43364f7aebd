//! Extraction service client.
//!
//! Sends the rendered prompt to a `generateContent`-style endpoint and
//! returns the model's reply text. HTTP is behind the [`Transport`] trait so
//! the request/response handling can run against a scripted transport.

mod http;

pub use http::ReqwestTransport;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::{GenerationConfig, ResolvedService};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Request body for the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationParams,
}

/// One content block of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

/// A text part of a content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPart {
    pub text: String,
}

/// Generation parameters as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl From<&GenerationConfig> for GenerationParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

impl GenerateRequest {
    /// Build a single-part request for `prompt`.
    pub fn new(prompt: &str, generation: &GenerationConfig) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: generation.into(),
        }
    }

    /// The prompt text carried by the request.
    pub fn prompt(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// Raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transports.
///
/// Implementations report connection failures and timeouts as
/// [`ExtractionError::Transport`] and return every HTTP response, whatever
/// its status, as an [`HttpReply`].
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url` with extra `headers`.
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &GenerateRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<HttpReply>> + Send;
}

/// Client for the generative extraction service.
pub struct ExtractionClient<T = ReqwestTransport> {
    transport: T,
    service: ResolvedService,
    generation: GenerationConfig,
}

impl ExtractionClient<ReqwestTransport> {
    /// Create a client using the default HTTP transport.
    pub fn new(service: ResolvedService, generation: GenerationConfig) -> Self {
        Self::with_transport(ReqwestTransport::new(), service, generation)
    }
}

impl<T: Transport> ExtractionClient<T> {
    /// Create a client on top of a custom transport.
    pub fn with_transport(transport: T, service: ResolvedService, generation: GenerationConfig) -> Self {
        Self {
            transport,
            service,
            generation,
        }
    }

    /// The transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `prompt` and return the model's reply text.
    ///
    /// Transport failures are retried at most `transport_retries` times;
    /// HTTP error statuses and malformed envelopes are returned immediately.
    pub async fn call(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest::new(prompt, &self.generation);
        let headers = [(self.service.api_key_header.as_str(), self.service.api_key())];
        let attempts = 1 + self.service.transport_retries.min(1);

        let mut attempt = 1;
        let reply = loop {
            info!("Calling extraction service (attempt {}/{})", attempt, attempts);

            match self
                .transport
                .post_json(&self.service.endpoint, &headers, &request, self.service.timeout)
                .await
            {
                Ok(reply) => break reply,
                Err(e) if e.is_transport() && attempt < attempts => {
                    warn!("Extraction service unreachable, retrying: {}", e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        debug!("Extraction service answered HTTP {} ({} bytes)", reply.status, reply.body.len());
        read_reply(reply)
    }
}

/// Classify an HTTP reply and pull the reply text out of its envelope.
pub fn read_reply(reply: HttpReply) -> Result<String> {
    if !reply.is_success() {
        warn!("Extraction service returned HTTP {}", reply.status);
        return Err(ExtractionError::Service {
            status: reply.status,
            body: reply.body,
        });
    }

    read_candidate_text(&reply.body)
}

/// Read `candidates[0].content.parts[0].text` from a response envelope.
pub fn read_candidate_text(body: &str) -> Result<String> {
    let envelope: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedEnvelope(format!("response is not JSON: {}", e)))?;

    let candidate = envelope
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| ExtractionError::MalformedEnvelope("no candidates in response".to_string()))?;

    let part = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .ok_or_else(|| ExtractionError::MalformedEnvelope("first candidate has no content parts".to_string()))?;

    part.get("text")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| ExtractionError::MalformedEnvelope("first content part has no text".to_string()))
}
