//! Gemini `generateContent` client.

use log::{debug, info};

use super::prompt::request_text;
use super::response::{candidate_text, decode_spec, GenerateRequest};
use super::SpecParser;
use crate::config::LlmConfig;
use crate::error::{CircuitGenError, Result};
use crate::spec::CircuitSpec;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a JSON body to an endpoint.
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with the API key as the `key` query parameter.
    /// Any status is returned as a response; only connection-level
    /// failures are errors.
    fn post(&self, url: &str, api_key: &str, body: &str) -> Result<TransportResponse>;
}

/// Blocking transport over `ureq`.
#[cfg(feature = "llm")]
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

#[cfg(feature = "llm")]
impl Transport for UreqTransport {
    fn post(&self, url: &str, api_key: &str, body: &str) -> Result<TransportResponse> {
        let result = ureq::post(url)
            .query("key", api_key)
            .set("Content-Type", "application/json")
            .send_string(body);

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(CircuitGenError::upstream(format!("request failed: {}", e))),
        };
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| CircuitGenError::upstream(format!("failed to read response: {}", e)))?;
        Ok(TransportResponse { status, body })
    }
}

/// Turns prompts into specs through the Gemini API.
pub struct GeminiClient {
    config: LlmConfig,
    transport: Box<dyn Transport>,
}

impl GeminiClient {
    /// Create a client over an explicit transport.
    pub fn with_transport(config: LlmConfig, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Create a client using the `ureq` transport.
    #[cfg(feature = "llm")]
    pub fn new(config: LlmConfig) -> Self {
        Self::with_transport(config, Box::new(UreqTransport))
    }

    /// The model's raw answer text for `prompt`.
    pub fn generate_text(&self, prompt: &str) -> Result<String> {
        let api_key = self.config.require_api_key()?;
        let request = GenerateRequest::user(request_text(prompt));
        let body = serde_json::to_string(&request)
            .map_err(|e| CircuitGenError::upstream(format!("failed to encode request: {}", e)))?;

        debug!("POST {} ({} bytes)", self.config.endpoint, body.len());
        let response = self.transport.post(&self.config.endpoint, api_key, &body)?;
        info!("language model answered with status {}", response.status);

        if response.status != 200 {
            return Err(CircuitGenError::UpstreamStatus {
                status: response.status,
                body: response.body,
            });
        }
        candidate_text(&response.body)
    }
}

impl SpecParser for GeminiClient {
    fn parse_prompt(&self, prompt: &str) -> Result<CircuitSpec> {
        let text = self.generate_text(prompt)?;
        debug!("model output: {}", text.trim());
        decode_spec(&text)
    }
}
