//! Request routing, independent of any socket.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{json, Value};

use crate::pipeline::Pipeline;

/// Route prefix for netlist downloads.
pub const DOWNLOAD_PREFIX: &str = "/download/";

/// An HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    /// A JSON reply.
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body: value.to_string().into_bytes(),
        }
    }

    /// `{"error": message}` with `status`.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &json!({ "error": message.into() }))
    }

    /// A file download.
    pub fn attachment(filename: &str, bytes: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            headers: vec![(
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{}\"", filename),
            )],
            body: bytes,
        }
    }

    /// The body decoded as JSON, if it is JSON.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// The generation service behind the HTTP front door.
#[derive(Clone)]
pub struct Service {
    pipeline: Arc<Pipeline>,
}

impl Service {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    /// Route one request.
    pub fn handle(&self, method: &str, url: &str, body: &[u8]) -> Reply {
        let path = url.split_once('?').map_or(url, |(path, _)| path);
        match (method, path) {
            ("POST", "/generate") => self.generate(body),
            ("GET", p) if p.starts_with(DOWNLOAD_PREFIX) => self.download(&p[DOWNLOAD_PREFIX.len()..]),
            _ => Reply::error(404, "Not found"),
        }
    }

    fn generate(&self, body: &[u8]) -> Reply {
        let prompt = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| v.get("prompt").and_then(Value::as_str).map(str::to_string))
            .filter(|p| !p.trim().is_empty());
        let Some(prompt) = prompt else {
            return Reply::error(400, "Missing or invalid 'prompt'.");
        };

        match self.pipeline.generate(&prompt) {
            Ok(generation) => {
                let file = generation.netlist_file_name().unwrap_or_default();
                Reply::json(
                    200,
                    &json!({
                        "spec": generation.spec.to_value(),
                        "filledTemplate": generation.filled,
                        "kicad_sch_url": format!("{}{}", DOWNLOAD_PREFIX, file),
                    }),
                )
            }
            Err(e) => {
                warn!("generation failed: {}", e);
                Reply::error(500, e.to_string())
            }
        }
    }

    fn download(&self, filename: &str) -> Reply {
        let not_found = || Reply::error(404, format!("File '{}' not found.", filename));
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
            return not_found();
        }

        let path = self.pipeline.output_dir().join(filename);
        if !path.is_file() {
            return not_found();
        }
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!("serving {} ({} bytes)", path.display(), bytes.len());
                Reply::attachment(filename, bytes)
            }
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                not_found()
            }
        }
    }
}
