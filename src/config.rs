//! Runtime configuration.
//!
//! Everything the pipeline needs from its environment is collected here and
//! passed to constructors explicitly. Only [`Config::from_env`] reads
//! environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{CircuitGenError, Result};
use crate::template::{builtin_store, DirTemplateStore, TemplateStore};

/// Default Gemini `generateContent` endpoint.
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Default directory for emitted netlists.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default HTTP listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Default number of HTTP worker threads.
pub const DEFAULT_WORKERS: usize = 4;

/// Where templates are loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// The templates compiled into the crate
    #[default]
    Builtin,
    /// `<dir>/<circuit_type>.json`
    Dir(PathBuf),
}

impl TemplateSource {
    /// Open the store for this source.
    pub fn store(&self) -> Result<Arc<dyn TemplateStore>> {
        Ok(match self {
            TemplateSource::Builtin => Arc::new(builtin_store()?),
            TemplateSource::Dir(dir) => Arc::new(DirTemplateStore::new(dir.clone())),
        })
    }
}

/// Language-model settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
        }
    }
}

impl LlmConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The API key, or a configuration error if none is set.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CircuitGenError::Config {
                message: "GEMINI_API_KEY is not set".to_string(),
            }),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ServerConfig {
    /// Set the listen address.
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    /// Set the worker count (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub templates: TemplateSource,
    pub output_dir: PathBuf,
    pub llm: LlmConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates: TemplateSource::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            llm: LlmConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read templates from a directory instead of the built-in set.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates = TemplateSource::Dir(dir.into());
        self
    }

    /// Set the netlist output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the language-model settings.
    pub fn with_llm(mut self, llm: LlmConfig) -> Self {
        self.llm = llm;
        self
    }

    /// Replace the server settings.
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    /// Defaults overridden by process environment variables.
    ///
    /// | Variable | Setting |
    /// |----------|---------|
    /// | `KICAD_TEMPLATE_PATH` | template directory |
    /// | `KICAD_OUTPUT_PATH` | output directory |
    /// | `GEMINI_API_KEY` | API key |
    /// | `GEMINI_API_URL` | endpoint |
    /// | `CIRCUITGEN_ADDR` | listen address |
    /// | `CIRCUITGEN_WORKERS` | worker threads |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`Config::from_env`] over an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::new();

        if let Some(dir) = var("KICAD_TEMPLATE_PATH") {
            config = config.with_template_dir(dir);
        }
        if let Some(dir) = var("KICAD_OUTPUT_PATH") {
            config = config.with_output_dir(dir);
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            config.llm = config.llm.with_api_key(key);
        }
        if let Some(url) = var("GEMINI_API_URL") {
            config.llm = config.llm.with_endpoint(url);
        }
        if let Some(addr) = var("CIRCUITGEN_ADDR") {
            config.server = config.server.with_addr(addr);
        }
        if let Some(workers) = var("CIRCUITGEN_WORKERS") {
            let workers = workers.trim().parse::<usize>().map_err(|_| CircuitGenError::Config {
                message: format!("CIRCUITGEN_WORKERS must be a positive integer, got '{}'", workers),
            })?;
            config.server = config.server.with_workers(workers);
        }
        Ok(config)
    }
}
