//! Error types for the circuit generator.
//!
//! This module provides a unified error type [`CircuitGenError`] that covers
//! every failure between a text prompt and a written netlist: spec
//! validation, template lookup, value derivation, the language-model bridge
//! and netlist emission.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`CircuitGenError`].
pub type Result<T> = std::result::Result<T, CircuitGenError>;

/// Pipeline phase an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Prompt → spec (language-model bridge)
    Parsing,
    /// Spec → filled template
    Filling,
    /// Filled template → netlist file
    Emission,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parsing => write!(f, "Parsing"),
            Stage::Filling => write!(f, "Template matching"),
            Stage::Emission => write!(f, "KiCad generation"),
        }
    }
}

/// Unified error type for all circuit generator operations.
#[derive(Error, Debug)]
pub enum CircuitGenError {
    // ============ Spec Errors ============
    /// Unsupported circuit type or malformed specification
    #[error("Invalid specification field '{field}': {message}")]
    Validation { field: String, message: String },

    // ============ Template Errors ============
    /// No template stored for a valid circuit type
    #[error("Template not found for '{circuit_type}' ({location})")]
    TemplateNotFound {
        circuit_type: String,
        location: String,
    },

    /// Stored template is not valid JSON
    #[error("Failed to parse template '{location}': {message}")]
    TemplateParse { location: String, message: String },

    // ============ Derivation Errors ============
    /// Missing, non-numeric or out-of-domain input to a value formula
    #[error("Cannot derive values for {circuit_type}: field '{field}' {message}")]
    Derivation {
        circuit_type: String,
        field: String,
        message: String,
    },

    // ============ Upstream Errors ============
    /// Language-model call failed or returned undecodable content
    #[error("Language model error: {message}")]
    Upstream { message: String },

    /// Language-model endpoint answered with a non-200 status
    #[error("Language model API error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    // ============ Netlist Errors ============
    /// Filled template does not have the component/connection shape
    #[error("Invalid filled template: {message}")]
    InvalidTemplate { message: String },

    /// Connection endpoint is not of the form `Ref.Pin`
    #[error("Invalid connection endpoint '{token}' (expected 'Ref.Pin')")]
    InvalidConnection { token: String },

    /// Connection names a component that is not in the template
    #[error("Component reference '{reference}' in '{token}' not found")]
    UnresolvedReference { reference: String, token: String },

    /// Connection names a pin the component does not have
    #[error("Pin '{pin}' not found on component '{reference}'")]
    UnresolvedPin { reference: String, pin: String },

    /// Two components share a designator
    #[error("Duplicate component reference '{reference}'")]
    DuplicateReference { reference: String },

    // ============ I/O Errors ============
    /// Error reading a file
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP server failure
    #[error("Server error: {message}")]
    Server { message: String },

    // ============ Context ============
    /// An error annotated with the pipeline phase that raised it
    #[error("{stage} error: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<CircuitGenError>,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl CircuitGenError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a derivation error
    pub fn derivation(
        circuit_type: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Derivation {
            circuit_type: circuit_type.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template(message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            message: message.into(),
        }
    }

    /// Attach the pipeline stage. An error that already carries a stage
    /// keeps its original one.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Self::Stage { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was raised in, if one was attached.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The error without its stage annotation.
    pub fn root(&self) -> &CircuitGenError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}
