//! # Circuitgen Core
//!
//! Turns a free-text circuit request into a KiCad netlist.
//!
//! This library provides:
//! - A closed set of supported topologies and a validated spec record
//! - Component value derivation for the topologies that need it
//! - JSON circuit templates with `{placeholder}` substitution
//! - KiCad netlist emission from filled templates
//! - A language-model bridge and an HTTP front door (optional)
//!
//! ## Architecture
//!
//! - [`spec`] - circuit types, spec fields and the [`CircuitSpec`] record
//! - [`derive`] - per-topology value formulas
//! - [`template`] - template stores and the filler
//! - [`netlist`] - part library, net resolution and KiCad output
//! - [`llm`] - prompt construction, Gemini client, response decoding
//! - [`pipeline`] - the three stages wired together
//! - [`server`] - `POST /generate` and `GET /download/<file>` (feature `server`)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! circuitgen fill divider.json --emit
//! GEMINI_API_KEY=... circuitgen generate "divide 12V down to 5V"
//! GEMINI_API_KEY=... circuitgen serve --addr 0.0.0.0:8080
//! ```
//!
//! ### Library
//!
//! ```
//! use std::sync::Arc;
//! use circuitgen_core::{builtin_store, CircuitSpec, CircuitType, SpecField, TemplateFiller};
//!
//! let filler = TemplateFiller::new(Arc::new(builtin_store().unwrap()));
//! let spec = CircuitSpec::new(CircuitType::VoltageDivider)
//!     .with_field(SpecField::Vin, "12V")
//!     .with_field(SpecField::Vout, "5V");
//! let filled = filler.fill_spec(&spec).unwrap();
//! assert_eq!(filled["components"][1]["type"], "7.14k");
//! ```

pub mod config;
pub mod derive;
pub mod error;
pub mod llm;
pub mod netlist;
pub mod pipeline;
pub mod spec;
pub mod template;

#[cfg(feature = "server")]
pub mod server;

// Re-export main types for convenience
pub use config::Config;
pub use error::{CircuitGenError, Result, Stage};
pub use netlist::NetlistEmitter;
pub use pipeline::{Generation, Pipeline};
pub use spec::{CircuitSpec, CircuitType, SpecField};
pub use template::{builtin_store, TemplateFiller};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitGen;
