//! Template resolution and filling.
//!
//! A template is a JSON tree whose strings may contain `{field_name}`
//! placeholders. Filling looks the template up by circuit type, builds a
//! [`ValueMap`] from the spec (passthrough fields plus derived values) and
//! substitutes it throughout the tree, producing a new tree.
//!
//! Filled templates conventionally look like:
//!
//! ```json
//! {
//!   "components": [
//!     {"ref": "R1", "type": "10k", "footprint": "Resistor_SMD:R_0603_1608Metric",
//!      "params": {"value": "10kΩ"}, "connections": ["1", "2"]}
//!   ],
//!   "connections": [
//!     {"from": "R1.2", "net": "VOUT", "to": "R2.1"}
//!   ]
//! }
//! ```
//!
//! The filler does not enforce that shape; [`crate::netlist`] does.

mod fill;
mod store;
mod values;

pub use fill::{substitute, substitute_str, unresolved_placeholders};
pub use store::{builtin_store, DirTemplateStore, MemoryTemplateStore, TemplateStore};
pub use values::{build_values, ValueMap};

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::error::{CircuitGenError, Result};
use crate::spec::{CircuitSpec, CircuitType};

/// A template after placeholder substitution.
pub type FilledTemplate = Value;

/// Fill an already-loaded template from a spec.
pub fn fill_template(template: &Value, spec: &CircuitSpec) -> Result<FilledTemplate> {
    let values = build_values(spec)?;
    Ok(substitute(template, &values))
}

/// Looks up templates and fills them.
#[derive(Clone)]
pub struct TemplateFiller {
    store: Arc<dyn TemplateStore>,
}

impl TemplateFiller {
    /// Create a filler over a template store.
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Fill the template for `circuit_type` from `spec`.
    ///
    /// `circuit_type` must be the spec's own type.
    pub fn fill(&self, circuit_type: CircuitType, spec: &CircuitSpec) -> Result<FilledTemplate> {
        if circuit_type != spec.circuit_type() {
            return Err(CircuitGenError::validation(
                "circuit_type",
                format!(
                    "requested template '{}' does not match specification type '{}'",
                    circuit_type,
                    spec.circuit_type()
                ),
            ));
        }

        let template = self.store.load(circuit_type)?;
        let filled = fill_template(&template, spec)?;

        let unresolved = unresolved_placeholders(&filled);
        if unresolved.is_empty() {
            debug!("filled template {}", circuit_type);
        } else {
            warn!(
                "template {} left {} placeholder(s) unresolved: {}",
                circuit_type,
                unresolved.len(),
                unresolved.join(", ")
            );
        }
        Ok(filled)
    }

    /// Fill the template matching the spec's circuit type.
    pub fn fill_spec(&self, spec: &CircuitSpec) -> Result<FilledTemplate> {
        self.fill(spec.circuit_type(), spec)
    }
}
