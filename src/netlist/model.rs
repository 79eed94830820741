//! Typed view of a filled template.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{CircuitGenError, Result};

/// A component entry of a filled template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateComponent {
    /// Designator, e.g. `R1`
    #[serde(rename = "ref")]
    pub reference: String,
    /// Part type or value text, e.g. `NE555` or `7.14k`
    #[serde(rename = "type")]
    pub part_type: String,
    /// `library:name`; the part library's footprint is used when absent
    #[serde(default)]
    pub footprint: Option<String>,
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Pin names the template uses on this component
    #[serde(default, rename = "connections")]
    pub pins: Vec<String>,
}

impl TemplateComponent {
    /// Parameters rendered as text, in template order.
    pub fn param_fields(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }
}

/// One `from` → `to` edge on a named net.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateConnection {
    /// `Ref.Pin`
    pub from: String,
    pub net: String,
    /// `Ref.Pin`
    pub to: String,
}

/// A filled template with the component/connection shape checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilledCircuit {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub components: Vec<TemplateComponent>,
    pub connections: Vec<TemplateConnection>,
}

impl FilledCircuit {
    /// Decode a filled template tree.
    pub fn from_value(value: &Value) -> Result<Self> {
        let circuit = Self::deserialize(value)
            .map_err(|e| CircuitGenError::invalid_template(e.to_string()))?;

        for component in &circuit.components {
            if component.reference.trim().is_empty() {
                return Err(CircuitGenError::invalid_template("component with empty 'ref'"));
            }
            if let Some(footprint) = &component.footprint {
                if !is_qualified(footprint) {
                    return Err(CircuitGenError::invalid_template(format!(
                        "footprint '{}' of {} is not of the form 'library:name'",
                        footprint, component.reference
                    )));
                }
            }
        }
        Ok(circuit)
    }

    /// The component with designator `reference`.
    pub fn component(&self, reference: &str) -> Option<&TemplateComponent> {
        self.components.iter().find(|c| c.reference == reference)
    }
}

fn is_qualified(footprint: &str) -> bool {
    matches!(footprint.split_once(':'), Some((lib, name)) if !lib.is_empty() && !name.is_empty())
}
