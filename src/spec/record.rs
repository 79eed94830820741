//! The validated circuit specification record.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::types::{CircuitType, SpecField};
use crate::error::{CircuitGenError, Result};

/// A structured description of the circuit a user asked for.
///
/// Created once per request and read-only afterwards: there are no setters,
/// only the consuming [`CircuitSpec::with_field`] builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitSpec {
    circuit_type: CircuitType,
    fields: BTreeMap<SpecField, String>,
}

impl CircuitSpec {
    /// Create a spec with no optional fields set.
    pub fn new(circuit_type: CircuitType) -> Self {
        Self {
            circuit_type,
            fields: BTreeMap::new(),
        }
    }

    /// Set an optional field.
    pub fn with_field(mut self, field: SpecField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Build a spec from `(name, value)` pairs, `circuit_type` included.
    ///
    /// Fails on an unsupported circuit type, a missing `circuit_type`, or a
    /// field name outside the specification.
    pub fn from_fields<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut circuit_type = None;
        let mut fields = BTreeMap::new();

        for (name, value) in pairs {
            if name == "circuit_type" {
                let value = value.ok_or_else(|| {
                    CircuitGenError::validation("circuit_type", "circuit_type is required")
                })?;
                circuit_type = Some(CircuitType::from_name(value)?);
                continue;
            }

            let field = SpecField::from_name(name)
                .ok_or_else(|| CircuitGenError::validation(name, "unknown specification field"))?;
            if let Some(value) = value {
                fields.insert(field, value.to_string());
            }
        }

        let circuit_type = circuit_type.ok_or_else(|| {
            CircuitGenError::validation("circuit_type", "circuit_type is required")
        })?;

        Ok(Self {
            circuit_type,
            fields,
        })
    }

    /// Decode and validate a JSON object.
    ///
    /// Unknown keys are ignored; `null` and absence are equivalent. Numeric
    /// values are accepted and kept as their text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CircuitGenError::validation("<json>", e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate an already-decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            CircuitGenError::validation("<json>", "specification must be a JSON object")
        })?;

        let circuit_type = match object.get("circuit_type") {
            Some(Value::String(name)) => CircuitType::from_name(name)?,
            Some(Value::Null) | None => {
                return Err(CircuitGenError::validation(
                    "circuit_type",
                    "circuit_type is required",
                ))
            }
            Some(other) => {
                return Err(CircuitGenError::validation(
                    "circuit_type",
                    format!("expected a string, got {}", other),
                ))
            }
        };

        let mut fields = BTreeMap::new();
        for field in SpecField::ALL {
            match object.get(field.name()) {
                None | Some(Value::Null) => {}
                Some(Value::String(text)) => {
                    fields.insert(field, text.clone());
                }
                Some(Value::Number(n)) => {
                    fields.insert(field, n.to_string());
                }
                Some(other) => {
                    return Err(CircuitGenError::validation(
                        field.name(),
                        format!("expected a string or null, got {}", other),
                    ))
                }
            }
        }

        Ok(Self {
            circuit_type,
            fields,
        })
    }

    /// The requested topology.
    pub fn circuit_type(&self) -> CircuitType {
        self.circuit_type
    }

    /// The value of an optional field, if present.
    pub fn get(&self, field: SpecField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Iterate over the present optional fields in wire order.
    pub fn present(&self) -> impl Iterator<Item = (SpecField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// JSON form with every field present (`null` when absent).
    pub fn to_value(&self) -> Value {
        // Serialization of this type cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for CircuitSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SpecField::ALL.len() + 1))?;
        map.serialize_entry("circuit_type", self.circuit_type.name())?;
        for field in SpecField::ALL {
            map.serialize_entry(field.name(), &self.get(field))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CircuitSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_minimal() {
        let spec = CircuitSpec::from_json(r#"{"circuit_type": "voltage_divider", "Vin": "12V", "Vout": null}"#)
            .unwrap();
        assert_eq!(spec.circuit_type(), CircuitType::VoltageDivider);
        assert_eq!(spec.get(SpecField::Vin), Some("12V"));
        assert_eq!(spec.get(SpecField::Vout), None);
    }

    #[test]
    fn test_from_json_rejects_unsupported_type() {
        let err = CircuitSpec::from_json(r#"{"circuit_type": "foo_bar"}"#).unwrap_err();
        assert!(matches!(err, CircuitGenError::Validation { ref field, .. } if field == "circuit_type"));
    }

    #[test]
    fn test_from_json_requires_circuit_type() {
        assert!(CircuitSpec::from_json(r#"{"Vin": "5V"}"#).is_err());
        assert!(CircuitSpec::from_json(r#"{"circuit_type": null}"#).is_err());
        assert!(CircuitSpec::from_json(r#"{"circuit_type": 3}"#).is_err());
    }

    #[test]
    fn test_from_json_ignores_unknown_keys_and_accepts_numbers() {
        let spec = CircuitSpec::from_json(
            r#"{"circuit_type": "555_timer_astable", "frequency": 1000, "colour": "blue"}"#,
        )
        .unwrap();
        assert_eq!(spec.get(SpecField::Frequency), Some("1000"));
    }

    #[test]
    fn test_from_json_rejects_non_string_field() {
        let err = CircuitSpec::from_json(r#"{"circuit_type": "comparator", "gain": [1]}"#)
            .unwrap_err();
        assert!(matches!(err, CircuitGenError::Validation { ref field, .. } if field == "gain"));
    }

    #[test]
    fn test_from_fields_names_unknown_field() {
        let err = CircuitSpec::from_fields([
            ("circuit_type", Some("ldo_regulator")),
            ("vout_typo", Some("3.3V")),
        ])
        .unwrap_err();
        assert!(matches!(err, CircuitGenError::Validation { ref field, .. } if field == "vout_typo"));
    }

    #[test]
    fn test_serialize_includes_every_field() {
        let spec = CircuitSpec::new(CircuitType::LowPassFilter)
            .with_field(SpecField::CutoffFrequency, "1");
        let value = spec.to_value();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), SpecField::ALL.len() + 1);
        assert_eq!(object["circuit_type"], "low_pass_filter");
        assert_eq!(object["cutoff_frequency"], "1");
        assert!(object["Vin"].is_null());

        let back: CircuitSpec = serde_json::from_value(value).unwrap();
        assert_eq!(back, spec);
    }
}
