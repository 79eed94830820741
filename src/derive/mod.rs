//! Component value derivation.
//!
//! Each topology that needs computed component values has one
//! [`Derivation`]: the spec fields it requires and a pure function from the
//! spec to placeholder values. [`derivation`] is the exhaustive dispatch
//! table from [`CircuitType`] to its derivation.
//!
//! | Topology | Inputs | Outputs |
//! |----------|--------|---------|
//! | voltage_divider | Vin, Vout | R2_value (kΩ, R1 = 10 kΩ) |
//! | low_pass_filter | cutoff_frequency (kHz) | R1_value (Ω), C1_value = 10 nF |
//! | high_pass_filter | cutoff_frequency (kHz) | R1_value = 10 kΩ, C1_value (nF) |
//! | 555_timer_astable | frequency (Hz) | R1_value = R2_value (kΩ), C1_value = 0.01 µF |
//! | led_blinker_555 | frequency (Hz), led_current (mA) | as above + R3_value (Ω) |
//! | comparator | threshold_high, threshold_low, supply_voltage | R1_value, R2_value |
//! | comparator_noninverting | reference_voltage, input_signal, supply_voltage | R1_value, R2_value |
//! | astable_multivibrator | resistor_value | resistor_value |
//!
//! Derived values are plain decimal text with two decimals; the template
//! supplies the unit.

mod comparator;
mod passive;
mod quantity;
mod timer;

pub use quantity::{format_value, parse_quantity, Unit, HERTZ, KILOHERTZ, MILLIAMPS, VOLTS};

use std::fmt;

use log::debug;

use crate::error::{CircuitGenError, Result};
use crate::spec::{CircuitSpec, CircuitType, SpecField};
use crate::template::ValueMap;

/// A value derivation for one topology.
pub struct Derivation {
    /// Fields that must be present (and non-blank) before computing
    pub required: &'static [SpecField],
    /// Placeholder names the derivation produces
    pub outputs: &'static [&'static str],
    compute: fn(&CircuitSpec) -> Result<ValueMap>,
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derivation")
            .field("required", &self.required)
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl Derivation {
    /// Check the required fields, then compute the values.
    pub fn run(&self, spec: &CircuitSpec) -> Result<ValueMap> {
        for &field in self.required {
            require(spec, field)?;
        }
        let values = (self.compute)(spec)?;
        debug!("derived {} values for {}: {:?}", values.len(), spec.circuit_type(), values);
        Ok(values)
    }
}

/// The derivation for a topology, or `None` if its template is filled from
/// passthrough fields only.
pub fn derivation(circuit_type: CircuitType) -> Option<&'static Derivation> {
    match circuit_type {
        CircuitType::VoltageDivider => Some(&passive::VOLTAGE_DIVIDER),
        CircuitType::LowPassFilter => Some(&passive::LOW_PASS_FILTER),
        CircuitType::HighPassFilter => Some(&passive::HIGH_PASS_FILTER),
        CircuitType::Timer555Astable => Some(&timer::TIMER_555_ASTABLE),
        CircuitType::LedBlinker555 => Some(&timer::LED_BLINKER_555),
        CircuitType::Comparator => Some(&comparator::COMPARATOR),
        CircuitType::ComparatorNoninverting => Some(&comparator::COMPARATOR_NONINVERTING),
        CircuitType::AstableMultivibrator => Some(&comparator::ASTABLE_MULTIVIBRATOR),
        CircuitType::BuckConverter
        | CircuitType::LdoRegulator
        | CircuitType::InvertingAmplifier
        | CircuitType::NoninvertingAmplifier
        | CircuitType::BridgeRectifier
        | CircuitType::VoltageMultiplier
        | CircuitType::MicrocontrollerBoard => None,
    }
}

/// Derived values for a spec; empty when the topology has no derivation.
pub fn derive_values(spec: &CircuitSpec) -> Result<ValueMap> {
    match derivation(spec.circuit_type()) {
        Some(d) => d.run(spec),
        None => Ok(ValueMap::new()),
    }
}

/// A required field's text, rejecting absent or blank values.
fn require(spec: &CircuitSpec, field: SpecField) -> Result<&str> {
    match spec.get(field) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(CircuitGenError::derivation(
            spec.circuit_type().name(),
            field.name(),
            format!("is required for {}", spec.circuit_type()),
        )),
    }
}

/// A required field parsed as a quantity in `unit`.
fn quantity(spec: &CircuitSpec, field: SpecField, unit: Unit) -> Result<f64> {
    let text = require(spec, field)?;
    parse_quantity(text, unit).ok_or_else(|| {
        CircuitGenError::derivation(
            spec.circuit_type().name(),
            field.name(),
            format!("is not a number: '{}'", text),
        )
    })
}

/// A required quantity that must be strictly positive.
fn positive(spec: &CircuitSpec, field: SpecField, unit: Unit) -> Result<f64> {
    let value = quantity(spec, field, unit)?;
    if value <= 0.0 {
        return Err(CircuitGenError::derivation(
            spec.circuit_type().name(),
            field.name(),
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(value)
}

/// A computed value, rejected when the formula overflowed or underflowed
/// into an infinity or NaN. `field` is the input the value came from.
fn finite(spec: &CircuitSpec, field: SpecField, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(CircuitGenError::derivation(
            spec.circuit_type().name(),
            field.name(),
            format!("gives a non-finite value for {}", spec.circuit_type()),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topology_has_an_entry() {
        let derived: Vec<_> = CircuitType::ALL
            .iter()
            .filter(|ct| derivation(**ct).is_some())
            .map(|ct| ct.name())
            .collect();
        assert_eq!(
            derived,
            vec![
                "voltage_divider",
                "low_pass_filter",
                "high_pass_filter",
                "555_timer_astable",
                "comparator",
                "comparator_noninverting",
                "led_blinker_555",
                "astable_multivibrator",
            ]
        );
    }

    #[test]
    fn test_passthrough_only_topologies_derive_nothing() {
        let spec = CircuitSpec::new(CircuitType::BuckConverter);
        assert!(derive_values(&spec).unwrap().is_empty());
    }

    #[test]
    fn test_required_fields_checked_before_compute() {
        for ct in CircuitType::ALL {
            if let Some(d) = derivation(ct) {
                let err = d.run(&CircuitSpec::new(ct)).unwrap_err();
                match err {
                    CircuitGenError::Derivation { field, message, .. } => {
                        assert_eq!(field, d.required[0].name());
                        assert!(message.contains("required"));
                    }
                    other => panic!("{ct}: unexpected error {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let spec = CircuitSpec::new(CircuitType::LowPassFilter)
            .with_field(SpecField::CutoffFrequency, "  ");
        let err = derive_values(&spec).unwrap_err();
        assert!(err.to_string().contains("is required"));
    }

    #[test]
    fn test_outputs_match_computed_keys() {
        let spec = CircuitSpec::new(CircuitType::LedBlinker555)
            .with_field(SpecField::Frequency, "2")
            .with_field(SpecField::LedCurrent, "20");
        let d = derivation(CircuitType::LedBlinker555).unwrap();
        let values = d.run(&spec).unwrap();
        let mut keys: Vec<_> = values.iter().map(|(k, _)| k.to_string()).collect();
        let mut outputs: Vec<_> = d.outputs.iter().map(|s| s.to_string()).collect();
        keys.sort();
        outputs.sort();
        assert_eq!(keys, outputs);
    }

    #[test]
    fn test_finite_rejects_overflow() {
        let spec = CircuitSpec::new(CircuitType::LowPassFilter);
        assert_eq!(finite(&spec, SpecField::CutoffFrequency, 1.5).unwrap(), 1.5);
        for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = finite(&spec, SpecField::CutoffFrequency, value).unwrap_err();
            match err {
                CircuitGenError::Derivation { field, message, .. } => {
                    assert_eq!(field, "cutoff_frequency");
                    assert!(message.contains("non-finite"));
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }
}
