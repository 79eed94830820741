//! Comparators and the transistor multivibrator.
//!
//! The comparator threshold divider is not solved from the thresholds yet:
//! both resistors are 10 kΩ whatever the inputs are. The required fields
//! are still enforced.

use super::{require, Derivation};
use crate::error::Result;
use crate::spec::{CircuitSpec, SpecField};
use crate::template::ValueMap;

pub static COMPARATOR: Derivation = Derivation {
    required: &[
        SpecField::ThresholdHigh,
        SpecField::ThresholdLow,
        SpecField::SupplyVoltage,
    ],
    outputs: &["R1_value", "R2_value"],
    compute: threshold_divider,
};

pub static COMPARATOR_NONINVERTING: Derivation = Derivation {
    required: &[
        SpecField::ReferenceVoltage,
        SpecField::InputSignal,
        SpecField::SupplyVoltage,
    ],
    outputs: &["R1_value", "R2_value"],
    compute: threshold_divider,
};

pub static ASTABLE_MULTIVIBRATOR: Derivation = Derivation {
    required: &[SpecField::ResistorValue],
    outputs: &["resistor_value"],
    compute: multivibrator,
};

// TODO: solve R1/R2 from the requested thresholds and supply_voltage
// (Vth = Vs·R2/(R1+R2)) instead of returning fixed values.
fn threshold_divider(_spec: &CircuitSpec) -> Result<ValueMap> {
    let mut values = ValueMap::new();
    values.insert("R1_value", "10");
    values.insert("R2_value", "10");
    Ok(values)
}

fn multivibrator(spec: &CircuitSpec) -> Result<ValueMap> {
    let resistor = require(spec, SpecField::ResistorValue)?;
    let mut values = ValueMap::new();
    values.insert("resistor_value", resistor);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::CircuitType;

    #[test]
    fn test_known_stub_comparator_ignores_thresholds() {
        for (high, low) in [("3V", "1V"), ("4.5", "0.5"), ("not a number", "x")] {
            let spec = CircuitSpec::new(CircuitType::Comparator)
                .with_field(SpecField::ThresholdHigh, high)
                .with_field(SpecField::ThresholdLow, low)
                .with_field(SpecField::SupplyVoltage, "5V");
            let values = COMPARATOR.run(&spec).unwrap();
            assert_eq!(values.get("R1_value"), Some("10"));
            assert_eq!(values.get("R2_value"), Some("10"));
        }
    }

    #[test]
    fn test_known_stub_noninverting_comparator() {
        let spec = CircuitSpec::new(CircuitType::ComparatorNoninverting)
            .with_field(SpecField::ReferenceVoltage, "2.5V")
            .with_field(SpecField::InputSignal, "sensor")
            .with_field(SpecField::SupplyVoltage, "5V");
        let values = COMPARATOR_NONINVERTING.run(&spec).unwrap();
        assert_eq!(values.get("R1_value"), Some("10"));
        assert_eq!(values.get("R2_value"), Some("10"));
    }

    #[test]
    fn test_comparator_still_requires_supply() {
        let spec = CircuitSpec::new(CircuitType::Comparator)
            .with_field(SpecField::ThresholdHigh, "3V")
            .with_field(SpecField::ThresholdLow, "1V");
        let err = COMPARATOR.run(&spec).unwrap_err();
        assert!(err.to_string().contains("supply_voltage"));
    }

    #[test]
    fn test_multivibrator_passthrough() {
        let spec = CircuitSpec::new(CircuitType::AstableMultivibrator)
            .with_field(SpecField::ResistorValue, "47k");
        let values = ASTABLE_MULTIVIBRATOR.run(&spec).unwrap();
        assert_eq!(values.get("resistor_value"), Some("47k"));
        assert_eq!(values.len(), 1);
    }
}
