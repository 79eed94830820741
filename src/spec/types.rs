//! Circuit topologies and specification fields.

use std::fmt;

use crate::error::{CircuitGenError, Result};

/// A supported circuit topology.
///
/// The set is closed: a name outside it never becomes a [`CircuitType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CircuitType {
    /// Switching step-down regulator
    BuckConverter,
    /// Linear low-dropout regulator
    LdoRegulator,
    /// Op-amp inverting gain stage
    InvertingAmplifier,
    /// Op-amp non-inverting gain stage
    NoninvertingAmplifier,
    /// Two-resistor divider
    VoltageDivider,
    /// First-order RC low-pass
    LowPassFilter,
    /// First-order RC high-pass
    HighPassFilter,
    /// NE555 in astable mode
    Timer555Astable,
    /// Four-diode full-wave rectifier
    BridgeRectifier,
    /// Diode/capacitor charge-pump multiplier
    VoltageMultiplier,
    /// Op-amp comparator with a threshold divider
    Comparator,
    /// Comparator with the reference on the non-inverting input
    ComparatorNoninverting,
    /// NE555 astable driving an LED
    LedBlinker555,
    /// MCU with crystal, decoupling and a sensor
    MicrocontrollerBoard,
    /// Two-transistor astable multivibrator
    AstableMultivibrator,
}

impl CircuitType {
    /// Every supported topology, in the order they are presented to the model.
    pub const ALL: [CircuitType; 15] = [
        CircuitType::BuckConverter,
        CircuitType::LdoRegulator,
        CircuitType::InvertingAmplifier,
        CircuitType::NoninvertingAmplifier,
        CircuitType::VoltageDivider,
        CircuitType::LowPassFilter,
        CircuitType::HighPassFilter,
        CircuitType::Timer555Astable,
        CircuitType::BridgeRectifier,
        CircuitType::VoltageMultiplier,
        CircuitType::Comparator,
        CircuitType::ComparatorNoninverting,
        CircuitType::LedBlinker555,
        CircuitType::MicrocontrollerBoard,
        CircuitType::AstableMultivibrator,
    ];

    /// The wire name, also the template storage key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuckConverter => "buck_converter",
            Self::LdoRegulator => "ldo_regulator",
            Self::InvertingAmplifier => "inverting_amplifier",
            Self::NoninvertingAmplifier => "noninverting_amplifier",
            Self::VoltageDivider => "voltage_divider",
            Self::LowPassFilter => "low_pass_filter",
            Self::HighPassFilter => "high_pass_filter",
            Self::Timer555Astable => "555_timer_astable",
            Self::BridgeRectifier => "bridge_rectifier",
            Self::VoltageMultiplier => "voltage_multiplier",
            Self::Comparator => "comparator",
            Self::ComparatorNoninverting => "comparator_noninverting",
            Self::LedBlinker555 => "led_blinker_555",
            Self::MicrocontrollerBoard => "microcontroller_board",
            Self::AstableMultivibrator => "astable_multivibrator",
        }
    }

    /// Parse a topology from its wire name (exact match).
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|ct| ct.name() == name)
            .ok_or_else(|| {
                CircuitGenError::validation(
                    "circuit_type",
                    format!("Unsupported circuit_type: {}", name),
                )
            })
    }
}

impl fmt::Display for CircuitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An optional, string-valued field of a circuit specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecField {
    InputVoltage,
    OutputVoltage,
    OutputCurrent,
    Gain,
    Mcu,
    Sensor,
    ClockFreq,
    Vin,
    Vout,
    CutoffFrequency,
    Frequency,
    FilterCapacitance,
    ThresholdHigh,
    ThresholdLow,
    InputSignal,
    ResistorValue,
    LedCurrent,
    InputAc,
    ReferenceVoltage,
    SupplyVoltage,
}

impl SpecField {
    /// All fields in wire order.
    pub const ALL: [SpecField; 20] = [
        SpecField::InputVoltage,
        SpecField::OutputVoltage,
        SpecField::OutputCurrent,
        SpecField::Gain,
        SpecField::Mcu,
        SpecField::Sensor,
        SpecField::ClockFreq,
        SpecField::Vin,
        SpecField::Vout,
        SpecField::CutoffFrequency,
        SpecField::Frequency,
        SpecField::FilterCapacitance,
        SpecField::ThresholdHigh,
        SpecField::ThresholdLow,
        SpecField::InputSignal,
        SpecField::ResistorValue,
        SpecField::LedCurrent,
        SpecField::InputAc,
        SpecField::ReferenceVoltage,
        SpecField::SupplyVoltage,
    ];

    /// The JSON key, also the placeholder name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InputVoltage => "input_voltage",
            Self::OutputVoltage => "output_voltage",
            Self::OutputCurrent => "output_current",
            Self::Gain => "gain",
            Self::Mcu => "mcu",
            Self::Sensor => "sensor",
            Self::ClockFreq => "clock_freq",
            Self::Vin => "Vin",
            Self::Vout => "Vout",
            Self::CutoffFrequency => "cutoff_frequency",
            Self::Frequency => "frequency",
            Self::FilterCapacitance => "filter_capacitance",
            Self::ThresholdHigh => "threshold_high",
            Self::ThresholdLow => "threshold_low",
            Self::InputSignal => "input_signal",
            Self::ResistorValue => "resistor_value",
            Self::LedCurrent => "led_current",
            Self::InputAc => "input_ac",
            Self::ReferenceVoltage => "reference_voltage",
            Self::SupplyVoltage => "supply_voltage",
        }
    }

    /// Look up a field by its JSON key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_type_names_round_trip() {
        for ct in CircuitType::ALL {
            assert_eq!(CircuitType::from_name(ct.name()).unwrap(), ct);
        }
    }

    #[test]
    fn test_unsupported_circuit_type() {
        let err = CircuitType::from_name("foo_bar").unwrap_err();
        match err {
            CircuitGenError::Validation { field, message } => {
                assert_eq!(field, "circuit_type");
                assert!(message.contains("foo_bar"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_circuit_type_is_case_sensitive() {
        assert!(CircuitType::from_name("Voltage_Divider").is_err());
        assert!(CircuitType::from_name(" voltage_divider").is_err());
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<_> = SpecField::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpecField::ALL.len());
        assert_eq!(SpecField::from_name("Vin"), Some(SpecField::Vin));
        assert_eq!(SpecField::from_name("vin"), None);
    }
}
