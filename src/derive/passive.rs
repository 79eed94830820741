//! Resistor dividers and first-order RC filters.

use std::f64::consts::PI;

use super::{finite, format_value, positive, quantity, Derivation, KILOHERTZ, VOLTS};
use crate::error::{CircuitGenError, Result};
use crate::spec::{CircuitSpec, SpecField};
use crate::template::ValueMap;

/// Top resistor of the divider, kΩ.
const DIVIDER_R1_KOHM: f64 = 10.0;

/// Filter capacitor of the low-pass, farads (10 nF).
const LOW_PASS_C1_F: f64 = 10e-9;

/// Filter resistor of the high-pass, ohms (10 kΩ).
const HIGH_PASS_R1_OHM: f64 = 10e3;

pub static VOLTAGE_DIVIDER: Derivation = Derivation {
    required: &[SpecField::Vin, SpecField::Vout],
    outputs: &["R2_value"],
    compute: voltage_divider,
};

pub static LOW_PASS_FILTER: Derivation = Derivation {
    required: &[SpecField::CutoffFrequency],
    outputs: &["R1_value", "C1_value"],
    compute: low_pass_filter,
};

pub static HIGH_PASS_FILTER: Derivation = Derivation {
    required: &[SpecField::CutoffFrequency],
    outputs: &["R1_value", "C1_value"],
    compute: high_pass_filter,
};

/// R2 = R1·Vout/(Vin−Vout) with R1 fixed at 10 kΩ.
fn voltage_divider(spec: &CircuitSpec) -> Result<ValueMap> {
    let vin = quantity(spec, SpecField::Vin, VOLTS)?;
    let vout = quantity(spec, SpecField::Vout, VOLTS)?;

    if vout >= vin {
        return Err(CircuitGenError::derivation(
            spec.circuit_type().name(),
            SpecField::Vout.name(),
            format!(
                "must be less than Vin for a voltage divider (Vin={}, Vout={})",
                vin, vout
            ),
        ));
    }
    if vout <= 0.0 {
        return Err(CircuitGenError::derivation(
            spec.circuit_type().name(),
            SpecField::Vout.name(),
            format!("must be greater than zero, got {}", vout),
        ));
    }

    let r2_kohm = finite(spec, SpecField::Vout, DIVIDER_R1_KOHM * vout / (vin - vout))?;

    let mut values = ValueMap::new();
    values.insert("R2_value", format_value(r2_kohm));
    Ok(values)
}

/// R1 = 1/(2π·f·C1) with C1 fixed at 10 nF. R1 is reported in ohms.
fn low_pass_filter(spec: &CircuitSpec) -> Result<ValueMap> {
    let f_khz = positive(spec, SpecField::CutoffFrequency, KILOHERTZ)?;
    let f_hz = f_khz * 1e3;
    let r1_ohm = finite(spec, SpecField::CutoffFrequency, 1.0 / (2.0 * PI * f_hz * LOW_PASS_C1_F))?;

    let mut values = ValueMap::new();
    values.insert("R1_value", format_value(r1_ohm));
    values.insert("C1_value", "10");
    Ok(values)
}

/// C1 = 1/(2π·f·R1) with R1 fixed at 10 kΩ. C1 is reported in nF.
fn high_pass_filter(spec: &CircuitSpec) -> Result<ValueMap> {
    let f_khz = positive(spec, SpecField::CutoffFrequency, KILOHERTZ)?;
    let f_hz = f_khz * 1e3;
    let c1_nf = finite(spec, SpecField::CutoffFrequency, 1.0 / (2.0 * PI * f_hz * HIGH_PASS_R1_OHM) * 1e9)?;

    let mut values = ValueMap::new();
    values.insert("R1_value", "10");
    values.insert("C1_value", format_value(c1_nf));
    Ok(values)
}
