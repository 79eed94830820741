//! NE555 astable networks.
//!
//! With R1 = R2 = R the astable frequency f = 1.44/((R1 + 2·R2)·C1)
//! solves to R = 1.44/(3·f·C1).

use super::{finite, format_value, positive, Derivation, HERTZ, MILLIAMPS};
use crate::error::Result;
use crate::spec::{CircuitSpec, SpecField};
use crate::template::ValueMap;

/// Timing capacitor, farads (0.01 µF).
const TIMING_C1_F: f64 = 0.01e-6;

/// LED blinker supply, volts.
const BLINKER_VCC: f64 = 5.0;

/// LED forward voltage, volts.
const LED_FORWARD_V: f64 = 2.0;

pub static TIMER_555_ASTABLE: Derivation = Derivation {
    required: &[SpecField::Frequency],
    outputs: &["R1_value", "R2_value", "C1_value"],
    compute: timer_555_astable,
};

pub static LED_BLINKER_555: Derivation = Derivation {
    required: &[SpecField::Frequency, SpecField::LedCurrent],
    outputs: &["R1_value", "R2_value", "C1_value", "R3_value"],
    compute: led_blinker_555,
};

/// Equal timing resistors for `f_hz`, in kΩ.
fn timing_resistance_kohm(f_hz: f64) -> f64 {
    1.44 / (3.0 * f_hz * TIMING_C1_F) / 1e3
}

fn timing_values(spec: &CircuitSpec) -> Result<ValueMap> {
    let f_hz = positive(spec, SpecField::Frequency, HERTZ)?;
    let r_kohm = finite(spec, SpecField::Frequency, timing_resistance_kohm(f_hz))?;
    let r = format_value(r_kohm);

    let mut values = ValueMap::new();
    values.insert("R1_value", r.clone());
    values.insert("R2_value", r);
    values.insert("C1_value", "0.01");
    Ok(values)
}

fn timer_555_astable(spec: &CircuitSpec) -> Result<ValueMap> {
    timing_values(spec)
}

/// Timing network plus LED ballast R3 = (Vcc − Vf)/I_led, in ohms.
fn led_blinker_555(spec: &CircuitSpec) -> Result<ValueMap> {
    let mut values = timing_values(spec)?;

    let i_led_ma = positive(spec, SpecField::LedCurrent, MILLIAMPS)?;
    let i_led_a = i_led_ma / 1e3;
    let r3_ohm = finite(spec, SpecField::LedCurrent, (BLINKER_VCC - LED_FORWARD_V) / i_led_a)?;

    values.insert("R3_value", format_value(r3_ohm));
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CircuitGenError;
    use crate::spec::CircuitType;

    fn blinker(freq: &str, current: &str) -> Result<ValueMap> {
        let spec = CircuitSpec::new(CircuitType::LedBlinker555)
            .with_field(SpecField::Frequency, freq)
            .with_field(SpecField::LedCurrent, current);
        LED_BLINKER_555.run(&spec)
    }

    #[test]
    fn test_astable_1khz() {
        let spec = CircuitSpec::new(CircuitType::Timer555Astable)
            .with_field(SpecField::Frequency, "1000");
        let values = TIMER_555_ASTABLE.run(&spec).unwrap();
        assert_eq!(values.get("R1_value"), Some("48.00"));
        assert_eq!(values.get("R2_value"), Some("48.00"));
        assert_eq!(values.get("C1_value"), Some("0.01"));
    }

    #[test]
    fn test_astable_accepts_hz_suffix() {
        let spec = CircuitSpec::new(CircuitType::Timer555Astable)
            .with_field(SpecField::Frequency, "1kHz");
        let values = TIMER_555_ASTABLE.run(&spec).unwrap();
        assert_eq!(values.get("R1_value"), Some("48.00"));
    }

    #[test]
    fn test_blinker_2hz_20ma() {
        let values = blinker("2", "20").unwrap();
        let r = format_value(timing_resistance_kohm(2.0));
        assert_eq!(r, "24000.00");
        assert_eq!(values.get("R1_value"), Some(r.as_str()));
        assert_eq!(values.get("R2_value"), Some(r.as_str()));
        assert_eq!(values.get("C1_value"), Some("0.01"));
        assert_eq!(values.get("R3_value"), Some("150.00"));
    }

    #[test]
    fn test_blinker_rejects_non_positive_current() {
        for current in ["0", "-5"] {
            let err = blinker("2", current).unwrap_err();
            assert!(
                matches!(err, CircuitGenError::Derivation { ref field, .. } if field == "led_current"),
                "{current}: {err}"
            );
        }
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let err = blinker("0", "20").unwrap_err();
        assert!(matches!(err, CircuitGenError::Derivation { ref field, .. } if field == "frequency"));
    }

    #[test]
    fn test_blinker_requires_led_current() {
        let spec = CircuitSpec::new(CircuitType::LedBlinker555).with_field(SpecField::Frequency, "2");
        let err = LED_BLINKER_555.run(&spec).unwrap_err();
        assert!(err.to_string().contains("led_current"));
    }

    #[test]
    fn test_vanishing_frequency_is_not_infinite() {
        let spec = CircuitSpec::new(CircuitType::Timer555Astable)
            .with_field(SpecField::Frequency, "1e-305");
        let err = TIMER_555_ASTABLE.run(&spec).unwrap_err();
        match err {
            CircuitGenError::Derivation { field, message, .. } => {
                assert_eq!(field, "frequency");
                assert!(message.contains("non-finite"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_vanishing_led_current_is_not_infinite() {
        let err = blinker("2", "1e-320").unwrap_err();
        assert!(
            matches!(err, CircuitGenError::Derivation { ref field, ref message, .. }
                if field == "led_current" && message.contains("non-finite")),
            "{err}"
        );
    }
}
