//! Parsing of physical quantities written as free text.
//!
//! Spec fields arrive as strings such as `"12V"`, `"1"`, `"1kHz"` or
//! `"20 mA"`. A bare number is read in the field's default unit; anything
//! else is read as an absolute SI value (optional unit symbol, optional SI
//! prefix) and converted to that default unit.

/// The default unit a field is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// SI symbol that may trail the number (matched case-insensitively)
    pub symbol: &'static str,
    /// Size of one default unit in base SI units
    pub scale: f64,
}

/// Volts.
pub const VOLTS: Unit = Unit {
    symbol: "V",
    scale: 1.0,
};

/// Hertz.
pub const HERTZ: Unit = Unit {
    symbol: "Hz",
    scale: 1.0,
};

/// Kilohertz; a bare `"1"` means 1 kHz.
pub const KILOHERTZ: Unit = Unit {
    symbol: "Hz",
    scale: 1e3,
};

/// Milliamperes; a bare `"20"` means 20 mA.
pub const MILLIAMPS: Unit = Unit {
    symbol: "A",
    scale: 1e-3,
};

/// SI prefixes accepted in front of a unit symbol.
const PREFIXES: [(char, f64); 9] = [
    ('p', 1e-12),
    ('n', 1e-9),
    ('u', 1e-6),
    ('µ', 1e-6),
    ('m', 1e-3),
    ('k', 1e3),
    ('K', 1e3),
    ('M', 1e6),
    ('G', 1e9),
];

/// Parse a quantity, returning its magnitude in `unit`.
///
/// Returns `None` for empty, non-numeric or non-finite input.
pub fn parse_quantity(text: &str, unit: Unit) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(plain) = text.parse::<f64>() {
        return Some(plain).filter(|v| v.is_finite());
    }

    let magnitude = strip_symbol(text, unit.symbol).trim_end();
    let (number, factor) = match magnitude.chars().last() {
        Some(last) => match PREFIXES.iter().find(|(p, _)| *p == last) {
            Some(&(_, factor)) => (&magnitude[..magnitude.len() - last.len_utf8()], factor),
            None => (magnitude, 1.0),
        },
        None => return None,
    };

    let si = number.trim_end().parse::<f64>().ok()? * factor;
    Some(si / unit.scale).filter(|v| v.is_finite())
}

fn strip_symbol<'a>(text: &'a str, symbol: &str) -> &'a str {
    if text.len() < symbol.len() {
        return text;
    }
    let split = text.len() - symbol.len();
    match text.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(symbol) => &text[..split],
        _ => text,
    }
}

/// Format a derived value the way templates expect it: two decimals, no unit.
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prefix_without_symbol() {
        assert_relative_eq!(parse_quantity("10k", VOLTS).unwrap(), 10_000.0);
        assert_relative_eq!(parse_quantity("100 n", VOLTS).unwrap(), 100e-9);
        assert_relative_eq!(parse_quantity("4.7µ", VOLTS).unwrap(), 4.7e-6);
        assert_relative_eq!(parse_quantity("1M", HERTZ).unwrap(), 1_000_000.0);
        assert!(parse_quantity("k", VOLTS).is_none());
    }

    #[test]
    fn test_plain_number_uses_default_unit() {
        assert_relative_eq!(parse_quantity("1", KILOHERTZ).unwrap(), 1.0);
        assert_relative_eq!(parse_quantity(" 20 ", MILLIAMPS).unwrap(), 20.0);
        assert_relative_eq!(parse_quantity("12", VOLTS).unwrap(), 12.0);
    }

    #[test]
    fn test_unit_suffix_is_stripped() {
        assert_relative_eq!(parse_quantity("12V", VOLTS).unwrap(), 12.0);
        assert_relative_eq!(parse_quantity("3.3 v", VOLTS).unwrap(), 3.3);
        assert_relative_eq!(parse_quantity("1000Hz", HERTZ).unwrap(), 1000.0);
    }

    #[test]
    fn test_prefixed_values_convert_to_default_unit() {
        assert_relative_eq!(parse_quantity("1kHz", KILOHERTZ).unwrap(), 1.0);
        assert_relative_eq!(parse_quantity("500Hz", KILOHERTZ).unwrap(), 0.5);
        assert_relative_eq!(parse_quantity("20mA", MILLIAMPS).unwrap(), 20.0, max_relative = 1e-12);
        assert_relative_eq!(parse_quantity("2k", HERTZ).unwrap(), 2000.0);
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert!(parse_quantity("", VOLTS).is_none());
        assert!(parse_quantity("V", VOLTS).is_none());
        assert!(parse_quantity("twelve", VOLTS).is_none());
        assert!(parse_quantity("12X", VOLTS).is_none());
        assert!(parse_quantity("NaN", VOLTS).is_none());
        assert!(parse_quantity("inf", HERTZ).is_none());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(7.142857), "7.14");
        assert_eq!(format_value(48.0), "48.00");
        assert_eq!(format_value(15915.494309), "15915.49");
    }
}
