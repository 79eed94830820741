//! Part library: template part types to KiCad symbols and pin tables.

/// A KiCad symbol with its default footprint and pin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartInfo {
    pub lib: &'static str,
    pub symbol: &'static str,
    pub footprint: &'static str,
    pub description: &'static str,
    /// `(name, number)` pairs; several names may share a number
    pub pins: &'static [(&'static str, &'static str)],
}

impl PartInfo {
    /// `lib:symbol`
    pub fn lib_id(&self) -> String {
        format!("{}:{}", self.lib, self.symbol)
    }

    /// Whether the symbol has a fixed pin table.
    pub fn has_pin_table(&self) -> bool {
        !self.pins.is_empty()
    }

    /// Resolve a pin by name, then by number, to `(number, name)`.
    pub fn pin(&self, pin: &str) -> Option<(&'static str, &'static str)> {
        self.pins
            .iter()
            .find(|(name, _)| *name == pin)
            .or_else(|| self.pins.iter().find(|(_, number)| *number == pin))
            .map(|&(name, number)| (number, name))
    }

    /// The primary name of each distinct pin number, in table order.
    pub fn distinct_pins(&self) -> Vec<(&'static str, &'static str)> {
        let mut pins: Vec<(&'static str, &'static str)> = Vec::new();
        for &(name, number) in self.pins {
            if !pins.iter().any(|(n, _)| *n == number) {
                pins.push((number, name));
            }
        }
        pins
    }
}

const TWO_PIN: &[(&str, &str)] = &[("1", "1"), ("2", "2")];
const POLARIZED: &[(&str, &str)] = &[("+", "1"), ("-", "2")];
const DIODE: &[(&str, &str)] = &[("K", "1"), ("A", "2")];

const RESISTOR: PartInfo = PartInfo {
    lib: "Device",
    symbol: "R",
    footprint: "Resistor_SMD:R_0603_1608Metric",
    description: "Resistor",
    pins: TWO_PIN,
};

const CAPACITOR: PartInfo = PartInfo {
    lib: "Device",
    symbol: "C",
    footprint: "Capacitor_SMD:C_0603_1608Metric",
    description: "Unpolarized capacitor",
    pins: TWO_PIN,
};

const CAPACITOR_POLARIZED: PartInfo = PartInfo {
    lib: "Device",
    symbol: "C_Polarized",
    footprint: "Capacitor_SMD:C_0805_2012Metric",
    description: "Polarized capacitor",
    pins: POLARIZED,
};

const GENERIC: PartInfo = PartInfo {
    lib: "Device",
    symbol: "DEVICE",
    footprint: "",
    description: "Generic device",
    pins: &[],
};

const LM2596S_PINS: &[(&str, &str)] = &[
    ("Vin", "1"),
    ("VIN", "1"),
    ("SW", "2"),
    ("OUT", "2"),
    ("GND", "3"),
    ("FB", "4"),
    ("ON", "5"),
];

const LM2676S_PINS: &[(&str, &str)] = &[
    ("Vin", "1"),
    ("VIN", "1"),
    ("SW", "2"),
    ("CB", "3"),
    ("GND", "4"),
    ("FB", "6"),
    ("ON", "7"),
];

const fn lm2596s(symbol: &'static str) -> PartInfo {
    PartInfo {
        lib: "Regulator_Switching",
        symbol,
        footprint: "Package_TO_SOT_SMD:TO-263-5_TabPin3",
        description: "3A step-down switching regulator",
        pins: LM2596S_PINS,
    }
}

const fn lm2676s(symbol: &'static str) -> PartInfo {
    PartInfo {
        lib: "Regulator_Switching",
        symbol,
        footprint: "Package_TO_SOT_SMD:TO-263-7_TabPin4",
        description: "3A step-down switching regulator",
        pins: LM2676S_PINS,
    }
}

const fn connector(symbol: &'static str, footprint: &'static str, pins: &'static [(&'static str, &'static str)]) -> PartInfo {
    PartInfo {
        lib: "Connector_Generic",
        symbol,
        footprint,
        description: "Generic connector",
        pins,
    }
}

/// Known part types.
const PARTS: &[(&str, PartInfo)] = &[
    ("LM2596S-5", lm2596s("LM2596S-5")),
    ("LM2596S-3.3", lm2596s("LM2596S-3.3")),
    ("LM2596S-12", lm2596s("LM2596S-12")),
    ("LM2596S-ADJ", lm2596s("LM2596S-ADJ")),
    ("LM2676S-5", lm2676s("LM2676S-5")),
    ("LM2676S-3.3", lm2676s("LM2676S-3.3")),
    ("LM2676S-12", lm2676s("LM2676S-12")),
    ("LM2676S-ADJ", lm2676s("LM2676S-ADJ")),
    (
        "AMS1117-3.3",
        PartInfo {
            lib: "Regulator_Linear",
            symbol: "AMS1117-3.3",
            footprint: "Package_TO_SOT_SMD:SOT-223-3_TabPin2",
            description: "1A low-dropout regulator",
            pins: &[("GND", "1"), ("VO", "2"), ("Vout", "2"), ("VI", "3"), ("Vin", "3")],
        },
    ),
    (
        "MCP6001",
        PartInfo {
            lib: "Amplifier_Operational",
            symbol: "MCP6001-OT",
            footprint: "Package_TO_SOT_SMD:SOT-23-5",
            description: "1MHz rail-to-rail op amp",
            pins: &[
                ("OUT", "1"),
                ("V-", "2"),
                ("VSS", "2"),
                ("+", "3"),
                ("IN+", "3"),
                ("-", "4"),
                ("IN-", "4"),
                ("V+", "5"),
                ("VDD", "5"),
            ],
        },
    ),
    (
        "NE555",
        PartInfo {
            lib: "Timer",
            symbol: "NE555P",
            footprint: "Package_DIP:DIP-8_W7.62mm",
            description: "Precision timer",
            pins: &[
                ("GND", "1"),
                ("TR", "2"),
                ("Q", "3"),
                ("R", "4"),
                ("CV", "5"),
                ("THR", "6"),
                ("DIS", "7"),
                ("VCC", "8"),
            ],
        },
    ),
    (
        "2N3904",
        PartInfo {
            lib: "Transistor_BJT",
            symbol: "2N3904",
            footprint: "Package_TO_SOT_THT:TO-92_Inline",
            description: "NPN small-signal transistor",
            pins: &[("E", "1"), ("B", "2"), ("C", "3")],
        },
    ),
    (
        "1N4007",
        PartInfo {
            lib: "Diode",
            symbol: "1N4007",
            footprint: "Diode_THT:D_DO-41_SOD81_P10.16mm_Horizontal",
            description: "1000V 1A rectifier diode",
            pins: DIODE,
        },
    ),
    (
        "SR560",
        PartInfo {
            lib: "Device",
            symbol: "D_Schottky",
            footprint: "Diode_SMD:D_SOD-123",
            description: "Schottky diode",
            pins: DIODE,
        },
    ),
    (
        "LED",
        PartInfo {
            lib: "Device",
            symbol: "LED",
            footprint: "LED_SMD:LED_0805_2012Metric",
            description: "Light emitting diode",
            pins: DIODE,
        },
    ),
    (
        "47uH_2A",
        PartInfo {
            lib: "Device",
            symbol: "L",
            footprint: "Inductor_SMD:L_0805_2012Metric",
            description: "Inductor",
            pins: TWO_PIN,
        },
    ),
    ("0.01uF", CAPACITOR),
    ("0.1uF", CAPACITOR),
    ("Capacitor_SMD", CAPACITOR),
    ("10uF", CAPACITOR_POLARIZED),
    ("22uF_35V", CAPACITOR_POLARIZED),
    ("47uF_10V", CAPACITOR_POLARIZED),
    (
        "Crystal_SMD",
        PartInfo {
            lib: "Device",
            symbol: "Crystal",
            footprint: "Crystal:Crystal_SMD_2016-4Pin_2.0x1.6mm",
            description: "Quartz crystal",
            pins: TWO_PIN,
        },
    ),
    (
        "STM32F103",
        PartInfo {
            lib: "MCU_ST_STM32F1",
            symbol: "STM32F103C8Tx",
            footprint: "Package_QFP:LQFP-48_7x7mm_P0.5mm",
            description: "ARM Cortex-M3 MCU, 64KB flash",
            pins: &[
                ("VBAT", "1"),
                ("OSC_IN", "5"),
                ("PD0", "5"),
                ("OSC_OUT", "6"),
                ("PD1", "6"),
                ("NRST", "7"),
                ("VSSA", "8"),
                ("VDDA", "9"),
                ("VSS", "23"),
                ("VDD", "24"),
                ("PB6", "42"),
                ("SCL", "42"),
                ("PB7", "43"),
                ("SDA", "43"),
                ("BOOT0", "44"),
            ],
        },
    ),
    (
        "BME280",
        PartInfo {
            lib: "Sensor_Humidity",
            symbol: "BME280",
            footprint: "Package_LGA:Bosch_LGA-8_2.5x2.5mm_P0.65mm_ClockwisePinNumbering",
            description: "Humidity, pressure and temperature sensor",
            pins: &[
                ("GND", "1"),
                ("CSB", "2"),
                ("SDI", "3"),
                ("SDA", "3"),
                ("SCK", "4"),
                ("SCL", "4"),
                ("SDO", "5"),
                ("VDDIO", "6"),
                ("VDD", "8"),
            ],
        },
    ),
    (
        "Conn_01x02",
        connector(
            "Conn_01x02",
            "Connector_PinHeader_2.54mm:PinHeader_1x02_P2.54mm_Vertical",
            &[("1", "1"), ("2", "2")],
        ),
    ),
    (
        "Conn_01x03",
        connector(
            "Conn_01x03",
            "Connector_PinHeader_2.54mm:PinHeader_1x03_P2.54mm_Vertical",
            &[("1", "1"), ("2", "2"), ("3", "3")],
        ),
    ),
    (
        "Conn_01x04",
        connector(
            "Conn_01x04",
            "Connector_PinHeader_2.54mm:PinHeader_1x04_P2.54mm_Vertical",
            &[("1", "1"), ("2", "2"), ("3", "3"), ("4", "4")],
        ),
    ),
];

/// Bare part numbers that name a default variant.
const ALIASES: &[(&str, &str)] = &[("LM2596S", "LM2596S-5"), ("LM2676S", "LM2676S-5")];

/// The symbol for a template part type.
///
/// Unknown types fall back on their value text: a trailing `k` or `Ω` is a
/// resistor, a `uF`/`µF`/`nF`/`pF` unit is a capacitor, anything else is a
/// generic device with no pin table.
pub fn lookup(part_type: &str) -> PartInfo {
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == part_type)
        .map(|(_, target)| *target)
        .unwrap_or(part_type);

    if let Some((_, info)) = PARTS.iter().find(|(name, _)| *name == key) {
        return *info;
    }

    let value = part_type.trim();
    if value.ends_with('k') || value.ends_with('Ω') {
        RESISTOR
    } else if ["uF", "µF", "nF", "pF"].iter().any(|u| value.contains(u)) {
        CAPACITOR
    } else {
        GENERIC
    }
}
