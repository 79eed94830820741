//! KiCad netlist export (S-expression, version E).

use std::fmt::{self, Write};

use super::builder::Netlist;

/// The `(design ...)` header of an exported netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignHeader {
    pub source: String,
    pub date: String,
    pub tool: String,
}

impl DesignHeader {
    /// A header for `source` stamped with the crate name and version.
    pub fn new(source: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            date: date.into(),
            tool: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Quote a string for an S-expression.
fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A netlist paired with its header, rendered through `Display`.
pub struct KicadNetlist<'a> {
    pub netlist: &'a Netlist,
    pub header: &'a DesignHeader,
}

impl fmt::Display for KicadNetlist<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let KicadNetlist { netlist, header } = self;

        writeln!(f, "(export (version \"E\")")?;
        writeln!(f, "  (design")?;
        writeln!(f, "    (source {})", quoted(&header.source))?;
        writeln!(f, "    (date {})", quoted(&header.date))?;
        writeln!(f, "    (tool {}))", quoted(&header.tool))?;

        writeln!(f, "  (components")?;
        for comp in &netlist.components {
            writeln!(f, "    (comp (ref {})", quoted(&comp.reference))?;
            writeln!(f, "      (value {})", quoted(&comp.value))?;
            if !comp.footprint.is_empty() {
                writeln!(f, "      (footprint {})", quoted(&comp.footprint))?;
            }
            if !comp.fields.is_empty() {
                writeln!(f, "      (fields")?;
                for (name, value) in &comp.fields {
                    writeln!(f, "        (field (name {}) {})", quoted(name), quoted(value))?;
                }
                writeln!(f, "      )")?;
            }
            writeln!(
                f,
                "      (libsource (lib {}) (part {})))",
                quoted(&comp.lib),
                quoted(&comp.symbol)
            )?;
        }
        writeln!(f, "  )")?;

        writeln!(f, "  (libparts")?;
        for part in &netlist.libparts {
            writeln!(f, "    (libpart (lib {}) (part {})", quoted(&part.lib), quoted(&part.symbol))?;
            writeln!(f, "      (description {})", quoted(&part.description))?;
            let mut pins = String::new();
            for pin in &part.pins {
                write!(pins, " (pin (num {}) (name {}))", quoted(&pin.number), quoted(&pin.name))?;
            }
            writeln!(f, "      (pins{}))", pins)?;
        }
        writeln!(f, "  )")?;

        writeln!(f, "  (nets")?;
        for net in &netlist.nets {
            write!(f, "    (net (code \"{}\") (name {})", net.code, quoted(&net.name))?;
            for node in &net.nodes {
                write!(
                    f,
                    " (node (ref {}) (pin {}) (pinfunction {}))",
                    quoted(&node.reference),
                    quoted(&node.pin),
                    quoted(&node.pin_function)
                )?;
            }
            writeln!(f, ")")?;
        }
        writeln!(f, "  )")?;

        writeln!(f, ")")
    }
}

/// Render a netlist as KiCad S-expression text.
pub fn write_kicad(netlist: &Netlist, header: &DesignHeader) -> String {
    KicadNetlist { netlist, header }.to_string()
}
