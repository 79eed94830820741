//! Resolve a filled circuit into components, library parts and nets.

use std::collections::HashMap;

use log::debug;

use super::library::{self, PartInfo};
use super::model::{FilledCircuit, TemplateComponent};
use crate::error::{CircuitGenError, Result};

/// A placed component.
#[derive(Debug, Clone, PartialEq)]
pub struct NetComponent {
    pub reference: String,
    /// The template part type, shown as the KiCad value
    pub value: String,
    pub footprint: String,
    pub lib: String,
    pub symbol: String,
    pub fields: Vec<(String, String)>,
}

/// A pin of a library part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibPin {
    pub number: String,
    pub name: String,
}

/// A library symbol used by at least one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibPart {
    pub lib: String,
    pub symbol: String,
    pub description: String,
    pub pins: Vec<LibPin>,
}

/// A component pin attached to a net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub reference: String,
    pub pin: String,
    pub pin_function: String,
}

/// A named net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    /// 1-based, in first-seen order
    pub code: usize,
    pub name: String,
    pub nodes: Vec<Node>,
}

/// A resolved netlist, ready to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Netlist {
    pub components: Vec<NetComponent>,
    pub libparts: Vec<LibPart>,
    pub nets: Vec<Net>,
}

struct Placed<'a> {
    template: &'a TemplateComponent,
    part: PartInfo,
}

impl<'a> Placed<'a> {
    /// Resolve a pin to `(number, name)`: the pin table by name then by
    /// number, then the pins the template declared for this component.
    fn resolve_pin(&self, pin: &str) -> Result<(String, String)> {
        if let Some((number, name)) = self.part.pin(pin) {
            return Ok((number.to_string(), name.to_string()));
        }
        if self.template.pins.iter().any(|p| p == pin) {
            return Ok((pin.to_string(), pin.to_string()));
        }
        Err(CircuitGenError::UnresolvedPin {
            reference: self.template.reference.clone(),
            pin: pin.to_string(),
        })
    }

    /// Pins listed for the library part: the table if there is one,
    /// otherwise the template's declared pins.
    fn lib_pins(&self) -> Vec<LibPin> {
        if self.part.has_pin_table() {
            self.part
                .distinct_pins()
                .into_iter()
                .map(|(number, name)| LibPin {
                    number: number.to_string(),
                    name: name.to_string(),
                })
                .collect()
        } else {
            self.template
                .pins
                .iter()
                .map(|p| LibPin {
                    number: p.clone(),
                    name: p.clone(),
                })
                .collect()
        }
    }
}

/// Split a `Ref.Pin` endpoint at the first dot.
fn split_endpoint(token: &str) -> Result<(&str, &str)> {
    match token.split_once('.') {
        Some((reference, pin)) if !reference.is_empty() && !pin.is_empty() => Ok((reference, pin)),
        _ => Err(CircuitGenError::InvalidConnection {
            token: token.to_string(),
        }),
    }
}

impl Netlist {
    /// Build a netlist from a filled circuit.
    pub fn build(circuit: &FilledCircuit) -> Result<Self> {
        let mut placed: Vec<Placed<'_>> = Vec::with_capacity(circuit.components.len());
        let mut by_ref: HashMap<&str, usize> = HashMap::new();

        for template in &circuit.components {
            if by_ref.insert(template.reference.as_str(), placed.len()).is_some() {
                return Err(CircuitGenError::DuplicateReference {
                    reference: template.reference.clone(),
                });
            }
            placed.push(Placed {
                template,
                part: library::lookup(&template.part_type),
            });
        }

        let mut netlist = Netlist::default();

        for p in &placed {
            let footprint = match &p.template.footprint {
                Some(fp) => fp.clone(),
                None => p.part.footprint.to_string(),
            };
            netlist.components.push(NetComponent {
                reference: p.template.reference.clone(),
                value: p.template.part_type.clone(),
                footprint,
                lib: p.part.lib.to_string(),
                symbol: p.part.symbol.to_string(),
                fields: p.template.param_fields(),
            });
            netlist.add_libpart(p);
        }

        let mut net_index: HashMap<&str, usize> = HashMap::new();
        for connection in &circuit.connections {
            for token in [&connection.from, &connection.to] {
                let (reference, pin) = split_endpoint(token)?;
                let idx = by_ref.get(reference).copied().ok_or_else(|| {
                    CircuitGenError::UnresolvedReference {
                        reference: reference.to_string(),
                        token: token.to_string(),
                    }
                })?;
                let (number, function) = placed[idx].resolve_pin(pin)?;

                let net_idx = *net_index.entry(connection.net.as_str()).or_insert_with(|| {
                    netlist.nets.push(Net {
                        code: netlist.nets.len() + 1,
                        name: connection.net.clone(),
                        nodes: Vec::new(),
                    });
                    netlist.nets.len() - 1
                });

                let net = &mut netlist.nets[net_idx];
                if !net.nodes.iter().any(|n| n.reference == reference && n.pin == number) {
                    net.nodes.push(Node {
                        reference: reference.to_string(),
                        pin: number,
                        pin_function: function,
                    });
                }
            }
        }

        debug!(
            "netlist: {} components, {} library parts, {} nets",
            netlist.components.len(),
            netlist.libparts.len(),
            netlist.nets.len()
        );
        Ok(netlist)
    }

    /// The net named `name`.
    pub fn net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.name == name)
    }

    fn add_libpart(&mut self, placed: &Placed<'_>) {
        let pins = placed.lib_pins();
        match self
            .libparts
            .iter_mut()
            .find(|lp| lp.lib == placed.part.lib && lp.symbol == placed.part.symbol)
        {
            Some(existing) => {
                for pin in pins {
                    if !existing.pins.iter().any(|p| p.number == pin.number) {
                        existing.pins.push(pin);
                    }
                }
            }
            None => self.libparts.push(LibPart {
                lib: placed.part.lib.to_string(),
                symbol: placed.part.symbol.to_string(),
                description: placed.part.description.to_string(),
                pins,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn divider() -> FilledCircuit {
        FilledCircuit::from_value(&json!({
            "components": [
                {"ref": "R1", "type": "10k", "connections": ["1", "2"]},
                {"ref": "R2", "type": "7.14k", "footprint": "Resistor_SMD:R_0805_2012Metric",
                 "connections": ["1", "2"]},
                {"ref": "J1", "type": "Conn_01x03"}
            ],
            "connections": [
                {"from": "J1.1", "net": "VIN", "to": "R1.1"},
                {"from": "R1.2", "net": "VOUT", "to": "R2.1"},
                {"from": "J1.2", "net": "VOUT", "to": "R2.1"},
                {"from": "R2.2", "net": "GND", "to": "J1.3"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_nets_in_first_seen_order() {
        let netlist = Netlist::build(&divider()).unwrap();
        let names: Vec<_> = netlist.nets.iter().map(|n| (n.code, n.name.as_str())).collect();
        assert_eq!(names, vec![(1, "VIN"), (2, "VOUT"), (3, "GND")]);
    }

    #[test]
    fn test_nodes_not_duplicated() {
        let netlist = Netlist::build(&divider()).unwrap();
        let vout = netlist.net("VOUT").unwrap();
        let nodes: Vec<_> = vout.nodes.iter().map(|n| format!("{}.{}", n.reference, n.pin)).collect();
        assert_eq!(nodes, vec!["R1.2", "R2.1", "J1.2"]);
    }

    #[test]
    fn test_footprint_override_and_default() {
        let netlist = Netlist::build(&divider()).unwrap();
        assert_eq!(netlist.components[0].footprint, "Resistor_SMD:R_0603_1608Metric");
        assert_eq!(netlist.components[1].footprint, "Resistor_SMD:R_0805_2012Metric");
        assert_eq!(netlist.components[1].symbol, "R");
    }

    #[test]
    fn test_libparts_shared_by_symbol() {
        let netlist = Netlist::build(&divider()).unwrap();
        let symbols: Vec<_> = netlist.libparts.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["R", "Conn_01x03"]);
    }

    #[test]
    fn test_pin_resolved_by_name() {
        let circuit = FilledCircuit::from_value(&json!({
            "components": [
                {"ref": "U1", "type": "NE555"},
                {"ref": "C1", "type": "0.1uF"}
            ],
            "connections": [{"from": "U1.VCC", "net": "VCC", "to": "C1.1"}]
        }))
        .unwrap();
        let netlist = Netlist::build(&circuit).unwrap();
        let node = &netlist.nets[0].nodes[0];
        assert_eq!((node.pin.as_str(), node.pin_function.as_str()), ("8", "VCC"));
    }

    #[test]
    fn test_generic_part_uses_declared_pins() {
        let circuit = FilledCircuit::from_value(&json!({
            "components": [
                {"ref": "U1", "type": "ESP32-WROOM", "connections": ["3V3", "GND"]},
                {"ref": "C1", "type": "0.1uF"}
            ],
            "connections": [{"from": "U1.3V3", "net": "VDD", "to": "C1.1"}]
        }))
        .unwrap();
        let netlist = Netlist::build(&circuit).unwrap();
        assert_eq!(netlist.nets[0].nodes[0].pin, "3V3");
        let generic = netlist.libparts.iter().find(|p| p.symbol == "DEVICE").unwrap();
        assert_eq!(generic.pins.len(), 2);

        let bad = FilledCircuit::from_value(&json!({
            "components": [{"ref": "U1", "type": "ESP32-WROOM", "connections": ["3V3"]}],
            "connections": [{"from": "U1.EN", "net": "EN", "to": "U1.3V3"}]
        }))
        .unwrap();
        assert!(matches!(
            Netlist::build(&bad).unwrap_err(),
            CircuitGenError::UnresolvedPin { .. }
        ));
    }

    #[test]
    fn test_unknown_pin() {
        let circuit = FilledCircuit::from_value(&json!({
            "components": [{"ref": "U1", "type": "NE555"}],
            "connections": [{"from": "U1.XYZ", "net": "N", "to": "U1.1"}]
        }))
        .unwrap();
        match Netlist::build(&circuit).unwrap_err() {
            CircuitGenError::UnresolvedPin { reference, pin } => {
                assert_eq!(reference, "U1");
                assert_eq!(pin, "XYZ");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_reference() {
        let circuit = FilledCircuit::from_value(&json!({
            "components": [{"ref": "R1", "type": "10k"}],
            "connections": [{"from": "R1.1", "net": "N", "to": "R9.1"}]
        }))
        .unwrap();
        assert!(matches!(
            Netlist::build(&circuit).unwrap_err(),
            CircuitGenError::UnresolvedReference { .. }
        ));
    }

    #[test]
    fn test_malformed_endpoint() {
        for token in ["R1", ".1", "R1."] {
            let circuit = FilledCircuit::from_value(&json!({
                "components": [{"ref": "R1", "type": "10k"}],
                "connections": [{"from": token, "net": "N", "to": "R1.1"}]
            }))
            .unwrap();
            assert!(
                matches!(Netlist::build(&circuit).unwrap_err(), CircuitGenError::InvalidConnection { .. }),
                "{token}"
            );
        }
    }

    #[test]
    fn test_duplicate_reference() {
        let circuit = FilledCircuit::from_value(&json!({
            "components": [{"ref": "R1", "type": "10k"}, {"ref": "R1", "type": "1k"}],
            "connections": []
        }))
        .unwrap();
        assert!(matches!(
            Netlist::build(&circuit).unwrap_err(),
            CircuitGenError::DuplicateReference { .. }
        ));
    }
}
