//! WASM bindings for Circuitgen Core.
//!
//! Browser-side preview of the template stage: a spec typed or edited in
//! the page is filled against the built-in templates and rendered as a
//! KiCad netlist without a round trip to the server.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuitGen } from 'circuitgen_core';
//!
//! await init();
//!
//! const gen = new WasmCircuitGen();
//! const spec = JSON.stringify({ circuit_type: "voltage_divider", Vin: "12V", Vout: "5V" });
//! const filled = JSON.parse(gen.fill(spec));
//! const netlist = gen.netlist(spec);
//! ```

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::error::CircuitGenError;
use crate::netlist::{write_kicad, DesignHeader, FilledCircuit, Netlist};
use crate::spec::{CircuitSpec, CircuitType};
use crate::template::{builtin_store, TemplateFiller};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: CircuitGenError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Template filling and netlist rendering over the built-in templates.
#[wasm_bindgen]
pub struct WasmCircuitGen {
    filler: TemplateFiller,
}

#[wasm_bindgen]
impl WasmCircuitGen {
    /// Create a generator over the built-in templates.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmCircuitGen, JsValue> {
        let store = builtin_store().map_err(js_error)?;
        Ok(WasmCircuitGen {
            filler: TemplateFiller::new(Arc::new(store)),
        })
    }

    /// Fill the template for a spec given as JSON and return the filled
    /// template as JSON text.
    #[wasm_bindgen]
    pub fn fill(&self, spec_json: &str) -> Result<String, JsValue> {
        let spec = CircuitSpec::from_json(spec_json).map_err(js_error)?;
        let filled = self.filler.fill_spec(&spec).map_err(js_error)?;
        serde_json::to_string_pretty(&filled).map_err(|e| {
            js_error(CircuitGenError::WasmError {
                message: e.to_string(),
            })
        })
    }

    /// Fill the template for a spec and render the KiCad netlist text.
    #[wasm_bindgen]
    pub fn netlist(&self, spec_json: &str) -> Result<String, JsValue> {
        let spec = CircuitSpec::from_json(spec_json).map_err(js_error)?;
        let filled = self.filler.fill_spec(&spec).map_err(js_error)?;
        let circuit = FilledCircuit::from_value(&filled).map_err(js_error)?;
        let netlist = Netlist::build(&circuit).map_err(js_error)?;
        let header = DesignHeader::new(spec.circuit_type().name(), "");
        Ok(write_kicad(&netlist, &header))
    }
}

/// Names of every supported circuit type.
#[wasm_bindgen]
pub fn circuit_types() -> Vec<String> {
    CircuitType::ALL.iter().map(|ct| ct.name().to_string()).collect()
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
