//! Template storage keyed by circuit type.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::error::{CircuitGenError, Result};
use crate::spec::CircuitType;

/// Lookup of a structured template by circuit type.
///
/// Implementations are shared between threads; a returned template is
/// read-only.
pub trait TemplateStore: Send + Sync {
    /// Load the template for `circuit_type`, or fail with
    /// [`CircuitGenError::TemplateNotFound`].
    fn load(&self, circuit_type: CircuitType) -> Result<Arc<Value>>;
}

/// Templates stored as `<dir>/<circuit_type>.json`, read on every lookup.
#[derive(Debug, Clone)]
pub struct DirTemplateStore {
    dir: PathBuf,
}

impl DirTemplateStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory templates are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, circuit_type: CircuitType) -> PathBuf {
        self.dir.join(format!("{}.json", circuit_type.name()))
    }
}

impl TemplateStore for DirTemplateStore {
    fn load(&self, circuit_type: CircuitType) -> Result<Arc<Value>> {
        let path = self.path_for(circuit_type);
        let location = path.display().to_string();
        debug!("loading template {}", location);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CircuitGenError::TemplateNotFound {
                    circuit_type: circuit_type.name().to_string(),
                    location,
                })
            }
            Err(e) => {
                return Err(CircuitGenError::FileRead {
                    path: location,
                    source: e,
                })
            }
        };

        parse_template(&text, &location).map(Arc::new)
    }
}

/// Templates held in memory, parsed once and shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<CircuitType, Arc<Value>>,
}

impl MemoryTemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn insert(&mut self, circuit_type: CircuitType, template: Value) {
        self.templates.insert(circuit_type, Arc::new(template));
    }

    /// Builder form of [`MemoryTemplateStore::insert`].
    pub fn with_template(mut self, circuit_type: CircuitType, template: Value) -> Self {
        self.insert(circuit_type, template);
        self
    }

    /// Number of stored templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self, circuit_type: CircuitType) -> Result<Arc<Value>> {
        self.templates
            .get(&circuit_type)
            .cloned()
            .ok_or_else(|| CircuitGenError::TemplateNotFound {
                circuit_type: circuit_type.name().to_string(),
                location: "memory".to_string(),
            })
    }
}

/// Template sources shipped with the crate.
const BUILTIN: [(CircuitType, &str); 15] = [
    (CircuitType::BuckConverter, include_str!("../../templates/buck_converter.json")),
    (CircuitType::LdoRegulator, include_str!("../../templates/ldo_regulator.json")),
    (CircuitType::InvertingAmplifier, include_str!("../../templates/inverting_amplifier.json")),
    (CircuitType::NoninvertingAmplifier, include_str!("../../templates/noninverting_amplifier.json")),
    (CircuitType::VoltageDivider, include_str!("../../templates/voltage_divider.json")),
    (CircuitType::LowPassFilter, include_str!("../../templates/low_pass_filter.json")),
    (CircuitType::HighPassFilter, include_str!("../../templates/high_pass_filter.json")),
    (CircuitType::Timer555Astable, include_str!("../../templates/555_timer_astable.json")),
    (CircuitType::BridgeRectifier, include_str!("../../templates/bridge_rectifier.json")),
    (CircuitType::VoltageMultiplier, include_str!("../../templates/voltage_multiplier.json")),
    (CircuitType::Comparator, include_str!("../../templates/comparator.json")),
    (CircuitType::ComparatorNoninverting, include_str!("../../templates/comparator_noninverting.json")),
    (CircuitType::LedBlinker555, include_str!("../../templates/led_blinker_555.json")),
    (CircuitType::MicrocontrollerBoard, include_str!("../../templates/microcontroller_board.json")),
    (CircuitType::AstableMultivibrator, include_str!("../../templates/astable_multivibrator.json")),
];

/// A store holding the built-in template for every supported topology.
pub fn builtin_store() -> Result<MemoryTemplateStore> {
    let mut store = MemoryTemplateStore::new();
    for (circuit_type, source) in BUILTIN {
        let location = format!("builtin:{}", circuit_type.name());
        store.insert(circuit_type, parse_template(source, &location)?);
    }
    Ok(store)
}

fn parse_template(text: &str, location: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| CircuitGenError::TemplateParse {
        location: location.to_string(),
        message: e.to_string(),
    })
}
