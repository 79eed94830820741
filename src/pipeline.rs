//! Prompt → spec → filled template → netlist file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, Stage};
use crate::llm::SpecParser;
use crate::netlist::NetlistEmitter;
use crate::spec::CircuitSpec;
use crate::template::TemplateFiller;

/// Everything produced for one prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub spec: CircuitSpec,
    pub filled: Value,
    pub netlist_path: PathBuf,
}

impl Generation {
    /// File name of the written netlist.
    pub fn netlist_file_name(&self) -> Option<&str> {
        self.netlist_path.file_name().and_then(|n| n.to_str())
    }
}

/// The three generation stages wired together.
///
/// Each stage's error is tagged with its [`Stage`]; a failed stage stops
/// the run.
#[derive(Clone)]
pub struct Pipeline {
    parser: Arc<dyn SpecParser>,
    filler: TemplateFiller,
    emitter: NetlistEmitter,
}

impl Pipeline {
    pub fn new(parser: Arc<dyn SpecParser>, filler: TemplateFiller, emitter: NetlistEmitter) -> Self {
        Self {
            parser,
            filler,
            emitter,
        }
    }

    /// Build the filler and emitter from `config` around `parser`.
    pub fn from_config(config: &Config, parser: Arc<dyn SpecParser>) -> Result<Self> {
        let filler = TemplateFiller::new(config.templates.store()?);
        let emitter = NetlistEmitter::new(config.output_dir.clone());
        Ok(Self::new(parser, filler, emitter))
    }

    /// A pipeline parsing prompts with the Gemini client.
    #[cfg(feature = "llm")]
    pub fn with_gemini(config: &Config) -> Result<Self> {
        let client = crate::llm::GeminiClient::new(config.llm.clone());
        Self::from_config(config, Arc::new(client))
    }

    /// Directory netlists are written to.
    pub fn output_dir(&self) -> &Path {
        self.emitter.output_dir()
    }

    /// Run all three stages for `prompt`.
    pub fn generate(&self, prompt: &str) -> Result<Generation> {
        let spec = self
            .parser
            .parse_prompt(prompt)
            .map_err(|e| e.in_stage(Stage::Parsing))?;
        info!("parsed prompt as {}", spec.circuit_type());

        let filled = self.fill(&spec)?;
        let netlist_path = self.emit(&spec, &filled)?;
        Ok(Generation {
            spec,
            filled,
            netlist_path,
        })
    }

    /// The filling stage alone.
    pub fn fill(&self, spec: &CircuitSpec) -> Result<Value> {
        self.filler.fill_spec(spec).map_err(|e| e.in_stage(Stage::Filling))
    }

    /// The emission stage alone.
    pub fn emit(&self, spec: &CircuitSpec, filled: &Value) -> Result<PathBuf> {
        self.emitter
            .emit(spec.circuit_type(), filled)
            .map_err(|e| e.in_stage(Stage::Emission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CircuitGenError;
    use crate::llm::StaticSpecParser;
    use crate::spec::{CircuitType, SpecField};
    use crate::template::{builtin_store, MemoryTemplateStore};
    use serde_json::json;

    struct FailingParser;

    impl SpecParser for FailingParser {
        fn parse_prompt(&self, _prompt: &str) -> Result<CircuitSpec> {
            Err(CircuitGenError::upstream("model unavailable"))
        }
    }

    fn pipeline(parser: Arc<dyn SpecParser>, out: &Path) -> Pipeline {
        Pipeline::from_config(&Config::new().with_output_dir(out), parser).unwrap()
    }

    fn divider_spec() -> CircuitSpec {
        CircuitSpec::new(CircuitType::VoltageDivider)
            .with_field(SpecField::Vin, "12V")
            .with_field(SpecField::Vout, "5V")
    }

    #[test]
    fn test_generate() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(Arc::new(StaticSpecParser::new(divider_spec())), dir.path());
        let generation = p.generate("12V to 5V divider").unwrap();

        assert_eq!(generation.spec, divider_spec());
        assert_eq!(generation.filled["components"][1]["type"], "7.14k");
        assert!(generation.netlist_path.exists());
        assert!(generation.netlist_file_name().unwrap().starts_with("voltage_divider_"));
    }

    #[test]
    fn test_parsing_failure_is_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline(Arc::new(FailingParser), dir.path())
            .generate("anything")
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Parsing));
        assert_eq!(err.to_string(), "Parsing error: Language model error: model unavailable");
    }

    #[test]
    fn test_derivation_failure_is_filling_stage() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CircuitSpec::new(CircuitType::VoltageDivider)
            .with_field(SpecField::Vin, "5V")
            .with_field(SpecField::Vout, "5V");
        let err = pipeline(Arc::new(StaticSpecParser::new(spec)), dir.path())
            .generate("bad divider")
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Filling));
        assert!(err.to_string().starts_with("Template matching error: "));
        assert_eq!(std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0), 0);
    }

    #[test]
    fn test_emission_failure_is_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryTemplateStore::new().with_template(
            CircuitType::LdoRegulator,
            json!({"components": [{"ref": "U1", "type": "AMS1117-3.3"}],
                   "connections": [{"from": "U1.NOPE", "net": "VIN", "to": "U1.VI"}]}),
        );
        let p = Pipeline::new(
            Arc::new(StaticSpecParser::new(CircuitSpec::new(CircuitType::LdoRegulator))),
            TemplateFiller::new(Arc::new(store)),
            NetlistEmitter::new(dir.path()),
        );
        let err = p.generate("ldo").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Emission));
        assert!(matches!(err.root(), CircuitGenError::UnresolvedPin { .. }));
    }

    #[test]
    fn test_every_topology_generates() {
        let dir = tempfile::tempdir().unwrap();
        let filler = TemplateFiller::new(Arc::new(builtin_store().unwrap()));
        for ct in CircuitType::ALL {
            let spec = match ct {
                CircuitType::VoltageDivider => divider_spec(),
                CircuitType::LowPassFilter | CircuitType::HighPassFilter => {
                    CircuitSpec::new(ct).with_field(SpecField::CutoffFrequency, "1")
                }
                CircuitType::Timer555Astable => CircuitSpec::new(ct).with_field(SpecField::Frequency, "1000"),
                CircuitType::LedBlinker555 => CircuitSpec::new(ct)
                    .with_field(SpecField::Frequency, "2")
                    .with_field(SpecField::LedCurrent, "20"),
                CircuitType::Comparator => CircuitSpec::new(ct)
                    .with_field(SpecField::ThresholdHigh, "3V")
                    .with_field(SpecField::ThresholdLow, "1V")
                    .with_field(SpecField::SupplyVoltage, "5V"),
                CircuitType::ComparatorNoninverting => CircuitSpec::new(ct)
                    .with_field(SpecField::ReferenceVoltage, "2.5V")
                    .with_field(SpecField::InputSignal, "sensor")
                    .with_field(SpecField::SupplyVoltage, "5V"),
                CircuitType::AstableMultivibrator => {
                    CircuitSpec::new(ct).with_field(SpecField::ResistorValue, "47k")
                }
                _ => CircuitSpec::new(ct),
            };
            let p = Pipeline::new(
                Arc::new(StaticSpecParser::new(spec)),
                filler.clone(),
                NetlistEmitter::new(dir.path()),
            );
            p.generate(ct.name()).unwrap_or_else(|e| panic!("{ct}: {e}"));
        }
    }
}
