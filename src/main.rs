//! Circuitgen - prompt-to-netlist circuit generator
//!
//! # Usage
//!
//! ```bash
//! circuitgen types
//! circuitgen fill divider.json --emit
//! GEMINI_API_KEY=... circuitgen generate "a 555 blinking an LED at 2 Hz with 20 mA"
//! GEMINI_API_KEY=... circuitgen serve --addr 0.0.0.0:8080
//! ```

use std::path::PathBuf;
#[cfg(feature = "server")]
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
#[cfg(feature = "llm")]
use serde_json::json;

use circuitgen_core::{
    derive,
    error::{CircuitGenError, Result},
    CircuitSpec, CircuitType, Config, NetlistEmitter, TemplateFiller,
};

/// Prompt-to-netlist circuit generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of `<circuit_type>.json` templates (default: built-in set)
    #[arg(long, global = true, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Directory netlists are written to
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported circuit types and the fields their values derive from
    Types,

    /// Fill the template for a spec file and print the result
    Fill {
        /// Spec as JSON, e.g. {"circuit_type": "voltage_divider", "Vin": "12V", "Vout": "5V"}
        #[arg(value_name = "SPEC_FILE")]
        spec_file: PathBuf,

        /// Also write the KiCad netlist
        #[arg(long)]
        emit: bool,
    },

    /// Run the full pipeline on a prompt
    #[cfg(feature = "llm")]
    Generate {
        /// Free-text circuit request
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },

    /// Serve the HTTP API
    #[cfg(feature = "server")]
    Serve {
        /// Listen address
        #[arg(long)]
        addr: Option<String>,

        /// Worker threads
        #[arg(long)]
        workers: Option<usize>,
    },
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CircuitGenError::Config {
        message: format!("failed to render output: {}", e),
    })?;
    println!("{}", text);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::from_env()?;
    if let Some(dir) = args.templates {
        config = config.with_template_dir(dir);
    }
    if let Some(dir) = args.output {
        config = config.with_output_dir(dir);
    }

    match args.command {
        Command::Types => {
            for ct in CircuitType::ALL {
                match derive::derivation(ct) {
                    Some(d) => {
                        let fields: Vec<_> = d.required.iter().map(|f| f.name()).collect();
                        println!("{:<26} {} -> {}", ct.name(), fields.join(", "), d.outputs.join(", "));
                    }
                    None => println!("{}", ct),
                }
            }
        }

        Command::Fill { spec_file, emit } => {
            let text = std::fs::read_to_string(&spec_file).map_err(|e| CircuitGenError::FileRead {
                path: spec_file.display().to_string(),
                source: e,
            })?;
            let spec = CircuitSpec::from_json(&text)?;
            let filler = TemplateFiller::new(config.templates.store()?);
            let filled = filler.fill_spec(&spec)?;
            print_json(&filled)?;

            if emit {
                let path = NetlistEmitter::new(config.output_dir.clone()).emit(spec.circuit_type(), &filled)?;
                info!("netlist written to {}", path.display());
            }
        }

        #[cfg(feature = "llm")]
        Command::Generate { prompt } => {
            let pipeline = circuitgen_core::Pipeline::with_gemini(&config)?;
            let generation = pipeline.generate(&prompt)?;
            print_json(&json!({
                "spec": generation.spec.to_value(),
                "filledTemplate": generation.filled,
                "netlist": generation.netlist_path.display().to_string(),
            }))?;
        }

        #[cfg(feature = "server")]
        Command::Serve { addr, workers } => {
            let mut server_config = config.server.clone();
            if let Some(addr) = addr {
                server_config = server_config.with_addr(addr);
            }
            if let Some(workers) = workers {
                server_config = server_config.with_workers(workers);
            }
            config.llm.require_api_key()?;

            let pipeline = circuitgen_core::Pipeline::with_gemini(&config)?;
            let service = circuitgen_core::server::Service::new(Arc::new(pipeline));
            circuitgen_core::server::serve(&server_config, Arc::new(service))?;
        }
    }

    Ok(())
}
