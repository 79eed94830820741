//! KiCad netlist emission.
//!
//! A filled template is decoded into a [`FilledCircuit`], resolved against
//! the part library into a [`Netlist`], and written as a KiCad S-expression
//! netlist by [`NetlistEmitter`].

mod builder;
mod kicad;
mod library;
mod model;

pub use builder::{LibPart, LibPin, Net, NetComponent, Netlist, Node};
pub use kicad::{write_kicad, DesignHeader, KicadNetlist};
pub use library::{lookup, PartInfo};
pub use model::{FilledCircuit, TemplateComponent, TemplateConnection};

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;
use serde_json::Value;

use crate::error::{CircuitGenError, Result};
use crate::spec::CircuitType;

/// File extension of emitted netlists.
pub const NETLIST_EXTENSION: &str = "net";

/// Writes netlist files into an output directory.
#[derive(Debug, Clone)]
pub struct NetlistEmitter {
    output_dir: PathBuf,
}

impl NetlistEmitter {
    /// Create an emitter writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The directory files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Emit a filled template as `<circuit_type>_<unix-seconds>.net` and
    /// return the path written. An existing file is never replaced: a
    /// second netlist in the same second becomes `<circuit_type>_<secs>_1.net`
    /// and so on.
    pub fn emit(&self, circuit_type: CircuitType, filled: &Value) -> Result<PathBuf> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.emit_at(circuit_type, filled, secs)
    }

    /// [`NetlistEmitter::emit`] with an explicit timestamp.
    pub fn emit_at(&self, circuit_type: CircuitType, filled: &Value, unix_secs: u64) -> Result<PathBuf> {
        let circuit = FilledCircuit::from_value(filled)?;
        let netlist = Netlist::build(&circuit)?;

        let header = DesignHeader::new(circuit_type.name(), unix_secs.to_string());
        let text = write_kicad(&netlist, &header);

        std::fs::create_dir_all(&self.output_dir).map_err(|e| CircuitGenError::FileWrite {
            path: self.output_dir.display().to_string(),
            source: e,
        })?;

        let stem = format!("{}_{}", circuit_type.name(), unix_secs);
        let (path, mut file) = self.create_new(&stem)?;
        file.write_all(text.as_bytes()).map_err(|e| CircuitGenError::FileWrite {
            path: path.display().to_string(),
            source: e,
        })?;

        info!(
            "wrote netlist {} ({} components, {} nets)",
            path.display(),
            netlist.components.len(),
            netlist.nets.len()
        );
        Ok(path)
    }

    /// Create `<stem>.net`, or the first free `<stem>_<n>.net`.
    fn create_new(&self, stem: &str) -> Result<(PathBuf, File)> {
        let mut n = 0u32;
        loop {
            let name = match n {
                0 => format!("{}.{}", stem, NETLIST_EXTENSION),
                _ => format!("{}_{}.{}", stem, n, NETLIST_EXTENSION),
            };
            let path = self.output_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && n < u32::MAX => n += 1,
                Err(e) => {
                    return Err(CircuitGenError::FileWrite {
                        path: path.display().to_string(),
                        source: e,
                    })
                }
            }
        }
    }
}
