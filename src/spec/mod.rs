//! Circuit specifications.
//!
//! A [`CircuitSpec`] is the structured intent extracted from a prompt: one
//! required [`CircuitType`] drawn from a closed set of topologies, plus
//! optional free-text fields such as `Vin` or `cutoff_frequency`. Values are
//! not interpreted here; numeric parsing happens in [`crate::derive`].

mod record;
mod types;

pub use record::CircuitSpec;
pub use types::{CircuitType, SpecField};
