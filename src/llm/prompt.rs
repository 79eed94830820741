//! Prompt construction.

use std::fmt::Write;

use crate::spec::{CircuitType, SpecField};

/// Instructions sent ahead of every user prompt: the supported circuit
/// types and the JSON schema the model must answer with.
pub fn system_prompt() -> String {
    let mut out = String::from(
        "You are a hardware design assistant. Extract exactly these fields from the user's prompt.\n\
         Supported circuit_type values (choose one):\n",
    );
    for ct in CircuitType::ALL {
        let _ = writeln!(out, "- {}", ct.name());
    }

    out.push_str("\nOutput the following JSON schema:\n\n{\n  \"circuit_type\": \"<string>\"");
    for field in SpecField::ALL {
        let _ = write!(out, ",\n  \"{}\": \"<string or null>\"", field.name());
    }
    out.push_str("\n}\n\nOnly return valid JSON. Set any irrelevant fields to null. Do not add explanations.");
    out
}

/// The full text sent for `prompt`.
pub fn request_text(prompt: &str) -> String {
    format!("{}\n\nUser Prompt: {}", system_prompt(), prompt)
}
