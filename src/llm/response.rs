//! Decoding of `generateContent` responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CircuitGenError, Result};
use crate::spec::CircuitSpec;

/// Request body for `generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// A single-turn user request.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(text.into()) }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// The text of the first part of the first candidate.
pub fn candidate_text(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| CircuitGenError::upstream(format!("response is not JSON: {}", e)))?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| CircuitGenError::upstream("response has no candidate text"))
}

/// Remove a leading markdown code fence (```` ``` ```` or ```` ```json ````)
/// and its closing fence.
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().trim_end_matches("```").trim()
}

/// The first balanced `{...}` object in `text`, ignoring braces inside
/// string literals.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode the model's answer text into a spec.
///
/// Undecodable JSON is an upstream error; a well-formed answer naming an
/// unsupported circuit type is a validation error.
pub fn decode_spec(text: &str) -> Result<CircuitSpec> {
    let body = strip_fence(text);
    let object = extract_object(body)
        .ok_or_else(|| CircuitGenError::upstream(format!("no JSON object in model output: {}", body)))?;
    let value: Value = serde_json::from_str(object)
        .map_err(|e| CircuitGenError::upstream(format!("model returned invalid JSON: {}", e)))?;
    CircuitSpec::from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CircuitType, SpecField};
    use serde_json::json;

    fn body(text: &str) -> String {
        json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]}).to_string()
    }

    #[test]
    fn test_candidate_text() {
        assert_eq!(candidate_text(&body("hello")).unwrap(), "hello");
    }

    #[test]
    fn test_candidate_text_missing() {
        for body in [r#"{}"#, r#"{"candidates": []}"#, r#"{"candidates": [{"content": {"parts": []}}]}"#] {
            assert!(matches!(
                candidate_text(body).unwrap_err(),
                CircuitGenError::Upstream { .. }
            ));
        }
    }

    #[test]
    fn test_strip_fence() {
        assert_eq!(strip_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_fence("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
        assert_eq!(strip_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_object() {
        assert_eq!(
            extract_object("Sure! {\"a\": {\"b\": \"}\"}} trailing {x}"),
            Some("{\"a\": {\"b\": \"}\"}}")
        );
        assert_eq!(extract_object("no object here"), None);
        assert_eq!(extract_object("{\"unterminated\": 1"), None);
    }

    #[test]
    fn test_decode_spec() {
        let spec = decode_spec(
            "```json\n{\"circuit_type\": \"ldo_regulator\", \"input_voltage\": \"5V\", \"gain\": null}\n```",
        )
        .unwrap();
        assert_eq!(spec.circuit_type(), CircuitType::LdoRegulator);
        assert_eq!(spec.get(SpecField::InputVoltage), Some("5V"));
        assert_eq!(spec.get(SpecField::Gain), None);
    }

    #[test]
    fn test_decode_rejects_garbage_and_unknown_types() {
        assert!(matches!(
            decode_spec("I cannot help with that").unwrap_err(),
            CircuitGenError::Upstream { .. }
        ));
        assert!(matches!(
            decode_spec("{\"circuit_type\": \"flux_capacitor\"}").unwrap_err(),
            CircuitGenError::Validation { .. }
        ));
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(GenerateRequest::user("hi")).unwrap();
        assert_eq!(value, json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]}));
    }
}
