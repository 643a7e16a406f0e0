//! Structured output extraction from model responses.

use super::error::DomainError;
use super::string::truncate;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract the JSON object embedded in a model response.
///
/// Handles ```` ```json ```` / ```` ``` ```` fenced blocks and leading or
/// trailing prose; the first balanced `{...}` object wins.
pub fn extract_json(text: &str) -> Result<Value, DomainError> {
    let body = strip_fences(text.trim());
    let candidate = first_object(body).unwrap_or(body);

    serde_json::from_str(candidate).map_err(|e| {
        DomainError::MalformedOutput(format!(
            "failed to parse JSON: {}. Text: {}",
            e,
            truncate(candidate, 200)
        ))
    })
}

/// Deserialize an already-extracted value, mapping failures to `MalformedOutput`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::MalformedOutput(format!("unexpected shape: {}", e)))
}

fn strip_fences(text: &str) -> &str {
    let (start, skip) = if let Some(i) = text.find("```json") {
        (i, "```json".len())
    } else if let Some(i) = text.find("```") {
        (i, "```".len())
    } else {
        return text;
    };

    let inner = &text[start + skip..];
    match inner.find("```") {
        Some(end) => inner[..end].trim(),
        None => inner.trim(),
    }
}

fn first_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
