//! Utility functions for Workflow Studio.

use serde::de::DeserializeOwned;

/// Remove control characters that break JSON parsing.
///
/// Keeps printable characters plus newlines, carriage returns, and tabs.
fn sanitize_json_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\r' || *c == '\t')
        .collect()
}

/// Parse JSON, retrying once with control characters stripped.
///
/// Backend payloads embed agent-written text (workflow purposes, artifact
/// paths) that occasionally carries stray control characters.
pub fn parse_json_safe<T: DeserializeOwned>(json_str: &str) -> Result<T, serde_json::Error> {
    match serde_json::from_str(json_str) {
        Ok(v) => Ok(v),
        Err(e) if e.to_string().contains("control character") => {
            serde_json::from_str(&sanitize_json_string(json_str))
        }
        Err(e) => Err(e),
    }
}
