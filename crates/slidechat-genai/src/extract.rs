//! Two-stage interpretation of model output.
//!
//! Stage one ([`extract_json_object`]) is permissive: it tolerates prose,
//! markdown code fences, and trailing commentary around the payload, and
//! isolates the first balanced JSON object. Stage two ([`parse_slides`]) is
//! strict: the object must carry a `slides` array whose elements pass the
//! slide schema, or the whole response is rejected.

use serde_json::Value;
use slidechat_core::models::slide::SlideDocument;

use crate::error::GenaiError;

/// Remove markdown code fence markers (```` ```json ```` and ```` ``` ````),
/// keeping the fenced content.
///
/// Only a marker at the start of a line counts as a fence. JSON strings
/// cannot span lines, so backticks inside string values are kept.
pub fn strip_code_fences(raw: &str) -> String {
    raw.lines()
        .map(|line| match line.trim_start().strip_prefix("```") {
            Some(rest) => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the first balanced top-level JSON object in `raw` that parses.
///
/// Braces inside string literals (including escaped quotes) are ignored
/// while matching. If a balanced span fails to parse, scanning resumes at
/// the next opening brace.
pub fn extract_json_object(raw: &str) -> Option<String> {
    let text = strip_code_fences(raw);
    let bytes = text.as_bytes();

    let mut start = 0;
    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = matching_brace(bytes, open) {
            let candidate = &text[open..=close];
            if serde_json::from_str::<Value>(candidate).is_ok_and(|v| v.is_object()) {
                return Some(candidate.to_string());
            }
        }
        start = open + 1;
    }

    None
}

/// Index of the `}` closing the `{` at `open`, or `None` if unbalanced.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Strictly interpret an extracted JSON object as a slide document.
///
/// Errors carry diagnostic detail; user-facing callers replace it.
pub fn parse_slides(json: &str) -> Result<SlideDocument, GenaiError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| GenaiError::Parse(format!("invalid JSON: {e}")))?;

    let mut object = match value {
        Value::Object(map) => map,
        _ => return Err(GenaiError::Parse("payload is not an object".to_string())),
    };

    let slides = object
        .remove("slides")
        .ok_or_else(|| GenaiError::Parse("payload has no `slides` field".to_string()))?;
    if !slides.is_array() {
        return Err(GenaiError::Parse("`slides` is not an array".to_string()));
    }

    SlideDocument::from_value(slides).map_err(|e| GenaiError::Parse(e.to_string()))
}

/// Both stages in sequence.
pub fn slides_from_response(raw: &str) -> Result<SlideDocument, GenaiError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| GenaiError::Parse("no JSON object found in response".to_string()))?;
    parse_slides(&json)
}
