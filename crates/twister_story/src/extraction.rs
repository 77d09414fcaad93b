//! Extracting twists from completion payloads.
//!
//! Payloads are parsed strictly first. When that fails, the JSON object is
//! recovered from a markdown code block or the first balanced `{ ... }` span,
//! which covers the usual ways a model wraps its answer. Nothing beyond that
//! is repaired.

use serde_json::{Map, Value};
use twister_core::{Twist, TwistId};
use twister_error::{MalformedResponseError, MalformedResponseErrorKind};
use tracing::{error, warn};

/// Extract a JSON object from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ``` or an unlabelled fence
/// 2. Balanced braces: { ... }
///
/// # Errors
///
/// Returns [`MalformedResponseErrorKind::NotJson`] if no candidate is found.
///
/// # Examples
///
/// ```
/// use twister_story::extract_json;
///
/// let response = "Here is your story:\n```json\n{\"0\": {\"title\": \"T\", \"body\": \"B\"}}\n```";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<String, MalformedResponseError> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    error!(
        response_length = response.len(),
        "No JSON object found in completion response"
    );

    Err(MalformedResponseError::new(
        MalformedResponseErrorKind::NotJson(format!(
            "no JSON object found in response (length: {})",
            response.len()
        )),
    ))
}

/// Parse a payload into a JSON object, falling back to [`extract_json`].
///
/// # Errors
///
/// [`MalformedResponseErrorKind::NotJson`] when nothing parses,
/// [`MalformedResponseErrorKind::NotAnObject`] when the JSON is not an object.
pub fn parse_object(payload: &str) -> Result<Map<String, Value>, MalformedResponseError> {
    let value: Value = match serde_json::from_str(payload.trim()) {
        Ok(value) => value,
        Err(strict) => {
            let candidate = extract_json(payload).map_err(|_| MalformedResponseError::from(strict))?;
            serde_json::from_str(&candidate)?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(MalformedResponseError::new(
            MalformedResponseErrorKind::NotAnObject,
        )),
    }
}

/// Parse one `{title, body}` value.
///
/// Extra fields are ignored; both `title` and `body` must be strings.
pub fn parse_twist(key: &str, value: &Value) -> Result<Twist, MalformedResponseError> {
    let invalid = |reason: &str| {
        MalformedResponseError::new(MalformedResponseErrorKind::InvalidTwist {
            key: key.to_string(),
            reason: reason.to_string(),
        })
    };

    let object = value.as_object().ok_or_else(|| invalid("not an object"))?;
    let title = object
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing string 'title'"))?;
    let body = object
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing string 'body'"))?;

    Ok(Twist::new(title, body))
}

/// Parse a sibling batch whose key set must equal `expected` exactly.
///
/// Returned twists follow the order of `expected`.
///
/// # Examples
///
/// ```
/// use twister_core::TwistId;
/// use twister_story::{parse_object, parse_twist_batch};
///
/// let object = parse_object(r#"{"00": {"title": "Run", "body": "..."}, "01": {"title": "Hide", "body": "..."}}"#).unwrap();
/// let expected = TwistId::root().children(2);
/// let batch = parse_twist_batch(&object, &expected).unwrap();
/// assert_eq!(batch[1].1.title, "Hide");
///
/// assert!(parse_twist_batch(&object, &TwistId::root().children(3)).is_err());
/// ```
pub fn parse_twist_batch(
    object: &Map<String, Value>,
    expected: &[TwistId],
) -> Result<Vec<(TwistId, Twist)>, MalformedResponseError> {
    let mut batch = Vec::with_capacity(expected.len());
    for id in expected {
        let value = object.get(id.as_str()).ok_or_else(|| {
            MalformedResponseError::new(MalformedResponseErrorKind::MissingKey(id.to_string()))
        })?;
        batch.push((id.clone(), parse_twist(id.as_str(), value)?));
    }

    if object.len() != expected.len() {
        if let Some(unexpected) = object
            .keys()
            .find(|key| !expected.iter().any(|id| id.as_str() == key.as_str()))
        {
            return Err(MalformedResponseError::new(
                MalformedResponseErrorKind::UnexpectedKey(unexpected.clone()),
            ));
        }
    }

    Ok(batch)
}

/// Collect every well-formed twist from an object describing a whole tree.
///
/// Entries with non-digit keys or malformed values are skipped.
pub(crate) fn parse_twists_lenient(object: &Map<String, Value>) -> Vec<(TwistId, Twist)> {
    object
        .iter()
        .filter_map(|(key, value)| {
            let id = match TwistId::parse(key.as_str()) {
                Ok(id) => id,
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping entry with invalid twist id");
                    return None;
                }
            };
            match parse_twist(key, value) {
                Ok(twist) => Some((id, twist)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping malformed twist");
                    None
                }
            }
        })
        .collect()
}

fn extract_from_code_block(response: &str) -> Option<String> {
    let (content_start, labelled) = match response.find("```json") {
        Some(start) => (start + "```json".len(), true),
        None => (response.find("```")? + 3, false),
    };

    // Skip a language tag on an unlabelled fence
    let skip_to = if labelled {
        content_start
    } else {
        response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start)
    };

    let content = match response[skip_to..].find("```") {
        Some(end) => &response[skip_to..skip_to + end],
        // Truncated response: no closing fence
        None => &response[skip_to..],
    };
    let content = content.trim();
    content.starts_with('{').then(|| content.to_string())
}

fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
