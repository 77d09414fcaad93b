//! Test utilities for the generation engine.
//!
//! [`MockDriver`] answers every prompt deterministically from the keys the
//! prompt asks for, so whole trees can be generated without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use twister_core::{GenerateRequest, GenerateResponse, Role};
use twister_error::{TransportError, TransportErrorKind, TwisterResult};
use twister_interface::TwisterDriver;

/// Story returned for linear prompts: four titled paragraphs.
pub const LINEAR_STORY: &str = "The Lamp\nThe lighthouse lamp flickers at dusk.\n\nThe Stairs\nMara climbs the spiral stairs.\n\nThe Voice\nA voice whispers her name.\n\nThe Dawn\nMorning breaks over a calm sea.";

/// How a scripted call should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Fail with a transport error
    Transport,
    /// Omit the last requested key
    DropKey,
    /// Add one key that was not requested
    ExtraKey,
    /// Reply with prose instead of JSON
    NotJson,
}

/// Scripted completion driver.
#[derive(Debug, Default)]
pub struct MockDriver {
    overrides: Vec<(String, String)>,
    failures: Vec<(String, MockFailure)>,
    calls: Mutex<Vec<GenerateRequest>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` whenever the last user prompt contains `needle`.
    pub fn with_override(mut self, needle: &str, response: &str) -> Self {
        self.overrides
            .push((needle.to_string(), response.to_string()));
        self
    }

    /// Misbehave whenever the last user prompt contains `needle`.
    pub fn failing_on(mut self, needle: &str, failure: MockFailure) -> Self {
        self.failures.push((needle.to_string(), failure));
        self
    }

    /// Every request received, in arrival order.
    pub fn calls(&self) -> Vec<GenerateRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The last user prompt of every request.
    pub fn prompts(&self) -> Vec<String> {
        self.calls().iter().map(last_user_prompt).collect()
    }

    /// The request whose last user prompt starts with `prefix`.
    pub fn request_starting_with(&self, prefix: &str) -> Option<GenerateRequest> {
        self.calls()
            .into_iter()
            .find(|request| last_user_prompt(request).starts_with(prefix))
    }
}

pub fn last_user_prompt(request: &GenerateRequest) -> String {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

fn requested_keys(prompt: &str) -> Vec<String> {
    let Some(start) = prompt.find("the keys ") else {
        return Vec::new();
    };
    let tail = &prompt[start..];
    let end = tail.find(", each containing").unwrap_or(tail.len());
    let re = Regex::new(r#""(\d+)""#).unwrap();
    re.captures_iter(&tail[..end])
        .map(|c| c[1].to_string())
        .collect()
}

fn twist_value(id: &str) -> Value {
    json!({
        "title": format!("Twist {}", id),
        "body": format!("Body of twist {}", id),
    })
}

fn respond(prompt: &str) -> String {
    if prompt.contains("key '0'") {
        return json!({ "0": twist_value("0") }).to_string();
    }

    if prompt.starts_with("Now rewrite the story") {
        let index = Regex::new(r"alternative (\d+)")
            .unwrap()
            .captures(prompt)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        return format!(
            "Turn {index}\nMara takes path {index}.\n\nEnd {index}\nPath {index} ends."
        );
    }

    if prompt.starts_with("Please write a story") {
        return LINEAR_STORY.to_string();
    }

    let keys = requested_keys(prompt);
    if !keys.is_empty() {
        let titles_only = prompt.contains("the title as a string");
        let object = keys
            .iter()
            .map(|key| {
                let value = if titles_only {
                    Value::String(format!("Title {}", key))
                } else {
                    twist_value(key)
                };
                (key.clone(), value)
            })
            .collect::<Map<_, _>>();
        return Value::Object(object).to_string();
    }

    format!("echo: {}", prompt)
}

fn misbehave(prompt: &str, failure: MockFailure) -> TwisterResult<String> {
    let mut object = match serde_json::from_str::<Value>(&respond(prompt)) {
        Ok(Value::Object(object)) => object,
        _ => Map::new(),
    };
    match failure {
        MockFailure::Transport => Err(TransportError::new(TransportErrorKind::Status {
            status: 503,
            message: "service unavailable".to_string(),
        })
        .into()),
        MockFailure::DropKey => {
            if let Some(last) = requested_keys(prompt).last() {
                object.remove(last);
            }
            Ok(Value::Object(object).to_string())
        }
        MockFailure::ExtraKey => {
            object.insert("999".to_string(), twist_value("999"));
            Ok(Value::Object(object).to_string())
        }
        MockFailure::NotJson => Ok("Once upon a time, with no JSON at all.".to_string()),
    }
}

#[async_trait]
impl TwisterDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> TwisterResult<GenerateResponse> {
        self.calls.lock().unwrap().push(req.clone());
        let prompt = last_user_prompt(req);

        if let Some((_, failure)) = self
            .failures
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return misbehave(&prompt, *failure).map(GenerateResponse::from_text);
        }

        if let Some((_, response)) = self
            .overrides
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return Ok(GenerateResponse::from_text(response.clone()));
        }

        Ok(GenerateResponse::from_text(respond(&prompt)))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model-v1"
    }
}
