//! Request and response types for the completion service.

use crate::Message;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A single completion request.
///
/// # Examples
///
/// ```
/// use twister_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Hello!")])
///     .json_mode(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 1);
/// assert!(request.json_mode);
/// assert_eq!(request.model, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Model identifier to use, overriding the driver's default
    pub model: Option<String>,
    /// Ask the service to constrain its reply to a JSON object
    pub json_mode: bool,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Supported output types from the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),
    /// Structured JSON output, when a driver parses it eagerly.
    Json(serde_json::Value),
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use twister_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("Once upon a time".to_string())],
/// };
///
/// assert_eq!(response.text().as_deref(), Some("Once upon a time"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Single-output text response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![Output::Text(text.into())],
        }
    }

    /// Concatenated textual payload of all outputs, `None` when there are none.
    ///
    /// JSON outputs are rendered back to their compact string form.
    pub fn text(&self) -> Option<String> {
        if self.outputs.is_empty() {
            return None;
        }
        let text = self
            .outputs
            .iter()
            .map(|output| match output {
                Output::Text(text) => text.clone(),
                Output::Json(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join("");
        Some(text)
    }
}
