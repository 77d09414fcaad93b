//! OpenAI chat-completions client.

use super::{ChatCompletionResponse, conversion};
use async_trait::async_trait;
use reqwest::Client;
use twister_core::{GenerateRequest, GenerateResponse};
use twister_error::{
    TransportError, TransportErrorKind, TwisterResult, ValidationError, ValidationErrorKind,
};
use twister_interface::TwisterDriver;
use twister_rate_limit::{CompletionConfig, RateLimiter};
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// OpenAI chat-completions client.
///
/// JSON mode on a [`GenerateRequest`] maps to `response_format: {"type": "json_object"}`.
/// When a [`RateLimiter`] is attached, each call holds a slot for its duration.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    rate_limiter: Option<RateLimiter>,
}

impl OpenAIClient {
    /// Creates a client reading the API key from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the API key is not set in the environment.
    #[instrument(skip_all)]
    pub fn new(model: impl Into<String>) -> TwisterResult<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            ValidationError::new(ValidationErrorKind::MissingCredential(
                API_KEY_VAR.to_string(),
            ))
        })?;
        Ok(Self::with_api_key(api_key, model))
    }

    /// Creates a client with a specific API key.
    pub fn with_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            rate_limiter: None,
        }
    }

    /// Creates a client from the `[completion]` section, key from the environment.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the API key is not set in the environment.
    pub fn from_config(config: &CompletionConfig) -> TwisterResult<Self> {
        let client = Self::new(config.model.clone())?.with_base_url(config.base_url.clone());
        Ok(match RateLimiter::from_config(config) {
            Some(limiter) => client.with_rate_limiter(limiter),
            None => client,
        })
    }

    /// Overrides the chat-completions endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attaches a rate limiter acquired before every call.
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// The endpoint requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TwisterDriver for OpenAIClient {
    #[instrument(
        skip(self, req),
        fields(model = %self.model, messages = req.messages.len(), json_mode = req.json_mode)
    )]
    async fn generate(&self, req: &GenerateRequest) -> TwisterResult<GenerateResponse> {
        let body = conversion::to_openai_request(req, &self.model)?;

        let _guard = match &self.rate_limiter {
            Some(limiter) => Some(limiter.acquire().await),
            None => None,
        };

        debug!(url = %self.base_url, "Sending chat completion request");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                TransportError::new(TransportErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TransportError::from_status(status.as_u16(), error_text).into());
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            TransportError::new(TransportErrorKind::Http(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        debug!(choices = parsed.choices().len(), "Chat completion received");
        conversion::from_openai_response(&parsed)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
