//! HTTP client for the Story3 API.

use super::dto::{CreateStoryRequest, CreateTwistRequest, CreatedResponse};
use crate::PublishingApi;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, instrument};
use twister_core::Twist;
use twister_error::{
    MalformedResponseError, MalformedResponseErrorKind, TransportError, TransportErrorKind,
    TwisterResult, ValidationError, ValidationErrorKind,
};
use twister_rate_limit::PublishConfig;

const TOKEN_VAR: &str = "STORY3_TOKEN";
const AUTH_HEADER: &str = "x-auth-token";

/// Story3 publishing client authenticated with an `x-auth-token` header.
#[derive(Debug, Clone)]
pub struct Story3Client {
    client: Client,
    token: String,
    base_url: String,
}

impl Story3Client {
    /// Creates a client reading the token from `STORY3_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the token is not set in the environment.
    pub fn new(base_url: impl Into<String>) -> TwisterResult<Self> {
        let token = std::env::var(TOKEN_VAR).map_err(|_| {
            ValidationError::new(ValidationErrorKind::MissingCredential(TOKEN_VAR.to_string()))
        })?;
        Ok(Self::with_token(token, base_url))
    }

    /// Creates a client with an explicit token.
    pub fn with_token(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    /// Creates a client from the `[publish]` section, token from the environment.
    pub fn from_config(config: &PublishConfig) -> TwisterResult<Self> {
        Self::new(config.base_url.clone())
    }

    /// The API root requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path` below the API root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> TwisterResult<Response> {
        let url = self.endpoint(path);
        debug!(url = %url, "Posting to publishing API");

        let response = self
            .client
            .post(&url)
            .header(AUTH_HEADER, &self.token)
            .json(body)
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
        Ok(response)
    }

    async fn create(&self, path: &str, body: &impl Serialize) -> TwisterResult<String> {
        let response = self.post(path, body).await?;
        let text = response.text().await.map_err(|e| {
            TransportError::new(TransportErrorKind::Http(format!(
                "Failed to read response: {}",
                e
            )))
        })?;
        let created: CreatedResponse = serde_json::from_str(&text).map_err(|_| {
            MalformedResponseError::new(MalformedResponseErrorKind::MissingKey(
                "hashId".to_string(),
            ))
        })?;
        Ok(created.hash_id().clone())
    }
}

#[async_trait]
impl PublishingApi for Story3Client {
    #[instrument(skip_all)]
    async fn create_story(&self, twist: &Twist) -> TwisterResult<String> {
        self.create("stories", &CreateStoryRequest::from(twist)).await
    }

    #[instrument(skip(self, twist))]
    async fn create_twist(&self, parent_hash_id: &str, twist: &Twist) -> TwisterResult<String> {
        self.create("twists", &CreateTwistRequest::new(parent_hash_id, twist))
            .await
    }

    #[instrument(skip(self))]
    async fn publish_twist(&self, hash_id: &str) -> TwisterResult<()> {
        self.post(&format!("twists/{}/publish", hash_id), &serde_json::json!({}))
            .await?;
        Ok(())
    }
}
