//! Trait definitions for completion backends.

use async_trait::async_trait;
use std::sync::Arc;
use twister_core::{GenerateRequest, GenerateResponse};
use twister_error::TwisterResult;

/// Core trait that all completion backends must implement.
///
/// Implementations perform exactly one remote call per `generate` and must not
/// retry internally; transport failures surface as `TransportError`.
#[async_trait]
pub trait TwisterDriver: Send + Sync {
    /// Generate one assistant turn for the request's conversation.
    async fn generate(&self, req: &GenerateRequest) -> TwisterResult<GenerateResponse>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-3.5-turbo-1106").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D: TwisterDriver + ?Sized> TwisterDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> TwisterResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: TwisterDriver + ?Sized> TwisterDriver for Box<D> {
    async fn generate(&self, req: &GenerateRequest) -> TwisterResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
