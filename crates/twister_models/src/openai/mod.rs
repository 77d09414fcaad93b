//! OpenAI chat-completions driver.

mod client;
pub(crate) mod conversion;
mod dto;

pub use client::OpenAIClient;
pub use dto::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatUsage, OpenAIMessage, ResponseFormat,
};
