//! Completion service drivers for Twister.
//!
//! # Example
//!
//! ```no_run
//! use twister_models::OpenAIClient;
//! use twister_interface::TwisterDriver;
//! use twister_core::{GenerateRequest, Message};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAIClient::new("gpt-3.5-turbo-1106")?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Hello")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatUsage, OpenAIClient, OpenAIMessage, ResponseFormat,
};
