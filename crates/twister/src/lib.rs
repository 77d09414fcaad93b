//! Twister: recursive interactive-fiction generation.
//!
//! Twister drives a chat-completion model through chained prompts to build a
//! tree of story "twists" addressed by digit strings, then uploads the finished
//! tree to a publishing API.
//!
//! # Quick Start
//!
//! ```no_run
//! use twister::{
//!     GenerationParameters, GenerationPolicy, OpenAIClient, TwistTreeGenerator, TwisterConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TwisterConfig::load()?;
//!     let client = OpenAIClient::from_config(&config.completion)?;
//!     let generator = TwistTreeGenerator::from_config(client, GenerationPolicy::v3(), &config);
//!
//!     let params = GenerationParameters::builder()
//!         .instructions("a haunted lighthouse")
//!         .branching_factor(2u32)
//!         .max_depth(4u32)
//!         .build()?;
//!
//!     let tree = generator.generate(&params).await?;
//!     println!("{}", tree.to_json());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry tracing bridge with a stdout exporter
//! - `api` - enable tests that call the real completion service
//!
//! # Architecture
//!
//! - `twister_error` - error types
//! - `twister_core` - twist ids, story trees, messages and requests
//! - `twister_interface` - the `TwisterDriver` completion trait
//! - `twister_rate_limit` - admission throttle, rate limiter and configuration
//! - `twister_models` - the OpenAI chat-completions driver
//! - `twister_story` - the generation engine
//! - `twister_publish` - the Story3 publishing client
//!
//! This crate re-exports everything for convenience.

pub use twister_core::*;
pub use twister_error::*;
pub use twister_interface::*;
pub use twister_models::*;
pub use twister_publish::*;
pub use twister_rate_limit::*;
pub use twister_story::*;

#[cfg(feature = "observability")]
pub mod observability;
