//! Core data types for the Twister story generation engine.
//!
//! This crate provides the data model shared by every other crate: conversation
//! turns sent to the completion service, twist identifiers and content, the
//! concurrently-writable [`StoryTree`], and the parameters of a generation request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod conversation;
mod message;
mod params;
mod request;
mod role;
mod stage;
mod tree;
mod twist;

pub use conversation::Conversation;
pub use message::{Message, MessageBuilder};
pub use params::{
    GenerationParameters, GenerationParametersBuilder, GenerationParametersBuilderError,
    StoryInstructions,
};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse, Output,
};
pub use role::Role;
pub use stage::{NarrativeStage, StageMarkers};
pub use tree::StoryTree;
pub use twist::{Twist, TwistId};
