//! Recursive twist-tree generation engine.
//!
//! A story is a tree of twists addressed by digit strings: the root is `"0"`,
//! its children `"00"`, `"01"`, and so on. [`TwistTreeGenerator`] builds that
//! tree by chaining completion calls: one call for the root, then one call per
//! internal node requesting its whole sibling batch, fanning out concurrently
//! with each branch carrying its own copy of the conversation.
//!
//! The variants differ only in their [`GenerationPolicy`]:
//!
//! - [`BranchingPolicy`]: constant width, or decaying towards a linear tail
//! - [`StagePolicy`]: optional climax and resolution hints at fixed depths
//! - [`TreeStrategy`]: recursive expansion, one single-shot call, or a
//!   paragraph-split linear / semi-linear story
//! - [`FailurePolicy`]: abort, or surface the partially merged tree
//!
//! # Example
//!
//! ```no_run
//! use twister_core::GenerationParameters;
//! use twister_models::OpenAIClient;
//! use twister_story::{GenerationPolicy, TwistTreeGenerator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAIClient::new("gpt-3.5-turbo-1106")?;
//! let generator = TwistTreeGenerator::new(client, GenerationPolicy::v2());
//!
//! let params = GenerationParameters::builder()
//!     .instructions("a haunted lighthouse")
//!     .branching_factor(2u32)
//!     .max_depth(3u32)
//!     .build()?;
//!
//! let tree = generator.generate(&params).await?;
//! println!("{}", serde_json::to_string_pretty(&tree)?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod completion;
mod extraction;
mod generator;
mod linear;
mod policy;
mod prompt;

pub use assembler::TreeAssembler;
pub use completion::CompletionAdapter;
pub use extraction::{extract_json, parse_object, parse_twist, parse_twist_batch};
pub use generator::TwistTreeGenerator;
pub use linear::{derive_title, paragraph_twist, split_paragraphs};
pub use policy::{
    BranchingPolicy, FailurePolicy, GenerationPolicy, GenerationVariant, StagePolicy, TreeStrategy,
};
pub use prompt::{JSON_SYSTEM_PROMPT, PromptBuilder};
pub use twister_core::{NarrativeStage, StageMarkers};
