//! Trait definitions for the Twister story generation engine.
//!
//! The completion service is a black box to the engine: it takes a conversation
//! and returns one assistant turn. [`TwisterDriver`] is that boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::TwisterDriver;
