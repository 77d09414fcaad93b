//! Error types for the Twister library.
//!
//! This crate provides the foundation error types used throughout the Twister workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The taxonomy mirrors how a generation request can fail:
//! - [`ValidationError`]: parameters rejected before any remote call
//! - [`TransportError`]: the completion or publishing service could not be reached
//! - [`MalformedResponseError`]: a response did not have the expected JSON shape
//! - [`PartialTreeError`]: generation failed after some twists were already merged
//!
//! # Examples
//!
//! ```
//! use twister_error::{TwisterResult, ValidationError, ValidationErrorKind};
//!
//! fn check_depth(depth: u32) -> TwisterResult<u32> {
//!     if depth == 0 {
//!         Err(ValidationError::new(ValidationErrorKind::ZeroDepth))?
//!     }
//!     Ok(depth)
//! }
//!
//! assert!(check_depth(0).is_err());
//! assert_eq!(check_depth(3).unwrap(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod malformed;
mod partial;
mod transport;
mod validation;

pub use config::ConfigError;
pub use error::{TwisterError, TwisterErrorKind, TwisterResult};
pub use malformed::{MalformedResponseError, MalformedResponseErrorKind};
pub use partial::PartialTreeError;
pub use transport::{TransportError, TransportErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
