//! Partial tree error: generation failed after some twists were merged.

use crate::TwisterErrorKind;

/// A generation that failed part-way, carrying what was already merged.
///
/// The partial tree is kept in its serialized form (the flat id → `{title, body}`
/// mapping) so callers can persist or inspect it without the core types.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Partial Tree: generation failed with {} twists merged: {}", merged, cause)]
pub struct PartialTreeError {
    merged: usize,
    partial: serde_json::Value,
    cause: Box<TwisterErrorKind>,
    line: u32,
    file: &'static str,
}

impl PartialTreeError {
    /// Wrap the failure that interrupted generation together with the partial tree.
    #[track_caller]
    pub fn new(partial: serde_json::Value, cause: TwisterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        let merged = partial.as_object().map(|m| m.len()).unwrap_or(0);
        Self {
            merged,
            partial,
            cause: Box::new(cause),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Number of twists merged before the failure.
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// The flat id → twist mapping produced before the failure.
    pub fn partial(&self) -> &serde_json::Value {
        &self.partial
    }

    /// The failure that interrupted generation.
    pub fn cause(&self) -> &TwisterErrorKind {
        &self.cause
    }

    /// Source location where the partial result was captured.
    pub fn location(&self) -> (&'static str, u32) {
        (self.file, self.line)
    }
}
