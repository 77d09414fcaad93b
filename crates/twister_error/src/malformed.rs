//! Malformed response error types.

/// Ways a completion response can fail to match the expected structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MalformedResponseErrorKind {
    /// The payload did not parse as JSON
    #[display("Response is not valid JSON: {}", _0)]
    NotJson(String),
    /// The payload parsed, but is not a JSON object
    #[display("Response is not a JSON object")]
    NotAnObject,
    /// An expected twist key is absent
    #[display("Expected key '{}' is missing from the response", _0)]
    MissingKey(String),
    /// A key outside the requested set was returned
    #[display("Unexpected key '{}' in the response", _0)]
    UnexpectedKey(String),
    /// A key's value is not a `{title, body}` object
    #[display("Twist '{}' is malformed: {}", key, reason)]
    InvalidTwist {
        /// Twist key
        key: String,
        /// What was wrong with it
        reason: String,
    },
    /// Free-text story contained no paragraphs to split
    #[display("Story text contains no paragraphs")]
    NoParagraphs,
    /// A twist arrived whose parent was never produced
    #[display("Twist '{}' has no parent in the response", _0)]
    MissingParent(String),
}

/// Malformed response error with location tracking.
///
/// # Examples
///
/// ```
/// use twister_error::{MalformedResponseError, MalformedResponseErrorKind};
///
/// let err = MalformedResponseError::new(MalformedResponseErrorKind::MissingKey("01".into()));
/// assert!(format!("{}", err).contains("'01'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Malformed Response: {} at line {} in {}", kind, line, file)]
pub struct MalformedResponseError {
    kind: MalformedResponseErrorKind,
    line: u32,
    file: &'static str,
}

impl MalformedResponseError {
    /// Create a new malformed response error with caller location tracking.
    #[track_caller]
    pub fn new(kind: MalformedResponseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MalformedResponseErrorKind {
        &self.kind
    }
}

impl From<serde_json::Error> for MalformedResponseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(MalformedResponseErrorKind::NotJson(err.to_string()))
    }
}
