//! Validation error types.

/// Specific reasons a generation or upload request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Neither free-form instructions nor a genre/topic pair was supplied
    #[display("Story instructions are required (instructions, or genres and topics)")]
    MissingInstructions,
    /// A required field was not set on a builder
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// Branching factor of zero
    #[display("Branching factor must be a positive integer")]
    ZeroBranching,
    /// Maximum depth of zero
    #[display("Maximum depth must be a positive integer")]
    ZeroDepth,
    /// Branching factor wider than the configured ceiling
    #[display("Branching factor {} exceeds the maximum of {}", requested, max)]
    BranchingTooWide {
        /// Requested branching factor
        requested: u32,
        /// Configured ceiling
        max: u32,
    },
    /// Semi-linear branch count outside 1..=3
    #[display("Semi-linear branch count must be between 1 and 3, got {}", _0)]
    InvalidBranchCount(u32),
    /// A twist id that is not a digit string descending from the root
    #[display("Invalid twist id '{}': ids are decimal digits starting with '0'", _0)]
    InvalidTwistId(String),
    /// A twist whose parent is absent from the tree being processed
    #[display("Twist '{}' has no parent in the tree", _0)]
    OrphanTwist(String),
    /// Generation target already holds twists
    #[display("Target tree already holds {} twists; generation needs an empty tree", _0)]
    TreeNotEmpty(usize),
    /// A required credential was not available in the environment
    #[display("Missing credential: {}", _0)]
    MissingCredential(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use twister_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::ZeroBranching);
/// assert_eq!(err.kind(), &ValidationErrorKind::ZeroBranching);
/// assert!(format!("{}", err).contains("positive"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}

/// Convert from derive_builder's uninitialized-field error.
impl From<String> for ValidationError {
    #[track_caller]
    fn from(msg: String) -> Self {
        Self::new(ValidationErrorKind::MissingField(msg))
    }
}
