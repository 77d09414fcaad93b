//! Top-level error wrapper types.

use crate::{
    ConfigError, MalformedResponseError, PartialTreeError, TransportError, ValidationError,
};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use twister_error::{TwisterError, TransportError, TransportErrorKind};
///
/// let err: TwisterError = TransportError::new(TransportErrorKind::EmptyChoice).into();
/// assert!(format!("{}", err).contains("no choices"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TwisterErrorKind {
    /// Rejected parameters
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Completion or publishing service unreachable or rejected the call
    #[from(TransportError)]
    Transport(TransportError),
    /// Response structure absent or unparsable
    #[from(MalformedResponseError)]
    MalformedResponse(MalformedResponseError),
    /// Generation failed after some twists were merged
    #[from(PartialTreeError)]
    PartialTree(PartialTreeError),
    /// Configuration could not be loaded
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Twister error with kind discrimination.
///
/// # Examples
///
/// ```
/// use twister_error::{TwisterResult, ConfigError};
///
/// fn might_fail() -> TwisterResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Twister Error: {}", _0)]
pub struct TwisterError(Box<TwisterErrorKind>);

impl TwisterError {
    /// Create a new error from a kind.
    pub fn new(kind: TwisterErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TwisterErrorKind {
        &self.0
    }

    /// Unwrap into the error kind.
    pub fn into_kind(self) -> TwisterErrorKind {
        *self.0
    }

    /// Whether the failure is a transient transport condition.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            TwisterErrorKind::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to TwisterErrorKind
impl<T> From<T> for TwisterError
where
    T: Into<TwisterErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Twister operations.
pub type TwisterResult<T> = std::result::Result<T, TwisterError>;
