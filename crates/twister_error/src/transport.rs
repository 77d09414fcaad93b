//! Transport error types for the completion and publishing services.

/// Specific transport failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// The request could not be sent or the body could not be read
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// The service answered with a non-success status
    #[display("Service returned {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Credentials were rejected
    #[display("Authentication rejected: {}", _0)]
    Auth(String),
    /// Quota or rate limit exhausted on the remote side
    #[display("Rate limited by service: {}", _0)]
    RateLimited(String),
    /// The completion service returned no assistant turn
    #[display("Completion returned no choices")]
    EmptyChoice,
}

/// Transport error with location tracking.
///
/// # Examples
///
/// ```
/// use twister_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::RateLimited("slow down".into()));
/// assert!(err.is_retryable());
///
/// let err = TransportError::new(TransportErrorKind::Auth("bad key".into()));
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    kind: TransportErrorKind,
    line: u32,
    file: &'static str,
}

impl TransportError {
    /// Create a new transport error with caller location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TransportErrorKind {
        &self.kind
    }

    /// Classify an HTTP status code into the matching kind.
    #[track_caller]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = match status {
            401 | 403 => TransportErrorKind::Auth(message),
            429 => TransportErrorKind::RateLimited(message),
            _ => TransportErrorKind::Status { status, message },
        };
        Self::new(kind)
    }

    /// Whether a caller could reasonably retry this failure.
    ///
    /// Rate limiting, server errors and connection failures are transient.
    /// Nothing in the generation engine retries on its own.
    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            TransportErrorKind::Http(_) | TransportErrorKind::RateLimited(_) => true,
            TransportErrorKind::Status { status, .. } => *status >= 500,
            TransportErrorKind::Auth(_) | TransportErrorKind::EmptyChoice => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_map_to_kinds() {
        let cases = [
            (401, TransportErrorKind::Auth("body".to_string()), false),
            (403, TransportErrorKind::Auth("body".to_string()), false),
            (429, TransportErrorKind::RateLimited("body".to_string()), true),
            (
                500,
                TransportErrorKind::Status {
                    status: 500,
                    message: "body".to_string(),
                },
                true,
            ),
            (
                404,
                TransportErrorKind::Status {
                    status: 404,
                    message: "body".to_string(),
                },
                false,
            ),
        ];

        for (status, kind, retryable) in cases {
            let err = TransportError::from_status(status, "body");
            assert_eq!(err.kind(), &kind, "status {}", status);
            assert_eq!(err.is_retryable(), retryable, "status {}", status);
        }
    }

    #[test]
    fn test_empty_choice_is_not_retryable() {
        assert!(!TransportError::new(TransportErrorKind::EmptyChoice).is_retryable());
    }
}
