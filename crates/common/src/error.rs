//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to the stable error codes returned to callers:
/// - [`ServiceError::BadRequest`] → `bad_request`
/// - [`ServiceError::DecryptFailed`] → `decrypt_failed`
/// - [`ServiceError::Unavailable`] → `unavailable`
/// - [`ServiceError::Internal`] → `internal_error`
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON, unknown operation or mode.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A ciphertext could not be decrypted.
    ///
    /// Carries no detail on purpose: malformed input, truncation and tag
    /// mismatch all look the same to the caller.
    #[error("decryption failed")]
    DecryptFailed,

    /// The encryption engine is not configured or not yet initialised.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the machine-readable error code that should be sent for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::DecryptFailed => "decrypt_failed",
            ServiceError::Unavailable(_) => "unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(ServiceError::DecryptFailed.code(), "decrypt_failed");
        assert_eq!(ServiceError::Unavailable("x".into()).code(), "unavailable");
        assert_eq!(ServiceError::Internal("x".into()).code(), "internal_error");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("unknown field `op`".into());
        assert!(e.to_string().contains("unknown field `op`"));
    }

    #[test]
    fn decrypt_failed_has_no_detail() {
        assert_eq!(ServiceError::DecryptFailed.to_string(), "decryption failed");
    }
}
