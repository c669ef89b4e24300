//! The closed error taxonomy of the encryption engine.

use common::ServiceError;
use thiserror::Error;

/// Errors produced by the encryption engine.
///
/// There are exactly three kinds. None of them is transient, so nothing in
/// this crate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The master key is not exactly 32 bytes after decoding, or its hex
    /// encoding is malformed.
    #[error("invalid master key: expected {} bytes", crate::crypto::KEY_LEN)]
    InvalidKey,

    /// Any decryption-path failure: malformed base64, truncated payload,
    /// authentication-tag mismatch, or ciphertext sealed under another key.
    ///
    /// The cause is never reported, so callers cannot use the error as an
    /// oracle on ciphertext validity.
    #[error("decryption failed")]
    DecryptFailed,

    /// The process-wide engine was requested before a successful `init`.
    #[error("encryption engine not initialised")]
    NotInitialized,
}

impl From<CryptoError> for ServiceError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidKey => ServiceError::Unavailable(e.to_string()),
            CryptoError::DecryptFailed => ServiceError::DecryptFailed,
            CryptoError::NotInitialized => ServiceError::Unavailable(e.to_string()),
        }
    }
}
