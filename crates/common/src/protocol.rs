//! Request and response types exchanged with the command-line front end.
//!
//! Each request and each response is a single JSON object on its own line.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encryption mode
// ---------------------------------------------------------------------------

/// Which cipher a field is protected with.
///
/// Ciphertext carries no mode tag, so the caller must remember which mode
/// was used for every stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Equal plaintexts encrypt to equal ciphertexts; supports equality lookups.
    Deterministic,
    /// Fresh random nonce per call; use for every field that is never searched.
    Probabilistic,
}

impl Mode {
    /// Lowercase name, as used in configuration and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Deterministic => "deterministic",
            Mode::Probabilistic => "probabilistic",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deterministic" => Ok(Mode::Deterministic),
            "probabilistic" => Ok(Mode::Probabilistic),
            other => Err(format!("unknown encryption mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One request line.
///
/// `value` is optional: an absent or `null` value passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Encrypt a single field value.
    Encrypt {
        /// Cipher to use.
        mode: Mode,
        /// Plaintext, or `null`.
        #[serde(default)]
        value: Option<String>,
    },
    /// Decrypt a single field value.
    Decrypt {
        /// Cipher the value was encrypted with.
        mode: Mode,
        /// Base64 ciphertext, or `null`.
        #[serde(default)]
        value: Option<String>,
    },
    /// Encrypt every policy field of a JSON record.
    EncryptRecord {
        /// The record to transform.
        payload: serde_json::Value,
    },
    /// Decrypt every policy field of a JSON record.
    DecryptRecord {
        /// The record to transform.
        payload: serde_json::Value,
    },
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One response line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// The request failed; see [`ErrorResponse`].
    Error {
        /// Error details.
        error: ErrorResponse,
    },
    /// Result of a record operation.
    Record {
        /// Transformed record.
        payload: serde_json::Value,
    },
    /// Result of a single-field operation.
    Value {
        /// Transformed value, `null` when the input was `null`.
        value: Option<String>,
    },
}

/// Standard error body returned for any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(e: &crate::ServiceError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}
