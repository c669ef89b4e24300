//! Adapters for nullable record fields.
//!
//! An absent value is not the same as an empty one: `None` passes through
//! without touching a cipher, while `Some("")` is delegated like any other
//! string (and therefore round-trips as `Some("")`).

use super::Engine;
use crate::error::CryptoError;

impl Engine {
    /// [`Engine::encrypt_deterministic`] over an optional value.
    pub fn encrypt_deterministic_opt(&self, plaintext: Option<&str>) -> Option<String> {
        plaintext.map(|p| self.encrypt_deterministic(p))
    }

    /// [`Engine::decrypt_deterministic`] over an optional value.
    ///
    /// # Errors
    ///
    /// Propagates [`CryptoError::DecryptFailed`] from a present value.
    pub fn decrypt_deterministic_opt(
        &self,
        ciphertext: Option<&str>,
    ) -> Result<Option<String>, CryptoError> {
        ciphertext.map(|c| self.decrypt_deterministic(c)).transpose()
    }

    /// [`Engine::encrypt_probabilistic`] over an optional value.
    pub fn encrypt_probabilistic_opt(&self, plaintext: Option<&str>) -> Option<String> {
        plaintext.map(|p| self.encrypt_probabilistic(p))
    }

    /// [`Engine::decrypt_probabilistic`] over an optional value.
    ///
    /// # Errors
    ///
    /// Propagates [`CryptoError::DecryptFailed`] from a present value.
    pub fn decrypt_probabilistic_opt(
        &self,
        ciphertext: Option<&str>,
    ) -> Result<Option<String>, CryptoError> {
        ciphertext.map(|c| self.decrypt_probabilistic(c)).transpose()
    }
}
