//! The encryption engine handle and the trait collaborators depend on.
//!
//! # Lifecycle
//!
//! 1. The composition root builds one [`Engine`] from the master key, either
//!    directly ([`Engine::new`], [`Engine::from_hex`]) or through the
//!    process-wide [`holder`].
//! 2. The master key is zeroed as soon as both subkeys are derived; the
//!    subkeys live only inside the keyed cipher state.
//! 3. The engine is never mutated. Clones share the same keyed state, so the
//!    handle can be passed to every data-access component that needs it.
//!
//! # Security invariants
//!
//! - Plaintext, ciphertext and key material are **never** logged.
//! - `Debug` output of every key-bearing type is redacted.

pub mod holder;
pub mod optional;

use std::sync::Arc;

use common::Mode;

use crate::crypto::kdf::{DETERMINISTIC_LABEL, PROBABILISTIC_LABEL};
use crate::crypto::{DeterministicCipher, MasterKey, ProbabilisticCipher};
use crate::error::CryptoError;

/// Field encryption engine holding both derived keys.
///
/// Cheap to clone; `Send + Sync`; immutable after construction.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Ciphers>,
}

struct Ciphers {
    deterministic: DeterministicCipher,
    probabilistic: ProbabilisticCipher,
}

impl Engine {
    /// Build an engine from raw master key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] unless `master_key` is exactly 32 bytes.
    pub fn new(master_key: &[u8]) -> Result<Self, CryptoError> {
        let master = MasterKey::from_bytes(master_key)?;
        Ok(Self::from_master(&master))
    }

    /// Build an engine from a hex-encoded master key (64 hex digits).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the string is not valid hex or
    /// does not decode to exactly 32 bytes.
    pub fn from_hex(master_key_hex: &str) -> Result<Self, CryptoError> {
        let master = MasterKey::from_hex(master_key_hex)?;
        Ok(Self::from_master(&master))
    }

    fn from_master(master: &MasterKey) -> Self {
        let deterministic = DeterministicCipher::new(&master.derive(DETERMINISTIC_LABEL));
        let probabilistic = ProbabilisticCipher::new(&master.derive(PROBABILISTIC_LABEL));
        Self {
            inner: Arc::new(Ciphers {
                deterministic,
                probabilistic,
            }),
        }
    }

    /// Encrypt so that equal plaintexts give equal ciphertexts.
    ///
    /// `""` encrypts to `""`.
    ///
    /// # Panics
    ///
    /// Panics if `plaintext` exceeds the AES-GCM-SIV message limit of 2^36 bytes.
    pub fn encrypt_deterministic(&self, plaintext: &str) -> String {
        self.inner.deterministic.encrypt(plaintext)
    }

    /// Decrypt a deterministic-mode ciphertext. `""` decrypts to `""`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DecryptFailed`] for any malformed, truncated,
    /// tampered or foreign ciphertext.
    pub fn decrypt_deterministic(&self, ciphertext: &str) -> Result<String, CryptoError> {
        self.inner.deterministic.decrypt(ciphertext)
    }

    /// Encrypt under a fresh random nonce. `""` encrypts to `""`.
    ///
    /// # Panics
    ///
    /// Panics if `plaintext` exceeds the AES-GCM-SIV message limit of 2^36 bytes.
    pub fn encrypt_probabilistic(&self, plaintext: &str) -> String {
        self.inner.probabilistic.encrypt(plaintext)
    }

    /// Decrypt a probabilistic-mode ciphertext. `""` decrypts to `""`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DecryptFailed`] for any malformed, truncated,
    /// tampered or foreign ciphertext.
    pub fn decrypt_probabilistic(&self, ciphertext: &str) -> Result<String, CryptoError> {
        self.inner.probabilistic.decrypt(ciphertext)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("Engine([REDACTED])")
    }
}

/// Encryption seam for data-access code.
///
/// Record readers and writers depend on this trait rather than on [`Engine`]
/// so they can be exercised against a mock.
#[cfg_attr(test, mockall::automock)]
pub trait FieldCipher {
    /// Encrypt an optional value under `mode`; `None` stays `None`.
    fn encrypt_field<'a>(&self, mode: Mode, value: Option<&'a str>) -> Option<String>;

    /// Decrypt an optional value under `mode`; `None` stays `None`.
    fn decrypt_field<'a>(&self, mode: Mode, value: Option<&'a str>) -> Result<Option<String>, CryptoError>;
}

impl FieldCipher for Engine {
    fn encrypt_field<'a>(&self, mode: Mode, value: Option<&'a str>) -> Option<String> {
        match mode {
            Mode::Deterministic => self.encrypt_deterministic_opt(value),
            Mode::Probabilistic => self.encrypt_probabilistic_opt(value),
        }
    }

    fn decrypt_field<'a>(&self, mode: Mode, value: Option<&'a str>) -> Result<Option<String>, CryptoError> {
        match mode {
            Mode::Deterministic => self.decrypt_deterministic_opt(value),
            Mode::Probabilistic => self.decrypt_probabilistic_opt(value),
        }
    }
}
