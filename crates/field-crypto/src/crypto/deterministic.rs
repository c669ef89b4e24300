//! Deterministic mode: equal plaintexts give equal ciphertexts.
//!
//! The nonce is `HMAC-SHA256(subkey, plaintext)` truncated to [`NONCE_LEN`]
//! bytes, so it is bound to the exact plaintext. Two stored ciphertexts are
//! equal iff their plaintexts were equal, which is what makes equality
//! lookups on encrypted columns possible.
//!
//! This leaks equality patterns (frequency analysis on repeated values).
//! Fields that are never searched belong in the probabilistic mode.

use aes_gcm_siv::{
    aead::{Key, KeyInit},
    Aes256GcmSiv,
};
use hmac::Mac;

use super::cipher::{open, seal, NONCE_LEN};
use super::kdf::{HmacSha256, SubKey};
use crate::error::CryptoError;

/// Cipher state for the deterministic mode, keyed once at construction.
///
/// The AES key schedule and the retained nonce key are both zeroed on drop.
#[derive(Clone)]
pub struct DeterministicCipher {
    aead: Aes256GcmSiv,
    nonce_key: SubKey,
}

impl DeterministicCipher {
    /// Build the cipher from the deterministic subkey.
    pub fn new(subkey: &SubKey) -> Self {
        let aead = Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(subkey.as_bytes()));
        Self {
            aead,
            nonce_key: subkey.clone(),
        }
    }

    /// Encrypt `plaintext`; the empty string maps to the empty string.
    ///
    /// # Panics
    ///
    /// Panics if `plaintext` exceeds the AES-GCM-SIV message limit of 2^36 bytes.
    pub fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }
        seal(&self.aead, self.nonce_for(plaintext), plaintext).to_string_repr()
    }

    /// Decrypt a value produced by [`DeterministicCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DecryptFailed`] on malformed base64, a payload
    /// shorter than the nonce, or failed authentication.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }
        open(&self.aead, ciphertext)
    }

    fn nonce_for(&self, plaintext: &str) -> [u8; NONCE_LEN] {
        // Keyed per call: hmac keeps no zeroizing state of its own.
        let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(self.nonce_key.as_bytes()) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        mac.update(plaintext.as_bytes());
        let digest = mac.finalize().into_bytes();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }
}

impl std::fmt::Debug for DeterministicCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DeterministicCipher([REDACTED])")
    }
}
