//! Probabilistic mode: a fresh random nonce for every encryption.

use aes_gcm_siv::{
    aead::{rand_core::RngCore, Key, KeyInit, OsRng},
    Aes256GcmSiv,
};

use super::cipher::{open, seal, NONCE_LEN};
use super::kdf::SubKey;
use crate::error::CryptoError;

/// Cipher state for the probabilistic mode, keyed once at construction.
#[derive(Clone)]
pub struct ProbabilisticCipher {
    aead: Aes256GcmSiv,
}

impl ProbabilisticCipher {
    /// Build the cipher from the probabilistic subkey.
    pub fn new(subkey: &SubKey) -> Self {
        Self {
            aead: Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(subkey.as_bytes())),
        }
    }

    /// Encrypt `plaintext` under a random 96-bit nonce from the OS CSPRNG.
    ///
    /// Repeated calls with the same input give different outputs. The empty
    /// string maps to the empty string.
    ///
    /// # Panics
    ///
    /// Panics if `plaintext` exceeds the AES-GCM-SIV message limit of 2^36 bytes.
    pub fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        seal(&self.aead, nonce, plaintext).to_string_repr()
    }

    /// Decrypt a value produced by [`ProbabilisticCipher::encrypt`].
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
}

impl std::fmt::Debug for ProbabilisticCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProbabilisticCipher([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::{MasterKey, PROBABILISTIC_LABEL};
    use crate::crypto::{EncryptedField, KEY_LEN};

    fn cipher() -> ProbabilisticCipher {
        let master = MasterKey::from_bytes(&[0x42u8; KEY_LEN]).unwrap();
        ProbabilisticCipher::new(&master.derive(PROBABILISTIC_LABEL))
    }

    #[test]
    fn repeated_encryption_differs() {
        let c = cipher();
        let a = c.encrypt("free text about the applicant");
        let b = c.encrypt("free text about the applicant");
        assert_ne!(a, b);
        assert_ne!(
            EncryptedField::from_str(&a).unwrap().nonce,
            EncryptedField::from_str(&b).unwrap().nonce
        );
    }

    #[test]
    fn round_trip() {
        let c = cipher();
        let ct = c.encrypt("Jl. Merdeka No. 1");
        assert_eq!(c.decrypt(&ct).unwrap(), "Jl. Merdeka No. 1");
    }

    #[test]
    fn empty_string_passes_through() {
        let c = cipher();
        assert_eq!(c.encrypt(""), "");
        assert_eq!(c.decrypt("").unwrap(), "");
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(cipher().decrypt("%%%").unwrap_err(), CryptoError::DecryptFailed);
    }
}
