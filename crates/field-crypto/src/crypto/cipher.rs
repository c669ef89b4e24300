//! AES-256-GCM-SIV sealing and opening of individual string fields.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is nonce-misuse-resistant.
//! The deterministic mode reuses a nonce whenever it sees the same plaintext,
//! and GCM-SIV keeps that safe: a repeated (nonce, plaintext) pair only
//! reveals that the plaintexts were equal.
//!
//! **Do NOT substitute plain AES-256-GCM with a fixed nonce.** GCM nonce reuse
//! across different plaintexts breaks both confidentiality and authentication.

use aes_gcm_siv::{aead::Aead, Aes256GcmSiv, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::CryptoError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// A parsed, encrypted field value.
///
/// The string representation is `base64(nonce || ciphertext+tag)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedField {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

impl EncryptedField {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        let mut raw = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.ciphertext);
        STANDARD.encode(raw)
    }

    /// Parse an encrypted field string back into an [`EncryptedField`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DecryptFailed`] if the string is not valid
    /// base64 or decodes to fewer than [`NONCE_LEN`] bytes.
    pub fn from_str(s: &str) -> Result<Self, CryptoError> {
        let raw = STANDARD.decode(s).map_err(|_| CryptoError::DecryptFailed)?;
        if raw.len() < NONCE_LEN {
            return Err(CryptoError::DecryptFailed);
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

/// Encrypt `plaintext` under `cipher` with the given nonce and no associated data.
///
/// # Panics
///
/// Panics if `plaintext` exceeds the AES-GCM-SIV message limit of 2^36 bytes.
pub(crate) fn seal(cipher: &Aes256GcmSiv, nonce: [u8; NONCE_LEN], plaintext: &str) -> EncryptedField {
    let ciphertext = match cipher.encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes()) {
        Ok(ct) => ct,
        Err(_) => panic!(
            "plaintext of {} bytes exceeds the AES-GCM-SIV message limit",
            plaintext.len()
        ),
    };
    EncryptedField { nonce, ciphertext }
}

/// Parse, authenticate and decrypt an encoded field.
///
/// Every failure collapses into [`CryptoError::DecryptFailed`].
pub(crate) fn open(cipher: &Aes256GcmSiv, encoded: &str) -> Result<String, CryptoError> {
    let field = EncryptedField::from_str(encoded)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&field.nonce), field.ciphertext.as_ref())
        .map_err(|_| CryptoError::DecryptFailed)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_gcm_siv::aead::KeyInit;

    fn cipher(byte: u8) -> Aes256GcmSiv {
        Aes256GcmSiv::new_from_slice(&[byte; KEY_LEN]).unwrap()
    }

    #[test]
    fn seal_open_round_trip() {
        let c = cipher(0x42);
        let encoded = seal(&c, [1u8; NONCE_LEN], "123-45-6789").to_string_repr();
        assert_eq!(open(&c, &encoded).unwrap(), "123-45-6789");
    }

    #[test]
    fn layout_is_nonce_then_ciphertext_and_tag() {
        let c = cipher(0x42);
        let field = seal(&c, [9u8; NONCE_LEN], "hello");
        let raw = STANDARD.decode(field.to_string_repr()).unwrap();
        assert_eq!(&raw[..NONCE_LEN], &[9u8; NONCE_LEN]);
        // 5 plaintext bytes + 16-byte tag.
        assert_eq!(raw.len(), NONCE_LEN + 5 + 16);
    }

    #[test]
    fn string_repr_round_trip() {
        let field = seal(&cipher(1), [3u8; NONCE_LEN], "hello");
        let parsed = EncryptedField::from_str(&field.to_string_repr()).unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn from_str_rejects_bad_base64() {
        assert_eq!(
            EncryptedField::from_str("!!!not base64!!!").unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn from_str_rejects_short_payload() {
        let short = STANDARD.encode([0u8; NONCE_LEN - 1]);
        assert_eq!(
            EncryptedField::from_str(&short).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn nonce_only_payload_fails_auth() {
        let bare = STANDARD.encode([0u8; NONCE_LEN]);
        assert_eq!(open(&cipher(1), &bare).unwrap_err(), CryptoError::DecryptFailed);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let encoded = seal(&cipher(1), [0u8; NONCE_LEN], "secret").to_string_repr();
        assert_eq!(open(&cipher(2), &encoded).unwrap_err(), CryptoError::DecryptFailed);
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let c = cipher(5);
        let mut field = seal(&c, [0u8; NONCE_LEN], "tamper me");
        // Flip a byte in the ciphertext to simulate tampering.
        field.ciphertext[0] ^= 0xFF;
        assert_eq!(
            open(&c, &field.to_string_repr()).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn non_utf8_plaintext_rejected() {
        let c = cipher(6);
        let nonce = [0u8; NONCE_LEN];
        let ciphertext = c
            .encrypt(Nonce::from_slice(&nonce), &[0xFFu8, 0xFE][..])
            .unwrap();
        let encoded = EncryptedField { nonce, ciphertext }.to_string_repr();
        assert_eq!(open(&c, &encoded).unwrap_err(), CryptoError::DecryptFailed);
    }
}
