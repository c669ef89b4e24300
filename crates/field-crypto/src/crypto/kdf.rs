//! Master key handling and HMAC-SHA256 subkey derivation.
//!
//! One 32-byte master key yields two independent subkeys, one per cipher
//! mode, as `HMAC-SHA256(key = master, msg = label)`.

use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use super::cipher::KEY_LEN;
use crate::error::CryptoError;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Derivation label of the deterministic-mode subkey.
pub const DETERMINISTIC_LABEL: &[u8] = b"deterministic";

/// Derivation label of the probabilistic-mode subkey.
pub const PROBABILISTIC_LABEL: &[u8] = b"probabilistic";

/// The 256-bit master secret.
///
/// Only lives long enough to derive the subkeys; zeroed on drop.
pub struct MasterKey(Box<[u8; KEY_LEN]>);

impl MasterKey {
    /// Wrap raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] unless `bytes` is exactly [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey);
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Decode a hex-encoded key (64 hex digits, either case).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the string is not valid hex or
    /// does not decode to exactly [`KEY_LEN`] bytes.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = hex::decode(encoded).map_err(|_| CryptoError::InvalidKey)?;
        let key = Self::from_bytes(&decoded);
        decoded.zeroize();
        key
    }

    /// Derive the subkey bound to `label`.
    pub fn derive(&self, label: &[u8]) -> SubKey {
        SubKey(Box::new(derive_subkey(&self.0, label)))
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// A 32-byte key derived for one cipher mode. Zeroed on drop.
pub struct SubKey(Box<[u8; KEY_LEN]>);

impl SubKey {
    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Clone for SubKey {
    fn clone(&self) -> Self {
        Self(Box::new(*self.0))
    }
}

impl Drop for SubKey {
    fn drop(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl std::fmt::Debug for SubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SubKey([REDACTED])")
    }
}

/// `HMAC-SHA256(key = master, msg = label)`.
///
/// Pure: the same master key and label always give the same subkey, and
/// distinct labels give unrelated subkeys.
pub fn derive_subkey(master: &[u8; KEY_LEN], label: &[u8]) -> [u8; KEY_LEN] {
    let Ok(mut mac) = HmacSha256::new_from_slice(master) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(label);

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&mac.finalize().into_bytes());
    key
}

/// Generate a fresh random master key, hex-encoded (64 lowercase digits).
pub fn generate_master_key_hex() -> String {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    let encoded = hex::encode(key);
    key.zeroize();
    encoded
}
