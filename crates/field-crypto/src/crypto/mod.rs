//! AES-256-GCM-SIV field encryption primitives.
//!
//! This module is intentionally free of configuration, I/O and logging.
//! It provides the key derivation and the two cipher modes used by
//! [`crate::Engine`].
//!
//! # Ciphertext format
//!
//! ```text
//! base64(nonce[12] || ciphertext || tag[16])
//! ```
//!
//! Standard alphabet with padding. The empty string encrypts to the empty
//! string in both modes and is never passed to the AEAD.

pub mod cipher;
pub mod deterministic;
pub mod kdf;
pub mod probabilistic;

pub use cipher::{EncryptedField, KEY_LEN, NONCE_LEN};
pub use deterministic::DeterministicCipher;
pub use kdf::{derive_subkey, generate_master_key_hex, MasterKey, SubKey};
pub use probabilistic::ProbabilisticCipher;
