//! Field-level encryption for data records.
//!
//! One 32-byte master key is split by HMAC-SHA256 into two subkeys:
//!
//! - **Deterministic** mode ([`Engine::encrypt_deterministic`]) binds the
//!   nonce to the plaintext, so equal values encrypt identically and
//!   encrypted columns can still be compared for equality.
//! - **Probabilistic** mode ([`Engine::encrypt_probabilistic`]) draws a fresh
//!   random nonce per call and is the default for everything that is never
//!   searched.
//!
//! Both use AES-256-GCM-SIV and emit `base64(nonce || ciphertext || tag)`.
//! Every decryption failure is reported as the single
//! [`CryptoError::DecryptFailed`].

pub mod crypto;
pub mod engine;
pub mod error;
pub mod record;

pub use crypto::generate_master_key_hex;
pub use engine::holder::{global, init, EngineCell};
pub use engine::{Engine, FieldCipher};
pub use error::CryptoError;
pub use record::{decrypt_record, encrypt_record, FieldPolicy, PolicyError};
