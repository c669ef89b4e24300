//! Record-level encryption driven by a field policy.
//!
//! A [`FieldPolicy`] names the dot-notation paths of a JSON record that hold
//! protected values (e.g. `"email"`, `"guardians[].phone"`) and the mode each
//! one is encrypted with. [`encrypt_record`] and [`decrypt_record`] apply it
//! through any [`crate::FieldCipher`].
//!
//! # Module invariants
//!
//! - Decryption is all-or-nothing: one failing field fails the record.
//! - `null` fields stay `null`; fields absent from the record stay absent.

pub mod codec;
pub mod policy;

pub use codec::{decrypt_record, encrypt_record};
pub use policy::{FieldPolicy, PolicyError};
