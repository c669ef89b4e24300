//! Common types, protocol definitions, and errors shared across `field-crypto` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
pub use protocol::Mode;
