//! Configuration loading and validation for the `field-crypto` binary.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use field_crypto::FieldPolicy;
use serde::Deserialize;
use zeroize::Zeroizing;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte master key. **Required.**
    pub field_encryption_key: String,

    /// Record field policy: comma-separated `path:mode` pairs.
    #[serde(default)]
    pub field_policy: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parse [`Config::field_policy`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the first malformed policy entry.
    pub fn policy(&self) -> Result<FieldPolicy> {
        FieldPolicy::parse(&self.field_policy).context("FIELD_POLICY is invalid")
    }

    /// Move the hex master key out, leaving an empty string behind.
    ///
    /// The returned buffer is zeroed when dropped.
    pub fn take_key(&mut self) -> Zeroizing<String> {
        Zeroizing::new(std::mem::take(&mut self.field_encryption_key))
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    ///
    /// The key itself is checked when the engine is built, so a malformed key
    /// surfaces as `InvalidKey` rather than as a configuration error.
    fn validate(&self) -> Result<()> {
        if self.field_encryption_key.trim().is_empty() {
            anyhow::bail!("FIELD_ENCRYPTION_KEY is required and must not be empty");
        }
        self.policy()?;
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("field_encryption_key", &"[REDACTED]")
            .field("field_policy", &self.field_policy)
            .field("log_level", &self.log_level)
            .finish()
    }
}
