//! `field-crypto` binary entry point.
//!
//! `field-crypto keygen` prints a fresh hex master key and exits.
//!
//! Otherwise the startup sequence is:
//! 1. Load and validate [`config::Config`] from environment variables.
//! 2. Initialise structured JSON logging (stderr).
//! 3. Install the process-wide encryption engine from `FIELD_ENCRYPTION_KEY`.
//! 4. Serve JSON-lines requests from stdin to stdout until EOF.

mod config;
mod serve;
mod telemetry;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("keygen") {
        println!("{}", field_crypto::generate_master_key_hex());
        return Ok(());
    }

    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let mut cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "field-crypto starting");

    // -----------------------------------------------------------------------
    // 3. Engine
    // -----------------------------------------------------------------------
    {
        let key = cfg.take_key();
        field_crypto::init(&key)
            .context("FIELD_ENCRYPTION_KEY must be 64 hex characters (32 bytes)")?;
    }
    let engine = field_crypto::global()?;
    let policy = cfg.policy()?;
    info!(policy_fields = policy.len(), "field policy loaded");

    // -----------------------------------------------------------------------
    // 4. Request loop
    // -----------------------------------------------------------------------
    serve::run(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        engine,
        &policy,
    )
    .await
}
