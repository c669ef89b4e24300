//! [`EngineCell`]: one-time holder for a process-lifetime [`Engine`].
//!
//! Library code takes an [`Engine`] handle explicitly. Only the composition
//! root reaches for the process-wide cell through [`init`] and [`global`].

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::Engine;
use crate::error::CryptoError;

/// Write-once slot for an [`Engine`].
///
/// The first successful initialisation wins; later ones are validated but
/// leave the installed engine untouched. Concurrent first initialisations
/// install exactly one engine, and readers only ever see a fully built one.
#[derive(Debug)]
pub struct EngineCell {
    cell: OnceCell<Engine>,
}

impl EngineCell {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Build an engine from a hex master key and install it if the cell is empty.
    ///
    /// Returns the installed engine, which is the first one ever installed.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if `master_key_hex` is malformed,
    /// whether or not an engine is already installed.
    pub fn init(&self, master_key_hex: &str) -> Result<&Engine, CryptoError> {
        let engine = Engine::from_hex(master_key_hex)?;
        Ok(self.install(engine))
    }

    /// Install `engine` if the cell is empty; otherwise drop it.
    pub fn install(&self, engine: Engine) -> &Engine {
        let mut installed = false;
        let current = self.cell.get_or_init(|| {
            installed = true;
            engine
        });
        if installed {
            info!("field encryption engine installed");
        } else {
            debug!("field encryption engine already installed; keeping the first");
        }
        current
    }

    /// Borrow the installed engine.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NotInitialized`] if nothing has been installed.
    pub fn get(&self) -> Result<&Engine, CryptoError> {
        self.cell.get().ok_or(CryptoError::NotInitialized)
    }

    /// Returns `true` once an engine has been installed.
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for EngineCell {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: EngineCell = EngineCell::new();

/// Initialise the process-wide engine from a hex master key.
///
/// Idempotent: only the first successful call installs an engine.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKey`] if `master_key_hex` is malformed.
pub fn init(master_key_hex: &str) -> Result<(), CryptoError> {
    GLOBAL.init(master_key_hex).map(|_| ())
}

/// Borrow the process-wide engine.
///
/// # Errors
///
/// Returns [`CryptoError::NotInitialized`] if [`init`] has not succeeded yet.
pub fn global() -> Result<&'static Engine, CryptoError> {
    GLOBAL.get()
}
