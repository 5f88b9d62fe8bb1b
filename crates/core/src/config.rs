//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{CONTRACTS_DIR_NAME, DEFAULT_PORT, TRANSACTIONS_FILE_NAME};
use crate::{TransactionError, TransactionResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    public_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(data_dir: PathBuf, public_dir: PathBuf) -> Self {
        Self {
            data_dir,
            public_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the JSON document that is the system's entire persisted state.
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir.join(TRANSACTIONS_FILE_NAME)
    }

    /// Directory holding uploaded contract documents.
    pub fn contracts_dir(&self) -> PathBuf {
        self.data_dir.join(CONTRACTS_DIR_NAME)
    }

    /// Root directory of the static browser client.
    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }
}

/// Parse the listening port from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns the default port.
pub fn port_from_env_value(value: Option<String>) -> TransactionResult<u16> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| {
            v.parse::<u16>()
                .map_err(|e| TransactionError::InvalidInput(format!("invalid PORT value: {e}")))
        })
        .transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_PORT))
}
