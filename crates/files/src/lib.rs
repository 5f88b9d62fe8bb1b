//! Escrow Contract Storage
//!
//! This crate stores the uploaded contract documents that accompany
//! transactions in the Escrow tracker.
//!
//! ## Design Principles
//!
//! - The transaction collection (semantic data) and contract bytes (binary
//!   data) are deliberately separated
//! - Contract files are written once and never modified afterwards
//! - Each file is owned by exactly one transaction, encoded in its name
//! - The transaction document remains valid even when a contract file is
//!   absent
//!
//! ## Storage Layout
//!
//! All contract files live in a single flat directory alongside the
//! transaction document:
//!
//! ```text
//! data/
//! ├── transactions.json
//! └── contracts/
//!     └── <transaction_id>-<original_file_name>
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use escrow_files::ContractStore;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ContractStore::new(Path::new("data/contracts"))?;
//! let stored = store.store("2f9d2a17", "deed.pdf", b"%PDF-1.7 ...")?;
//! assert_eq!(stored.file_name, "2f9d2a17-deed.pdf");
//! # Ok(())
//! # }
//! ```

mod contracts;

pub use contracts::{ContractFile, ContractStore, DEFAULT_CONTRACT_FILE_NAME};

/// Errors that can occur during contract file operations
#[derive(Debug, thiserror::Error)]
pub enum ContractFileError {
    /// Contract directory could not be created or is not a directory
    #[error("Invalid contract directory: {0}")]
    InvalidContractDirectory(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
