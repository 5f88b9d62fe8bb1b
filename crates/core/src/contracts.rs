//! Contract ingestion.
//!
//! An uploaded contract arrives as `{name, content}` where `content` is a
//! base64 encoding of a UTF-8 JSON document describing the sale
//! (`{property, buyer, seller}`). This narrow shape (JSON nested inside
//! base64, not raw file bytes) is the wire contract the browser client
//! speaks and is kept exactly.
//!
//! Ingestion has two side effects: the raw decoded bytes land in the
//! contract directory as `<transaction_id>-<file_name>`, and the new
//! transaction is appended to the persisted collection. The contract file is
//! written first; if the document append then fails, the orphaned file is
//! removed so a persisted transaction never lacks its backing document.

use crate::config::CoreConfig;
use crate::error::{TransactionError, TransactionResult};
use crate::store::TransactionStore;
use crate::transaction::Transaction;
use base64::{engine::general_purpose, Engine as _};
use escrow_files::ContractStore;
use std::sync::Arc;

/// Sale details decoded from an uploaded contract document.
#[derive(Debug, serde::Deserialize)]
pub struct ContractDetails {
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub seller: String,
}

/// Service that turns an uploaded contract into a transaction plus its
/// stored document.
pub struct ContractService {
    contracts: ContractStore,
    store: Arc<TransactionStore>,
}

impl ContractService {
    /// Creates the service, creating and validating the contract directory.
    ///
    /// # Errors
    ///
    /// Returns a [`TransactionError::ContractFile`] if the contract directory
    /// cannot be created or canonicalised.
    pub fn new(cfg: &CoreConfig, store: Arc<TransactionStore>) -> TransactionResult<Self> {
        let contracts = ContractStore::new(&cfg.contracts_dir())?;
        Ok(Self { contracts, store })
    }

    /// Ingests one uploaded contract.
    ///
    /// Decodes base64 → UTF-8 → JSON, constructs the transaction, writes the
    /// contract file, then appends the transaction to the collection. Decode
    /// and parse failures leave no trace on disk.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::ContractBase64`] / [`TransactionError::ContractUtf8`] /
    ///   [`TransactionError::ContractDetails`] for an undecodable upload
    /// - [`TransactionError::ContractFile`] if the contract file write fails
    /// - the underlying storage error if the document append fails, or
    ///   [`TransactionError::CleanupAfterIngestFailed`] if removing the
    ///   orphaned contract file fails too
    pub async fn ingest(&self, name: &str, content: &str) -> TransactionResult<Transaction> {
        let raw = general_purpose::STANDARD
            .decode(content)
            .map_err(TransactionError::ContractBase64)?;
        let text = String::from_utf8(raw).map_err(TransactionError::ContractUtf8)?;
        let details: ContractDetails =
            serde_json::from_str(&text).map_err(TransactionError::ContractDetails)?;

        let transaction = Transaction::new(details.property, details.buyer, details.seller);

        // Contract file first: a persisted transaction must never lack its
        // backing document.
        let stored = self
            .contracts
            .store(&transaction.id, name, text.as_bytes())?;

        if let Err(ingest_error) = self.store.append_transaction(transaction.clone()).await {
            let path = self.contracts.path_of(&stored);
            return Err(match self.contracts.remove(&stored) {
                Ok(()) => ingest_error,
                Err(cleanup) => TransactionError::CleanupAfterIngestFailed {
                    path,
                    ingest_error: Box::new(ingest_error),
                    cleanup_error: match cleanup {
                        escrow_files::ContractFileError::Io(err) => err,
                        other => std::io::Error::other(other.to_string()),
                    },
                },
            });
        }

        tracing::info!(
            "ingested contract {} for transaction {}",
            stored.file_name,
            transaction.id
        );
        Ok(transaction)
    }

    /// The underlying contract file store.
    pub fn contracts(&self) -> &ContractStore {
        &self.contracts
    }
}
