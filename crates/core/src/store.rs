//! Transaction persistence store.
//!
//! The [`TransactionStore`] owns the single JSON document that is the
//! system's entire persisted state: one array of transaction records, each
//! embedding its tasks. Every operation re-reads the full document and every
//! mutation rewrites it whole; there is no cache and no partial write.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//! └── transactions.json    # JSON array of Transaction records
//! ```
//!
//! ## Concurrency
//!
//! Each mutation runs a load → mutate-in-memory → save cycle. The cycle is
//! serialized by an async mutex owned by the store, so interleaved mutating
//! requests queue instead of losing updates. The lock is held across the file
//! I/O of one cycle and nothing else.
//!
//! ## Read Recovery
//!
//! An absent document is the normal first-run state and loads as an empty
//! collection. A document that exists but cannot be read or parsed also loads
//! as empty so the service stays available, but the failure is logged at
//! warn level with the underlying error.

use crate::config::CoreConfig;
use crate::error::{TransactionError, TransactionResult};
use crate::transaction::{Task, Transaction};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Store owning the transactions document.
///
/// Constructed once at startup and shared across handlers; `load`/`save` are
/// its only mutation surface.
#[derive(Debug)]
pub struct TransactionStore {
    document_path: PathBuf,
    write_lock: Mutex<()>,
}

impl TransactionStore {
    /// Creates a store for the transactions document of `cfg`.
    ///
    /// Performs no I/O; the document and its directory are created on the
    /// first successful save.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            document_path: cfg.transactions_file(),
            write_lock: Mutex::new(()),
        }
    }

    /// The full ordered transaction collection.
    pub async fn list(&self) -> Vec<Transaction> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    /// Creates a transaction with an empty checklist and persists it.
    pub async fn create_transaction(
        &self,
        property: String,
        buyer: String,
        seller: String,
    ) -> TransactionResult<Transaction> {
        let transaction = Transaction::new(property, buyer, seller);
        self.append_transaction(transaction.clone()).await?;
        Ok(transaction)
    }

    /// Appends an already-constructed transaction to the collection.
    ///
    /// Used by contract ingestion, where the transaction id must exist before
    /// the document write (the contract file is named after it).
    pub async fn append_transaction(&self, transaction: Transaction) -> TransactionResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut transactions = self.load().await;
        transactions.push(transaction);
        self.save(&transactions).await
    }

    /// Appends a task to the transaction with id `transaction_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::TransactionNotFound`] if no such
    /// transaction exists, or a storage error if the save fails.
    pub async fn append_task(
        &self,
        transaction_id: &str,
        description: String,
        due_date: Option<String>,
    ) -> TransactionResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut transactions = self.load().await;

        let transaction = transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| TransactionError::TransactionNotFound(transaction_id.to_owned()))?;

        let task = Task::new(description, due_date);
        transaction.tasks.push(task.clone());

        self.save(&transactions).await?;
        Ok(task)
    }

    /// Toggles the completion flag of one task.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::TransactionNotFound`] or
    /// [`TransactionError::TaskNotFound`] when either id is unknown, or a
    /// storage error if the save fails.
    pub async fn toggle_task(
        &self,
        transaction_id: &str,
        task_id: &str,
    ) -> TransactionResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut transactions = self.load().await;

        let task = {
            let transaction = transactions
                .iter_mut()
                .find(|t| t.id == transaction_id)
                .ok_or_else(|| TransactionError::TransactionNotFound(transaction_id.to_owned()))?;
            let task = transaction
                .task_mut(task_id)
                .ok_or_else(|| TransactionError::TaskNotFound(task_id.to_owned()))?;
            task.toggle();
            task.clone()
        };

        self.save(&transactions).await?;
        Ok(task)
    }

    /// Reads the whole document, recovering to an empty collection on any
    /// read or parse failure (absent file silently, anything else logged).
    async fn load(&self) -> Vec<Transaction> {
        let bytes = match tokio::fs::read(&self.document_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(
                    "transactions document {} is unreadable, serving an empty collection: {}",
                    self.document_path.display(),
                    err
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(transactions) => transactions,
            Err(err) => {
                tracing::warn!(
                    "transactions document {} is corrupt, serving an empty collection: {}",
                    self.document_path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Serializes the full collection and overwrites the document.
    async fn save(&self, transactions: &[Transaction]) -> TransactionResult<()> {
        if let Some(parent) = self.document_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(TransactionError::DataDirCreation)?;
        }

        let body = serde_json::to_vec_pretty(transactions)
            .map_err(TransactionError::Serialization)?;

        tokio::fs::write(&self.document_path, body)
            .await
            .map_err(TransactionError::FileWrite)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> TransactionStore {
        let cfg = CoreConfig::new(temp.path().join("data"), temp.path().join("public"));
        TransactionStore::new(&cfg)
    }

    #[tokio::test]
    async fn created_transaction_is_listed_exactly_once() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let created = store
            .create_transaction("12 Elm St".into(), "A".into(), "B".into())
            .await
            .unwrap();

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert!(listed[0].tasks.is_empty());
    }

    #[tokio::test]
    async fn save_creates_the_data_directory() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        assert!(!temp.path().join("data").exists());
        store
            .create_transaction("12 Elm St".into(), "A".into(), "B".into())
            .await
            .unwrap();

        assert!(temp.path().join("data/transactions.json").is_file());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        for street in ["1 First St", "2 Second St", "3 Third St"] {
            store
                .create_transaction(street.into(), "A".into(), "B".into())
                .await
                .unwrap();
        }

        let properties: Vec<String> = store
            .list()
            .await
            .into_iter()
            .map(|t| t.property)
            .collect();
        assert_eq!(properties, ["1 First St", "2 Second St", "3 Third St"]);
    }

    #[tokio::test]
    async fn append_task_requires_known_transaction() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let result = store
            .append_task("no-such-id", "Inspection".into(), None)
            .await;

        assert!(matches!(
            result,
            Err(TransactionError::TransactionNotFound(_))
        ));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn appended_task_persists_on_its_transaction() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let tx = store
            .create_transaction("12 Elm St".into(), "A".into(), "B".into())
            .await
            .unwrap();
        let task = store
            .append_task(&tx.id, "Inspection".into(), Some("2024-05-01".into()))
            .await
            .unwrap();

        assert!(!task.completed);

        let listed = store.list().await;
        assert_eq!(listed[0].tasks.len(), 1);
        assert_eq!(listed[0].tasks[0].id, task.id);
        assert_eq!(listed[0].tasks[0].due_date.as_deref(), Some("2024-05-01"));
    }

    #[tokio::test]
    async fn toggle_flips_and_double_toggle_restores() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let tx = store
            .create_transaction("12 Elm St".into(), "A".into(), "B".into())
            .await
            .unwrap();
        let task = store
            .append_task(&tx.id, "Inspection".into(), None)
            .await
            .unwrap();

        let toggled = store.toggle_task(&tx.id, &task.id).await.unwrap();
        assert!(toggled.completed);

        let restored = store.toggle_task(&tx.id, &task.id).await.unwrap();
        assert!(!restored.completed);
        assert!(!store.list().await[0].tasks[0].completed);
    }

    #[tokio::test]
    async fn toggle_distinguishes_missing_transaction_from_missing_task() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let tx = store
            .create_transaction("12 Elm St".into(), "A".into(), "B".into())
            .await
            .unwrap();

        assert!(matches!(
            store.toggle_task("no-such-tx", "whatever").await,
            Err(TransactionError::TransactionNotFound(_))
        ));
        assert!(matches!(
            store.toggle_task(&tx.id, "no-such-task").await,
            Err(TransactionError::TaskNotFound(_))
        ));
    }

    #[tokio::test]
    async fn absent_document_loads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_document_loads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        std::fs::create_dir_all(temp.path().join("data")).unwrap();
        std::fs::write(temp.path().join("data/transactions.json"), b"{ not json").unwrap();

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn document_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();

        let tx = {
            let store = test_store(&temp);
            store
                .create_transaction("12 Elm St".into(), "A".into(), "B".into())
                .await
                .unwrap()
        };

        // A second store over the same path sees the saved state.
        let reopened = test_store(&temp);
        let listed = reopened.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, tx.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_task_creation_loses_no_tasks() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(test_store(&temp));

        let tx = store
            .create_transaction("12 Elm St".into(), "A".into(), "B".into())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let id = tx.id.clone();
            handles.push(tokio::spawn(async move {
                store.append_task(&id, format!("task {i}"), None).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await[0].tasks.len(), 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_transaction_creation_loses_no_transactions() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(test_store(&temp));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create_transaction(format!("{i} Elm St"), "A".into(), "B".into())
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.len(), 8);
    }
}
