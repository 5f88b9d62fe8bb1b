//! Directory-scoped contract file storage.
//!
//! The [`ContractStore`] writes the raw bytes of an uploaded contract to a
//! file named `<transaction_id>-<original_file_name>` inside its directory.
//! The transaction id prefix ties each file to its owning transaction and
//! keeps names unique even when two uploads share an original file name.
//!
//! # Security Model
//!
//! - The directory is canonicalised at construction time
//! - Stored names are reduced to the final path component of the supplied
//!   file name, so a client-supplied name can never navigate outside the
//!   contract directory
//! - File operations are scoped to the single configured directory

use crate::ContractFileError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Stored name used when the upload carries no usable file name.
pub const DEFAULT_CONTRACT_FILE_NAME: &str = "contract.txt";

/// Metadata for a stored contract file
///
/// Describes a single contract document after it has been written to disk.
/// The structure is serialisable so callers can log or persist an auditable
/// record of the upload.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ContractFile {
    /// Name of the file inside the contract directory,
    /// `<transaction_id>-<original_file_name>`
    pub file_name: String,

    /// Size of the stored file in bytes
    pub size_bytes: u64,

    /// Detected media type (MIME type), if available
    ///
    /// Best-effort detection from the file content; `None` when the content
    /// matches no known signature.
    pub media_type: Option<String>,

    /// UTC timestamp when the file was stored
    pub stored_at: DateTime<Utc>,
}

/// Service for storing contract documents
///
/// A `ContractStore` is bound to one directory, created and canonicalised
/// when the store is constructed. Files are written once; the store never
/// rewrites an existing contract.
#[derive(Debug)]
pub struct ContractStore {
    /// Canonicalised directory holding all contract files
    directory: PathBuf,
}

impl ContractStore {
    /// Creates a new `ContractStore` rooted at `directory`.
    ///
    /// The directory is created if it does not yet exist, then canonicalised
    /// so later joins cannot be redirected through symlinked components.
    ///
    /// # Errors
    ///
    /// Returns `ContractFileError` if the directory cannot be created, is not
    /// a directory, or cannot be canonicalised.
    pub fn new(directory: &Path) -> Result<Self, ContractFileError> {
        fs::create_dir_all(directory).map_err(|e| {
            ContractFileError::InvalidContractDirectory(format!(
                "Cannot create directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        let directory = directory.canonicalize().map_err(|e| {
            ContractFileError::InvalidContractDirectory(format!(
                "Cannot canonicalize path {}: {}",
                directory.display(),
                e
            ))
        })?;

        if !directory.is_dir() {
            return Err(ContractFileError::InvalidContractDirectory(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(Self { directory })
    }

    /// Writes the raw contract bytes for a transaction.
    ///
    /// The stored file is named `<transaction_id>-<name>` where `name` is the
    /// final path component of `original_name` (falling back to
    /// [`DEFAULT_CONTRACT_FILE_NAME`] when that yields nothing usable).
    ///
    /// # Errors
    ///
    /// Returns `ContractFileError::Io` if the file cannot be written.
    pub fn store(
        &self,
        transaction_id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<ContractFile, ContractFileError> {
        let file_name = format!("{}-{}", transaction_id, sanitize_file_name(original_name));
        let path = self.directory.join(&file_name);

        fs::write(&path, bytes).map_err(|e| {
            ContractFileError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write contract file {}: {}", path.display(), e),
            ))
        })?;

        let media_type = infer::get(bytes).map(|kind| kind.mime_type().to_owned());

        Ok(ContractFile {
            file_name,
            size_bytes: bytes.len() as u64,
            media_type,
            stored_at: Utc::now(),
        })
    }

    /// Removes a previously stored contract file.
    ///
    /// Used to clean up an orphaned file when the transaction it belongs to
    /// could not be persisted.
    ///
    /// # Errors
    ///
    /// Returns `ContractFileError::Io` if the file cannot be removed.
    pub fn remove(&self, stored: &ContractFile) -> Result<(), ContractFileError> {
        fs::remove_file(self.path_of(stored)).map_err(ContractFileError::from)
    }

    /// Absolute path of a stored contract file.
    #[must_use]
    pub fn path_of(&self, stored: &ContractFile) -> PathBuf {
        self.directory.join(&stored.file_name)
    }

    /// The canonicalised directory holding all contract files.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Reduce a client-supplied file name to a single safe path component.
fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_CONTRACT_FILE_NAME.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_new_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("contracts");

        let store = ContractStore::new(&dir).unwrap();

        assert!(dir.is_dir());
        assert!(store.directory().ends_with("contracts"));
    }

    #[test]
    fn test_store_new_rejects_file_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "occupied").unwrap();

        let store = ContractStore::new(&file);

        assert!(matches!(
            store,
            Err(ContractFileError::InvalidContractDirectory(_))
        ));
    }

    #[test]
    fn test_store_writes_prefixed_file() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let stored = store
            .store("tx-1", "deed.pdf", b"contract body")
            .unwrap();

        assert_eq!(stored.file_name, "tx-1-deed.pdf");
        assert_eq!(stored.size_bytes, 13);
        let on_disk = fs::read(store.path_of(&stored)).unwrap();
        assert_eq!(on_disk, b"contract body");
    }

    #[test]
    fn test_store_sanitizes_traversal_names() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let stored = store
            .store("tx-2", "../../etc/passwd", b"nope")
            .unwrap();

        assert_eq!(stored.file_name, "tx-2-passwd");
        assert!(store.path_of(&stored).starts_with(store.directory()));
    }

    #[test]
    fn test_store_empty_name_falls_back() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let stored = store.store("tx-3", "", b"anonymous upload").unwrap();

        assert_eq!(
            stored.file_name,
            format!("tx-3-{}", DEFAULT_CONTRACT_FILE_NAME)
        );
        assert!(store.path_of(&stored).exists());
    }

    #[test]
    fn test_store_detects_media_type() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let stored = store.store("tx-4", "scan.png", &png_header).unwrap();

        assert_eq!(stored.media_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_store_plain_text_has_no_media_type() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let stored = store.store("tx-5", "notes.txt", b"just words").unwrap();

        assert_eq!(stored.media_type, None);
    }

    #[test]
    fn test_remove_deletes_stored_file() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let stored = store.store("tx-6", "deed.pdf", b"body").unwrap();
        assert!(store.path_of(&stored).exists());

        store.remove(&stored).unwrap();

        assert!(!store.path_of(&stored).exists());
    }

    #[test]
    fn test_remove_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let stored = store.store("tx-7", "deed.pdf", b"body").unwrap();
        store.remove(&stored).unwrap();

        assert!(matches!(
            store.remove(&stored),
            Err(ContractFileError::Io(_))
        ));
    }

    #[test]
    fn test_contract_file_serialization() {
        let stored = ContractFile {
            file_name: "tx-8-deed.pdf".to_owned(),
            size_bytes: 1024,
            media_type: Some("application/pdf".to_owned()),
            stored_at: "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
        };

        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("tx-8-deed.pdf"));
        assert!(json.contains("application/pdf"));
    }

    #[test]
    fn test_same_original_name_different_transactions() {
        let temp = TempDir::new().unwrap();
        let store = ContractStore::new(temp.path()).unwrap();

        let first = store.store("tx-a", "deed.pdf", b"first").unwrap();
        let second = store.store("tx-b", "deed.pdf", b"second").unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert_eq!(fs::read(store.path_of(&first)).unwrap(), b"first");
        assert_eq!(fs::read(store.path_of(&second)).unwrap(), b"second");
    }
}
