#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to read transactions document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write transactions document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize transactions: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize transactions: {0}")]
    Deserialization(serde_json::Error),

    #[error("contract content is not valid base64: {0}")]
    ContractBase64(base64::DecodeError),
    #[error("contract content is not valid UTF-8: {0}")]
    ContractUtf8(std::string::FromUtf8Error),
    #[error("contract details are not valid JSON: {0}")]
    ContractDetails(serde_json::Error),
    #[error("contract file error: {0}")]
    ContractFile(#[from] escrow_files::ContractFileError),
    #[error(
        "ingest failed and contract cleanup also failed (path: {path}): ingest={ingest_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterIngestFailed {
        path: std::path::PathBuf,
        #[source]
        ingest_error: Box<TransactionError>,
        cleanup_error: std::io::Error,
    },
}

pub type TransactionResult<T> = std::result::Result<T, TransactionError>;
