//! Shared constants for the escrow core crate.

/// File name of the JSON document holding the full transaction collection.
pub const TRANSACTIONS_FILE_NAME: &str = "transactions.json";

/// Directory under the data dir holding uploaded contract documents.
pub const CONTRACTS_DIR_NAME: &str = "contracts";

/// Default data directory when `ESCROW_DATA_DIR` is not set.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default static asset root when `ESCROW_PUBLIC_DIR` is not set.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Default listening port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;
