//! Storage subsystem for sqlkv
//!
//! Wraps one embedded SQLite database holding the `kvdata` table:
//!
//! ```text
//! kvdata(id integer primary key, key varchar(255) unique, value varchar(4096))
//! ```
//!
//! # Operations
//!
//! - KV: `get`, `set` (insert-or-replace), `delete`, `scan` (prefix, bounded)
//! - Raw SQL: `exec` and `query`, passed to the engine as written
//!
//! Transactions, durability and locking are the engine's business. The
//! application only serializes access to its single connection.

mod errors;
mod kv;
mod sql;
mod store;
mod value;

pub use errors::{Severity, StorageError, StorageResult};
pub use kv::{ScanLimit, DEFAULT_SCAN_LIMIT};
pub use store::{Store, DEFAULT_DB_PATH};
pub use value::{ExecResult, Row, SqlValue};
