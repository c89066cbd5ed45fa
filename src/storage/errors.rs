//! Storage error types
//!
//! Failures while opening the database file or creating the `kvdata` table
//! are FATAL: nothing can be served without them. Every other failure is a
//! request-level ERROR that is reported back to the caller.

use std::fmt;

use thiserror::Error;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// sqlkv must terminate
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage error
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database file could not be opened or created
    #[error("failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The `kvdata` table could not be created
    #[error("failed to create kvdata table: {0}")]
    Schema(#[source] rusqlite::Error),

    /// Any error raised by SQLite while serving a request.
    ///
    /// Displayed verbatim so clients see the engine's own message.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Raw SQL text held no statement
    #[error("empty query")]
    EmptyQuery,

    /// A request panicked while holding the connection
    #[error("database connection poisoned")]
    Poisoned,

    /// The blocking task running the statement did not complete
    #[error("task join error: {0}")]
    TaskJoin(String),
}

impl StorageError {
    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageError::Open { .. } | StorageError::Schema(_) => Severity::Fatal,
            StorageError::Sqlite(_)
            | StorageError::EmptyQuery
            | StorageError::Poisoned
            | StorageError::TaskJoin(_) => Severity::Error,
        }
    }

    /// Check if this error must halt the process
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
