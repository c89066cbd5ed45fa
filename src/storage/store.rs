//! Shared database handle
//!
//! One SQLite connection serves every request. `rusqlite::Connection` is
//! `Send` but not `Sync`, so it sits behind a mutex and each statement runs
//! on the blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{debug, info};

use super::errors::{StorageError, StorageResult};

/// Default location of the database file
pub const DEFAULT_DB_PATH: &str = "./storage.db";

const SCHEMA: &str = "
    create table if not exists kvdata (
        id integer not null primary key,
        key varchar(255) not null,
        value varchar(4096) not null,
        constraint kvdata_key_idx unique (key)
    );
";

/// Handle to the embedded database.
///
/// Cloning is cheap; all clones share the same connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (creating if absent) the database file and ensure `kvdata` exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "database ready");
        Ok(store)
    }

    /// Open a private in-memory database (useful for tests).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA).map_err(StorageError::Schema)?;
        debug!("kvdata table ensured");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    pub(crate) async fn with_connection<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StorageError::Poisoned)?;
            f(&guard)
        })
        .await
        .map_err(|e| StorageError::TaskJoin(e.to_string()))?
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
