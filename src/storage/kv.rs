//! Key-value operations on the `kvdata` table

use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};

use super::errors::StorageResult;
use super::store::Store;

/// Number of rows a scan returns when the caller's limit is unusable
pub const DEFAULT_SCAN_LIMIT: usize = 10;

/// Scan limit as supplied by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimit(usize);

impl ScanLimit {
    /// Parse a client-supplied limit.
    ///
    /// Missing, unparsable and non-positive values fall back to
    /// [`DEFAULT_SCAN_LIMIT`] instead of being rejected.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(|s| s.parse::<i64>().ok()) {
            Some(n) if n > 0 => Self(n as usize),
            _ => Self::default(),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for ScanLimit {
    fn default() -> Self {
        Self(DEFAULT_SCAN_LIMIT)
    }
}

impl Store {
    /// Value stored under `key`, or `""` when the key is absent.
    pub async fn get(&self, key: &str) -> StorageResult<String> {
        let key = key.to_owned();
        self.with_connection(move |conn| get(conn, &key)).await
    }

    /// Insert `key`, or replace the value already stored under it.
    pub async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let (key, value) = (key.to_owned(), value.to_owned());
        self.with_connection(move |conn| set(conn, &key, &value))
            .await
    }

    /// Remove `key`. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        let key = key.to_owned();
        self.with_connection(move |conn| delete(conn, &key)).await
    }

    /// Up to `limit` pairs whose key starts with `prefix`.
    pub async fn scan(
        &self,
        prefix: &str,
        limit: ScanLimit,
    ) -> StorageResult<BTreeMap<String, String>> {
        let prefix = prefix.to_owned();
        self.with_connection(move |conn| scan(conn, &prefix, limit))
            .await
    }
}

fn get(conn: &Connection, key: &str) -> StorageResult<String> {
    let mut stmt = conn.prepare_cached("select value from kvdata where key = ?1 limit 1")?;
    let value = stmt
        .query_row(params![key], |row| row.get::<_, String>(0))
        .optional()?;
    Ok(value.unwrap_or_default())
}

fn set(conn: &Connection, key: &str, value: &str) -> StorageResult<()> {
    let mut stmt =
        conn.prepare_cached("insert or replace into kvdata (key, value) values (?1, ?2)")?;
    stmt.execute(params![key, value])?;
    Ok(())
}

fn delete(conn: &Connection, key: &str) -> StorageResult<()> {
    let mut stmt = conn.prepare_cached("delete from kvdata where key = ?1")?;
    stmt.execute(params![key])?;
    Ok(())
}

// Starts-with via `like`: `%` and `_` inside the prefix are wildcards and
// ASCII letters match case-insensitively.
fn scan(conn: &Connection, prefix: &str, limit: ScanLimit) -> StorageResult<BTreeMap<String, String>> {
    let mut stmt = conn.prepare_cached("select key, value from kvdata where key like ?1 limit ?2")?;
    let pattern = format!("{}%", prefix);
    let rows = stmt.query_map(params![pattern, limit.get() as i64], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut result = BTreeMap::new();
    for row in rows {
        let (key, value) = row?;
        result.insert(key, value);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_limit_parses_positive_integers() {
        assert_eq!(ScanLimit::parse(Some("3")).get(), 3);
        assert_eq!(ScanLimit::parse(Some("250")).get(), 250);
    }

    #[test]
    fn test_scan_limit_defaults_when_unusable() {
        for raw in [None, Some(""), Some("ten"), Some("0"), Some("-5"), Some("1.5")] {
            assert_eq!(ScanLimit::parse(raw), ScanLimit::default(), "input {:?}", raw);
        }
        assert_eq!(ScanLimit::default().get(), DEFAULT_SCAN_LIMIT);
    }

    #[tokio::test]
    async fn test_get_missing_key_is_empty() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get("never-written").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_set_overwrites_without_duplicates() {
        let store = Store::open_in_memory().unwrap();
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), "v2");

        let rows: i64 = store
            .with_connection(|conn| {
                Ok(conn.query_row("select count(*) from kvdata where key = 'k'", [], |row| {
                    row.get(0)
                })?)
            })
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_empty() {
        let store = Store::open_in_memory().unwrap();
        store.set("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), "");

        // Second delete has nothing to remove.
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_matches_prefix_only() {
        let store = Store::open_in_memory().unwrap();
        for (k, v) in [("user:1", "a"), ("user:2", "b"), ("order:1", "c")] {
            store.set(k, v).await.unwrap();
        }

        let found = store.scan("user:", ScanLimit::default()).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found.get("user:1").map(String::as_str), Some("a"));
        assert_eq!(found.get("user:2").map(String::as_str), Some("b"));
    }

    #[tokio::test]
    async fn test_scan_respects_limit() {
        let store = Store::open_in_memory().unwrap();
        for i in 0..15 {
            store.set(&format!("p{:02}", i), "x").await.unwrap();
        }

        assert_eq!(store.scan("p", ScanLimit::parse(Some("4"))).await.unwrap().len(), 4);
        assert_eq!(store.scan("p", ScanLimit::parse(Some("bad"))).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_scan_empty_prefix_matches_everything() {
        let store = Store::open_in_memory().unwrap();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        assert_eq!(store.scan("", ScanLimit::default()).await.unwrap().len(), 2);
    }
}
