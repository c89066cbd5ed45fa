//! Storage Persistence Tests
//!
//! Against a real database file:
//! - writes survive reopening the file
//! - the key uniqueness constraint holds under concurrent upserts
//! - a raw SQL failure does not disturb the KV table

use sqlkv::storage::{ScanLimit, SqlValue, Store};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

async fn row_count(store: &Store) -> i64 {
    let rows = store.query("select count(*) as n from kvdata").await.unwrap();
    match rows[0].get("n") {
        Some(SqlValue::Integer(n)) => *n,
        other => panic!("unexpected count {:?}", other),
    }
}

// =============================================================================
// Durability across reopen
// =============================================================================

#[tokio::test]
async fn test_values_survive_reopen() {
    let temp_dir = create_temp_data_dir();
    let path = temp_dir.path().join("storage.db");

    {
        let store = Store::open(&path).unwrap();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.delete("b").await.unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(store.get("a").await.unwrap(), "1");
    assert_eq!(store.get("b").await.unwrap(), "");
    assert_eq!(row_count(&store).await, 1);
}

#[tokio::test]
async fn test_user_tables_survive_reopen() {
    let temp_dir = create_temp_data_dir();
    let path = temp_dir.path().join("storage.db");

    {
        let store = Store::open(&path).unwrap();
        store
            .exec("create table notes (body text); insert into notes values ('hello');")
            .await
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let rows = store.query("select body from notes").await.unwrap();
    assert_eq!(rows[0].get("body"), Some(&SqlValue::Text("hello".into())));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_keep_one_row_per_key() {
    let temp_dir = create_temp_data_dir();
    let store = Store::open(temp_dir.path().join("storage.db")).unwrap();

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("key{}", i % 5);
            store.set(&key, &format!("value{}", i)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(row_count(&store).await, 5);
    let found = store.scan("key", ScanLimit::default()).await.unwrap();
    assert_eq!(found.len(), 5);
}

#[tokio::test]
async fn test_failed_sql_leaves_kv_intact() {
    let temp_dir = create_temp_data_dir();
    let store = Store::open(temp_dir.path().join("storage.db")).unwrap();
    store.set("k", "v").await.unwrap();

    assert!(store.exec("insert into kvdata (key) values ('k2')").await.is_err());
    assert!(store.exec("this is not sql").await.is_err());

    assert_eq!(store.get("k").await.unwrap(), "v");
    assert_eq!(row_count(&store).await, 1);
}
