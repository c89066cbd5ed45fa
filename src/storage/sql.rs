//! Raw SQL passthrough
//!
//! The caller's text goes to SQLite untouched. No statement-type checks are
//! made here; this is the low-level escape hatch of the service.

use rusqlite::{Batch, Connection, Statement};

use super::errors::{StorageError, StorageResult};
use super::store::Store;
use super::value::{ExecResult, Row, SqlValue};

impl Store {
    /// Execute one or more statements that return no rows.
    pub async fn exec(&self, sql: &str) -> StorageResult<ExecResult> {
        let sql = sql.to_owned();
        self.with_connection(move |conn| exec(conn, &sql)).await
    }

    /// Run every statement in `sql` and collect the rows of the last one.
    pub async fn query(&self, sql: &str) -> StorageResult<Vec<Row>> {
        let sql = sql.to_owned();
        self.with_connection(move |conn| query(conn, &sql)).await
    }
}

// Changes made by this batch alone. The per-statement counter is not reset
// by DDL or selects, so it would leak the count of an earlier request.
fn exec(conn: &Connection, sql: &str) -> StorageResult<ExecResult> {
    let before = total_changes(conn)?;
    conn.execute_batch(sql)?;
    let after = total_changes(conn)?;
    Ok(ExecResult {
        rows_affected: after - before,
    })
}

fn total_changes(conn: &Connection) -> StorageResult<i64> {
    Ok(conn.query_row("select total_changes()", [], |row| row.get(0))?)
}

// Every statement in the text runs in order; the rows of the last one are
// returned.
fn query(conn: &Connection, sql: &str) -> StorageResult<Vec<Row>> {
    let mut batch = Batch::new(conn, sql);
    let mut last = None;
    while let Some(mut stmt) = batch.next()? {
        last = Some(collect_rows(&mut stmt)?);
    }
    last.ok_or(StorageError::EmptyQuery)
}

fn collect_rows(stmt: &mut Statement<'_>) -> StorageResult<Vec<Row>> {
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        let mut columns = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let value: rusqlite::types::Value = row.get(idx)?;
            columns.push((name.clone(), SqlValue::from(value)));
        }
        result.push(Row { columns });
    }
    Ok(result)
}
