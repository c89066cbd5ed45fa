//! Raw SQL HTTP Routes
//!
//! - `POST /sql/exec`  `{sql, auth_key}` -> `{"RowsAffected": n}`
//! - `POST /sql/query` `{sql, auth_key}` -> `[{column: value, ...}, ...]`

use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Router};
use serde::Deserialize;
use tracing::{info, warn};

use super::envelope::Envelope;
use super::state::{AppState, Authenticated};

/// Body of both SQL endpoints. Absent and `null` fields read as `""`.
#[derive(Debug, Default, Deserialize)]
pub struct SqlRequest {
    #[serde(default)]
    sql: Option<String>,
    #[serde(default)]
    auth_key: Option<String>,
}

impl SqlRequest {
    pub fn sql(&self) -> &str {
        self.sql.as_deref().unwrap_or("")
    }
}

impl Authenticated for SqlRequest {
    fn auth_key(&self) -> &str {
        self.auth_key.as_deref().unwrap_or("")
    }
}

/// Create SQL routes
pub fn sql_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/exec", post(exec_handler))
        .route("/query", post(query_handler))
        .with_state(state)
}

async fn exec_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Envelope {
    let request: SqlRequest = match state.admit(&body) {
        Ok(request) => request,
        Err(reply) => return reply,
    };
    info!(sql = %request.sql(), "exec");

    let result = state.store.exec(request.sql()).await;
    if let Err(e) = &result {
        warn!(sql = %request.sql(), error = %e, "exec failed");
    }
    Envelope::from_result(result)
}

async fn query_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Envelope {
    let request: SqlRequest = match state.admit(&body) {
        Ok(request) => request,
        Err(reply) => return reply,
    };
    info!(sql = %request.sql(), "query");

    let result = state.store.query(request.sql()).await;
    match &result {
        Ok(rows) => info!(rows = rows.len(), "query done"),
        Err(e) => warn!(sql = %request.sql(), error = %e, "query failed"),
    }
    Envelope::from_result(result)
}
