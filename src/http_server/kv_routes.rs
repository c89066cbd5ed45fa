//! Key-value HTTP Routes
//!
//! Bodies are flat JSON objects of strings. Absent and `null` fields read
//! as `""`.
//!
//! - `POST /kv/get`    `{key, auth_key}`
//! - `POST /kv/set`    `{key, value, auth_key}`
//! - `POST /kv/delete` `{key, auth_key}`
//! - `POST /kv/scan`   `{key, limit, auth_key}`

use std::collections::HashMap;
use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Router};
use serde::Deserialize;
use tracing::{info, warn};

use super::envelope::Envelope;
use super::state::{AppState, Authenticated};
use crate::storage::ScanLimit;

/// Flat string map decoded from a KV request body
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct KvRequest(HashMap<String, Option<String>>);

impl KvRequest {
    /// Field value, `""` when absent or `null`
    pub fn field(&self, name: &str) -> &str {
        self.0.get(name).and_then(Option::as_deref).unwrap_or("")
    }

    fn limit(&self) -> ScanLimit {
        ScanLimit::parse(self.0.get("limit").and_then(Option::as_deref))
    }
}

impl Authenticated for KvRequest {
    fn auth_key(&self) -> &str {
        self.field("auth_key")
    }
}

/// Create KV routes
pub fn kv_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get", post(get_handler))
        .route("/set", post(set_handler))
        .route("/delete", post(delete_handler))
        .route("/scan", post(scan_handler))
        .with_state(state)
}

async fn get_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Envelope {
    let request: KvRequest = match state.admit(&body) {
        Ok(request) => request,
        Err(reply) => return reply,
    };
    let key = request.field("key");

    let result = state.store.get(key).await;
    match &result {
        Ok(value) => info!(key, value = %value, "get"),
        Err(e) => warn!(key, error = %e, "get failed"),
    }
    Envelope::from_result(result)
}

async fn set_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Envelope {
    let request: KvRequest = match state.admit(&body) {
        Ok(request) => request,
        Err(reply) => return reply,
    };
    let key = request.field("key");
    info!(key, "set");

    let result = state.store.set(key, request.field("value")).await;
    if let Err(e) = &result {
        warn!(key, error = %e, "set failed");
    }
    Envelope::from_result(result.map(|()| ""))
}

async fn delete_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Envelope {
    let request: KvRequest = match state.admit(&body) {
        Ok(request) => request,
        Err(reply) => return reply,
    };
    let key = request.field("key");
    info!(key, "delete");

    let result = state.store.delete(key).await;
    if let Err(e) = &result {
        warn!(key, error = %e, "delete failed");
    }
    Envelope::from_result(result.map(|()| ""))
}

async fn scan_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Envelope {
    let request: KvRequest = match state.admit(&body) {
        Ok(request) => request,
        Err(reply) => return reply,
    };
    let prefix = request.field("key");
    let limit = request.limit();
    info!(prefix, limit = limit.get(), "scan");

    let result = state.store.scan(prefix, limit).await;
    if let Err(e) = &result {
        warn!(prefix, error = %e, "scan failed");
    }
    Envelope::from_result(result)
}
