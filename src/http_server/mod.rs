//! # sqlkv HTTP Server Module
//!
//! JSON-over-HTTP surface for the key-value table and the raw SQL
//! passthrough.
//!
//! # Endpoints
//!
//! - `/kv/get`, `/kv/set`, `/kv/delete`, `/kv/scan` - key-value operations
//! - `/sql/exec`, `/sql/query` - raw SQL
//!
//! Every request body carries `auth_key`, compared with the configured
//! secret after the body decodes. Every response is an [`Envelope`] with
//! HTTP status 200; errors travel in its `e` field.

pub mod config;
pub mod envelope;
pub mod kv_routes;
pub mod server;
pub mod sql_routes;
pub mod state;

pub use config::HttpServerConfig;
pub use envelope::{Envelope, AUTH_FAIL};
pub use server::HttpServer;
pub use state::AppState;
