//! sqlkv - a key-value store and raw SQL surface over HTTP
//!
//! One embedded SQLite file, one `kvdata` table, six JSON endpoints.

pub mod cli;
pub mod http_server;
pub mod storage;
