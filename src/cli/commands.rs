//! CLI command implementations
//!
//! Boot order: logging, flags, database, listener. Any failure before the
//! listener is up is fatal.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::http_server::HttpServer;
use crate::storage::Store;

use super::args::Cli;
use super::errors::{CliError, CliResult};

/// Entry point: parse flags and serve until interrupted
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse_args();
    serve(&cli)
}

/// Open the database and run the HTTP server
pub fn serve(cli: &Cli) -> CliResult<()> {
    let store = Store::open(&cli.db_path)?;
    let server = HttpServer::new(cli.server_config(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    info!("Bye bye");
    Ok(())
}

/// `RUST_LOG` overrides the default `info` filter.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
