//! # HTTP Server
//!
//! Combines the KV and SQL routers into one Axum server and owns its
//! lifecycle: bind, serve, and graceful shutdown on interrupt.

use std::future::{pending, Future, IntoFuture};
use std::io;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::config::HttpServerConfig;
use super::kv_routes::kv_routes;
use super::sql_routes::sql_routes;
use super::state::AppState;
use crate::storage::Store;

/// HTTP Server for sqlkv
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server answering requests against `store`
    pub fn new(config: HttpServerConfig, store: Store) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: Store) -> Router {
        let state = Arc::new(AppState::new(store, config.auth_key.clone()));

        Router::new()
            .nest("/kv", kv_routes(state.clone()))
            .nest("/sql", sql_routes(state))
            // Bodies are read whole; a size rejection would bypass the envelope.
            .layer(DefaultBodyLimit::disable())
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!("Listening at http://{}", self.config.socket_addr());

        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `signal` resolves, then drain.
    ///
    /// After the signal no new connections are accepted. In-flight requests
    /// finish first, unless the configured drain timeout runs out.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (started_tx, started_rx) = oneshot::channel::<()>();
        let graceful = async move {
            signal.await;
            info!("shutdown requested, draining in-flight requests");
            let _ = started_tx.send(());
        };

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(graceful)
            .into_future();

        let Some(timeout) = self.config.drain_timeout else {
            return serve.await;
        };

        let deadline = async move {
            if started_rx.await.is_err() {
                pending::<()>().await;
            }
            tokio::time::sleep(timeout).await;
        };

        tokio::select! {
            result = serve => result,
            () = deadline => {
                warn!(?timeout, "drain timeout elapsed, abandoning in-flight requests");
                Ok(())
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for interrupt");
        pending::<()>().await;
    }
}
