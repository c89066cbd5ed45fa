//! HTTP Server Configuration
//!
//! Listen address, shared secret and shutdown drain bound.

use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 4243;

/// Default shared secret
pub const DEFAULT_AUTH_KEY: &str = "auth";

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 4243)
    pub port: u16,

    /// Secret every request body must carry in `auth_key` (default: "auth")
    pub auth_key: String,

    /// How long in-flight requests may drain after shutdown is requested.
    /// `None` waits for them indefinitely.
    pub drain_timeout: Option<Duration>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            auth_key: DEFAULT_AUTH_KEY.to_string(),
            drain_timeout: None,
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Replace the shared secret
    pub fn auth_key(mut self, auth_key: impl Into<String>) -> Self {
        self.auth_key = auth_key.into();
        self
    }

    /// Bound the shutdown drain
    pub fn drain_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
