//! State shared by every handler

use serde::de::DeserializeOwned;

use super::envelope::Envelope;
use crate::storage::Store;

/// Router state: the database handle and the shared secret
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    auth_key: String,
}

impl AppState {
    pub fn new(store: Store, auth_key: impl Into<String>) -> Self {
        Self {
            store,
            auth_key: auth_key.into(),
        }
    }

    /// Exact comparison against the configured secret.
    pub fn authorize(&self, supplied: &str) -> bool {
        supplied == self.auth_key
    }

    /// Decode a request body, then check its secret.
    ///
    /// Decoding comes first: a malformed body reports the decode error even
    /// when its secret would not have matched.
    pub(crate) fn admit<T>(&self, body: &[u8]) -> Result<T, Envelope>
    where
        T: DeserializeOwned + Authenticated,
    {
        let request: T = serde_json::from_slice(body).map_err(Envelope::fail)?;
        if !self.authorize(request.auth_key()) {
            return Err(Envelope::auth_fail());
        }
        Ok(request)
    }
}

/// A request body that carries the shared secret
pub(crate) trait Authenticated {
    fn auth_key(&self) -> &str;
}
