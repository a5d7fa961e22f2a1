use http::HeaderMap;
use tollgate_store::{SharedStore, keys};

use crate::AuthError;

/// Header carrying the caller's service credential
pub const SERVICE_KEY_HEADER: &str = "service-key";

/// Admits requests whose service key is registered in the store
///
/// A credential is valid exactly when `key-{credential}` exists. Keys are
/// not cached, so deleting one revokes access on the next request.
#[derive(Clone)]
pub struct AccessGate {
    store: SharedStore,
}

impl AccessGate {
    pub const fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Check the first `service-key` header against the store
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] when the header is absent or
    /// not visible ASCII, [`AuthError::InvalidCredential`] when the key is
    /// unknown, and [`AuthError::Store`] when the lookup itself fails
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let credential = headers
            .get(SERVICE_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingCredential)?;

        if self.store.exists(&keys::credential_key(credential)).await? {
            Ok(())
        } else {
            tracing::warn!("rejected unknown service key");
            Err(AuthError::InvalidCredential)
        }
    }
}
