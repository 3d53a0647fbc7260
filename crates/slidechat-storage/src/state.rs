use serde::{Serialize, de::DeserializeOwned};

use crate::backend::StateBackend;
use crate::error::StorageError;

/// Load a JSON state blob. Returns `StorageError::NotFound` if the key has
/// never been written.
pub async fn load_state<T: DeserializeOwned>(
    backend: &dyn StateBackend,
    key: &str,
) -> Result<T, StorageError> {
    let body = backend
        .get(key)
        .await?
        .ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
    let value: T = serde_json::from_slice(&body)?;
    Ok(value)
}

/// Save a JSON state blob, replacing the previous value.
pub async fn save_state<T: Serialize>(
    backend: &dyn StateBackend,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    backend.set(key, body).await
}
