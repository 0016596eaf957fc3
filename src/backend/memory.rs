use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use super::{validate_key, BackendError, SecureBackend};

/// Process-local backend. Values vanish with the process.
#[derive(Default)]
pub struct InMemoryBackend {
    map: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.map.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.map.lock().await.is_empty()
    }
}

#[async_trait]
impl SecureBackend for InMemoryBackend {
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        validate_key(key)?;
        self.map
            .lock()
            .await
            .insert(key.to_string(), Zeroizing::new(value.to_string()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Zeroizing<String>, BackendError> {
        validate_key(key)?;
        self.map
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(key.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<bool, BackendError> {
        validate_key(key)?;
        Ok(self.map.lock().await.remove(key).is_some())
    }

    async fn contains(&self, key: &str) -> Result<bool, BackendError> {
        validate_key(key)?;
        Ok(self.map.lock().await.contains_key(key))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
