//! OS keyring backend.
//!
//! Stores each credential as one entry in the operating system's secure
//! credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! Keyring calls block, so every call runs on the blocking pool.

use async_trait::async_trait;
use zeroize::Zeroizing;

use super::{validate_key, BackendError, SecureBackend};

/// Service name used when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "crewkey";

#[derive(Debug, Clone)]
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<::keyring::Entry, BackendError> {
        validate_key(key)?;
        ::keyring::Entry::new(&self.service, key)
            .map_err(|e| BackendError::Unavailable(format!("failed to create keyring entry: {e}")))
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

fn join_error(e: tokio::task::JoinError) -> BackendError {
    BackendError::Io(format!("keyring task failed: {e}"))
}

#[async_trait]
impl SecureBackend for KeyringBackend {
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let entry = self.entry(key)?;
        let value = Zeroizing::new(value.to_string());
        tokio::task::spawn_blocking(move || entry.set_password(&value))
            .await
            .map_err(join_error)?
            .map_err(|e| BackendError::Io(format!("failed to store in keyring: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Zeroizing<String>, BackendError> {
        let entry = self.entry(key)?;
        let res = tokio::task::spawn_blocking(move || entry.get_password())
            .await
            .map_err(join_error)?;

        match res {
            Ok(value) => Ok(Zeroizing::new(value)),
            Err(::keyring::Error::NoEntry) => Err(BackendError::NotFound(key.to_string())),
            Err(::keyring::Error::BadEncoding(_)) => Err(BackendError::Corrupted(format!(
                "keyring entry '{key}' is not valid UTF-8"
            ))),
            Err(e) => Err(BackendError::Io(format!("failed to read from keyring: {e}"))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, BackendError> {
        let entry = self.entry(key)?;
        let res = tokio::task::spawn_blocking(move || entry.delete_credential())
            .await
            .map_err(join_error)?;

        match res {
            Ok(()) => Ok(true),
            Err(::keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(BackendError::Io(format!(
                "failed to delete from keyring: {e}"
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "keyring"
    }
}
