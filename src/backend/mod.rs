//! Secure storage backends.
//!
//! The credential store never persists anything itself; it talks to a
//! [`SecureBackend`], a small key/value port over whatever hardware-backed
//! secret store the deployment target offers:
//! - `InMemoryBackend` — process-local, for tests and throwaway sessions (`memory`)
//! - `KeyringBackend` — OS keychain / credential manager / secret service (`keyring`)
//! - `EncryptedFileBackend` — passphrase-protected file for hosts without a keyring (`file`)

pub mod file;
#[cfg(feature = "keyring-store")]
pub mod keyring;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::errors::CrewKeyError;

pub use file::EncryptedFileBackend;
#[cfg(feature = "keyring-store")]
pub use self::keyring::KeyringBackend;
pub use memory::InMemoryBackend;

/// Longest key any backend accepts.
const MAX_KEY_LEN: usize = 128;

/// Failures reported by a backend.
///
/// `NotFound` is kept apart from everything else so callers can turn
/// absence into `None` while real failures keep propagating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("no value stored under '{0}'")]
    NotFound(String),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("secure storage unavailable: {0}")]
    Unavailable(String),

    #[error("secure storage I/O failed: {0}")]
    Io(String),

    #[error("stored data is corrupted: {0}")]
    Corrupted(String),
}

/// Key/value port over a platform secret store.
///
/// Keys are namespaced per credential kind (one key per kind, no
/// sub-keys). Implementations must be safe to share across tasks.
#[async_trait]
pub trait SecureBackend: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Read the value under `key`. Absence is `BackendError::NotFound`.
    async fn get(&self, key: &str) -> Result<Zeroizing<String>, BackendError>;

    /// Remove `key`. Returns whether a value was actually removed.
    async fn remove(&self, key: &str) -> Result<bool, BackendError>;

    /// Whether a value is stored under `key`.
    ///
    /// The default reads the value and drops it immediately; backends that
    /// can answer from metadata alone should override this.
    async fn contains(&self, key: &str) -> Result<bool, BackendError> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(BackendError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Which backend adapter to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Keyring,
    File,
    Memory,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Keyring => "keyring",
            BackendKind::File => "file",
            BackendKind::Memory => "memory",
        }
    }
}

impl Default for BackendKind {
    /// The OS keyring when compiled in, the encrypted file otherwise.
    fn default() -> Self {
        if cfg!(feature = "keyring-store") {
            BackendKind::Keyring
        } else {
            BackendKind::File
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = CrewKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(BackendKind::Keyring),
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            other => Err(CrewKeyError::ConfigError(format!(
                "unknown backend '{other}' — supported: keyring, file, memory"
            ))),
        }
    }
}

/// Reject keys that some platform stores would mangle.
///
/// Allowed: ASCII letters, digits, `-`, `_`, `.`; 1..=128 bytes.
pub(crate) fn validate_key(key: &str) -> Result<(), BackendError> {
    let ok = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if ok {
        Ok(())
    } else {
        Err(BackendError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_namespaced_kind_keys() {
        assert!(validate_key("credential.source-control").is_ok());
        assert!(validate_key("crew_key.llm-provider-a").is_ok());
    }

    #[test]
    fn rejects_unsafe_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key("path/like").is_err());
        assert!(validate_key(&"k".repeat(129)).is_err());
    }

    #[test]
    fn backend_kind_parses() {
        assert_eq!("FILE".parse::<BackendKind>().unwrap(), BackendKind::File);
        assert_eq!(
            "keyring".parse::<BackendKind>().unwrap(),
            BackendKind::Keyring
        );
        assert!("vault".parse::<BackendKind>().is_err());
    }
}
