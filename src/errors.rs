use std::path::PathBuf;
use thiserror::Error;

use crate::backend::BackendError;

/// All errors that can occur in crewkey.
///
/// Validation and biometric outcomes are *not* errors: they come back as
/// values (`StoreOutcome`, an empty `RetrievedCredential`). Only genuine
/// backend failures and the CLI's own plumbing end up here.
#[derive(Debug, Error)]
pub enum CrewKeyError {
    // --- Backend errors ---
    #[error("Secure storage error: {0}")]
    Backend(#[from] BackendError),

    // --- Credential errors ---
    #[error("Unknown credential kind '{0}' — expected one of: source-control, llm-provider-a, llm-provider-b, generic-server")]
    UnknownKind(String),

    // --- Crypto errors (encrypted file backend) ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong passphrase or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Invalid credential file format: {0}")]
    InvalidStoreFormat(String),

    #[error("HMAC verification failed — credential file may be tampered")]
    HmacMismatch,

    #[error("HMAC error: {0}")]
    HmacError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),

    #[error("Credential file not found at {0}")]
    StoreFileNotFound(PathBuf),
}

/// Convenience type alias for crewkey results.
pub type Result<T> = std::result::Result<T, CrewKeyError>;
