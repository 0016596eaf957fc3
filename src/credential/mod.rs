//! Credential module — the security core.
//!
//! - `CredentialKind`, the closed set of secret categories (`kind`)
//! - Syntax-only format rules per kind (`validate`)
//! - Display-safe masking (`mask`)
//! - `CredentialStore`, the orchestrator over a secure backend (`store`)

pub mod kind;
pub mod mask;
pub mod store;
pub mod validate;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use kind::CredentialKind;
pub use mask::{mask, mask_named};
pub use store::{
    CredentialStore, RetrieveOptions, RetrievedCredential, StoreOptions, StoreOutcome,
    ValidationResult,
};
pub use validate::{FormatError, FormatValidator, SourceControlProvider};

/// Non-secret facts about a stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialMetadata {
    pub kind: CredentialKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

impl CredentialMetadata {
    pub fn new(kind: CredentialKind) -> Self {
        Self {
            kind,
            stored_at: None,
            principal: None,
        }
    }
}
