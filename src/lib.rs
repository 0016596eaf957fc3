#[cfg(feature = "audit-log")]
pub mod audit;
pub mod backend;
pub mod biometric;
pub mod cli;
pub mod config;
pub mod credential;
pub mod crypto;
pub mod errors;

pub use backend::{BackendError, SecureBackend};
pub use biometric::{AuthorizationError, BiometricGate, BiometricProvider};
pub use credential::{
    CredentialKind, CredentialStore, FormatValidator, RetrieveOptions, RetrievedCredential,
    StoreOptions, StoreOutcome,
};
pub use errors::{CrewKeyError, Result};
