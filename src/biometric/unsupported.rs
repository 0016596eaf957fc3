use async_trait::async_trait;

use super::{AuthorizationError, BiometricAvailability, BiometricProvider};

/// Provider for targets without biometric hardware (desktop CLI, servers).
///
/// Never available; every challenge fails with `NotAvailable`, so any
/// biometric-gated operation is refused rather than silently allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBiometrics;

#[async_trait]
impl BiometricProvider for UnsupportedBiometrics {
    async fn check_availability(&self) -> BiometricAvailability {
        BiometricAvailability::default()
    }

    async fn authenticate(&self, _reason: &str) -> Result<(), AuthorizationError> {
        Err(AuthorizationError::NotAvailable)
    }
}
