//! Biometric presence checks.
//!
//! The platform capability sits behind [`BiometricProvider`]; the
//! [`BiometricGate`] adds the policy the credential store relies on:
//! availability means hardware *and* an enrolled factor, every
//! authorization prompts afresh, and a challenge that never resolves is
//! cut off by the configured timeout.

pub mod scripted;
pub mod unsupported;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use scripted::ScriptedBiometrics;
pub use unsupported::UnsupportedBiometrics;

/// Reason shown in the platform prompt when none is configured.
pub const DEFAULT_PROMPT: &str = "Authenticate to access your credentials";

/// What the device reports about its biometric hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiometricAvailability {
    /// Usable biometric hardware is present.
    pub is_available: bool,
    /// At least one biometric factor is enrolled.
    pub enrolled: bool,
}

impl BiometricAvailability {
    pub fn usable(self) -> bool {
        self.is_available && self.enrolled
    }
}

/// Why a biometric challenge did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("biometric hardware is not available")]
    NotAvailable,

    #[error("no biometric factor is enrolled")]
    NotEnrolled,

    #[error("biometric prompt was cancelled")]
    Cancelled,

    #[error("biometrics are locked out after too many attempts")]
    Lockout,

    #[error("biometric did not match")]
    Failed,

    #[error("biometric prompt timed out")]
    TimedOut,

    #[error("biometric hardware error: {0}")]
    Hardware(String),
}

/// Port over the platform's biometric capability.
#[async_trait]
pub trait BiometricProvider: Send + Sync {
    async fn check_availability(&self) -> BiometricAvailability;

    /// Run one challenge. `Ok(())` only on a genuine match.
    async fn authenticate(&self, reason: &str) -> Result<(), AuthorizationError>;
}

/// Stateless policy wrapper around a [`BiometricProvider`].
#[derive(Clone)]
pub struct BiometricGate {
    provider: Arc<dyn BiometricProvider>,
    timeout: Option<Duration>,
    prompt: String,
}

impl BiometricGate {
    pub fn new(provider: Arc<dyn BiometricProvider>) -> Self {
        Self {
            provider,
            timeout: None,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Gate for targets with no biometric hardware at all.
    pub fn unsupported() -> Self {
        Self::new(Arc::new(UnsupportedBiometrics))
    }

    /// Abandon a challenge that has not resolved after `timeout`.
    /// `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `true` only when hardware is present and a factor is enrolled.
    pub async fn is_available(&self) -> bool {
        self.provider.check_availability().await.usable()
    }

    /// Prompt for biometric proof of presence.
    ///
    /// Never cached: each call prompts again.
    pub async fn authorize(&self) -> Result<(), AuthorizationError> {
        let availability = self.provider.check_availability().await;
        if !availability.is_available {
            return Err(AuthorizationError::NotAvailable);
        }
        if !availability.enrolled {
            return Err(AuthorizationError::NotEnrolled);
        }

        let challenge = self.provider.authenticate(&self.prompt);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, challenge)
                .await
                .unwrap_or(Err(AuthorizationError::TimedOut)),
            None => challenge.await,
        };

        match &outcome {
            Ok(()) => tracing::debug!("biometric authorization succeeded"),
            Err(e) => tracing::debug!(reason = %e, "biometric authorization failed"),
        }
        outcome
    }
}

impl std::fmt::Debug for BiometricGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiometricGate")
            .field("timeout", &self.timeout)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn available_requires_hardware_and_enrollment() {
        let gate = BiometricGate::new(Arc::new(ScriptedBiometrics::approving()));
        assert!(gate.is_available().await);

        let no_enroll = ScriptedBiometrics::approving().with_availability(true, false);
        assert!(!BiometricGate::new(Arc::new(no_enroll)).is_available().await);

        let no_hw = ScriptedBiometrics::approving().with_availability(false, true);
        assert!(!BiometricGate::new(Arc::new(no_hw)).is_available().await);
    }

    #[tokio::test]
    async fn authorize_does_not_prompt_without_enrollment() {
        let provider = Arc::new(ScriptedBiometrics::approving().with_availability(true, false));
        let gate = BiometricGate::new(provider.clone());

        assert_eq!(gate.authorize().await, Err(AuthorizationError::NotEnrolled));
        assert_eq!(provider.prompt_count(), 0);
    }

    #[tokio::test]
    async fn every_authorization_prompts_again() {
        let provider = Arc::new(ScriptedBiometrics::approving());
        let gate = BiometricGate::new(provider.clone());

        gate.authorize().await.unwrap();
        gate.authorize().await.unwrap();
        assert_eq!(provider.prompt_count(), 2);
    }

    #[tokio::test]
    async fn failures_pass_through() {
        let gate = BiometricGate::new(Arc::new(ScriptedBiometrics::rejecting(
            AuthorizationError::Lockout,
        )));
        assert_eq!(gate.authorize().await, Err(AuthorizationError::Lockout));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_challenge_times_out() {
        let provider =
            ScriptedBiometrics::approving().with_delay(Duration::from_secs(120));
        let gate = BiometricGate::new(Arc::new(provider))
            .with_timeout(Some(Duration::from_secs(30)));

        assert_eq!(gate.authorize().await, Err(AuthorizationError::TimedOut));
    }

    #[tokio::test]
    async fn unsupported_gate_is_never_available() {
        let gate = BiometricGate::unsupported();
        assert!(!gate.is_available().await);
        assert_eq!(gate.authorize().await, Err(AuthorizationError::NotAvailable));
    }

    #[tokio::test]
    async fn prompt_text_reaches_the_provider() {
        let provider = Arc::new(ScriptedBiometrics::approving());
        let gate = BiometricGate::new(provider.clone()).with_prompt("Unlock OpenAI key");
        gate.authorize().await.unwrap();
        assert_eq!(provider.last_prompt().as_deref(), Some("Unlock OpenAI key"));
    }
}
