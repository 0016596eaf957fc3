use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{AuthorizationError, BiometricAvailability, BiometricProvider};

/// Deterministic provider for tests and demos.
///
/// Reports a fixed availability, answers every challenge with a fixed
/// outcome (optionally after a delay), and counts the prompts it served.
pub struct ScriptedBiometrics {
    availability: BiometricAvailability,
    outcome: Mutex<Result<(), AuthorizationError>>,
    delay: Option<Duration>,
    prompts: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedBiometrics {
    fn with_outcome(outcome: Result<(), AuthorizationError>) -> Self {
        Self {
            availability: BiometricAvailability {
                is_available: true,
                enrolled: true,
            },
            outcome: Mutex::new(outcome),
            delay: None,
            prompts: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Enrolled hardware that accepts every challenge.
    pub fn approving() -> Self {
        Self::with_outcome(Ok(()))
    }

    /// Enrolled hardware that fails every challenge with `error`.
    pub fn rejecting(error: AuthorizationError) -> Self {
        Self::with_outcome(Err(error))
    }

    pub fn with_availability(mut self, is_available: bool, enrolled: bool) -> Self {
        self.availability = BiometricAvailability {
            is_available,
            enrolled,
        };
        self
    }

    /// Hold each challenge open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the answer for subsequent challenges.
    pub fn set_outcome(&self, outcome: Result<(), AuthorizationError>) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = outcome;
        }
    }

    /// How many challenges have been presented.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl BiometricProvider for ScriptedBiometrics {
    async fn check_availability(&self) -> BiometricAvailability {
        self.availability
    }

    async fn authenticate(&self, reason: &str) -> Result<(), AuthorizationError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(reason.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcome
            .lock()
            .map(|o| o.clone())
            .unwrap_or_else(|_| Err(AuthorizationError::Hardware("provider state poisoned".into())))
    }
}
