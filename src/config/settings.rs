use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::biometric::DEFAULT_PROMPT;
use crate::credential::store::DEFAULT_NAMESPACE;
use crate::credential::{FormatValidator, SourceControlProvider};
use crate::crypto::Argon2Params;
use crate::errors::{CrewKeyError, Result};

/// Configuration, loaded from `.crewkey.toml`.
///
/// Every field has a sensible default so crewkey works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Which secure backend to use (`keyring`, `file`, `memory`).
    #[serde(default)]
    pub backend: BackendKind,

    /// Service name under which keyring entries are filed.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Prefix of every backend key (`<namespace>.<kind>`).
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Directory (relative to the config dir) for the credential file and
    /// the audit database.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Whose token format `source-control` secrets are checked against.
    #[serde(default)]
    pub source_control_provider: SourceControlProvider,

    /// Seconds before an unanswered biometric prompt counts as failed.
    /// `0` waits indefinitely.
    #[serde(default = "default_biometric_timeout_secs")]
    pub biometric_timeout_secs: u64,

    /// Reason text shown in the biometric prompt.
    #[serde(default = "default_biometric_prompt")]
    pub biometric_prompt: String,

    /// Argon2 memory cost in KiB for the file backend (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_service_name() -> String {
    "crewkey".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_data_dir() -> String {
    ".crewkey".to_string()
}

fn default_biometric_timeout_secs() -> u64 {
    60
}

fn default_biometric_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            service_name: default_service_name(),
            namespace: default_namespace(),
            data_dir: default_data_dir(),
            source_control_provider: SourceControlProvider::default(),
            biometric_timeout_secs: default_biometric_timeout_secs(),
            biometric_prompt: default_biometric_prompt(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".crewkey.toml";

    /// Load settings from `<config_dir>/.crewkey.toml`.
    ///
    /// If the file does not exist, defaults are returned. If it exists but
    /// cannot be parsed (including unknown backend or provider names), an
    /// error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CrewKeyError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        if self.namespace.is_empty()
            || !self
                .namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(CrewKeyError::ConfigError(format!(
                "namespace '{}' is invalid: only ASCII letters, digits, '-', '_' and '.' are allowed",
                self.namespace
            )));
        }
        if self.service_name.trim().is_empty() {
            return Err(CrewKeyError::ConfigError(
                "service_name cannot be empty".into(),
            ));
        }
        self.argon2_params().check()
    }

    /// Directory holding the credential file and audit database.
    ///
    /// Example: `config_dir/.crewkey`
    pub fn data_dir_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.data_dir)
    }

    /// Full path of the encrypted credential file.
    ///
    /// Example: `config_dir/.crewkey/credentials.ckv`
    pub fn credential_file_path(&self, config_dir: &Path) -> PathBuf {
        self.data_dir_path(config_dir)
            .join(crate::backend::file::FILE_NAME)
    }

    /// Biometric challenge timeout; `None` when disabled.
    pub fn biometric_timeout(&self) -> Option<Duration> {
        (self.biometric_timeout_secs > 0).then(|| Duration::from_secs(self.biometric_timeout_secs))
    }

    /// Format validator for the configured source-control provider.
    pub fn validator(&self) -> FormatValidator {
        FormatValidator::new(self.source_control_provider)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
