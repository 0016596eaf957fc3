//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use zeroize::Zeroizing;

use crate::backend::{BackendKind, EncryptedFileBackend, InMemoryBackend, SecureBackend};
use crate::biometric::BiometricGate;
use crate::config::Settings;
use crate::credential::{CredentialKind, CredentialStore};
use crate::errors::{CrewKeyError, Result};

/// Minimum passphrase length for a new credential file.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable consulted before prompting for the file passphrase.
pub const PASSPHRASE_ENV: &str = "CREWKEY_PASSPHRASE";

/// crewkey: credential store for AI agent crews.
#[derive(Parser)]
#[command(
    name = "crewkey",
    about = "Validate, store, mask and biometrically gate BYOK credentials",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding .crewkey.toml (default: current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Secure backend: keyring, file or memory (overrides the config file)
    #[arg(long, global = true, env = "CREWKEY_BACKEND")]
    pub backend: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Validate and store a credential
    Store {
        /// Credential kind (source-control, llm-provider-a, llm-provider-b,
        /// generic-server, or github/anthropic/openai/mcp)
        kind: String,
        /// Secret value (omit for piped input or an interactive prompt)
        value: Option<String>,
        /// Store without checking the format
        #[arg(long)]
        skip_validation: bool,
        /// Require a biometric check first
        #[arg(long)]
        biometric: bool,
    },

    /// Print a stored credential
    Get {
        /// Credential kind
        kind: String,
        /// Require a biometric check first
        #[arg(long)]
        biometric: bool,
        /// Print the masked form instead of the secret
        #[arg(long)]
        masked: bool,
    },

    /// Delete a stored credential
    Delete {
        /// Credential kind
        kind: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Exit 0 if a credential is stored, 1 otherwise
    Exists {
        /// Credential kind
        kind: String,
    },

    /// List which credential kinds are stored
    List {
        /// Also show each stored credential in masked form
        #[arg(long)]
        masked: bool,
    },

    /// Print the display-safe form of a secret
    Mask {
        /// Credential kind
        kind: String,
        /// Secret value (omit for piped input or an interactive prompt)
        value: Option<String>,
    },

    /// Check a secret's format without storing it
    Validate {
        /// Credential kind
        kind: String,
        /// Secret value (omit for piped input or an interactive prompt)
        value: Option<String>,
    },

    /// Report whether biometric authentication is available
    Biometric,

    /// View the audit log of credential operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum, ignore_case = true)]
        shell: clap_complete::Shell,
    },
}

/// How a command intends to use the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Directory holding `.crewkey.toml`: `--config-dir` or the current directory.
pub fn config_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Load settings and apply the `--backend` override.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(&config_dir(cli)?)?;
    if let Some(name) = &cli.backend {
        settings.backend = name.parse::<BackendKind>()?;
    }
    Ok(settings)
}

/// Directory for the credential file and audit database.
pub fn data_dir(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    Ok(settings.data_dir_path(&config_dir(cli)?))
}

pub fn parse_kind(name: &str) -> Result<CredentialKind> {
    name.parse()
}

/// The biometric gate for this host.
///
/// The command line has no platform biometric prompt, so challenges
/// always report `NotAvailable`.
pub fn build_gate(settings: &Settings) -> BiometricGate {
    BiometricGate::unsupported()
        .with_timeout(settings.biometric_timeout())
        .with_prompt(settings.biometric_prompt.clone())
}

/// Build the credential store described by the settings.
pub async fn build_store(
    cli: &Cli,
    settings: &Settings,
    access: Access,
) -> Result<CredentialStore> {
    let backend = open_backend(cli, settings, access).await?;
    tracing::debug!(backend = backend.name(), "credential store ready");

    Ok(CredentialStore::new(backend, build_gate(settings))
        .with_validator(settings.validator())
        .with_namespace(settings.namespace.clone()))
}

async fn open_backend(
    cli: &Cli,
    settings: &Settings,
    access: Access,
) -> Result<Arc<dyn SecureBackend>> {
    match settings.backend {
        BackendKind::Memory => {
            output::warning("Memory backend: credentials are discarded when crewkey exits.");
            Ok(Arc::new(InMemoryBackend::new()))
        }
        BackendKind::File => {
            let path = settings.credential_file_path(&config_dir(cli)?);

            if tokio::fs::try_exists(&path).await? {
                let passphrase = prompt_passphrase()?;
                return Ok(Arc::new(EncryptedFileBackend::open(&path, passphrase).await?));
            }

            if access == Access::ReadOnly {
                // Nothing stored yet; answer reads without creating the file.
                tracing::debug!(path = %path.display(), "no credential file yet");
                return Ok(Arc::new(InMemoryBackend::new()));
            }

            let passphrase = prompt_new_passphrase()?;
            let backend =
                EncryptedFileBackend::create(&path, passphrase, settings.argon2_params()).await?;
            output::info(&format!("Created credential file at {}", path.display()));
            Ok(Arc::new(backend))
        }
        BackendKind::Keyring => keyring_backend(settings),
    }
}

#[cfg(feature = "keyring-store")]
fn keyring_backend(settings: &Settings) -> Result<Arc<dyn SecureBackend>> {
    Ok(Arc::new(crate::backend::KeyringBackend::new(
        settings.service_name.clone(),
    )))
}

#[cfg(not(feature = "keyring-store"))]
fn keyring_backend(_settings: &Settings) -> Result<Arc<dyn SecureBackend>> {
    Err(CrewKeyError::ConfigError(
        "the keyring backend is not compiled in; rebuild with `--features keyring-store` \
         or set backend = \"file\""
            .into(),
    ))
}

/// Get the passphrase of an existing credential file, trying in order:
/// 1. `CREWKEY_PASSPHRASE` env var (CI/CD)
/// 2. Interactive prompt
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter credential file passphrase")
        .interact()
        .map_err(|e| CrewKeyError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Choose a passphrase for a new credential file, with confirmation.
///
/// Also respects `CREWKEY_PASSPHRASE`. Enforces a minimum length.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        if pw.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(CrewKeyError::CommandFailed(format!(
                "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let pw = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose credential file passphrase")
                .with_confirmation(
                    "Confirm passphrase",
                    "Passphrases do not match, try again",
                )
                .interact()
                .map_err(|e| CrewKeyError::CommandFailed(format!("passphrase prompt: {e}")))?,
        );

        if pw.chars().count() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(pw);
    }
}

fn passphrase_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Read a secret from, in order: the command line, piped stdin, or a
/// hidden interactive prompt. Empty input is refused.
pub fn read_secret(prompt_label: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    let secret = if let Some(v) = value {
        output::warning("Value provided on command line; it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed_len = buf.trim_end().len();
        buf.truncate(trimmed_len);
        buf
    } else {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Enter {prompt_label}"))
                .interact()
                .map_err(|e| CrewKeyError::CommandFailed(format!("input prompt: {e}")))?,
        )
    };

    require_non_empty(secret, prompt_label)
}

fn require_non_empty(secret: Zeroizing<String>, label: &str) -> Result<Zeroizing<String>> {
    if secret.is_empty() {
        return Err(CrewKeyError::CommandFailed(format!(
            "no value given for {label}"
        )));
    }
    Ok(secret)
}

/// Append an entry to the audit log, if compiled in.
#[cfg(feature = "audit-log")]
pub fn record(cli: &Cli, settings: &Settings, op: &str, kind: Option<CredentialKind>, outcome: &str) {
    if let Ok(dir) = data_dir(cli, settings) {
        crate::audit::log_audit(&dir, op, kind, outcome);
    }
}

#[cfg(not(feature = "audit-log"))]
pub fn record(
    _cli: &Cli,
    _settings: &Settings,
    _op: &str,
    _kind: Option<CredentialKind>,
    _outcome: &str,
) {
}
