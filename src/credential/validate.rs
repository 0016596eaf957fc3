//! Syntax-only credential format checks.
//!
//! Nothing here touches the network: a secret that passes is merely
//! *plausible* for its kind, not proven live.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::CredentialKind;
use crate::errors::CrewKeyError;

static GITHUB_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ghp_[A-Za-z0-9]{36}$").expect("static regex"));

static ANTHROPIC_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk-ant-[A-Za-z0-9_-]+$").expect("static regex"));

static OPENAI_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk-[A-Za-z0-9_-]+$").expect("static regex"));

/// Why a secret was rejected. Never carries the secret itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("value is empty")]
    Empty,

    #[error("expected prefix '{expected}'")]
    WrongPrefix { expected: &'static str },

    #[error("nothing follows the prefix")]
    MissingBody,

    #[error("expected {expected} characters after the prefix, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("value contains characters not allowed for this credential")]
    InvalidCharacters,

    #[error("no token format is defined for {0} yet")]
    NoRuleForProvider(SourceControlProvider),
}

/// Source-control hosts whose tokens may be stored under
/// `CredentialKind::SourceControl`.
///
/// Only GitHub has a known token shape. The others are accepted as
/// configuration values but fail closed until a rule is added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceControlProvider {
    #[default]
    Github,
    Gitlab,
    Bitbucket,
}

impl SourceControlProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceControlProvider::Github => "github",
            SourceControlProvider::Gitlab => "gitlab",
            SourceControlProvider::Bitbucket => "bitbucket",
        }
    }

    fn token_shape(self) -> Option<&'static TokenShape> {
        match self {
            SourceControlProvider::Github => Some(&GITHUB_SHAPE),
            SourceControlProvider::Gitlab | SourceControlProvider::Bitbucket => None,
        }
    }
}

impl fmt::Display for SourceControlProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceControlProvider {
    type Err = CrewKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(SourceControlProvider::Github),
            "gitlab" => Ok(SourceControlProvider::Gitlab),
            "bitbucket" => Ok(SourceControlProvider::Bitbucket),
            other => Err(CrewKeyError::ConfigError(format!(
                "unknown source control provider '{other}' — supported: github, gitlab, bitbucket"
            ))),
        }
    }
}

/// A prefix + body token layout, backed by a full-match regex.
///
/// The regex decides; the other fields only explain a rejection.
struct TokenShape {
    prefix: &'static str,
    /// `Some(n)` for fixed-length bodies.
    body_len: Option<usize>,
    /// Punctuation allowed in the body besides ASCII alphanumerics.
    body_extra: &'static [char],
    pattern: &'static LazyLock<Regex>,
}

static GITHUB_SHAPE: TokenShape = TokenShape {
    prefix: "ghp_",
    body_len: Some(36),
    body_extra: &[],
    pattern: &GITHUB_TOKEN,
};

static ANTHROPIC_SHAPE: TokenShape = TokenShape {
    prefix: "sk-ant-",
    body_len: None,
    body_extra: &['-', '_'],
    pattern: &ANTHROPIC_KEY,
};

static OPENAI_SHAPE: TokenShape = TokenShape {
    prefix: "sk-",
    body_len: None,
    body_extra: &['-', '_'],
    pattern: &OPENAI_KEY,
};

impl TokenShape {
    fn check(&self, secret: &str) -> Result<(), FormatError> {
        if self.pattern.is_match(secret) {
            return Ok(());
        }

        let Some(body) = secret.strip_prefix(self.prefix) else {
            return Err(FormatError::WrongPrefix {
                expected: self.prefix,
            });
        };

        if body.is_empty() {
            return Err(FormatError::MissingBody);
        }

        if !body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || self.body_extra.contains(&c))
        {
            return Err(FormatError::InvalidCharacters);
        }

        Err(FormatError::WrongLength {
            expected: self.body_len.unwrap_or_default(),
            actual: body.chars().count(),
        })
    }
}

/// Per-kind format rules.
///
/// Cheap to copy; holds only the configured source-control provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatValidator {
    source_control: SourceControlProvider,
}

impl FormatValidator {
    pub fn new(source_control: SourceControlProvider) -> Self {
        Self { source_control }
    }

    /// `true` if `secret` is syntactically plausible for `kind`.
    pub fn validate(&self, kind: CredentialKind, secret: &str) -> bool {
        self.check(kind, secret).is_ok()
    }

    /// Like [`validate`](Self::validate), but says why a secret was rejected.
    pub fn check(&self, kind: CredentialKind, secret: &str) -> Result<(), FormatError> {
        if secret.is_empty() {
            return Err(FormatError::Empty);
        }

        match kind {
            // Opaque to us.
            CredentialKind::GenericServer => Ok(()),
            CredentialKind::SourceControl => match self.source_control.token_shape() {
                Some(shape) => shape.check(secret),
                None => Err(FormatError::NoRuleForProvider(self.source_control)),
            },
            CredentialKind::LlmProviderA => ANTHROPIC_SHAPE.check(secret),
            CredentialKind::LlmProviderB => {
                // An Anthropic key is never an OpenAI key, even though it
                // also starts with `sk-`.
                if secret.starts_with(ANTHROPIC_SHAPE.prefix) {
                    return Err(FormatError::WrongPrefix {
                        expected: OPENAI_SHAPE.prefix,
                    });
                }
                OPENAI_SHAPE.check(secret)
            }
        }
    }
}
