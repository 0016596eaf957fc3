//! The closed set of credential kinds the store knows about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CrewKeyError;

/// Category of a secret. Determines its format rule and masking rule,
/// and the single backend key it is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    /// Source-control token (GitHub, GitLab, Bitbucket).
    SourceControl,
    /// Anthropic API key.
    LlmProviderA,
    /// OpenAI API key.
    LlmProviderB,
    /// Opaque credential for a generic (e.g. MCP) server.
    GenericServer,
}

impl CredentialKind {
    /// Every kind, in declaration order.
    pub const ALL: [CredentialKind; 4] = [
        CredentialKind::SourceControl,
        CredentialKind::LlmProviderA,
        CredentialKind::LlmProviderB,
        CredentialKind::GenericServer,
    ];

    /// Canonical, stable name. Also the suffix of the backend key.
    pub fn as_str(self) -> &'static str {
        match self {
            CredentialKind::SourceControl => "source-control",
            CredentialKind::LlmProviderA => "llm-provider-a",
            CredentialKind::LlmProviderB => "llm-provider-b",
            CredentialKind::GenericServer => "generic-server",
        }
    }

    /// Human label for tables and prompts.
    pub fn label(self) -> &'static str {
        match self {
            CredentialKind::SourceControl => "Source control token",
            CredentialKind::LlmProviderA => "Anthropic API key",
            CredentialKind::LlmProviderB => "OpenAI API key",
            CredentialKind::GenericServer => "Server credential",
        }
    }

    /// Build the namespaced backend key for this kind, e.g.
    /// `credential.source-control`.
    pub fn storage_key(self, namespace: &str) -> String {
        format!("{namespace}.{}", self.as_str())
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = CrewKeyError;

    /// Accepts the canonical names plus the provider aliases users
    /// actually type (`github`, `anthropic`, `openai`, `mcp`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source-control" | "github" | "gitlab" | "bitbucket" | "git" => {
                Ok(CredentialKind::SourceControl)
            }
            "llm-provider-a" | "anthropic" => Ok(CredentialKind::LlmProviderA),
            "llm-provider-b" | "openai" => Ok(CredentialKind::LlmProviderB),
            "generic-server" | "mcp" | "server" => Ok(CredentialKind::GenericServer),
            _ => Err(CrewKeyError::UnknownKind(s.to_string())),
        }
    }
}
