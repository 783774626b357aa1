//! Provider definitions as stored on disk and as handed to the provider invoker.
//!
//! Stored entries ([`ProviderEntry`]) are deliberately loose: every field is
//! optional so a hand-edited file with a missing `model` or `url` still loads
//! and the gap is reported by the resolver with the field name. The resolved
//! form ([`ResolvedProvider`]) is tagged over [`ProviderKind`] and carries the
//! fields each kind requires as plain values.

use crate::error::{Result, SmartgenError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model pulled for a local provider when none is given.
pub const DEFAULT_LOCAL_MODEL: &str = "deepseek-coder-v2";

/// Ollama's default listen address.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:11434";

const LOCAL_PROVIDER_NAMES: [&str; 3] = ["ollama", "lm-studio", "local"];

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Local,
    Cloud,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Local => write!(f, "local"),
            ProviderKind::Cloud => write!(f, "cloud"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = SmartgenError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(ProviderKind::Local),
            "cloud" => Ok(ProviderKind::Cloud),
            _ => Err(SmartgenError::InvalidProviderKind(s.to_string())),
        }
    }
}

impl ProviderKind {
    /// Guess the kind from a provider name.
    /// Well-known local runtimes are `local`; everything else is `cloud`.
    pub fn infer(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if LOCAL_PROVIDER_NAMES.contains(&lower.as_str()) {
            ProviderKind::Local
        } else {
            ProviderKind::Cloud
        }
    }
}

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A provider credential. Formatting always prints a mask.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(********)")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

// ---------------------------------------------------------------------------
// ProviderEntry
// ---------------------------------------------------------------------------

/// One provider as written in either store. The name is the map key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    #[serde(
        rename = "type",
        alias = "kind",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, alias = "endpoint", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "secret", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Secret>,
}

impl ProviderEntry {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key));
        self
    }

    pub fn has_secret(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fill the local runtime defaults for any missing model/url.
    pub fn fill_local_defaults(&mut self) {
        if self.kind != Some(ProviderKind::Local) {
            return;
        }
        if self.model.as_deref().map_or(true, |m| m.trim().is_empty()) {
            self.model = Some(DEFAULT_LOCAL_MODEL.to_string());
        }
        if self.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            self.url = Some(DEFAULT_LOCAL_URL.to_string());
        }
    }
}

/// Copy of `provider` that is safe to persist in the project-scoped store.
/// The secret is dropped unconditionally.
pub fn sanitize_for_project_scope(provider: &ProviderEntry) -> ProviderEntry {
    ProviderEntry {
        api_key: None,
        ..provider.clone()
    }
}

// ---------------------------------------------------------------------------
// LlmSettings
// ---------------------------------------------------------------------------

/// The `llm:` section shared by the project and global stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderEntry>,
}

impl LlmSettings {
    pub fn provider(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.get(name)
    }

    /// The configured default, ignoring blank values.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Resolved form
// ---------------------------------------------------------------------------

/// Where the credential of a resolved provider comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum Credential {
    /// Taken from the private global store.
    Stored {
        #[serde(skip)]
        secret: Secret,
    },
    /// Not stored; the provider invoker reads it from the named source.
    External { source: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolvedProvider {
    Local {
        name: String,
        model: String,
        endpoint: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        credential: Option<Credential>,
    },
    Cloud {
        name: String,
        model: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        credential: Credential,
    },
}

impl ResolvedProvider {
    pub fn name(&self) -> &str {
        match self {
            ResolvedProvider::Local { name, .. } | ResolvedProvider::Cloud { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ResolvedProvider::Local { .. } => ProviderKind::Local,
            ResolvedProvider::Cloud { .. } => ProviderKind::Cloud,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ResolvedProvider::Local { model, .. } | ResolvedProvider::Cloud { model, .. } => model,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ResolvedProvider::Local { endpoint, .. } => Some(endpoint),
            ResolvedProvider::Cloud { endpoint, .. } => endpoint.as_deref(),
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            ResolvedProvider::Local { credential, .. } => credential.as_ref(),
            ResolvedProvider::Cloud { credential, .. } => Some(credential),
        }
    }

    /// The stored secret, if the global store supplied one.
    pub fn secret(&self) -> Option<&Secret> {
        match self.credential() {
            Some(Credential::Stored { secret }) => Some(secret),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
