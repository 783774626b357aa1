//! Provider selection across the project and global stores.
//!
//! The project store decides *which* provider runs and with which model and
//! endpoint. The global store only contributes the secret. Resolution is a
//! pure function of the two loaded configs and the requested name; callers
//! load both stores fresh before every call and drop the result afterwards.

use crate::global::GlobalConfig;
use crate::project::ProjectConfig;
use crate::provider::{Credential, ProviderKind, ResolvedProvider, Secret};
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no provider requested and no default provider configured")]
    MissingDefaultProvider,

    #[error("provider '{0}' is not defined in the project configuration")]
    UnknownProvider(String),

    #[error("no credentials configured for cloud provider '{0}'")]
    MissingCredentials(String),

    #[error("provider '{provider}' is missing required field '{field}'")]
    InvalidProviderConfig {
        provider: String,
        field: &'static str,
    },
}

impl ResolveError {
    /// A next step the user can take, suitable for printing under the error.
    pub fn hint(&self) -> String {
        match self {
            ResolveError::MissingDefaultProvider => {
                "pass --provider <name> or run 'smartgen llmconfig set-default <name>'".to_string()
            }
            ResolveError::UnknownProvider(name) => format!(
                "add '{name}' under llm.providers in .smartgen.yml or re-run 'smartgen init'"
            ),
            ResolveError::MissingCredentials(name) => format!(
                "run 'smartgen llmconfig set-config --add {name} --api-key <key>' \
                 or export SMARTGEN_{}_API_KEY",
                env_fragment(name)
            ),
            ResolveError::InvalidProviderConfig { provider, field } => match *field {
                "secret" => format!(
                    "run 'smartgen llmconfig set-config --add {provider} --api-key <key>'"
                ),
                "endpoint" => {
                    format!("set llm.providers.{provider}.url in .smartgen.yml")
                }
                "type" => format!(
                    "set llm.providers.{provider}.type to 'local' or 'cloud' in .smartgen.yml"
                ),
                other => format!("set llm.providers.{provider}.{other} in .smartgen.yml"),
            },
        }
    }
}

/// Non-fatal findings passed through with a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveWarning {
    /// The global store has no secret; an external source will supply it.
    CredentialDeferred { provider: String, source: String },
    /// The project entry carries a secret, which was ignored.
    ProjectSecretIgnored { provider: String },
}

impl std::fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveWarning::CredentialDeferred { provider, source } => write!(
                f,
                "no stored credential for '{provider}'; using {source}"
            ),
            ResolveWarning::ProjectSecretIgnored { provider } => write!(
                f,
                "provider '{provider}' has an api_key in .smartgen.yml; it was ignored, \
                 move it to the global config"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Secret sources
// ---------------------------------------------------------------------------

/// A secret found outside the global store, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedSecret {
    pub source: String,
    pub secret: Secret,
}

/// An alternate place a cloud credential may live, consulted only when the
/// global store has none. Sources are tried in the order they were added.
pub trait SecretSource: Send + Sync {
    fn lookup(&self, provider: &str) -> Option<SourcedSecret>;
}

impl<T: SecretSource + ?Sized> SecretSource for Box<T> {
    fn lookup(&self, provider: &str) -> Option<SourcedSecret> {
        (**self).lookup(provider)
    }
}

type EnvReader = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads `SMARTGEN_<NAME>_API_KEY`, then the vendor's conventional variable.
pub struct EnvSecretSource {
    reader: EnvReader,
}

impl EnvSecretSource {
    pub fn new() -> Self {
        Self::with_reader(|key| std::env::var(key).ok())
    }

    pub fn with_reader<F>(reader: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            reader: Box::new(reader),
        }
    }

    /// Variables checked for `provider`, most specific first.
    pub fn candidate_vars(provider: &str) -> Vec<String> {
        let mut vars = vec![format!("SMARTGEN_{}_API_KEY", env_fragment(provider))];
        let vendor = match provider.to_ascii_lowercase().as_str() {
            "openai" | "codex" => Some("OPENAI_API_KEY"),
            "anthropic" | "claude" => Some("ANTHROPIC_API_KEY"),
            "gemini" | "google" => Some("GEMINI_API_KEY"),
            "mistral" => Some("MISTRAL_API_KEY"),
            "groq" => Some("GROQ_API_KEY"),
            "deepseek" => Some("DEEPSEEK_API_KEY"),
            _ => None,
        };
        vars.extend(vendor.map(str::to_string));
        vars
    }
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for EnvSecretSource {
    fn lookup(&self, provider: &str) -> Option<SourcedSecret> {
        Self::candidate_vars(provider).into_iter().find_map(|var| {
            (self.reader)(&var)
                .filter(|v| !v.trim().is_empty())
                .map(|v| SourcedSecret {
                    source: format!("environment variable {var}"),
                    secret: Secret::new(v),
                })
        })
    }
}

fn env_fragment(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ConfigResolver
// ---------------------------------------------------------------------------

/// The merged, validated provider handed to the provider invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub selected_provider: ResolvedProvider,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ResolveWarning>,
}

pub struct ConfigResolver<'a> {
    project: &'a ProjectConfig,
    global: &'a GlobalConfig,
    secret_sources: Vec<Box<dyn SecretSource + 'a>>,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(project: &'a ProjectConfig, global: &'a GlobalConfig) -> Self {
        Self {
            project,
            global,
            secret_sources: Vec::new(),
        }
    }

    pub fn with_secret_source(mut self, source: impl SecretSource + 'a) -> Self {
        self.secret_sources.push(Box::new(source));
        self
    }

    /// Resolve `requested`, or the project's default provider when `None`.
    pub fn resolve(&self, requested: Option<&str>) -> Result<ResolvedConfig, ResolveError> {
        let name = requested
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.project.llm.default_name())
            .ok_or(ResolveError::MissingDefaultProvider)?;

        let entry = self
            .project
            .llm
            .provider(name)
            .ok_or_else(|| ResolveError::UnknownProvider(name.to_string()))?;
        let invalid = |field| ResolveError::InvalidProviderConfig {
            provider: name.to_string(),
            field,
        };

        let mut warnings = Vec::new();
        if entry.has_secret() {
            tracing::warn!(provider = name, "ignoring api_key found in project config");
            warnings.push(ResolveWarning::ProjectSecretIgnored {
                provider: name.to_string(),
            });
        }

        let kind = entry.kind.ok_or_else(|| invalid("type"))?;
        let global_entry = self.global.llm.provider(name);
        let stored = global_entry
            .and_then(|g| g.api_key.clone())
            .filter(|s| !s.is_blank());

        let external = match (kind, &stored) {
            (ProviderKind::Cloud, None) => self.external_source(name),
            _ => None,
        };
        if global_entry.is_none() && kind == ProviderKind::Cloud && external.is_none() {
            return Err(ResolveError::MissingCredentials(name.to_string()));
        }

        let model = non_blank(entry.model.as_deref()).ok_or_else(|| invalid("model"))?;
        let endpoint = non_blank(entry.url.as_deref());

        let selected_provider = match kind {
            ProviderKind::Local => ResolvedProvider::Local {
                name: name.to_string(),
                model,
                endpoint: endpoint.ok_or_else(|| invalid("endpoint"))?,
                credential: stored.map(|secret| Credential::Stored { secret }),
            },
            ProviderKind::Cloud => {
                let credential = match (stored, external) {
                    (Some(secret), _) => Credential::Stored { secret },
                    (None, Some(source)) => {
                        tracing::warn!(provider = name, %source, "credential deferred to external source");
                        warnings.push(ResolveWarning::CredentialDeferred {
                            provider: name.to_string(),
                            source: source.clone(),
                        });
                        Credential::External { source }
                    }
                    (None, None) => return Err(invalid("secret")),
                };
                ResolvedProvider::Cloud {
                    name: name.to_string(),
                    model,
                    endpoint,
                    credential,
                }
            }
        };

        tracing::debug!(
            provider = name,
            kind = %kind,
            model = selected_provider.model(),
            "resolved provider"
        );
        Ok(ResolvedConfig {
            selected_provider,
            warnings,
        })
    }

    fn external_source(&self, provider: &str) -> Option<String> {
        self.secret_sources
            .iter()
            .find_map(|s| s.lookup(provider))
            .map(|found| found.source)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
