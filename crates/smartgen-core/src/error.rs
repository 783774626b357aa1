use crate::resolver::ResolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmartgenError {
    #[error("not initialized: run 'smartgen init'")]
    NotInitialized,

    #[error("'.smartgen.yml' already exists in {0}")]
    ProjectConfigExists(String),

    #[error("provider '{0}' not found")]
    ProviderNotFound(String),

    #[error("invalid provider name '{0}': use letters, digits, '.', '_' or '-'")]
    InvalidProviderName(String),

    #[error("invalid provider type '{0}': expected 'local' or 'cloud'")]
    InvalidProviderKind(String),

    #[error("no LLM configuration found: run 'smartgen llmconfig set-config' first")]
    NoProvidersConfigured,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("default provider '{0}' has no model configured")]
    MissingModel(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SmartgenError {
    /// A next step the user can take, when there is one to suggest.
    pub fn hint(&self) -> Option<String> {
        match self {
            SmartgenError::Resolve(e) => Some(e.hint()),
            SmartgenError::MissingModel(name) => Some(format!(
                "pass --model <model> to 'smartgen init', or run \
                 'smartgen llmconfig set-config --add {name} --model <model>'"
            )),
            SmartgenError::ProjectConfigExists(_) => {
                Some("use 'smartgen config show' to inspect the existing file".to_string())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SmartgenError>;
