//! `smartgen init`: seed a project from the user's default provider.

use crate::error::{Result, SmartgenError};
use crate::global::GlobalConfig;
use crate::io;
use crate::paths;
use crate::project::{ProjectConfig, ProjectSettings};
use crate::provider::{sanitize_for_project_scope, ProviderEntry, ProviderKind};
use crate::resolver::{ConfigResolver, ResolveError, ResolveWarning, SecretSource};
use std::path::{Path, PathBuf};

const BLANK_SRS: &str = "# Software Requirements Specification\n\n";

#[derive(Debug)]
pub struct InitOutcome {
    pub provider_name: String,
    /// The entry as written to `.smartgen.yml` (no secret).
    pub provider: ProviderEntry,
    pub config_path: PathBuf,
    pub srs_path: PathBuf,
    pub srs_created: bool,
    pub warnings: Vec<ResolveWarning>,
}

/// Write `.smartgen.yml` for `root` using the global default provider.
///
/// `model` replaces the default provider's model in the project file only;
/// the global store is left alone. The new project config is resolved
/// against `global` before anything is written, so a cloud default without a
/// key or a model fails here rather than at the first `generate`.
pub fn initialize(
    root: &Path,
    global: &GlobalConfig,
    settings: ProjectSettings,
    model: Option<String>,
    secret_sources: Vec<Box<dyn SecretSource>>,
) -> Result<InitOutcome> {
    if global.llm.providers.is_empty() {
        return Err(SmartgenError::NoProvidersConfigured);
    }
    let (name, source) = match global.default_provider() {
        Some(found) => found,
        None => {
            return Err(match global.llm.default_name() {
                Some(dangling) => SmartgenError::ProviderNotFound(dangling.to_string()),
                None => ResolveError::MissingDefaultProvider.into(),
            })
        }
    };

    let mut entry = sanitize_for_project_scope(source);
    if entry.kind.is_none() {
        entry.kind = Some(ProviderKind::infer(name));
    }
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        entry.model = Some(model);
    }
    entry.fill_local_defaults();

    let mut project = ProjectConfig {
        project: settings,
        ..ProjectConfig::default()
    };
    project.llm.default = Some(name.to_string());
    project.llm.providers.insert(name.to_string(), entry.clone());

    let mut resolver = ConfigResolver::new(&project, global);
    for secret_source in secret_sources {
        resolver = resolver.with_secret_source(secret_source);
    }
    // The project file does not exist yet, so point at the flag instead.
    let resolved = resolver.resolve(None).map_err(|e| match e {
        ResolveError::InvalidProviderConfig { field: "model", .. } => {
            SmartgenError::MissingModel(name.to_string())
        }
        other => other.into(),
    })?;

    let config_path = paths::project_config_path(root);
    if config_path.exists() {
        return Err(SmartgenError::ProjectConfigExists(root.display().to_string()));
    }
    project.save(root)?;

    let srs_path = paths::srs_path(root);
    let srs_created = io::write_if_missing(&srs_path, BLANK_SRS.as_bytes())?;

    tracing::debug!(provider = name, srs_created, "initialized project");
    Ok(InitOutcome {
        provider_name: name.to_string(),
        provider: entry,
        config_path,
        srs_path,
        srs_created,
        warnings: resolved.warnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
