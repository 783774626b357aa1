//! The private per-user store, `~/.smartgen/.llmconfig`.
//!
//! This is the only place provider secrets are written. It is JSON and is
//! written with owner-only permissions.

use crate::error::{Result, SmartgenError};
use crate::io;
use crate::paths;
use crate::provider::{LlmSettings, ProviderEntry, ProviderKind, Secret};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub llm: LlmSettings,
}

impl GlobalConfig {
    /// Secret for `provider`, or for the default provider when `None`.
    pub fn api_key(&self, provider: Option<&str>) -> Option<&Secret> {
        let name = provider.or_else(|| self.llm.default_name())?;
        self.llm.provider(name)?.api_key.as_ref()
    }

    /// The default provider's name and entry, if both exist.
    pub fn default_provider(&self) -> Option<(&str, &ProviderEntry)> {
        let name = self.llm.default_name()?;
        self.llm.provider(name).map(|entry| (name, entry))
    }
}

/// Options for [`GlobalStore::add_provider`].
#[derive(Debug, Clone, Default)]
pub struct NewProvider {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub url: Option<String>,
}

/// Handle on the global config file. Every operation reloads from disk.
#[derive(Debug, Clone)]
pub struct GlobalStore {
    path: PathBuf,
}

impl GlobalStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.smartgen/.llmconfig` for the current user.
    pub fn default_location() -> Result<Self> {
        Ok(Self::at(paths::default_global_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty config.
    pub fn load(&self) -> Result<GlobalConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "global config not found, using empty");
            return Ok(GlobalConfig::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(GlobalConfig::default());
        }
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &GlobalConfig) -> Result<()> {
        let data = serde_json::to_string_pretty(config)?;
        io::atomic_write_private(&self.path, data.as_bytes())
    }

    /// Add or replace a provider. Local providers get default model and url
    /// when none are given. The first provider added becomes the default.
    pub fn add_provider(&self, name: &str, kind: ProviderKind, opts: NewProvider) -> Result<()> {
        paths::validate_provider_name(name)?;
        let mut config = self.load()?;
        let is_first = config.llm.providers.is_empty();

        let mut entry = ProviderEntry::new(kind);
        entry.api_key = opts.api_key.filter(|k| !k.is_empty()).map(Secret::new);
        entry.model = opts.model.filter(|m| !m.is_empty());
        entry.url = opts.url.filter(|u| !u.is_empty());
        entry.fill_local_defaults();

        config.llm.providers.insert(name.to_string(), entry);
        if is_first {
            config.llm.default = Some(name.to_string());
        }
        tracing::debug!(provider = name, %kind, first = is_first, "saved provider");
        self.save(&config)
    }

    pub fn set_default_provider(&self, name: &str) -> Result<()> {
        let mut config = self.load()?;
        if !config.llm.providers.contains_key(name) {
            return Err(SmartgenError::ProviderNotFound(name.to_string()));
        }
        config.llm.default = Some(name.to_string());
        self.save(&config)
    }

    /// Remove a provider, clearing the default if it pointed at it.
    pub fn remove_provider(&self, name: &str) -> Result<()> {
        let mut config = self.load()?;
        if config.llm.providers.remove(name).is_none() {
            return Err(SmartgenError::ProviderNotFound(name.to_string()));
        }
        if config.llm.default.as_deref() == Some(name) {
            config.llm.default = None;
        }
        self.save(&config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{DEFAULT_LOCAL_MODEL, DEFAULT_LOCAL_URL};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> GlobalStore {
        GlobalStore::at(paths::global_config_path(dir.path()))
    }

    #[test]
    fn load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let cfg = store(&dir).load().unwrap();
        assert_eq!(cfg, GlobalConfig::default());
        assert!(!store(&dir).path().exists());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = GlobalConfig::default();
        cfg.llm.default = Some("test".to_string());
        store(&dir).save(&cfg).unwrap();
        assert_eq!(store(&dir).load().unwrap(), cfg);
    }

    #[test]
    fn reads_original_json_layout() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::create_dir_all(s.path().parent().unwrap()).unwrap();
        std::fs::write(
            s.path(),
            r#"{"llm":{"default":"openai","providers":{"openai":{"type":"cloud","api_key":"sk-1"}}}}"#,
        )
        .unwrap();
        let cfg = s.load().unwrap();
        assert_eq!(cfg.api_key(None).map(Secret::expose), Some("sk-1"));
        assert_eq!(cfg.api_key(Some("openai")).map(Secret::expose), Some("sk-1"));
        assert!(cfg.api_key(Some("other")).is_none());
    }

    #[test]
    fn add_provider_first_becomes_default() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider(
            "test_provider",
            ProviderKind::Local,
            NewProvider {
                model: Some("test-model".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let cfg = s.load().unwrap();
        let entry = cfg.llm.provider("test_provider").unwrap();
        assert_eq!(entry.kind, Some(ProviderKind::Local));
        assert_eq!(entry.model.as_deref(), Some("test-model"));
        assert_eq!(entry.url.as_deref(), Some(DEFAULT_LOCAL_URL));
        assert_eq!(cfg.llm.default_name(), Some("test_provider"));
    }

    #[test]
    fn add_local_provider_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider("ollama", ProviderKind::Local, NewProvider::default())
            .unwrap();
        let cfg = s.load().unwrap();
        let entry = cfg.llm.provider("ollama").unwrap();
        assert_eq!(entry.model.as_deref(), Some(DEFAULT_LOCAL_MODEL));
        assert_eq!(entry.url.as_deref(), Some(DEFAULT_LOCAL_URL));
        assert!(entry.api_key.is_none());
    }

    #[test]
    fn add_cloud_provider_keeps_key_and_no_defaults() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider(
            "openai",
            ProviderKind::Cloud,
            NewProvider {
                api_key: Some("sk-abc".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let cfg = s.load().unwrap();
        let entry = cfg.llm.provider("openai").unwrap();
        assert_eq!(entry.api_key.as_ref().map(Secret::expose), Some("sk-abc"));
        assert!(entry.model.is_none());
        assert!(entry.url.is_none());
    }

    #[test]
    fn second_provider_does_not_change_default() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider("provider1", ProviderKind::Local, NewProvider::default())
            .unwrap();
        s.add_provider("provider2", ProviderKind::Local, NewProvider::default())
            .unwrap();
        assert_eq!(s.load().unwrap().llm.default_name(), Some("provider1"));
    }

    #[test]
    fn add_provider_rejects_bad_name() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir)
            .add_provider("bad name", ProviderKind::Cloud, NewProvider::default())
            .unwrap_err();
        assert!(matches!(err, SmartgenError::InvalidProviderName(_)));
    }

    #[test]
    fn set_default_provider() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider("provider1", ProviderKind::Local, NewProvider::default())
            .unwrap();
        s.add_provider("provider2", ProviderKind::Local, NewProvider::default())
            .unwrap();
        s.set_default_provider("provider2").unwrap();
        assert_eq!(s.load().unwrap().llm.default_name(), Some("provider2"));
    }

    #[test]
    fn set_default_provider_nonexistent() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir).set_default_provider("nonexistent").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn remove_provider_keeps_other_default() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider("provider1", ProviderKind::Local, NewProvider::default())
            .unwrap();
        s.add_provider("provider2", ProviderKind::Local, NewProvider::default())
            .unwrap();
        s.remove_provider("provider2").unwrap();

        let cfg = s.load().unwrap();
        assert!(cfg.llm.provider("provider2").is_none());
        assert_eq!(cfg.llm.default_name(), Some("provider1"));
    }

    #[test]
    fn remove_default_provider_unsets_default() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_provider("provider1", ProviderKind::Local, NewProvider::default())
            .unwrap();
        s.remove_provider("provider1").unwrap();

        let cfg = s.load().unwrap();
        assert!(cfg.llm.providers.is_empty());
        assert!(cfg.llm.default.is_none());
    }

    #[test]
    fn remove_unknown_provider_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            store(&dir).remove_provider("ghost"),
            Err(SmartgenError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn default_provider_lookup() {
        let mut cfg = GlobalConfig::default();
        assert!(cfg.default_provider().is_none());
        cfg.llm.default = Some("codex".to_string());
        assert!(cfg.default_provider().is_none());
        cfg.llm
            .providers
            .insert("codex".to_string(), ProviderEntry::new(ProviderKind::Cloud));
        assert_eq!(cfg.default_provider().map(|(n, _)| n), Some("codex"));
    }
}
