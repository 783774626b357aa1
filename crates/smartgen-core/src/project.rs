use crate::error::{Result, SmartgenError};
use crate::paths;
use crate::provider::{sanitize_for_project_scope, LlmSettings, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_pattern", alias = "architecture_pattern")]
    pub pattern: String,
    #[serde(default = "default_app", alias = "application_kind")]
    pub app: String,
}

fn default_language() -> String {
    "python".to_string()
}

fn default_pattern() -> String {
    "ddd".to_string()
}

fn default_app() -> String {
    "api".to_string()
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            pattern: default_pattern(),
            app: default_app(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig (.smartgen.yml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSettings,
    #[serde(default)]
    pub llm: LlmSettings,
}

impl ProjectConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::project_config_path(root);
        if !path.exists() {
            return Err(SmartgenError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        // An empty file is a valid, empty config.
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: ProjectConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Write `.smartgen.yml`. Every provider is sanitized on the way out, so a
    /// secret that slipped into memory never reaches the committed file.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::project_config_path(root);
        let data = serde_yaml::to_string(&self.sanitized())?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn sanitized(&self) -> Self {
        let mut clean = self.clone();
        for entry in clean.llm.providers.values_mut() {
            *entry = sanitize_for_project_scope(entry);
        }
        clean
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        match self.llm.default_name() {
            None => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no default provider set in llm.default".to_string(),
            }),
            Some(name) if !self.llm.providers.contains_key(name) => {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("default provider '{name}' is not defined in llm.providers"),
                })
            }
            Some(_) => {}
        }

        for (name, entry) in &self.llm.providers {
            if entry.has_secret() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "provider '{name}' has an api_key; secrets belong in the global config"
                    ),
                });
            }

            match entry.kind {
                None => warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("provider '{name}' has no type (expected local or cloud)"),
                }),
                Some(ProviderKind::Local) => {
                    if entry.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                        warnings.push(ConfigWarning {
                            level: WarnLevel::Warning,
                            message: format!("local provider '{name}' has no url"),
                        });
                    }
                }
                Some(ProviderKind::Cloud) => {}
            }

            if entry.model.as_deref().map_or(true, |m| m.trim().is_empty()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("provider '{name}' has no model"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderEntry;
    use tempfile::TempDir;

    fn sample() -> ProjectConfig {
        let mut cfg = ProjectConfig::default();
        cfg.llm.default = Some("ollama".to_string());
        cfg.llm.providers.insert(
            "ollama".to_string(),
            ProviderEntry::new(ProviderKind::Local)
                .with_model("deepseek-coder-v2")
                .with_url("http://localhost:11434"),
        );
        cfg
    }

    #[test]
    fn parses_original_layout() {
        let yaml = r#"
project:
  language: python
  pattern: ddd
  app: api

llm:
  default: ollama
  providers:
    ollama:
      type: local
      model: deepseek-coder-v2
"#;
        let cfg: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.project.language, "python");
        assert_eq!(cfg.llm.default_name(), Some("ollama"));
        let ollama = cfg.llm.provider("ollama").unwrap();
        assert_eq!(ollama.kind, Some(ProviderKind::Local));
        assert!(ollama.url.is_none());
    }

    #[test]
    fn project_section_defaults() {
        let cfg: ProjectConfig = serde_yaml::from_str("llm:\n  default: x\n").unwrap();
        assert_eq!(cfg.project, ProjectSettings::default());
        assert_eq!(cfg.project.pattern, "ddd");
        assert_eq!(cfg.project.app, "api");
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, SmartgenError::NotInitialized));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = sample();
        cfg.save(dir.path()).unwrap();
        let loaded = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn save_strips_secrets() {
        let dir = TempDir::new().unwrap();
        let mut cfg = sample();
        cfg.llm.providers.insert(
            "openai".to_string(),
            ProviderEntry::new(ProviderKind::Cloud)
                .with_model("gpt-4o")
                .with_api_key("sk-should-not-leak"),
        );
        cfg.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(paths::project_config_path(dir.path())).unwrap();
        assert!(!raw.contains("sk-should-not-leak"));
        assert!(!raw.contains("api_key"));
        let loaded = ProjectConfig::load(dir.path()).unwrap();
        assert!(loaded.llm.providers.values().all(|p| !p.has_secret()));
    }

    #[test]
    fn load_empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::project_config_path(dir.path()), "").unwrap();
        let cfg = ProjectConfig::load(dir.path()).unwrap();
        assert!(cfg.llm.providers.is_empty());
    }

    #[test]
    fn load_invalid_yaml_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            paths::project_config_path(dir.path()),
            "llm:\n  providers: [unclosed\n",
        )
        .unwrap();
        assert!(matches!(
            ProjectConfig::load(dir.path()),
            Err(SmartgenError::Yaml(_))
        ));
    }

    #[test]
    fn validate_clean_config_no_warnings() {
        assert!(sample().validate().is_empty());
    }

    #[test]
    fn validate_flags_secret_as_error() {
        let mut cfg = sample();
        cfg.llm.providers.insert(
            "openai".to_string(),
            ProviderEntry::new(ProviderKind::Cloud)
                .with_model("gpt-4o")
                .with_api_key("sk-x"),
        );
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| {
            w.level == WarnLevel::Error && w.message.contains("provider 'openai' has an api_key")
        }));
    }

    #[test]
    fn validate_dangling_default() {
        let mut cfg = sample();
        cfg.llm.default = Some("ghost".to_string());
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("'ghost'")));
    }

    #[test]
    fn validate_missing_default_and_fields() {
        let mut cfg = ProjectConfig::default();
        cfg.llm
            .providers
            .insert("ollama".to_string(), ProviderEntry::new(ProviderKind::Local));
        cfg.llm
            .providers
            .insert("mystery".to_string(), ProviderEntry::default().with_model("m"));
        let warnings = cfg.validate();
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("no default provider")));
        assert!(messages.iter().any(|m| m.contains("local provider 'ollama' has no url")));
        assert!(messages.iter().any(|m| m.contains("provider 'ollama' has no model")));
        assert!(messages.iter().any(|m| m.contains("provider 'mystery' has no type")));
    }
}
