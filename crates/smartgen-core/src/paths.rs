use crate::error::{Result, SmartgenError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

/// Project-scoped settings, committed to version control. Never holds secrets.
pub const PROJECT_CONFIG_FILE: &str = ".smartgen.yml";

/// Software requirements document read by `smartgen generate`.
pub const SRS_FILE: &str = "srs.md";

/// Per-user private settings directory, relative to `$HOME`.
pub const GLOBAL_CONFIG_DIR: &str = ".smartgen";

/// Per-user private settings file inside [`GLOBAL_CONFIG_DIR`].
pub const GLOBAL_CONFIG_FILE: &str = ".llmconfig";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(PROJECT_CONFIG_FILE)
}

pub fn srs_path(root: &Path) -> PathBuf {
    root.join(SRS_FILE)
}

pub fn global_config_path(home: &Path) -> PathBuf {
    home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE)
}

/// `~/.smartgen/.llmconfig` for the current user.
pub fn default_global_config_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(SmartgenError::HomeNotFound)?;
    Ok(global_config_path(&home))
}

// ---------------------------------------------------------------------------
// Provider name validation
// ---------------------------------------------------------------------------

static PROVIDER_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn provider_name_re() -> &'static Regex {
    PROVIDER_NAME_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-]*$").expect("valid regex"))
}

pub fn validate_provider_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 || !provider_name_re().is_match(name) {
        return Err(SmartgenError::InvalidProviderName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_provider_names() {
        for name in ["openai", "ollama", "lm-studio", "test_provider", "gpt4.1", "A1"] {
            validate_provider_name(name).unwrap_or_else(|_| panic!("expected valid: {name}"));
        }
    }

    #[test]
    fn invalid_provider_names() {
        for name in ["", "-dash", ".hidden", "has space", "slash/name"] {
            assert!(
                validate_provider_name(name).is_err(),
                "expected invalid: {name}"
            );
        }
        assert!(validate_provider_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            project_config_path(root),
            PathBuf::from("/tmp/proj/.smartgen.yml")
        );
        assert_eq!(srs_path(root), PathBuf::from("/tmp/proj/srs.md"));
        assert_eq!(
            global_config_path(Path::new("/home/dev")),
            PathBuf::from("/home/dev/.smartgen/.llmconfig")
        );
    }
}
