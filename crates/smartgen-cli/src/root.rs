use smartgen_core::global::GlobalStore;
use smartgen_core::paths::PROJECT_CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Resolve the project root directory.
///
/// Priority:
/// 1. `--root` flag / `SMARTGEN_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.smartgen.yml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if let Some(dir) = find_upward(&cwd, |d| d.join(PROJECT_CONFIG_FILE).is_file()) {
        return dir;
    }
    if let Some(dir) = find_upward(&cwd, |d| d.join(".git").is_dir()) {
        return dir;
    }

    cwd
}

fn find_upward(start: &Path, matches: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| matches(*dir))
        .map(Path::to_path_buf)
}

/// The private global store: `--global-config` / `SMARTGEN_GLOBAL_CONFIG`,
/// else `~/.smartgen/.llmconfig`.
pub fn resolve_global_store(explicit: Option<&Path>) -> anyhow::Result<GlobalStore> {
    match explicit {
        Some(p) => Ok(GlobalStore::at(p)),
        None => Ok(GlobalStore::default_location()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn find_upward_locates_project_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "llm: {}\n").unwrap();
        let subdir = dir.path().join("src/domain");
        std::fs::create_dir_all(&subdir).unwrap();

        let found = find_upward(&subdir, |d| d.join(PROJECT_CONFIG_FILE).is_file());
        assert_eq!(found.as_deref(), Some(dir.path()));
    }

    #[test]
    fn explicit_global_config_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("llmconfig.json");
        let store = resolve_global_store(Some(path.as_path())).unwrap();
        assert_eq!(store.path(), path.as_path());
    }
}
