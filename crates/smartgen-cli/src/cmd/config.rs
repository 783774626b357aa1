use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use smartgen_core::global::GlobalStore;
use smartgen_core::project::{ProjectConfig, WarnLevel};
use smartgen_core::provider::Credential;
use smartgen_core::ConfigResolver;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate .smartgen.yml for common mistakes
    Validate,

    /// Print the project configuration (secrets are never shown)
    Show,

    /// Resolve the provider a generation run would use
    Resolve {
        /// Provider name (default: llm.default from .smartgen.yml)
        #[arg(long)]
        provider: Option<String>,
        /// Do not accept API keys from environment variables
        #[arg(long)]
        no_env: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    global: &GlobalStore,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Resolve { provider, no_env } => {
            resolve(root, global, provider.as_deref(), no_env, json)
        }
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = ProjectConfig::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = ProjectConfig::load(root)
        .context("failed to load config")?
        .sanitized();

    if json {
        return print_json(&config);
    }
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

fn resolve(
    root: &Path,
    global: &GlobalStore,
    provider: Option<&str>,
    no_env: bool,
    json: bool,
) -> anyhow::Result<()> {
    // Both stores are reloaded on every call; nothing is cached between runs.
    let project = ProjectConfig::load(root).context("failed to load config")?;
    let global_config = global
        .load()
        .with_context(|| format!("failed to load {}", global.path().display()))?;

    let mut resolver = ConfigResolver::new(&project, &global_config);
    for source in super::secret_sources(no_env) {
        resolver = resolver.with_secret_source(source);
    }
    let resolved = resolver.resolve(provider)?;

    if json {
        return print_json(&resolved);
    }

    for warning in &resolved.warnings {
        eprintln!("warning: {warning}");
    }
    let selected = &resolved.selected_provider;
    println!("Provider: {}", selected.name());
    println!("Type:     {}", selected.kind());
    println!("Model:    {}", selected.model());
    println!("Endpoint: {}", selected.endpoint().unwrap_or("(provider default)"));
    let credential = match selected.credential() {
        Some(Credential::Stored { .. }) => "******** (global config)".to_string(),
        Some(Credential::External { source }) => format!("from {source}"),
        None => "none".to_string(),
    };
    println!("API key:  {credential}");
    Ok(())
}
