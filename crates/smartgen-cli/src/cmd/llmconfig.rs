use crate::output::{mask, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use smartgen_core::global::{GlobalStore, NewProvider};
use smartgen_core::provider::ProviderKind;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum LlmconfigSubcommand {
    /// Save a provider (cloud or local)
    ///
    /// Examples:
    ///   smartgen llmconfig set-config --default openai --api-key <key>
    ///   smartgen llmconfig set-config --add ollama --model qwen --url http://localhost:11434
    SetConfig {
        /// Default LLM provider to configure with --api-key (e.g. openai, anthropic)
        #[arg(long)]
        default: Option<String>,
        /// API key for a cloud provider
        #[arg(long)]
        api_key: Option<String>,
        /// Add or update a provider by name
        #[arg(long)]
        add: Option<String>,
        /// Model name (local default: deepseek-coder-v2)
        #[arg(long)]
        model: Option<String>,
        /// Endpoint URL (local default: http://localhost:11434)
        #[arg(long)]
        url: Option<String>,
        /// Provider type: local or cloud (default: inferred from the name)
        #[arg(long = "type", value_name = "TYPE")]
        provider_type: Option<String>,
    },

    /// Set the default LLM provider
    SetDefault {
        /// Provider name to set as default
        provider: String,
    },

    /// Remove an LLM provider configuration
    Remove {
        /// Provider name to remove
        provider: String,
    },

    /// Display current LLM configuration (keys are masked)
    Show,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(store: &GlobalStore, subcmd: LlmconfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        LlmconfigSubcommand::SetConfig {
            default,
            api_key,
            add,
            model,
            url,
            provider_type,
        } => set_config(store, default, api_key, add, model, url, provider_type),
        LlmconfigSubcommand::SetDefault { provider } => {
            store.set_default_provider(&provider)?;
            println!("Default provider set to: {provider}");
            Ok(())
        }
        LlmconfigSubcommand::Remove { provider } => {
            store.remove_provider(&provider)?;
            println!("Provider '{provider}' removed");
            Ok(())
        }
        LlmconfigSubcommand::Show => show(store, json),
    }
}

// ---------------------------------------------------------------------------
// set-config
// ---------------------------------------------------------------------------

fn set_config(
    store: &GlobalStore,
    default: Option<String>,
    api_key: Option<String>,
    add: Option<String>,
    model: Option<String>,
    url: Option<String>,
    provider_type: Option<String>,
) -> anyhow::Result<()> {
    let explicit_kind = provider_type
        .as_deref()
        .map(str::parse::<ProviderKind>)
        .transpose()?;

    if let Some(name) = add {
        let kind = explicit_kind.unwrap_or_else(|| ProviderKind::infer(&name));
        store
            .add_provider(&name, kind, NewProvider { api_key, model, url })
            .with_context(|| format!("error saving provider '{name}'"))?;
        println!("Provider '{name}' saved (type: {kind})");
        return Ok(());
    }

    match (default, api_key) {
        (Some(name), Some(key)) => {
            let kind = explicit_kind.unwrap_or(ProviderKind::Cloud);
            store
                .add_provider(
                    &name,
                    kind,
                    NewProvider {
                        api_key: Some(key),
                        model,
                        url,
                    },
                )
                .with_context(|| format!("error saving provider '{name}'"))?;
            store.set_default_provider(&name)?;
            println!("LLM config saved: provider={name}");
            Ok(())
        }
        _ => anyhow::bail!("please provide either --add or (--default + --api-key)"),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(store: &GlobalStore, json: bool) -> anyhow::Result<()> {
    let config = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    let llm = &config.llm;

    if json {
        let providers: serde_json::Map<String, serde_json::Value> = llm
            .providers
            .iter()
            .map(|(name, p)| {
                (
                    name.clone(),
                    serde_json::json!({
                        "type": p.kind,
                        "model": p.model,
                        "url": p.url,
                        "api_key_set": p.has_secret(),
                    }),
                )
            })
            .collect();
        print_json(&serde_json::json!({
            "default": llm.default,
            "providers": providers,
        }))?;
        return Ok(());
    }

    if llm.providers.is_empty() && llm.default.is_none() {
        println!("No LLM configuration found.");
        return Ok(());
    }

    println!(
        "Default provider: {}",
        llm.default_name().unwrap_or("Not set")
    );
    if llm.providers.is_empty() {
        println!("No providers configured.");
        return Ok(());
    }

    println!();
    print_table(
        &["NAME", "TYPE", "MODEL", "URL", "API KEY"],
        llm.providers
            .iter()
            .map(|(name, p)| {
                vec![
                    name.clone(),
                    p.kind.map(|k| k.to_string()).unwrap_or_else(|| "unknown".to_string()),
                    p.model.clone().unwrap_or_else(|| "N/A".to_string()),
                    p.url.clone().unwrap_or_else(|| "-".to_string()),
                    mask(p.has_secret()),
                ]
            })
            .collect(),
    );
    Ok(())
}
