use crate::output::print_json;
use anyhow::Context;
use smartgen_core::global::GlobalStore;
use smartgen_core::init;
use smartgen_core::project::ProjectSettings;
use std::path::Path;

pub fn run(
    root: &Path,
    global: &GlobalStore,
    settings: ProjectSettings,
    model: Option<String>,
    no_env: bool,
    json: bool,
) -> anyhow::Result<()> {
    let global_config = global
        .load()
        .with_context(|| format!("failed to load {}", global.path().display()))?;
    let outcome = init::initialize(
        root,
        &global_config,
        settings,
        model,
        super::secret_sources(no_env),
    )?;

    if json {
        print_json(&serde_json::json!({
            "provider": outcome.provider_name,
            "type": outcome.provider.kind,
            "model": outcome.provider.model,
            "config": outcome.config_path,
            "srs": outcome.srs_path,
            "srs_created": outcome.srs_created,
            "warnings": outcome.warnings,
        }))?;
        return Ok(());
    }

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    println!("Initialized with provider '{}'.", outcome.provider_name);
    println!(
        "Created {} in {}",
        smartgen_core::paths::PROJECT_CONFIG_FILE,
        root.display()
    );
    if outcome.srs_created {
        println!(
            "\nNext step: blank Software Requirements Specification created at {}.\n\
             Please provide the initial requirement to get started.",
            smartgen_core::paths::SRS_FILE
        );
    }
    Ok(())
}
