mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, llmconfig::LlmconfigSubcommand};
use smartgen_core::project::ProjectSettings;
use smartgen_core::{ResolveError, SmartgenError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "smartgen",
    about = "Generate code from a requirements document with a configurable LLM provider",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .smartgen.yml or .git/)
    #[arg(long, global = true, env = "SMARTGEN_ROOT")]
    root: Option<PathBuf>,

    /// Private global config file (default: ~/.smartgen/.llmconfig)
    #[arg(long, global = true, env = "SMARTGEN_GLOBAL_CONFIG")]
    global_config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize smartgen in the current project
    Init {
        /// Project language
        #[arg(long, default_value = "python")]
        language: String,
        /// Project architecture pattern
        #[arg(long, default_value = "ddd")]
        pattern: String,
        /// Application type
        #[arg(long, default_value = "api")]
        app: String,
        /// Model to write for the default provider (overrides the global one)
        #[arg(long)]
        model: Option<String>,
        /// Do not accept API keys from environment variables
        #[arg(long)]
        no_env: bool,
    },

    /// Configure LLM providers in the private global config
    Llmconfig {
        #[command(subcommand)]
        subcommand: LlmconfigSubcommand,
    },

    /// Inspect, validate and resolve the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG always applies; --verbose raises the floor to DEBUG.
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let global = root::resolve_global_store(cli.global_config.as_deref());

    let result = global.and_then(|global| match cli.command {
        Commands::Init {
            language,
            pattern,
            app,
            model,
            no_env,
        } => {
            let settings = ProjectSettings {
                language,
                pattern,
                app,
            };
            cmd::init::run(&root, &global, settings, model, no_env, cli.json)
        }
        Commands::Llmconfig { subcommand } => cmd::llmconfig::run(&global, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, &global, subcommand, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        let hint = if let Some(err) = e.downcast_ref::<SmartgenError>() {
            err.hint()
        } else {
            e.downcast_ref::<ResolveError>().map(ResolveError::hint)
        };
        if let Some(hint) = hint {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}
