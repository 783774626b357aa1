pub mod config;
pub mod init;
pub mod llmconfig;

use smartgen_core::resolver::{EnvSecretSource, SecretSource};

/// Alternate credential sources for resolution; empty with `--no-env`.
pub fn secret_sources(no_env: bool) -> Vec<Box<dyn SecretSource>> {
    if no_env {
        Vec::new()
    } else {
        vec![Box::new(EnvSecretSource::new())]
    }
}
