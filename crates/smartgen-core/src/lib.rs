//! Layered LLM provider configuration for smartgen.
//!
//! Two stores feed every provider call: `.smartgen.yml` in the project
//! (committed, secret-free) and `~/.smartgen/.llmconfig` (private, holds API
//! keys). [`ConfigResolver`] merges them into one validated provider.

pub mod error;
pub mod global;
pub mod init;
pub mod io;
pub mod paths;
pub mod project;
pub mod provider;
pub mod resolver;

pub use error::{Result, SmartgenError};
pub use resolver::{ConfigResolver, ResolveError, ResolvedConfig};
