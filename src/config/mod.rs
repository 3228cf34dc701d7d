//! Configuration management for weave.
//!
//! Settings are layered: built-in defaults, then the JSON file at
//! `~/.weave/config`, then environment variables. Command-line flags are
//! applied last by the CLI through [`ConfigBuilder`].

mod builder;
mod constants;
mod defaults;
mod environment;
mod loader;
mod types;
mod validation;

pub use builder::ConfigBuilder;
pub use constants::*;
pub use types::{
    Config, EmbedderKind, LlmProvider, LlmSettings, ModelSettings, RetrievalSettings,
    WorkflowSettings,
};

#[cfg(test)]
mod tests;
