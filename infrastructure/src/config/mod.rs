//! Configuration file loading for persona-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COUNCIL_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/persona-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDeliberationConfig, FileGathererConfig, FileInteractionConfig,
    FileOutputConfig, FilePersonasConfig, PERSONA_PLACEHOLDER,
};
pub use loader::ConfigLoader;
