//! Persona configuration from TOML (`[personas]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by the persona name in `command` arguments
pub const PERSONA_PLACEHOLDER: &str = "{persona}";

/// Raw persona configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersonasConfig {
    /// Initial roster
    pub roster: Vec<String>,
    /// Program and arguments run once per persona call; the prompt goes to stdin
    pub command: Vec<String>,
    /// Bound on each persona call
    pub timeout_secs: u64,
    /// Directory the command runs in; unset keeps the current one
    pub working_dir: Option<PathBuf>,
}

impl Default for FilePersonasConfig {
    fn default() -> Self {
        Self {
            roster: vec![
                "security".to_string(),
                "performance".to_string(),
                "maintainer".to_string(),
            ],
            command: Vec::new(),
            timeout_secs: 120,
            working_dir: None,
        }
    }
}

impl FilePersonasConfig {
    /// Whether any argument carries the persona placeholder
    pub fn mentions_persona(&self) -> bool {
        self.command.iter().any(|arg| arg.contains(PERSONA_PLACEHOLDER))
    }
}
