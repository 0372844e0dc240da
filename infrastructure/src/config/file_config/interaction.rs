//! Interaction configuration from TOML (`[interaction]` section)

use council_domain::{ConfigIssue, ConfigIssueCode, InteractionMode};
use serde::{Deserialize, Serialize};

/// Raw interaction configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInteractionConfig {
    /// `interactive` or `headless`
    pub mode: String,
    /// Bound on each wait for a human answer; 0 waits forever
    pub answer_timeout_secs: u64,
}

impl Default for FileInteractionConfig {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Interactive.to_string(),
            answer_timeout_secs: 300,
        }
    }
}

impl FileInteractionConfig {
    /// Parse `mode`, falling back to interactive with an issue when unknown
    pub fn parse_mode(&self) -> (InteractionMode, Vec<ConfigIssue>) {
        match self.mode.parse::<InteractionMode>() {
            Ok(mode) => (mode, vec![]),
            Err(e) => (
                InteractionMode::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::UnknownInteractionMode,
                    format!("interaction.mode: {}", e),
                )],
            ),
        }
    }
}
