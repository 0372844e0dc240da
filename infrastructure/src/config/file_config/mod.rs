//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod deliberation;
mod gatherer;
mod interaction;
mod output;
mod personas;

pub use deliberation::FileDeliberationConfig;
pub use gatherer::FileGathererConfig;
pub use interaction::FileInteractionConfig;
pub use output::FileOutputConfig;
pub use personas::{FilePersonasConfig, PERSONA_PLACEHOLDER};

use council_application::DeliberationParams;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Convergence and round budget settings
    pub deliberation: FileDeliberationConfig,
    /// Roster and persona command
    pub personas: FilePersonasConfig,
    /// Codebase search and session summary lookups
    pub gatherer: FileGathererConfig,
    /// Human-in-the-loop settings
    pub interaction: FileInteractionConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Deliberation bounds
        let threshold = self.deliberation.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdOutOfRange,
                format!(
                    "deliberation.threshold: {} is outside (0, 1]",
                    threshold
                ),
            ));
        }
        if self.deliberation.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRounds,
                "deliberation.max_rounds must be at least 1",
            ));
        }
        if self.personas.roster.len() > self.deliberation.max_personas {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::RosterExceedsLimit,
                format!(
                    "personas.roster has {} entries but deliberation.max_personas is {}; extra personas are dropped",
                    self.personas.roster.len(),
                    self.deliberation.max_personas
                ),
            ));
        }

        // 2. Persona command
        if self.personas.command.first().is_none_or(|p| p.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCommand,
                "personas.command is empty; set the program that answers as a persona",
            ));
        } else if !self.personas.mentions_persona() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::CommandWithoutPersona,
                format!(
                    "personas.command never uses {}; the persona name is only passed as COUNCIL_PERSONA",
                    PERSONA_PLACEHOLDER
                ),
            ));
        }

        if let Some(dir) = &self.personas.working_dir
            && !dir.is_dir()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingWorkingDir,
                format!("personas.working_dir: {} is not a directory", dir.display()),
            ));
        }

        // 3. Timeouts (answer_timeout_secs = 0 means no timeout)
        for (field, value) in [
            ("personas.timeout_secs", self.personas.timeout_secs),
            ("gatherer.lookup_timeout_secs", self.gatherer.lookup_timeout_secs),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout,
                    format!("{} cannot be 0", field),
                ));
            }
        }

        // 4. Enum parse validation
        issues.extend(self.interaction.parse_mode().1);

        issues
    }

    /// Application-level parameters derived from this configuration
    pub fn deliberation_params(&self) -> DeliberationParams {
        let answer_timeout = match self.interaction.answer_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        DeliberationParams::default()
            .with_threshold(self.deliberation.threshold)
            .with_max_rounds(self.deliberation.max_rounds)
            .with_max_personas(self.deliberation.max_personas)
            .with_persona_timeout(Duration::from_secs(self.personas.timeout_secs))
            .with_lookup_timeout(Duration::from_secs(self.gatherer.lookup_timeout_secs))
            .with_answer_timeout(answer_timeout)
            .with_max_hits(self.gatherer.max_hits)
            .with_search_scope(self.gatherer.search_root.clone())
    }
}
