//! Deliberation configuration from TOML (`[deliberation]` section)

use council_domain::DEFAULT_CONVERGENCE_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Raw deliberation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    /// Weighted agreement required to converge, within (0, 1]
    pub threshold: f64,
    /// Round budget
    pub max_rounds: usize,
    /// Roster size limit, recruited personas included
    pub max_personas: usize,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            max_rounds: 5,
            max_personas: 8,
        }
    }
}
