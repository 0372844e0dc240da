//! Output format value object

use serde::{Deserialize, Serialize};

/// How a deliberation report is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round, every persona, and the final outcome (default)
    #[default]
    Full,
    /// Only the final verdict line
    Verdict,
    /// JSON output
    Json,
}
