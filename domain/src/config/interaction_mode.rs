//! How unresolved information requests reach a human

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Interaction mode for the human-in-the-loop step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Prompt on the terminal (default)
    #[default]
    Interactive,
    /// Nobody is listening: every request is reported as unavailable
    Headless,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::Interactive => "interactive",
            InteractionMode::Headless => "headless",
        }
    }
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interactive" => Ok(InteractionMode::Interactive),
            "headless" => Ok(InteractionMode::Headless),
            other => Err(format!(
                "Unknown interaction mode '{}' (expected interactive or headless)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Headless".parse::<InteractionMode>().unwrap(),
            InteractionMode::Headless
        );
        assert!("batch".parse::<InteractionMode>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let mode = InteractionMode::Interactive;
        assert_eq!(mode.to_string().parse::<InteractionMode>().unwrap(), mode);
    }
}
