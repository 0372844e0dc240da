//! `[output]` section: how the final report is printed

use council_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `full`, `verdict` or `json`; unset prints the full report
    pub format: Option<OutputFormat>,
    /// Colored terminal output (`NO_COLOR` in the environment also turns it off)
    pub color: bool,
    /// Progress bars while personas deliberate
    pub progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            progress: true,
        }
    }
}

impl FileOutputConfig {
    pub fn effective_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn use_color(&self) -> bool {
        self.color && std::env::var_os("NO_COLOR").is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_section_deserialize() {
        let toml_str = r#"
[output]
format = "verdict"
progress = false
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.effective_format(), OutputFormat::Verdict);
        assert!(config.output.color);
        assert!(!config.output.progress);
    }

    #[test]
    fn test_unset_format_is_full() {
        assert_eq!(
            FileOutputConfig::default().effective_format(),
            OutputFormat::Full
        );
    }

    #[test]
    fn test_color_flag_off_wins() {
        let config = FileOutputConfig {
            color: false,
            ..Default::default()
        };
        assert!(!config.use_color());
    }
}
