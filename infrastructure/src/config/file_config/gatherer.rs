//! Information gatherer configuration from TOML (`[gatherer]` section)

use serde::{Deserialize, Serialize};

/// Raw gatherer configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGathererConfig {
    /// Directory searched for codebase requests
    pub search_root: String,
    /// Glob, relative to `search_root`, selecting the files searched
    pub file_pattern: String,
    /// Directory holding `*.jsonl` / `*.json` session summaries
    pub summaries_dir: String,
    /// Bound on each lookup attempt
    pub lookup_timeout_secs: u64,
    /// Hits kept per successful search
    pub max_hits: usize,
}

impl Default for FileGathererConfig {
    fn default() -> Self {
        Self {
            search_root: ".".to_string(),
            file_pattern: "**/*".to_string(),
            summaries_dir: ".council/summaries".to_string(),
            lookup_timeout_secs: 10,
            max_hits: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gatherer_deserialize() {
        let toml_str = r#"
[gatherer]
search_root = "src"
file_pattern = "**/*.rs"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gatherer.search_root, "src");
        assert_eq!(config.gatherer.file_pattern, "**/*.rs");
        assert_eq!(config.gatherer, FileGathererConfig {
            search_root: "src".to_string(),
            file_pattern: "**/*.rs".to_string(),
            ..FileGathererConfig::default()
        });
    }
}
