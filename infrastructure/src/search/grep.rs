//! Literal, case-insensitive text search over a directory tree.

use async_trait::async_trait;
use council_application::ports::text_search::{LookupError, TextSearchPort};
use council_domain::SearchHit;
use council_domain::core::string::truncate;
use glob::glob;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum number of hits returned per search
const MAX_RESULTS: usize = 200;

/// Maximum file size for grep (5 MB)
const MAX_GREP_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum excerpt length per hit
const MAX_EXCERPT_CHARS: usize = 200;

/// [`TextSearchPort`] that scans files on the local filesystem
#[derive(Debug, Clone)]
pub struct GrepTextSearch {
    file_pattern: String,
}

impl GrepTextSearch {
    pub fn new() -> Self {
        Self {
            file_pattern: "**/*".to_string(),
        }
    }

    /// Restrict the files scanned below the scope (e.g. `**/*.rs`)
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }
}

impl Default for GrepTextSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextSearchPort for GrepTextSearch {
    async fn search(&self, pattern: &str, scope: &str) -> Result<Vec<SearchHit>, LookupError> {
        let pattern = pattern.trim().to_string();
        if pattern.is_empty() {
            return Err(LookupError::InvalidPattern("empty search term".to_string()));
        }

        let scope = PathBuf::from(scope);
        if !scope.exists() {
            return Err(LookupError::ScopeNotFound(scope.display().to_string()));
        }

        let file_pattern = self.file_pattern.clone();
        tokio::task::spawn_blocking(move || grep_literal(&pattern, &scope, &file_pattern))
            .await
            .map_err(|e| LookupError::Other(format!("search task failed: {}", e)))?
    }
}

fn grep_literal(
    term: &str,
    scope: &Path,
    file_pattern: &str,
) -> Result<Vec<SearchHit>, LookupError> {
    let regex = Regex::new(&format!("(?i){}", regex::escape(term)))
        .map_err(|e| LookupError::InvalidPattern(e.to_string()))?;

    let files = if scope.is_file() {
        vec![scope.to_path_buf()]
    } else {
        collect_files(scope, file_pattern)?
    };

    let mut hits = Vec::new();
    for file_path in files {
        if hits.len() >= MAX_RESULTS {
            break;
        }

        if let Ok(metadata) = fs::metadata(&file_path)
            && metadata.len() > MAX_GREP_FILE_SIZE
        {
            debug!("Skipping large file {}", file_path.display());
            continue;
        }

        // Binary and non-UTF-8 files fail here and are skipped
        let Ok(content) = fs::read_to_string(&file_path) else {
            continue;
        };

        let file_display = display_path(&file_path);
        for (line_num, line) in content.lines().enumerate() {
            if hits.len() >= MAX_RESULTS {
                break;
            }
            if regex.is_match(line) {
                hits.push(SearchHit {
                    file: file_display.clone(),
                    line: line_num + 1,
                    excerpt: truncate(line.trim(), MAX_EXCERPT_CHARS),
                });
            }
        }
    }

    debug!("Search for {:?} found {} hits", term, hits.len());
    Ok(hits)
}

fn collect_files(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>, LookupError> {
    let base = glob::Pattern::escape(&dir.display().to_string());
    let full_pattern = format!("{}/{}", base, file_pattern);

    let paths = glob(&full_pattern).map_err(|e| LookupError::InvalidPattern(e.to_string()))?;
    let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
    files.sort();
    Ok(files)
}

fn display_path(path: &Path) -> String {
    let display = path.display().to_string();
    match display.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => display,
    }
}
