//! Session summaries stored as JSON files in a directory.
//!
//! `*.jsonl` files hold one summary object per line. `*.json` files hold a
//! single summary or an array of them. Unreadable files and malformed entries
//! are skipped with a warning.

use async_trait::async_trait;
use council_application::ports::metrics_store::MetricsStorePort;
use council_application::ports::text_search::LookupError;
use council_domain::SessionSummary;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory-backed [`MetricsStorePort`]
#[derive(Debug, Clone)]
pub struct JsonlSummaryStore {
    dir: PathBuf,
}

impl JsonlSummaryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl MetricsStorePort for JsonlSummaryStore {
    async fn recent_summaries(&self, limit: usize) -> Result<Vec<SessionSummary>, LookupError> {
        let dir = self.dir.clone();
        let mut summaries = tokio::task::spawn_blocking(move || load_dir(&dir))
            .await
            .map_err(|e| LookupError::Other(format!("summary task failed: {}", e)))??;

        // Newest first; undated entries last, in file order
        summaries.sort_by(|a, b| match (&a.recorded_at, &b.recorded_at) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        summaries.truncate(limit);
        Ok(summaries)
    }
}

fn load_dir(dir: &Path) -> Result<Vec<SessionSummary>, LookupError> {
    if !dir.exists() {
        debug!("Summary directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut summaries = Vec::new();
    for path in paths {
        let extension = path.extension().and_then(|e| e.to_str());
        let content = match extension {
            Some("jsonl") | Some("json") => match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Could not read {}: {}", path.display(), e);
                    continue;
                }
            },
            _ => continue,
        };

        match extension {
            Some("jsonl") => summaries.extend(parse_jsonl(&path, &content)),
            _ => summaries.extend(parse_json(&path, &content)),
        }
    }

    Ok(summaries)
}

fn parse_jsonl(path: &Path, content: &str) -> Vec<SessionSummary> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str(line) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Skipping {}:{}: {}", path.display(), index + 1, e);
                None
            }
        })
        .collect()
}

fn parse_json(path: &Path, content: &str) -> Vec<SessionSummary> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let entries = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Skipping entry in {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}
