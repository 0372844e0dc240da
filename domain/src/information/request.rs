//! Information requests raised by personas and the answers gathered for them.

use super::classify::classify_request;
use crate::deliberation::record::PersonaRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How urgently a persona needs the information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    /// Must be answered; a human refusing it abandons the deliberation
    Critical,
    Normal,
}

/// Where an answer is expected to come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Look it up in the code
    CodebaseSearch,
    /// Look it up in stored performance/session summaries
    Metrics,
    /// Only a human can answer
    UserQuestion,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::CodebaseSearch => "codebase_search",
            RequestType::Metrics => "metrics",
            RequestType::UserQuestion => "user_question",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single "I need more information" entry from a persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRequest {
    /// `<persona>-<n>`, unique within a round
    pub id: String,
    pub requested_by: String,
    pub description: String,
    pub priority: RequestPriority,
    #[serde(rename = "type")]
    pub request_type: RequestType,
}

impl InfoRequest {
    /// Build a request from one raw `INFO_NEEDED` entry.
    ///
    /// The request is critical when the entry opens with a marker such as
    /// `[CRITICAL]` or `CRITICAL:` (any case), or carries `CRITICAL` as an
    /// uppercase word of its own. Prose like "critical path" or
    /// "non-critical" stays normal. A leading marker is removed from the
    /// description.
    pub fn from_entry(requested_by: &str, index: usize, raw: &str) -> Self {
        let priority = if has_critical_marker(raw) {
            RequestPriority::Critical
        } else {
            RequestPriority::Normal
        };
        let description = strip_critical_marker(raw);

        Self {
            id: format!("{}-{}", requested_by, index + 1),
            requested_by: requested_by.to_string(),
            request_type: classify_request(&description),
            description,
            priority,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.priority == RequestPriority::Critical
    }
}

const CRITICAL_MARKERS: [&str; 5] = ["[CRITICAL]", "(CRITICAL)", "**CRITICAL**", "CRITICAL:", "CRITICAL -"];

/// Length of the leading marker, matched case-insensitively
fn leading_marker_len(trimmed: &str) -> Option<usize> {
    let upper = trimmed.to_ascii_uppercase();
    CRITICAL_MARKERS
        .iter()
        .find(|marker| upper.starts_with(*marker))
        .map(|marker| marker.len())
}

fn has_critical_marker(raw: &str) -> bool {
    if leading_marker_len(raw.trim()).is_some() {
        return true;
    }
    // Hyphens and underscores join words, so "NON-CRITICAL" is one token
    raw.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .any(|token| token == "CRITICAL")
}

fn strip_critical_marker(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(len) = leading_marker_len(trimmed) {
        let rest = trimmed[len..].trim_start_matches([':', '-', ' ']).trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }
    trimmed.to_string()
}

/// Flatten every record's `info_needed` into requests, in record order.
pub fn collect_requests<'a, I>(records: I) -> Vec<InfoRequest>
where
    I: IntoIterator<Item = &'a PersonaRecord>,
{
    records
        .into_iter()
        .flat_map(|record| {
            record
                .info_needed
                .iter()
                .enumerate()
                .map(move |(index, entry)| InfoRequest::from_entry(&record.persona, index, entry))
        })
        .collect()
}

/// Information resolved for a request, with the label of where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatheredInfo {
    pub request: InfoRequest,
    pub data: String,
    /// e.g. `codebase_search:"BackfillJob"`, `session_summary:2024-06-01`, `user`
    pub source: String,
}

impl GatheredInfo {
    pub fn new(request: InfoRequest, data: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            request,
            data: data.into(),
            source: source.into(),
        }
    }

    /// Wrap a human answer
    pub fn from_user(request: InfoRequest, answer: impl Into<String>) -> Self {
        Self::new(request, answer, "user")
    }
}

/// One text-search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub file: String,
    /// 1-indexed line number
    pub line: usize,
    pub excerpt: String,
}

impl std::fmt::Display for SearchHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.excerpt)
    }
}

/// One entry of the local session-summary store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}
