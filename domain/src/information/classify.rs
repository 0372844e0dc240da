//! Keyword classification of information requests and search-term extraction.
//!
//! Classification is checked in a fixed order: people/budget/timeline
//! questions first (never auto-resolvable), then metrics, and everything else
//! is treated as a codebase search.

use super::request::{RequestType, SessionSummary};
use crate::core::string::words;

/// People, budget and timeline vocabulary: only a human can answer these
const USER_QUESTION_KEYWORDS: &[&str] = &[
    "who", "whom", "team", "teams", "owner", "owners", "owns", "stakeholder", "stakeholders",
    "budget", "budgets", "cost", "costs", "price", "pricing", "spend", "timeline", "timelines",
    "deadline", "deadlines", "schedule", "roadmap", "headcount", "staffing", "hire", "hiring",
    "customer", "customers", "business", "legal", "contract", "sign-off", "approval", "priority",
    "priorities",
];

/// Volume, latency and performance vocabulary
const METRICS_KEYWORDS: &[&str] = &[
    "latency", "latencies", "p50", "p90", "p95", "p99", "throughput", "volume", "volumes",
    "traffic", "qps", "rps", "tps", "performance", "slow", "slowdown", "error-rate",
    "utilization", "cpu", "memory", "metric", "metrics", "benchmark", "benchmarks", "sla", "slo",
];

const METRICS_PHRASES: &[&str] = &["requests per", "per second", "response time", "error rate"];

/// Terms a session summary must mention to answer a metrics request
const PERFORMANCE_TERMS: &[&str] = &[
    "latency", "performance", "metric", "metrics", "p50", "p95", "p99", "throughput",
    "benchmark", "benchmarks", "slo", "qps", "rps",
];

/// Capitalised words that start questions rather than name code
const QUESTION_STOPWORDS: &[&str] = &[
    "What", "Where", "Which", "Who", "Why", "How", "When", "Is", "Are", "Was", "Were", "Does",
    "Do", "Did", "Can", "Could", "Should", "Would", "Will", "The", "A", "An", "This", "That",
    "These", "Those", "There", "Any", "Our", "We", "I", "It", "If", "In", "On", "For", "Of",
    "To", "And", "Or", "Please", "Need", "Check", "Find", "Confirm", "Verify", "Show", "List",
    "CRITICAL",
];

/// Classify a request description.
///
/// # Example
///
/// ```
/// use council_domain::{RequestType, classify_request};
///
/// assert_eq!(classify_request("What is the current p95 latency?"), RequestType::Metrics);
/// assert_eq!(classify_request("Who approves the budget?"), RequestType::UserQuestion);
/// assert_eq!(classify_request("Where is `RetryPolicy` defined?"), RequestType::CodebaseSearch);
/// ```
pub fn classify_request(description: &str) -> RequestType {
    let lower = description.to_lowercase();
    if mentions_any(&lower, USER_QUESTION_KEYWORDS, &[]) {
        RequestType::UserQuestion
    } else if mentions_any(&lower, METRICS_KEYWORDS, METRICS_PHRASES) {
        RequestType::Metrics
    } else {
        RequestType::CodebaseSearch
    }
}

/// Whether a stored summary can answer a metrics request
pub fn mentions_performance(summary: &SessionSummary) -> bool {
    mentions_any(&summary.summary.to_lowercase(), PERFORMANCE_TERMS, METRICS_PHRASES)
}

fn mentions_any(lower: &str, keywords: &[&str], phrases: &[&str]) -> bool {
    words(lower).any(|word| keywords.contains(&word))
        || phrases.iter().any(|phrase| lower.contains(phrase))
}

/// Candidate search terms for a codebase request, at most `limit`.
///
/// Quoted substrings (`"..."`, `` `...` ``, `'...'`) take precedence; only
/// when there are none are capitalised words used.
pub fn extract_search_terms(description: &str, limit: usize) -> Vec<String> {
    let quoted = quoted_substrings(description);
    let candidates = if quoted.is_empty() {
        capitalized_words(description)
    } else {
        quoted
    };

    let mut terms: Vec<String> = Vec::new();
    for candidate in candidates {
        if !terms.contains(&candidate) {
            terms.push(candidate);
        }
        if terms.len() == limit {
            break;
        }
    }
    terms
}

fn quoted_substrings(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (open_at, quote) = chars[i];
        let is_quote = matches!(quote, '"' | '`' | '\'');
        // An apostrophe only opens a quote at a word start ("it's" does not)
        let opens = is_quote
            && (quote != '\'' || i == 0 || !chars[i - 1].1.is_alphanumeric());

        if opens {
            let close = (i + 1..chars.len()).find(|&j| {
                chars[j].1 == quote
                    && (quote != '\''
                        || chars.get(j + 1).is_none_or(|(_, next)| !next.is_alphanumeric()))
            });
            if let Some(j) = close {
                let inner = text[open_at + quote.len_utf8()..chars[j].0].trim();
                if !inner.is_empty() {
                    found.push(inner.to_string());
                }
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }

    found
}

fn capitalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        // "RetryPolicy's" names RetryPolicy
        .map(|word| word.split(['\'', '’']).next().unwrap_or(word))
        .map(|word| word.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_')))
        .filter(|word| {
            word.len() >= 2
                && word.chars().next().is_some_and(|c| c.is_uppercase())
                && !QUESTION_STOPWORDS.contains(word)
        })
        .map(str::to_string)
        .collect()
}
