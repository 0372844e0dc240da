//! Gather Information use case.
//!
//! Tries to resolve the "I need more information" requests of a round
//! without involving a human:
//!
//! 1. **codebase_search**: query the text search with up to three terms
//!    extracted from the request; the first term with any hit wins
//! 2. **metrics**: scan recent session summaries for one that talks about
//!    performance
//! 3. **user_question**: never resolved here
//!
//! Every attempt is bounded by `lookup_timeout`. Failures are logged and
//! count as "no result"; they never abort the round.

use crate::config::DeliberationParams;
use crate::ports::metrics_store::MetricsStorePort;
use crate::ports::text_search::TextSearchPort;
use council_domain::{
    GatheredInfo, InfoRequest, PersonaRecord, RequestType, collect_requests,
    extract_search_terms, mentions_performance,
};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Result of one gathering pass
#[derive(Debug, Clone, Default)]
pub struct GatherOutcome {
    pub gathered: Vec<GatheredInfo>,
    /// Requests nothing could answer, in request order
    pub missing: Vec<InfoRequest>,
}

impl GatherOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Use case for resolving persona information requests automatically.
pub struct GatherInformationUseCase {
    search: Arc<dyn TextSearchPort>,
    metrics: Arc<dyn MetricsStorePort>,
    params: DeliberationParams,
}

impl GatherInformationUseCase {
    pub fn new(
        search: Arc<dyn TextSearchPort>,
        metrics: Arc<dyn MetricsStorePort>,
        params: DeliberationParams,
    ) -> Self {
        Self {
            search,
            metrics,
            params,
        }
    }

    /// Flatten and resolve every request raised in a round
    pub async fn gather_all_requests<'a, I>(&self, records: I) -> GatherOutcome
    where
        I: IntoIterator<Item = &'a PersonaRecord>,
    {
        self.gather_requests(collect_requests(records)).await
    }

    /// Resolve already-built requests, one at a time
    pub async fn gather_requests(&self, requests: Vec<InfoRequest>) -> GatherOutcome {
        let mut outcome = GatherOutcome::default();

        for request in requests {
            match self.resolve(&request).await {
                Some((data, source)) => {
                    info!(
                        "Resolved {} ({}) from {}",
                        request.id, request.request_type, source
                    );
                    outcome.gathered.push(GatheredInfo::new(request, data, source));
                }
                None => {
                    debug!("No automatic answer for {} ({})", request.id, request.request_type);
                    outcome.missing.push(request);
                }
            }
        }

        outcome
    }

    /// `(data, source)` for a resolvable request
    async fn resolve(&self, request: &InfoRequest) -> Option<(String, String)> {
        match request.request_type {
            RequestType::CodebaseSearch => self.search_codebase(request).await,
            RequestType::Metrics => self.lookup_metrics(request).await,
            RequestType::UserQuestion => None,
        }
    }

    async fn search_codebase(&self, request: &InfoRequest) -> Option<(String, String)> {
        let terms = extract_search_terms(&request.description, self.params.max_search_terms);
        if terms.is_empty() {
            debug!("No search terms in request {}", request.id);
            return None;
        }

        for term in terms {
            let attempt = timeout(
                self.params.lookup_timeout,
                self.search.search(&term, &self.params.search_scope),
            )
            .await;

            let hits = match attempt {
                Ok(Ok(hits)) => hits,
                Ok(Err(e)) => {
                    warn!("Search for {:?} failed: {}", term, e);
                    continue;
                }
                Err(_) => {
                    warn!(
                        "Search for {:?} timed out after {:?}",
                        term, self.params.lookup_timeout
                    );
                    continue;
                }
            };

            if hits.is_empty() {
                continue;
            }

            let mut data = hits
                .iter()
                .take(self.params.max_hits)
                .map(|hit| hit.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            if hits.len() > self.params.max_hits {
                data.push_str(&format!(
                    "\n(+{} more matches)",
                    hits.len() - self.params.max_hits
                ));
            }
            return Some((data, format!("codebase_search:\"{}\"", term)));
        }

        None
    }

    async fn lookup_metrics(&self, request: &InfoRequest) -> Option<(String, String)> {
        let attempt = timeout(
            self.params.lookup_timeout,
            self.metrics.recent_summaries(self.params.metrics_scan_limit),
        )
        .await;

        let summaries = match attempt {
            Ok(Ok(summaries)) => summaries,
            Ok(Err(e)) => {
                warn!("Metrics lookup for {} failed: {}", request.id, e);
                return None;
            }
            Err(_) => {
                warn!(
                    "Metrics lookup for {} timed out after {:?}",
                    request.id, self.params.lookup_timeout
                );
                return None;
            }
        };

        summaries
            .into_iter()
            .find(mentions_performance)
            .map(|s| (s.summary, format!("session_summary:{}", s.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::text_search::LookupError;
    use async_trait::async_trait;
    use council_domain::{SearchHit, SessionSummary};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Doubles ====================

    #[derive(Default)]
    struct FakeSearch {
        hits: HashMap<String, Vec<SearchHit>>,
        failing: Vec<String>,
        slow: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn with_hits(mut self, term: &str, count: usize) -> Self {
            let hits = (1..=count)
                .map(|line| SearchHit {
                    file: "src/jobs.rs".to_string(),
                    line,
                    excerpt: format!("{} usage {}", term, line),
                })
                .collect();
            self.hits.insert(term.to_string(), hits);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextSearchPort for FakeSearch {
        async fn search(&self, pattern: &str, _scope: &str) -> Result<Vec<SearchHit>, LookupError> {
            self.calls.lock().unwrap().push(pattern.to_string());
            if self.slow {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.failing.iter().any(|t| t == pattern) {
                return Err(LookupError::Other("index offline".to_string()));
            }
            Ok(self.hits.get(pattern).cloned().unwrap_or_default())
        }
    }

    struct FakeStore {
        summaries: Result<Vec<SessionSummary>, String>,
    }

    impl FakeStore {
        fn with(summaries: &[(&str, &str)]) -> Self {
            Self {
                summaries: Ok(summaries
                    .iter()
                    .map(|(id, text)| SessionSummary {
                        id: id.to_string(),
                        summary: text.to_string(),
                        recorded_at: None,
                    })
                    .collect()),
            }
        }
    }

    #[async_trait]
    impl MetricsStorePort for FakeStore {
        async fn recent_summaries(&self, limit: usize) -> Result<Vec<SessionSummary>, LookupError> {
            match &self.summaries {
                Ok(all) => Ok(all.iter().take(limit).cloned().collect()),
                Err(e) => Err(LookupError::Malformed(e.clone())),
            }
        }
    }

    fn params() -> DeliberationParams {
        DeliberationParams::default().with_lookup_timeout(Duration::from_millis(50))
    }

    fn gatherer(search: Arc<FakeSearch>, store: FakeStore) -> GatherInformationUseCase {
        GatherInformationUseCase::new(search, Arc::new(store), params())
    }

    fn record(persona: &str, requests: &[&str]) -> PersonaRecord {
        requests
            .iter()
            .fold(PersonaRecord::new(persona), |r, q| r.with_info_needed(*q))
    }

    // ==================== Codebase Search ====================

    #[tokio::test]
    async fn test_codebase_first_term_with_hits_wins() {
        let search = Arc::new(FakeSearch::default().with_hits("SessionCache", 2));
        let use_case = gatherer(search.clone(), FakeStore::with(&[]));

        let records = vec![record(
            "architect",
            &["Compare `TokenStore` with `SessionCache` and `AuthLayer`"],
        )];
        let outcome = use_case.gather_all_requests(&records).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.gathered.len(), 1);
        let info = &outcome.gathered[0];
        assert_eq!(info.source, "codebase_search:\"SessionCache\"");
        assert!(info.data.contains("src/jobs.rs:1: SessionCache usage 1"));
        // Stops probing after the first term with hits
        assert_eq!(search.calls(), vec!["TokenStore", "SessionCache"]);
    }

    #[tokio::test]
    async fn test_codebase_hits_are_capped() {
        let search = Arc::new(FakeSearch::default().with_hits("BackfillJob", 8));
        let use_case = gatherer(search, FakeStore::with(&[]));

        let outcome = use_case
            .gather_all_requests(&[record("a", &["Where is \"BackfillJob\" implemented?"])])
            .await;

        let data = &outcome.gathered[0].data;
        assert_eq!(data.lines().count(), 6);
        assert!(data.ends_with("(+3 more matches)"));
    }

    #[tokio::test]
    async fn test_codebase_failures_become_missing() {
        let search = Arc::new(FakeSearch {
            failing: vec!["BackfillJob".to_string()],
            ..FakeSearch::default()
        });
        let use_case = gatherer(search.clone(), FakeStore::with(&[]));

        let outcome = use_case
            .gather_all_requests(&[record("a", &["Where is \"BackfillJob\" implemented?"])])
            .await;

        assert!(outcome.gathered.is_empty());
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].id, "a-1");
    }

    #[tokio::test]
    async fn test_codebase_timeout_becomes_missing() {
        let search = Arc::new(FakeSearch {
            slow: true,
            ..FakeSearch::default().with_hits("BackfillJob", 1)
        });
        let use_case = gatherer(search, FakeStore::with(&[]));

        let outcome = use_case
            .gather_all_requests(&[record("a", &["Where is \"BackfillJob\" implemented?"])])
            .await;

        assert_eq!(outcome.missing.len(), 1);
    }

    #[tokio::test]
    async fn test_codebase_without_terms_is_missing() {
        let search = Arc::new(FakeSearch::default());
        let use_case = gatherer(search.clone(), FakeStore::with(&[]));

        let outcome = use_case
            .gather_all_requests(&[record("a", &["is the config loaded twice?"])])
            .await;

        assert_eq!(outcome.missing.len(), 1);
        assert!(search.calls().is_empty());
    }

    // ==================== Metrics ====================

    #[tokio::test]
    async fn test_metrics_resolved_from_summary() {
        let store = FakeStore::with(&[
            ("s3", "Refactored the config loader"),
            ("s2", "Load test: checkout p95 latency 210ms at 800 rps"),
        ]);
        let use_case = gatherer(Arc::new(FakeSearch::default()), store);

        let outcome = use_case
            .gather_all_requests(&[record("perf", &["What is the current p95 latency?"])])
            .await;

        assert_eq!(outcome.gathered.len(), 1);
        assert_eq!(outcome.gathered[0].source, "session_summary:s2");
        assert!(outcome.gathered[0].data.contains("210ms"));
    }

    #[tokio::test]
    async fn test_metrics_missing_without_performance_summary() {
        let store = FakeStore::with(&[("s1", "Renamed the billing module")]);
        let use_case = gatherer(Arc::new(FakeSearch::default()), store);

        let outcome = use_case
            .gather_all_requests(&[record("perf", &["What is the current p95 latency?"])])
            .await;

        assert!(outcome.gathered.is_empty());
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].request_type, RequestType::Metrics);
    }

    #[tokio::test]
    async fn test_metrics_store_error_is_missing() {
        let store = FakeStore {
            summaries: Err("truncated line".to_string()),
        };
        let use_case = gatherer(Arc::new(FakeSearch::default()), store);

        let outcome = use_case
            .gather_all_requests(&[record("perf", &["What is the current p95 latency?"])])
            .await;

        assert_eq!(outcome.missing.len(), 1);
    }

    // ==================== User Questions ====================

    #[tokio::test]
    async fn test_user_questions_always_missing_in_order() {
        let search = Arc::new(FakeSearch::default().with_hits("BackfillJob", 1));
        let use_case = gatherer(search, FakeStore::with(&[]));

        let records = vec![
            record("product", &["CRITICAL: Who owns the billing budget?"]),
            record("architect", &["Where is \"BackfillJob\" implemented?", "What is the deadline?"]),
        ];
        let outcome = use_case.gather_all_requests(&records).await;

        let missing: Vec<_> = outcome.missing.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(missing, vec!["product-1", "architect-2"]);
        assert!(outcome.missing[0].is_critical());
        assert_eq!(outcome.gathered.len(), 1);
    }
}
