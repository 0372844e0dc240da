//! Metrics store port
//!
//! Read access to the local store of session summaries, used to answer
//! performance and volume questions.

use super::text_search::LookupError;
use async_trait::async_trait;
use council_domain::SessionSummary;

#[async_trait]
pub trait MetricsStorePort: Send + Sync {
    /// Up to `limit` summaries, most recent first
    async fn recent_summaries(&self, limit: usize) -> Result<Vec<SessionSummary>, LookupError>;
}
