//! Text search port
//!
//! Lookup capability used to answer codebase questions raised by personas.

use async_trait::async_trait;
use council_domain::SearchHit;
use thiserror::Error;

/// Errors from a lookup collaborator (text search or summary store).
///
/// The information gatherer never propagates these; each one turns the
/// attempt into "no result".
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Literal, case-insensitive line search below a scope (a directory)
#[async_trait]
pub trait TextSearchPort: Send + Sync {
    async fn search(&self, pattern: &str, scope: &str) -> Result<Vec<SearchHit>, LookupError>;
}
