//! Information requests domain
//!
//! Personas may answer a round with "I need more information". This module
//! holds the request/answer value objects and the pure classification logic;
//! the lookups themselves are application-layer use cases.

pub mod classify;
pub mod request;

pub use classify::{classify_request, extract_search_terms, mentions_performance};
pub use request::{
    GatheredInfo, InfoRequest, RequestPriority, RequestType, SearchHit, SessionSummary,
    collect_requests,
};
