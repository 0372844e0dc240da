//! Domain layer for persona-council
//!
//! This crate contains the core deliberation logic: parsing persona output,
//! deciding convergence, classifying information requests and assembling
//! round contexts. It has no dependencies on infrastructure or presentation
//! concerns, and every operation in it is a pure function of its inputs.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A proposal is reviewed by several independent personas over a number of
//! rounds. Each round every persona answers with a structured opinion
//! ([`PersonaRecord`]); the round is then evaluated:
//!
//! - **Convergence**: conviction-weighted agreement on one [`Verdict`] at or
//!   above the threshold, with nobody asking for more information,
//!   escalating or recruiting
//! - **Stalemate**: persistent disagreement with low average conviction,
//!   which never counts as convergence
//!
//! ## Information requests
//!
//! Personas may ask for facts they lack. Requests are classified as codebase
//! searches, metrics lookups or questions only a human can answer
//! ([`RequestType`]).

pub mod config;
pub mod core;
pub mod deliberation;
pub mod information;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, InteractionMode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use deliberation::{
    ConvergenceResult, DEFAULT_CONFIDENCE, DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_CONVICTION,
    DeliberationOutcome, DeliberationState, PersonaRecord, PersonaRef, PositionChange,
    RoundHistory, RoundRecord, Verdict, VoteWeighting, check_convergence, parse_persona_output,
};
pub use information::{
    GatheredInfo, InfoRequest, RequestPriority, RequestType, SearchHit, SessionSummary,
    classify_request, collect_requests, extract_search_terms, mentions_performance,
};
pub use prompt::{HISTORY_BLOCK_MARKER, build_round_context, response_format_instructions};
