//! Deliberation domain
//!
//! Per-round persona opinions, the convergence rule over them, and the
//! round-by-round state machine of a deliberation run.
//!
//! Everything here is a pure function of its inputs: the parser and the
//! detector never see more than one round, and the history is only ever
//! appended to by whoever drives the run.

pub mod convergence;
pub mod parsing;
pub mod record;
pub mod round;
pub mod state;
pub mod verdict;

pub use convergence::{
    ConvergenceResult, DEFAULT_CONVERGENCE_THRESHOLD, STALEMATE_AGREEMENT_CEILING,
    STALEMATE_CONVICTION_CEILING, VoteWeighting, check_convergence,
};
pub use parsing::parse_persona_output;
pub use record::{DEFAULT_CONFIDENCE, DEFAULT_CONVICTION, PersonaRecord, PersonaRef, PositionChange};
pub use round::{RoundHistory, RoundRecord};
pub use state::{DeliberationOutcome, DeliberationState};
pub use verdict::Verdict;
