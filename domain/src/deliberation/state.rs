//! Deliberation state machine.
//!
//! ```text
//! Round(n) ──evaluate──┬─▶ Converged(n)                       (terminal)
//!                      ├─▶ NeedInfo(n) ──info_resolved──┬─▶ NeedUser(n) ──user_answered──┬─▶ Continue(n)
//!                      │                                └─▶ Continue(n)                  └─▶ Abandoned(n) (terminal)
//!                      └─▶ Continue(n)
//!
//! Continue(n) ──advance──┬─▶ Round(n + 1)
//!                        └─▶ Exhausted(n)                     (terminal, budget spent)
//! ```

use super::convergence::ConvergenceResult;
use super::verdict::Verdict;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Where a deliberation run currently stands. Every state carries the
/// number of the round it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "round", rename_all = "snake_case")]
pub enum DeliberationState {
    /// Personas are being consulted for this round
    Round(usize),
    /// Weighted agreement reached
    Converged(usize),
    /// Personas asked for information; automatic lookups pending
    NeedInfo(usize),
    /// Some requests could not be resolved automatically; a human is needed
    NeedUser(usize),
    /// Round finished without convergence; another round may follow
    Continue(usize),
    /// Round budget spent without convergence
    Exhausted(usize),
    /// A human declined to answer a critical request
    Abandoned(usize),
}

impl DeliberationState {
    /// Initial state
    pub fn start() -> Self {
        DeliberationState::Round(1)
    }

    pub fn round(&self) -> usize {
        match *self {
            DeliberationState::Round(n)
            | DeliberationState::Converged(n)
            | DeliberationState::NeedInfo(n)
            | DeliberationState::NeedUser(n)
            | DeliberationState::Continue(n)
            | DeliberationState::Exhausted(n)
            | DeliberationState::Abandoned(n) => n,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliberationState::Converged(_)
                | DeliberationState::Exhausted(_)
                | DeliberationState::Abandoned(_)
        )
    }

    /// Round evaluated: converged, needs information, or simply continues
    pub fn evaluate(self, result: &ConvergenceResult) -> Result<Self, DomainError> {
        match self {
            DeliberationState::Round(n) if result.converged => Ok(DeliberationState::Converged(n)),
            DeliberationState::Round(n) if result.has_new_requests => {
                Ok(DeliberationState::NeedInfo(n))
            }
            DeliberationState::Round(n) => Ok(DeliberationState::Continue(n)),
            other => Err(other.invalid("evaluate")),
        }
    }

    /// Automatic lookups finished with `missing` requests still unresolved
    pub fn info_resolved(self, missing: usize) -> Result<Self, DomainError> {
        match self {
            DeliberationState::NeedInfo(n) if missing > 0 => Ok(DeliberationState::NeedUser(n)),
            DeliberationState::NeedInfo(n) => Ok(DeliberationState::Continue(n)),
            other => Err(other.invalid("info_resolved")),
        }
    }

    /// The human exchange finished; `abandoned` when a critical request went unanswered
    pub fn user_answered(self, abandoned: bool) -> Result<Self, DomainError> {
        match self {
            DeliberationState::NeedUser(n) if abandoned => Ok(DeliberationState::Abandoned(n)),
            DeliberationState::NeedUser(n) => Ok(DeliberationState::Continue(n)),
            other => Err(other.invalid("user_answered")),
        }
    }

    /// Move to the next round, or stop once `max_rounds` rounds have run
    pub fn advance(self, max_rounds: usize) -> Result<Self, DomainError> {
        match self {
            DeliberationState::Continue(n) if n >= max_rounds => {
                Ok(DeliberationState::Exhausted(n))
            }
            DeliberationState::Continue(n) => Ok(DeliberationState::Round(n + 1)),
            other => Err(other.invalid("advance")),
        }
    }

    fn invalid(self, event: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            from: format!("{:?}", self),
            event,
        }
    }
}

/// How a deliberation run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeliberationOutcome {
    Converged {
        round: usize,
        result: ConvergenceResult,
    },
    Exhausted {
        rounds: usize,
        last_agreement_ratio: f64,
        last_result: Option<ConvergenceResult>,
    },
    Abandoned {
        round: usize,
        request_id: String,
    },
}

impl DeliberationOutcome {
    pub fn exhausted(rounds: usize, last_result: Option<ConvergenceResult>) -> Self {
        DeliberationOutcome::Exhausted {
            rounds,
            last_agreement_ratio: last_result.as_ref().map_or(0.0, |r| r.agreement_ratio),
            last_result,
        }
    }

    /// The agreed verdict, only for a converged run
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            DeliberationOutcome::Converged { result, .. } => result.dominant_verdict,
            _ => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, DeliberationOutcome::Converged { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliberationOutcome::Converged { .. } => "CONVERGED",
            DeliberationOutcome::Exhausted { .. } => "EXHAUSTED",
            DeliberationOutcome::Abandoned { .. } => "ABANDONED",
        }
    }
}
