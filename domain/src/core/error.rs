//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No personas configured for deliberation")]
    NoPersonas,

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Invalid convergence threshold {0}: must be within (0, 1]")]
    InvalidThreshold(f64),

    #[error("Round {got} recorded out of order (expected round {expected})")]
    RoundOutOfOrder { expected: usize, got: usize },

    #[error("Invalid deliberation transition: {event} is not allowed in state {from}")]
    InvalidTransition { from: String, event: &'static str },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
