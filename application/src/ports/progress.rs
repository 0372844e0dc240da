//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation run.

use council_domain::{ConvergenceResult, InfoRequest, PersonaRecord};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, nothing).
pub trait DeliberationProgress: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, round: usize, personas: &[String]);

    /// Called when one persona's answer has been parsed (or given up on)
    fn on_persona_complete(&self, round: usize, record: &PersonaRecord);

    /// Called once the round has been evaluated
    fn on_round_complete(&self, round: usize, result: &ConvergenceResult);

    // ==================== Information Callbacks ====================

    /// Called before automatic lookups start
    fn on_gather_start(&self, _requests: &[InfoRequest]) {}

    /// Called when automatic lookups are done
    fn on_gather_complete(&self, _gathered: usize, _missing: usize) {}

    /// Called when a persona joins the roster mid-deliberation
    fn on_persona_joined(&self, _persona: &str, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_round_start(&self, _round: usize, _personas: &[String]) {}
    fn on_persona_complete(&self, _round: usize, _record: &PersonaRecord) {}
    fn on_round_complete(&self, _round: usize, _result: &ConvergenceResult) {}
}
