//! Structured per-round opinion of a single persona.

use super::verdict::Verdict;
use serde::{Deserialize, Serialize};

/// Confidence assumed when a persona does not report one
pub const DEFAULT_CONFIDENCE: u8 = 0;

/// Conviction assumed when a persona does not report one.
///
/// Neutral rather than zero: a missing conviction is not "no conviction".
pub const DEFAULT_CONVICTION: u8 = 50;

/// A reference to another persona together with the reason it was named.
///
/// Used for escalations, recruitments and disagreements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaRef {
    pub persona: String,
    pub reason: String,
}

impl PersonaRef {
    pub fn new(persona: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            reason: reason.into(),
        }
    }
}

/// A declared change of position since the previous round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// One persona's structured contribution to one round.
///
/// Records are produced fresh every round by
/// [`parse_persona_output`](super::parsing::parse_persona_output) and never
/// mutated afterwards. A record that failed to parse is still kept, flagged
/// with `parse_success == false`, so the participant is accounted for.
///
/// # Example
///
/// ```
/// use council_domain::{PersonaRecord, Verdict};
///
/// let record = PersonaRecord::new("security")
///     .with_verdict(Verdict::Stop)
///     .with_scores(90, 150);
/// assert_eq!(record.conviction, 100);
/// assert!((record.weight() - 0.9).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    /// Persona name (roster key)
    pub persona: String,
    pub verdict: Option<Verdict>,
    /// Self-reported certainty, 0-100
    pub confidence: u8,
    /// Self-reported strength of feeling, 0-100
    pub conviction: u8,
    pub reasoning: String,
    pub info_needed: Vec<String>,
    pub escalate_to: Option<PersonaRef>,
    pub agrees_with: Vec<String>,
    pub disagrees_with: Vec<PersonaRef>,
    pub changed_position: Option<PositionChange>,
    pub blockers: Vec<String>,
    pub recruits: Option<PersonaRef>,
    pub parse_success: bool,
    pub parse_errors: Vec<String>,
    pub parse_warnings: Vec<String>,
}

impl PersonaRecord {
    /// Create an empty record with default scores.
    ///
    /// `parse_success` starts out false; the parser sets it.
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            verdict: None,
            confidence: DEFAULT_CONFIDENCE,
            conviction: DEFAULT_CONVICTION,
            reasoning: String::new(),
            info_needed: Vec::new(),
            escalate_to: None,
            agrees_with: Vec::new(),
            disagrees_with: Vec::new(),
            changed_position: None,
            blockers: Vec::new(),
            recruits: None,
            parse_success: false,
            parse_errors: Vec::new(),
            parse_warnings: Vec::new(),
        }
    }

    /// Record standing in for a persona whose output never arrived
    /// (timeout, gateway failure). It carries zero confidence so it adds no
    /// weight to any verdict.
    pub fn unavailable(persona: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let mut record = Self::new(persona);
        record
            .parse_errors
            .push(format!("Persona response unavailable: {}", reason));
        record
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Set confidence and conviction, clamping both into 0-100
    pub fn with_scores(mut self, confidence: u32, conviction: u32) -> Self {
        self.confidence = confidence.min(100) as u8;
        self.conviction = conviction.min(100) as u8;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_info_needed(mut self, request: impl Into<String>) -> Self {
        self.info_needed.push(request.into());
        self
    }

    pub fn with_escalation(mut self, persona: impl Into<String>, reason: impl Into<String>) -> Self {
        self.escalate_to = Some(PersonaRef::new(persona, reason));
        self
    }

    pub fn with_recruit(mut self, persona: impl Into<String>, reason: impl Into<String>) -> Self {
        self.recruits = Some(PersonaRef::new(persona, reason));
        self
    }

    /// Vote weight: `(confidence / 100) * (conviction / 100)`
    pub fn weight(&self) -> f64 {
        (self.confidence as f64 / 100.0) * (self.conviction as f64 / 100.0)
    }

    /// Verdict used for vote counting. An unparsed record counts as ABSTAIN.
    pub fn effective_verdict(&self) -> Verdict {
        self.verdict.unwrap_or(Verdict::Abstain)
    }

    /// Whether this persona is asking for anything before it can settle
    pub fn has_open_requests(&self) -> bool {
        !self.info_needed.is_empty()
    }
}
