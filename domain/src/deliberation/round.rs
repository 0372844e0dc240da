//! Round records and the append-only deliberation history.

use super::convergence::{ConvergenceResult, check_convergence};
use super::record::PersonaRecord;
use crate::core::error::DomainError;
use crate::information::GatheredInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything recorded for one completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-indexed)
    pub round: usize,
    /// Persona name → that persona's record for this round
    pub records: BTreeMap<String, PersonaRecord>,
    /// Information gathered (or answered by a human) after this round
    pub gathered: Vec<GatheredInfo>,
}

impl RoundRecord {
    pub fn new(round: usize, records: impl IntoIterator<Item = PersonaRecord>) -> Self {
        Self {
            round,
            records: records
                .into_iter()
                .map(|record| (record.persona.clone(), record))
                .collect(),
            gathered: Vec::new(),
        }
    }

    pub fn with_gathered(mut self, gathered: Vec<GatheredInfo>) -> Self {
        self.gathered = gathered;
        self
    }

    pub fn get(&self, persona: &str) -> Option<&PersonaRecord> {
        self.records.get(persona)
    }

    /// Evaluate this round's records
    pub fn convergence(&self, threshold: f64) -> ConvergenceResult {
        check_convergence(self.records.values(), threshold)
    }
}

/// Append-only sequence of rounds, owned by whoever drives the deliberation.
///
/// Round numbers must be 1, 2, 3, … with no gaps; earlier rounds can never be
/// replaced or edited.
///
/// # Example
///
/// ```
/// use council_domain::{RoundHistory, RoundRecord};
///
/// let mut history = RoundHistory::new();
/// history.push(RoundRecord::new(1, vec![])).unwrap();
/// assert!(history.push(RoundRecord::new(3, vec![])).is_err());
/// assert_eq!(history.next_round(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundHistory {
    rounds: Vec<RoundRecord>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next round
    pub fn push(&mut self, round: RoundRecord) -> Result<(), DomainError> {
        let expected = self.next_round();
        if round.round != expected {
            return Err(DomainError::RoundOutOfOrder {
                expected,
                got: round.round,
            });
        }
        self.rounds.push(round);
        Ok(())
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn last(&self) -> Option<&RoundRecord> {
        self.rounds.last()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number the next pushed round must carry
    pub fn next_round(&self) -> usize {
        self.rounds.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::verdict::Verdict;

    #[test]
    fn test_round_record_keys_by_persona() {
        let round = RoundRecord::new(
            1,
            vec![
                PersonaRecord::new("security").with_verdict(Verdict::Stop),
                PersonaRecord::new("architect").with_verdict(Verdict::Proceed),
            ],
        );
        assert_eq!(round.records.len(), 2);
        assert_eq!(round.get("security").unwrap().verdict, Some(Verdict::Stop));
        // Deterministic (alphabetical) iteration
        let names: Vec<_> = round.records.keys().cloned().collect();
        assert_eq!(names, vec!["architect", "security"]);
    }

    #[test]
    fn test_history_requires_consecutive_rounds() {
        let mut history = RoundHistory::new();
        assert_eq!(history.next_round(), 1);

        history.push(RoundRecord::new(1, vec![])).unwrap();
        history.push(RoundRecord::new(2, vec![])).unwrap();
        assert_eq!(history.len(), 2);

        let err = history.push(RoundRecord::new(2, vec![])).unwrap_err();
        assert_eq!(err, DomainError::RoundOutOfOrder { expected: 3, got: 2 });
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_round_convergence_delegates() {
        let round = RoundRecord::new(
            1,
            vec![PersonaRecord::new("a")
                .with_verdict(Verdict::Proceed)
                .with_scores(90, 90)],
        );
        assert!(round.convergence(0.7).converged);
    }
}
