//! Conviction-weighted convergence detection.
//!
//! A pure function of one round's records: no history, no I/O, no
//! dependence on the order personas answered in.
//!
//! # Weighting
//!
//! ```text
//! weight = (confidence / 100) × (conviction / 100)
//!
//! STOP      conf 90  conv 90  → 0.81
//! PROCEED   conf 80  conv 70  → 0.56 ┐
//! PROCEED   conf 60  conv 30  → 0.18 ┘ 0.74
//!
//! agreement = 0.81 / 1.55 ≈ 0.52  → below 0.70, not converged
//! ```
//!
//! A round where every weight is exactly zero falls back to an unweighted
//! head count instead of dividing by zero.

use super::record::PersonaRecord;
use super::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default agreement ratio required for convergence
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.7;

/// Below this agreement ratio a low-conviction round counts as stalemate
pub const STALEMATE_AGREEMENT_CEILING: f64 = 0.60;

/// Below this average conviction a split round counts as stalemate
pub const STALEMATE_CONVICTION_CEILING: f64 = 60.0;

/// How votes were weighted for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteWeighting {
    /// Each vote weighted by confidence × conviction
    ConvictionWeighted,
    /// Degenerate round (total weight zero): one persona, one vote
    UnweightedMajority,
}

impl VoteWeighting {
    fn label(&self) -> &'static str {
        match self {
            VoteWeighting::ConvictionWeighted => "weighted",
            VoteWeighting::UnweightedMajority => "head-count",
        }
    }
}

/// Outcome of evaluating one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceResult {
    pub converged: bool,
    /// Threshold the round was evaluated against
    pub threshold: f64,
    /// Dominant verdict's share of `total_weight` (0.0 to 1.0)
    pub agreement_ratio: f64,
    pub dominant_verdict: Option<Verdict>,
    /// Verdict → summed weight (or head count in the fallback)
    pub weighted_scores: BTreeMap<Verdict, f64>,
    /// Sum of `weighted_scores`
    pub total_weight: f64,
    pub weighting: VoteWeighting,
    pub has_new_requests: bool,
    pub has_escalations: bool,
    pub has_recruitments: bool,
    pub has_low_conviction_stalemate: bool,
    pub avg_conviction: f64,
    /// Human-readable explanation of why the round did or did not converge
    pub reason: String,
}

impl ConvergenceResult {
    /// Whether anything besides the vote itself is holding the round open
    pub fn has_pending_actions(&self) -> bool {
        self.has_new_requests || self.has_escalations || self.has_recruitments
    }
}

/// Evaluate one round of persona records against `threshold`.
///
/// Records without a verdict count as ABSTAIN, so `weighted_scores` always
/// sums to `total_weight`.
///
/// # Example
///
/// ```
/// use council_domain::{PersonaRecord, Verdict, check_convergence};
///
/// let records = vec![
///     PersonaRecord::new("a").with_verdict(Verdict::Proceed).with_scores(90, 90),
///     PersonaRecord::new("b").with_verdict(Verdict::Proceed).with_scores(80, 80),
///     PersonaRecord::new("c").with_verdict(Verdict::Stop).with_scores(40, 30),
/// ];
/// let result = check_convergence(&records, 0.7);
/// assert!(result.converged);
/// assert_eq!(result.dominant_verdict, Some(Verdict::Proceed));
/// ```
pub fn check_convergence<'a, I>(records: I, threshold: f64) -> ConvergenceResult
where
    I: IntoIterator<Item = &'a PersonaRecord>,
{
    let records: Vec<&PersonaRecord> = records.into_iter().collect();

    let mut weighted_scores: BTreeMap<Verdict, f64> = BTreeMap::new();
    for record in &records {
        *weighted_scores.entry(record.effective_verdict()).or_insert(0.0) += record.weight();
    }
    let mut total_weight: f64 = weighted_scores.values().sum();
    let mut weighting = VoteWeighting::ConvictionWeighted;

    // Exact zero only: low-but-nonzero weight still votes by weight
    if total_weight == 0.0 && !records.is_empty() {
        weighting = VoteWeighting::UnweightedMajority;
        weighted_scores.clear();
        for record in &records {
            *weighted_scores.entry(record.effective_verdict()).or_insert(0.0) += 1.0;
        }
        total_weight = records.len() as f64;
    }

    let dominant_verdict = dominant(&weighted_scores);
    let agreement_ratio = match dominant_verdict {
        Some(verdict) if total_weight > 0.0 => weighted_scores[&verdict] / total_weight,
        _ => 0.0,
    };

    let avg_conviction = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.conviction as f64).sum::<f64>() / records.len() as f64
    };

    let has_low_conviction_stalemate = !records.is_empty()
        && agreement_ratio < STALEMATE_AGREEMENT_CEILING
        && avg_conviction < STALEMATE_CONVICTION_CEILING;
    let has_new_requests = records.iter().any(|r| r.has_open_requests());
    let has_escalations = records.iter().any(|r| r.escalate_to.is_some());
    let has_recruitments = records.iter().any(|r| r.recruits.is_some());

    let converged = !records.is_empty()
        && agreement_ratio >= threshold
        && !has_new_requests
        && !has_escalations
        && !has_recruitments
        && !has_low_conviction_stalemate;

    let mut result = ConvergenceResult {
        converged,
        threshold,
        agreement_ratio,
        dominant_verdict,
        weighted_scores,
        total_weight,
        weighting,
        has_new_requests,
        has_escalations,
        has_recruitments,
        has_low_conviction_stalemate,
        avg_conviction,
        reason: String::new(),
    };
    result.reason = describe(&result, &records);
    result
}

/// Highest score wins; ties go to the earlier verdict in [`Verdict::ALL`]
fn dominant(scores: &BTreeMap<Verdict, f64>) -> Option<Verdict> {
    let mut best: Option<(Verdict, f64)> = None;
    for verdict in Verdict::ALL {
        if let Some(&score) = scores.get(&verdict)
            && best.is_none_or(|(_, best_score)| score > best_score)
        {
            best = Some((verdict, score));
        }
    }
    best.map(|(verdict, _)| verdict)
}

fn describe(result: &ConvergenceResult, records: &[&PersonaRecord]) -> String {
    let Some(dominant) = result.dominant_verdict else {
        return "No persona records to evaluate".to_string();
    };

    let mut reason = if result.converged {
        format!(
            "Converged on {} with {:.0}% {} agreement (threshold {:.0}%)",
            dominant,
            result.agreement_ratio * 100.0,
            result.weighting.label(),
            result.threshold * 100.0
        )
    } else {
        let mut blockers = Vec::new();
        if result.agreement_ratio < result.threshold {
            blockers.push(format!(
                "agreement {:.0}% on {} is below threshold {:.0}%",
                result.agreement_ratio * 100.0,
                dominant,
                result.threshold * 100.0
            ));
        }
        if result.has_low_conviction_stalemate {
            blockers.push(format!(
                "low-conviction stalemate (agreement {:.0}%, average conviction {:.0})",
                result.agreement_ratio * 100.0,
                result.avg_conviction
            ));
        }
        if result.has_new_requests {
            blockers.push(format!(
                "information requested by {}",
                names(records, |r| r.has_open_requests())
            ));
        }
        if result.has_escalations {
            blockers.push(format!(
                "escalation requested by {}",
                names(records, |r| r.escalate_to.is_some())
            ));
        }
        if result.has_recruitments {
            blockers.push(format!(
                "recruitment requested by {}",
                names(records, |r| r.recruits.is_some())
            ));
        }
        format!("Not converged: {}", blockers.join("; "))
    };

    if result.weighting == VoteWeighting::UnweightedMajority {
        reason.push_str(" [all vote weights were zero; unweighted majority used]");
    }
    reason
}

fn names(records: &[&PersonaRecord], predicate: impl Fn(&PersonaRecord) -> bool) -> String {
    records
        .iter()
        .filter(|r| predicate(r))
        .map(|r| r.persona.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
