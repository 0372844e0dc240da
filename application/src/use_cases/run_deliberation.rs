//! Run Deliberation use case
//!
//! Drives the round loop of a persona deliberation:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Round N                                                     │
//! │   for each persona: build context → generate → parse        │
//! │   check_convergence                                         │
//! │     ├─ converged ───────────────────────────────▶ CONVERGED │
//! │     ├─ info requests → gather → ask user                    │
//! │     │                     └─ critical refused ──▶ ABANDONED │
//! │     └─ continue                                             │
//! │   admit recruited / escalated-to personas                   │
//! │   round budget spent ───────────────────────────▶ EXHAUSTED │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Personas of one round are consulted one after another. Each call is
//! bounded by `persona_timeout`; a persona that fails or times out still
//! gets a (flagged, weightless) record for the round.

use crate::config::DeliberationParams;
use crate::ports::metrics_store::MetricsStorePort;
use crate::ports::persona_gateway::PersonaGateway;
use crate::ports::progress::{DeliberationProgress, NoProgress};
use crate::ports::text_search::TextSearchPort;
use crate::ports::user_channel::UserChannelPort;
use crate::use_cases::ask_user::{AskUserError, AskUserUseCase};
use crate::use_cases::gather_information::GatherInformationUseCase;
use crate::use_cases::shared::check_cancelled;
use council_domain::{
    ConvergenceResult, DeliberationOutcome, DeliberationState, DomainError, GatheredInfo,
    PersonaRecord, RoundHistory, RoundRecord, build_round_context, check_convergence,
    collect_requests, parse_persona_output, response_format_instructions,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a deliberation run
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    #[error("No personas configured")]
    NoPersonas,

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    /// The proposal under review
    pub proposal: String,
    /// Extra background appended to the proposal every round
    pub context: Option<String>,
    /// Initial roster
    pub personas: Vec<String>,
}

impl RunDeliberationInput {
    pub fn new(proposal: impl Into<String>, personas: Vec<String>) -> Self {
        Self {
            proposal: proposal.into(),
            context: None,
            personas,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Final outcome together with the full round history, for audit or handoff
#[derive(Debug, Clone, Serialize)]
pub struct DeliberationReport {
    pub proposal: String,
    pub outcome: DeliberationOutcome,
    pub history: RoundHistory,
}

/// Use case for running a deliberation to a terminal state
pub struct RunDeliberationUseCase<G: PersonaGateway + 'static> {
    gateway: Arc<G>,
    gatherer: GatherInformationUseCase,
    asker: AskUserUseCase,
    params: DeliberationParams,
    cancellation_token: Option<CancellationToken>,
}

impl<G: PersonaGateway + 'static> RunDeliberationUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        search: Arc<dyn TextSearchPort>,
        metrics: Arc<dyn MetricsStorePort>,
        channel: Arc<dyn UserChannelPort>,
        params: DeliberationParams,
    ) -> Self {
        Self {
            gateway,
            gatherer: GatherInformationUseCase::new(search, metrics, params.clone()),
            asker: AskUserUseCase::new(channel, params.answer_timeout),
            params,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token, observed between phases
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDeliberationInput,
    ) -> Result<DeliberationReport, RunDeliberationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDeliberationInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationReport, RunDeliberationError> {
        let mut roster = self.validate(&input)?;

        info!(
            "Starting deliberation with {} personas (threshold {:.2}, max {} rounds)",
            roster.len(),
            self.params.threshold,
            self.params.max_rounds
        );

        let mut history = RoundHistory::new();
        let mut state = DeliberationState::start();

        loop {
            check_cancelled(&self.cancellation_token)?;
            let round = state.round();
            progress.on_round_start(round, &roster);
            info!("Round {}: consulting {}", round, roster.join(", "));

            let records = self
                .consult_personas(&input, &roster, &history, round, progress)
                .await?;
            let result = check_convergence(&records, self.params.threshold);
            info!("Round {}: {}", round, result.reason);
            progress.on_round_complete(round, &result);

            let round_record = RoundRecord::new(round, records);
            state = state.evaluate(&result)?;

            let mut gathered = Vec::new();
            let mut abandoned_by = None;
            if let DeliberationState::NeedInfo(_) = state {
                check_cancelled(&self.cancellation_token)?;
                let (found, next, refused) = self.resolve_requests(&round_record, state, progress).await?;
                gathered = found;
                state = next;
                abandoned_by = refused;
            }

            self.admit_personas(&round_record, &mut roster, progress);
            history.push(round_record.with_gathered(gathered))?;

            if let Some(outcome) = self.finish_round(&mut state, result, abandoned_by)? {
                info!("Deliberation finished: {}", outcome.label());
                return Ok(DeliberationReport {
                    proposal: input.proposal,
                    outcome,
                    history,
                });
            }
        }
    }

    /// Deduplicated initial roster
    fn validate(&self, input: &RunDeliberationInput) -> Result<Vec<String>, RunDeliberationError> {
        if input.proposal.trim().is_empty() {
            return Err(DomainError::InvalidProposal("proposal is empty".to_string()).into());
        }
        if !(self.params.threshold > 0.0 && self.params.threshold <= 1.0) {
            return Err(DomainError::InvalidThreshold(self.params.threshold).into());
        }

        let mut roster: Vec<String> = Vec::new();
        for persona in input.personas.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            if !roster.iter().any(|r| r.eq_ignore_ascii_case(persona)) {
                roster.push(persona.to_string());
            }
        }
        if roster.is_empty() {
            return Err(RunDeliberationError::NoPersonas);
        }
        if roster.len() > self.params.max_personas {
            warn!(
                "Roster of {} exceeds max_personas {}; keeping the first {}",
                roster.len(),
                self.params.max_personas,
                self.params.max_personas
            );
            roster.truncate(self.params.max_personas.max(1));
        }
        Ok(roster)
    }

    /// Consult every persona in roster order
    async fn consult_personas(
        &self,
        input: &RunDeliberationInput,
        roster: &[String],
        history: &RoundHistory,
        round: usize,
        progress: &dyn DeliberationProgress,
    ) -> Result<Vec<PersonaRecord>, RunDeliberationError> {
        let mut records = Vec::with_capacity(roster.len());

        for persona in roster {
            check_cancelled(&self.cancellation_token)?;
            let context = build_round_context(
                &input.proposal,
                history.rounds(),
                persona,
                input.context.as_deref(),
            );
            let prompt = format!(
                "You are the {} persona on a review council (round {}).\n\n{}\n\n{}",
                persona,
                round,
                context,
                response_format_instructions()
            );

            let record = match timeout(
                self.params.persona_timeout,
                self.gateway.generate(persona, &prompt),
            )
            .await
            {
                Ok(Ok(raw)) => parse_persona_output(&raw, persona),
                Ok(Err(e)) => {
                    warn!("Persona {} failed: {}", persona, e);
                    PersonaRecord::unavailable(persona.as_str(), e)
                }
                Err(_) => {
                    warn!(
                        "Persona {} timed out after {:?}",
                        persona, self.params.persona_timeout
                    );
                    PersonaRecord::unavailable(
                        persona.as_str(),
                        format!("timed out after {:?}", self.params.persona_timeout),
                    )
                }
            };

            if !record.parse_success {
                debug!(
                    "Persona {} output degraded: errors={:?} warnings={:?}",
                    persona, record.parse_errors, record.parse_warnings
                );
            }
            progress.on_persona_complete(round, &record);
            records.push(record);
        }

        Ok(records)
    }

    /// NeedInfo → gather → (NeedUser → ask) → Continue | Abandoned.
    ///
    /// Returns the gathered information, the next state, and the id of the
    /// critical request that went unanswered if the run was abandoned.
    async fn resolve_requests(
        &self,
        round: &RoundRecord,
        state: DeliberationState,
        progress: &dyn DeliberationProgress,
    ) -> Result<(Vec<GatheredInfo>, DeliberationState, Option<String>), RunDeliberationError> {
        let requests = collect_requests(round.records.values());
        progress.on_gather_start(&requests);
        let outcome = self.gatherer.gather_requests(requests).await;
        progress.on_gather_complete(outcome.gathered.len(), outcome.missing.len());

        let mut gathered = outcome.gathered;
        let state = state.info_resolved(outcome.missing.len())?;
        if !matches!(state, DeliberationState::NeedUser(_)) {
            return Ok((gathered, state, None));
        }

        check_cancelled(&self.cancellation_token)?;
        match self.asker.ask_for_information(&outcome.missing).await {
            Ok(mut answers) => {
                for request in outcome.missing {
                    if let Some(answer) = answers.remove(&request.id) {
                        gathered.push(GatheredInfo::from_user(request, answer));
                    }
                }
                Ok((gathered, state.user_answered(false)?, None))
            }
            Err(AskUserError::Abandoned { request_id }) => {
                Ok((gathered, state.user_answered(true)?, Some(request_id)))
            }
            Err(AskUserError::Cancelled) => Err(RunDeliberationError::Cancelled),
        }
    }

    /// Personas named by `recruits` or `escalate_to` join for the next round
    fn admit_personas(
        &self,
        round: &RoundRecord,
        roster: &mut Vec<String>,
        progress: &dyn DeliberationProgress,
    ) {
        let named = round
            .records
            .values()
            .flat_map(|r| [r.recruits.as_ref(), r.escalate_to.as_ref()])
            .flatten();

        for reference in named {
            if roster.iter().any(|p| p.eq_ignore_ascii_case(&reference.persona)) {
                continue;
            }
            if roster.len() >= self.params.max_personas {
                warn!(
                    "Roster full ({}); {} not added",
                    self.params.max_personas, reference.persona
                );
                continue;
            }
            info!("Persona {} joins: {}", reference.persona, reference.reason);
            progress.on_persona_joined(&reference.persona, &reference.reason);
            roster.push(reference.persona.clone());
        }
    }

    /// Map the post-round state to a terminal outcome, advancing otherwise
    fn finish_round(
        &self,
        state: &mut DeliberationState,
        result: ConvergenceResult,
        abandoned_by: Option<String>,
    ) -> Result<Option<DeliberationOutcome>, RunDeliberationError> {
        match *state {
            DeliberationState::Converged(round) => {
                Ok(Some(DeliberationOutcome::Converged { round, result }))
            }
            DeliberationState::Abandoned(round) => Ok(Some(DeliberationOutcome::Abandoned {
                round,
                request_id: abandoned_by.unwrap_or_default(),
            })),
            DeliberationState::Continue(_) => {
                *state = state.advance(self.params.max_rounds)?;
                match *state {
                    DeliberationState::Exhausted(rounds) => {
                        Ok(Some(DeliberationOutcome::exhausted(rounds, Some(result))))
                    }
                    _ => Ok(None),
                }
            }
            other => Err(DomainError::InvalidTransition {
                from: format!("{:?}", other),
                event: "finish_round",
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::persona_gateway::GatewayError;
    use crate::ports::text_search::LookupError;
    use crate::ports::user_channel::{NoAnswerChannel, PresetAnswerChannel};
    use async_trait::async_trait;
    use council_domain::{SearchHit, SessionSummary, Verdict};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Doubles ====================

    /// Replays canned answers per persona; the last answer repeats
    #[derive(Default)]
    struct ScriptedGateway {
        answers: Mutex<HashMap<String, VecDeque<String>>>,
        failing: Vec<String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedGateway {
        fn answer(self, persona: &str, answers: &[&str]) -> Self {
            self.answers.lock().unwrap().insert(
                persona.to_string(),
                answers.iter().map(|a| a.to_string()).collect(),
            );
            self
        }

        fn prompts_for(&self, persona: &str) -> Vec<String> {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .filter(|(p, _)| p == persona)
                .map(|(_, prompt)| prompt.clone())
                .collect()
        }
    }

    #[async_trait]
    impl PersonaGateway for ScriptedGateway {
        async fn generate(&self, persona: &str, prompt: &str) -> Result<String, GatewayError> {
            self.prompts
                .lock()
                .unwrap()
                .push((persona.to_string(), prompt.to_string()));
            if self.failing.iter().any(|p| p == persona) {
                return Err(GatewayError::RequestFailed("connection reset".to_string()));
            }
            let mut answers = self.answers.lock().unwrap();
            let queue = answers
                .get_mut(persona)
                .ok_or_else(|| GatewayError::PersonaNotAvailable(persona.to_string()))?;
            if queue.len() > 1 {
                Ok(queue.pop_front().unwrap_or_default())
            } else {
                Ok(queue.front().cloned().unwrap_or_default())
            }
        }
    }

    struct SlowGateway;

    #[async_trait]
    impl PersonaGateway for SlowGateway {
        async fn generate(&self, _persona: &str, _prompt: &str) -> Result<String, GatewayError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(String::new())
        }
    }

    struct FixedSearch(Vec<SearchHit>);

    #[async_trait]
    impl TextSearchPort for FixedSearch {
        async fn search(&self, _pattern: &str, _scope: &str) -> Result<Vec<SearchHit>, LookupError> {
            Ok(self.0.clone())
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl MetricsStorePort for EmptyStore {
        async fn recent_summaries(&self, _limit: usize) -> Result<Vec<SessionSummary>, LookupError> {
            Ok(vec![])
        }
    }

    fn response(verdict: &str, confidence: u32, conviction: u32, extra: &str) -> String {
        format!(
            "VERDICT: {}\nCONFIDENCE: {}\nCONVICTION: {}\nREASONING:\nPosition of a {} reviewer.\n{}",
            verdict, confidence, conviction, verdict, extra
        )
    }

    fn use_case<G: PersonaGateway + 'static>(
        gateway: Arc<G>,
        channel: Arc<dyn UserChannelPort>,
        params: DeliberationParams,
    ) -> RunDeliberationUseCase<G> {
        let hits = vec![SearchHit {
            file: "src/jobs/backfill.rs".to_string(),
            line: 12,
            excerpt: "pub struct BackfillJob {".to_string(),
        }];
        RunDeliberationUseCase::new(
            gateway,
            Arc::new(FixedSearch(hits)),
            Arc::new(EmptyStore),
            channel,
            params,
        )
    }

    fn personas(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    // ==================== Terminal States ====================

    #[tokio::test]
    async fn test_converges_in_first_round() {
        let proceed = response("PROCEED", 90, 80, "");
        let gateway = Arc::new(
            ScriptedGateway::default()
                .answer("security", &[&proceed])
                .answer("performance", &[&proceed]),
        );
        let report = use_case(gateway.clone(), Arc::new(NoAnswerChannel), DeliberationParams::default())
            .execute(RunDeliberationInput::new(
                "Adopt gRPC",
                personas(&["security", "performance"]),
            ))
            .await
            .unwrap();

        assert!(report.outcome.is_converged());
        assert_eq!(report.outcome.verdict(), Some(Verdict::Proceed));
        assert_eq!(report.history.len(), 1);
        let prompt = &gateway.prompts_for("security")[0];
        assert!(prompt.contains("Adopt gRPC"));
        assert!(prompt.contains("VERDICT: PROCEED | CONDITIONAL_GO"));
        assert!(!prompt.contains("### Round "));
    }

    #[tokio::test]
    async fn test_exhausted_after_budget() {
        let gateway = Arc::new(
            ScriptedGateway::default()
                .answer("security", &[&response("STOP", 90, 90, "")])
                .answer("performance", &[&response("PROCEED", 90, 90, "")]),
        );
        let params = DeliberationParams::default().with_max_rounds(3);
        let report = use_case(gateway.clone(), Arc::new(NoAnswerChannel), params)
            .execute(
                RunDeliberationInput::new("Adopt gRPC", personas(&["security", "performance"]))
                    .with_context("Team of four"),
            )
            .await
            .unwrap();

        match &report.outcome {
            DeliberationOutcome::Exhausted {
                rounds,
                last_agreement_ratio,
                ..
            } => {
                assert_eq!(*rounds, 3);
                assert!((last_agreement_ratio - 0.5).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(report.history.len(), 3);

        // Round 3 sees two history blocks, never its own reasoning
        let third = &gateway.prompts_for("security")[2];
        assert_eq!(third.matches("### Round ").count(), 2);
        assert!(third.contains("Team of four"));
        assert!(third.contains("Position of a PROCEED reviewer."));
        assert!(!third.contains("Position of a STOP reviewer."));
    }

    #[tokio::test]
    async fn test_abandoned_when_critical_request_unanswered() {
        let asks = response(
            "ABSTAIN",
            50,
            50,
            "INFO_NEEDED:\n- CRITICAL: Who owns the billing budget?",
        );
        let gateway = Arc::new(
            ScriptedGateway::default()
                .answer("product", &[&asks])
                .answer("security", &[&response("PROCEED", 80, 80, "")]),
        );
        let report = use_case(gateway, Arc::new(NoAnswerChannel), DeliberationParams::default())
            .execute(RunDeliberationInput::new(
                "Raise prices",
                personas(&["product", "security"]),
            ))
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            DeliberationOutcome::Abandoned {
                round: 1,
                request_id: "product-1".to_string()
            }
        );
        assert_eq!(report.history.len(), 1);
    }

    // ==================== Information Flow ====================

    #[tokio::test]
    async fn test_gathered_and_answered_info_reaches_next_round() {
        let asks = response(
            "CONDITIONAL_GO",
            70,
            70,
            "INFO_NEEDED:\n- Where is \"BackfillJob\" implemented?\n- What is the deadline?",
        );
        let settled = response("PROCEED", 90, 90, "");
        let gateway = Arc::new(
            ScriptedGateway::default()
                .answer("architect", &[&asks, &settled])
                .answer("maintainer", &[&settled]),
        );
        let channel = PresetAnswerChannel::default().with_answer("architect-2", "End of Q3");

        let report = use_case(gateway.clone(), Arc::new(channel), DeliberationParams::default())
            .execute(RunDeliberationInput::new(
                "Migrate the billing schema",
                personas(&["architect", "maintainer"]),
            ))
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            DeliberationOutcome::Converged {
                round: 2,
                result: report.history.rounds()[1].convergence(0.7)
            }
        );

        let first = &report.history.rounds()[0];
        let sources: Vec<_> = first.gathered.iter().map(|g| g.source.as_str()).collect();
        assert_eq!(sources, vec!["codebase_search:\"BackfillJob\"", "user"]);

        let second_prompt = &gateway.prompts_for("maintainer")[1];
        assert!(second_prompt.contains("Q: Where is \"BackfillJob\" implemented?"));
        assert!(second_prompt.contains("src/jobs/backfill.rs:12"));
        assert!(second_prompt.contains("A: End of Q3 [user]"));
    }

    // ==================== Roster ====================

    #[tokio::test]
    async fn test_recruited_persona_joins_next_round() {
        let recruits = response("PROCEED", 90, 90, "RECRUITS: dba - schema change needs review");
        let settled = response("PROCEED", 90, 90, "");
        let gateway = Arc::new(
            ScriptedGateway::default()
                .answer("architect", &[&recruits, &settled])
                .answer("dba", &[&settled]),
        );

        let report = use_case(gateway.clone(), Arc::new(NoAnswerChannel), DeliberationParams::default())
            .execute(RunDeliberationInput::new("Migrate", personas(&["architect"])))
            .await
            .unwrap();

        assert!(report.outcome.is_converged());
        assert_eq!(report.history.len(), 2);
        assert!(report.history.rounds()[1].get("dba").is_some());
        assert_eq!(gateway.prompts_for("dba").len(), 1);
    }

    #[tokio::test]
    async fn test_recruit_ignored_when_roster_full() {
        let recruits = response("STOP", 90, 90, "RECRUITS: dba - schema change needs review");
        let gateway = Arc::new(
            ScriptedGateway::default()
                .answer("architect", &[&recruits])
                .answer("security", &[&response("PROCEED", 90, 90, "")]),
        );
        let params = DeliberationParams::default()
            .with_max_personas(2)
            .with_max_rounds(2);

        let report = use_case(gateway.clone(), Arc::new(NoAnswerChannel), params)
            .execute(RunDeliberationInput::new(
                "Migrate",
                personas(&["architect", "security"]),
            ))
            .await
            .unwrap();

        assert_eq!(report.outcome.label(), "EXHAUSTED");
        assert!(gateway.prompts_for("dba").is_empty());
    }

    #[tokio::test]
    async fn test_failed_persona_recorded_as_unavailable() {
        let gateway = Arc::new(ScriptedGateway {
            failing: vec!["flaky".to_string()],
            ..ScriptedGateway::default().answer("security", &[&response("PROCEED", 90, 90, "")])
        });

        let report = use_case(gateway, Arc::new(NoAnswerChannel), DeliberationParams::default())
            .execute(RunDeliberationInput::new("Adopt gRPC", personas(&["security", "flaky"])))
            .await
            .unwrap();

        // The failed persona carries no weight, so the other one converges alone
        assert!(report.outcome.is_converged());
        let flaky = report.history.rounds()[0].get("flaky").unwrap();
        assert!(!flaky.parse_success);
        assert!(flaky.parse_errors[0].starts_with("Persona response unavailable"));
    }

    #[tokio::test]
    async fn test_persona_timeout() {
        let params = DeliberationParams::default()
            .with_persona_timeout(Duration::from_millis(20))
            .with_max_rounds(1);

        let report = use_case(Arc::new(SlowGateway), Arc::new(NoAnswerChannel), params)
            .execute(RunDeliberationInput::new("Adopt gRPC", personas(&["security"])))
            .await
            .unwrap();

        let record = report.history.rounds()[0].get("security").unwrap();
        assert!(!record.parse_success);
        assert!(record.parse_errors[0].contains("timed out"));
        // Only weightless records: the unweighted fallback counts one ABSTAIN
        assert_eq!(report.outcome.verdict(), Some(Verdict::Abstain));
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_rejects_empty_roster_and_proposal() {
        let gateway = Arc::new(ScriptedGateway::default());
        let use_case = use_case(gateway, Arc::new(NoAnswerChannel), DeliberationParams::default());

        let err = use_case
            .execute(RunDeliberationInput::new("Adopt gRPC", personas(&[" ", ""])))
            .await
            .unwrap_err();
        assert!(matches!(err, RunDeliberationError::NoPersonas));

        let err = use_case
            .execute(RunDeliberationInput::new("   ", personas(&["security"])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunDeliberationError::Domain(DomainError::InvalidProposal(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_invalid_threshold() {
        let gateway = Arc::new(ScriptedGateway::default());
        let params = DeliberationParams::default().with_threshold(1.5);
        let err = use_case(gateway, Arc::new(NoAnswerChannel), params)
            .execute(RunDeliberationInput::new("Adopt gRPC", personas(&["security"])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunDeliberationError::Domain(DomainError::InvalidThreshold(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_round() {
        let gateway = Arc::new(ScriptedGateway::default());
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case(gateway.clone(), Arc::new(NoAnswerChannel), DeliberationParams::default())
            .with_cancellation(token)
            .execute(RunDeliberationInput::new("Adopt gRPC", personas(&["security"])))
            .await
            .unwrap_err();

        assert!(matches!(err, RunDeliberationError::Cancelled));
        assert!(gateway.prompts_for("security").is_empty());
    }
}
