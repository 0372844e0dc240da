//! Per-persona round input assembled from the accumulated history.

use crate::core::string::truncate;
use crate::deliberation::round::RoundRecord;
use std::fmt::Write;

/// Marks the start of one prior-round block in a round context
pub const HISTORY_BLOCK_MARKER: &str = "### Round ";

/// Maximum length of the reasoning excerpt shown for each peer
pub const REASONING_EXCERPT_CHARS: usize = 300;

/// Build the text `persona_key` receives at the start of the next round.
///
/// With an empty history this is just the proposal followed by the enriched
/// context. Otherwise every prior round is rendered as one
/// [`HISTORY_BLOCK_MARKER`] block holding the other personas' positions and
/// the information gathered that round, followed by the menu of moves.
/// The persona's own earlier output is never shown back to it.
///
/// # Example
///
/// ```
/// use council_domain::build_round_context;
///
/// let context = build_round_context("Adopt gRPC", &[], "security", Some("Team of 4"));
/// assert_eq!(context, "Adopt gRPC\n\nTeam of 4");
/// ```
pub fn build_round_context(
    proposal: &str,
    history: &[RoundRecord],
    persona_key: &str,
    enriched_context: Option<&str>,
) -> String {
    let mut out = proposal.trim().to_string();
    if let Some(context) = enriched_context.map(str::trim).filter(|c| !c.is_empty()) {
        out.push_str("\n\n");
        out.push_str(context);
    }

    if history.is_empty() {
        return out;
    }

    out.push_str("\n\n## Deliberation so far\n");
    for round in history {
        render_round(&mut out, round, persona_key);
    }

    let next = history.last().map_or(1, |r| r.round + 1);
    let _ = write!(out, "\n## Your move in round {}\n\n", next);
    out.push_str(MOVES_MENU);
    out
}

fn render_round(out: &mut String, round: &RoundRecord, persona_key: &str) {
    let _ = writeln!(out, "\n{}{}\n", HISTORY_BLOCK_MARKER, round.round);

    let mut peers = 0;
    for record in round
        .records
        .values()
        .filter(|r| !r.persona.eq_ignore_ascii_case(persona_key))
    {
        peers += 1;
        let verdict = record
            .verdict
            .map_or_else(|| "NO VERDICT".to_string(), |v| v.to_string());
        let excerpt = truncate(record.reasoning.trim(), REASONING_EXCERPT_CHARS);
        let _ = writeln!(
            out,
            "- **{}**: {} (confidence {})",
            record.persona, verdict, record.confidence
        );
        if !excerpt.is_empty() {
            let _ = writeln!(out, "  {}", excerpt.replace('\n', " "));
        }
    }
    if peers == 0 {
        out.push_str("- (no other personas)\n");
    }

    if !round.gathered.is_empty() {
        out.push_str("\nInformation gathered:\n");
        for info in &round.gathered {
            let _ = writeln!(out, "Q: {}", info.request.description);
            let _ = writeln!(out, "A: {} [{}]", info.data.trim(), info.source);
        }
    }
}

const MOVES_MENU: &str = "\
Choose one of the following moves:
- Maintain your position (restate your verdict and what would change your mind)
- Change your position, with a CHANGED_POSITION entry explaining why
- Agree or disagree with a named persona (AGREES_WITH / DISAGREES_WITH)
- Request more information (INFO_NEEDED, prefix CRITICAL if you cannot decide without it)
- Recruit a new persona whose expertise is missing (RECRUITS)
";

/// Response format the output parser understands; appended to every persona prompt
pub fn response_format_instructions() -> &'static str {
    "\
Respond using these fields, each on its own line:

VERDICT: PROCEED | CONDITIONAL_GO | STOP | ABSTAIN | ESCALATE
CONFIDENCE: 0-100 (how certain you are)
CONVICTION: 0-100 (how strongly you feel about it)
REASONING:
<your reasoning, any length>

Optional sections (omit when not needed):
INFO_NEEDED:
- <question> (prefix with CRITICAL if you cannot decide without the answer)
BLOCKERS:
- <blocker>
ESCALATE_TO: <persona> - <reason>
AGREES_WITH: <persona>, <persona>
DISAGREES_WITH:
- <persona>: <reason>
CHANGED_POSITION: from <old verdict> to <new verdict> - <reason>
RECRUITS: <persona> - <reason>
"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::record::PersonaRecord;
    use crate::deliberation::verdict::Verdict;
    use crate::information::{GatheredInfo, InfoRequest};

    fn round(n: usize) -> RoundRecord {
        RoundRecord::new(
            n,
            vec![
                PersonaRecord::new("security")
                    .with_verdict(Verdict::Stop)
                    .with_scores(90, 80)
                    .with_reasoning("Tokens are logged in plain text."),
                PersonaRecord::new("performance")
                    .with_verdict(Verdict::Proceed)
                    .with_scores(70, 60)
                    .with_reasoning("Latency budget is fine."),
            ],
        )
    }

    fn block_count(context: &str) -> usize {
        context.matches(HISTORY_BLOCK_MARKER).count()
    }

    #[test]
    fn test_round_one_is_verbatim() {
        let context = build_round_context("Adopt gRPC", &[], "security", None);
        assert_eq!(context, "Adopt gRPC");
        assert_eq!(block_count(&context), 0);
        assert!(!context.contains("Your move"));
    }

    #[test]
    fn test_history_block_count() {
        for rounds in 1..=4 {
            let history: Vec<_> = (1..=rounds).map(round).collect();
            let context = build_round_context("Adopt gRPC", &history, "security", None);
            assert_eq!(block_count(&context), rounds);
            assert!(context.contains(&format!("Your move in round {}", rounds + 1)));
        }
    }

    #[test]
    fn test_own_output_excluded() {
        let history = vec![round(1)];
        let context = build_round_context("Adopt gRPC", &history, "Security", None);
        assert!(!context.contains("Tokens are logged"));
        assert!(context.contains("**performance**: PROCEED (confidence 70)"));
        assert!(context.contains("Latency budget is fine."));
    }

    #[test]
    fn test_reasoning_excerpt_truncated() {
        let long = "x".repeat(1000);
        let history = vec![RoundRecord::new(
            1,
            vec![PersonaRecord::new("a")
                .with_verdict(Verdict::Proceed)
                .with_reasoning(long.clone())],
        )];
        let context = build_round_context("p", &history, "b", None);
        assert!(!context.contains(&long));
        assert!(context.contains(&"x".repeat(REASONING_EXCERPT_CHARS - 3)));
    }

    #[test]
    fn test_gathered_info_rendered_as_pairs() {
        let request = InfoRequest::from_entry("performance", 0, "What is the current p95 latency?");
        let history = vec![round(1).with_gathered(vec![GatheredInfo::new(
            request,
            "p95 = 210ms",
            "session_summary:s1",
        )])];
        let context = build_round_context("p", &history, "security", Some("ctx"));
        assert!(context.starts_with("p\n\nctx"));
        assert!(context.contains("Q: What is the current p95 latency?"));
        assert!(context.contains("A: p95 = 210ms [session_summary:s1]"));
    }

    #[test]
    fn test_moves_menu_lists_every_move() {
        let context = build_round_context("p", &[round(1)], "security", None);
        for needle in ["Maintain", "Change your position", "Agree or disagree", "INFO_NEEDED", "RECRUITS"] {
            assert!(context.contains(needle), "missing {}", needle);
        }
    }
}
