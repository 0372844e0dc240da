//! Console output formatter for deliberation reports

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use council_application::DeliberationReport;
use council_domain::core::string::truncate;
use council_domain::{ConvergenceResult, DeliberationOutcome, PersonaRecord, RoundRecord, Verdict};

/// Reasoning longer than this is cut in the full report
const MAX_REASONING_CHARS: usize = 400;

/// Formats deliberation reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &DeliberationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Persona Council"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Proposal:".cyan().bold(),
            report.proposal
        ));

        for round in report.history.rounds() {
            output.push_str(&Self::format_round(round));
        }

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&Self::format_outcome(&report.outcome));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &DeliberationReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final verdict only
    pub fn format_verdict_only(report: &DeliberationReport) -> String {
        match &report.outcome {
            DeliberationOutcome::Converged { round, result } => format!(
                "{} {} ({:.0}% agreement, round {})\n",
                Self::verdict_label(result.dominant_verdict),
                "CONVERGED".green(),
                result.agreement_ratio * 100.0,
                round
            ),
            DeliberationOutcome::Exhausted {
                rounds,
                last_agreement_ratio,
                ..
            } => format!(
                "{} after {} rounds ({:.0}% agreement)\n",
                "EXHAUSTED".yellow().bold(),
                rounds,
                last_agreement_ratio * 100.0
            ),
            DeliberationOutcome::Abandoned { round, request_id } => format!(
                "{} in round {} (unanswered {})\n",
                "ABANDONED".red().bold(),
                round,
                request_id
            ),
        }
    }

    fn format_round(round: &RoundRecord) -> String {
        let mut output = Self::section_header(&format!("Round {}", round.round));

        for record in round.records.values() {
            output.push_str(&Self::format_record(record));
        }

        if !round.gathered.is_empty() {
            output.push_str(&format!("\n{}\n", "Gathered information:".cyan().bold()));
            for info in &round.gathered {
                output.push_str(&format!(
                    "  Q: {}\n{}\n  {}\n",
                    info.request.description,
                    Self::indent(&info.data, "     "),
                    format!("[{}]", info.source).dimmed()
                ));
            }
        }

        output
    }

    fn format_record(record: &PersonaRecord) -> String {
        let mut output = format!(
            "\n{} {} {}\n",
            format!("── {} ──", record.persona).yellow().bold(),
            Self::verdict_label(record.verdict),
            format!(
                "(confidence {}, conviction {})",
                record.confidence, record.conviction
            )
            .dimmed()
        );

        if !record.reasoning.is_empty() {
            output.push_str(&Self::indent(
                &truncate(&record.reasoning, MAX_REASONING_CHARS),
                "  ",
            ));
            output.push('\n');
        }

        if let Some(change) = &record.changed_position {
            output.push_str(&format!(
                "  {} {} -> {}: {}\n",
                "changed:".magenta(),
                change.from,
                change.to,
                change.reason
            ));
        }
        for blocker in &record.blockers {
            output.push_str(&format!("  {} {}\n", "blocker:".red(), blocker));
        }
        for request in &record.info_needed {
            output.push_str(&format!("  {} {}\n", "needs:".cyan(), request));
        }
        if let Some(target) = &record.escalate_to {
            output.push_str(&format!(
                "  {} {} ({})\n",
                "escalates to:".yellow(),
                target.persona,
                target.reason
            ));
        }
        if let Some(recruit) = &record.recruits {
            output.push_str(&format!(
                "  {} {} ({})\n",
                "recruits:".yellow(),
                recruit.persona,
                recruit.reason
            ));
        }
        for error in &record.parse_errors {
            output.push_str(&format!("  {} {}\n", "parse error:".red().dimmed(), error));
        }

        output
    }

    fn format_outcome(outcome: &DeliberationOutcome) -> String {
        match outcome {
            DeliberationOutcome::Converged { round, result } => format!(
                "{} in round {} on {}\n{}{}",
                "CONVERGED".green().bold(),
                round,
                Self::verdict_label(result.dominant_verdict),
                Self::decision_line(result.dominant_verdict),
                Self::format_tally(result)
            ),
            DeliberationOutcome::Exhausted {
                rounds,
                last_result,
                ..
            } => {
                let mut output = format!(
                    "{} after {} rounds without agreement\n",
                    "EXHAUSTED".yellow().bold(),
                    rounds
                );
                if let Some(result) = last_result {
                    output.push_str(&Self::format_tally(result));
                }
                output
            }
            DeliberationOutcome::Abandoned { round, request_id } => format!(
                "{} in round {}: critical request {} was not answered\n",
                "ABANDONED".red().bold(),
                round,
                request_id
            ),
        }
    }

    /// Whether the council's verdict lets the proposal go ahead
    fn decision_line(verdict: Option<Verdict>) -> String {
        let decision = match verdict {
            Some(verdict) if verdict.allows_action() => "go ahead".green().bold(),
            _ => "hold off".red().bold(),
        };
        format!("{} {}\n", "Decision:".cyan().bold(), decision)
    }

    fn format_tally(result: &ConvergenceResult) -> String {
        let mut output = format!(
            "\n{} {:.0}% (threshold {:.0}%), average conviction {:.0}\n",
            "Agreement:".cyan().bold(),
            result.agreement_ratio * 100.0,
            result.threshold * 100.0,
            result.avg_conviction
        );
        for verdict in Verdict::ALL {
            if let Some(weight) = result.weighted_scores.get(&verdict)
                && *weight > 0.0
            {
                output.push_str(&format!("  {:<15} {:.2}\n", verdict.as_str(), weight));
            }
        }
        output.push_str(&format!("{} {}\n", "Reason:".cyan().bold(), result.reason));
        output
    }

    fn verdict_label(verdict: Option<Verdict>) -> ColoredString {
        match verdict {
            Some(Verdict::Proceed) => "PROCEED".green().bold(),
            Some(Verdict::ConditionalGo) => "CONDITIONAL_GO".green(),
            Some(Verdict::Stop) => "STOP".red().bold(),
            Some(Verdict::Escalate) => "ESCALATE".yellow().bold(),
            Some(Verdict::Abstain) => "ABSTAIN".dimmed(),
            None => "NO VERDICT".dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &DeliberationReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &DeliberationReport) -> String {
        Self::format_json(report)
    }

    fn format_verdict_only(&self, report: &DeliberationReport) -> String {
        Self::format_verdict_only(report)
    }
}
