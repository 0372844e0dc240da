//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Outcome, tally and every round
    Full,
    /// Only the final verdict line
    Verdict,
    /// JSON report
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Verdict => council_domain::OutputFormat::Verdict,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for persona-council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Persona council - reviewers deliberate until they agree")]
#[command(long_about = r#"
Persona council asks a roster of reviewer personas whether a proposed action
should go ahead, and lets them deliberate over several rounds.

Each round every persona gives a verdict with confidence and conviction. The
round converges once one verdict holds enough weighted support and nobody is
still waiting on information, escalating or recruiting. Questions a persona
raises are answered from the codebase, stored session summaries, or you.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/persona-council/config.toml   Global config

Exit status: 0 converged, 2 round budget exhausted, 3 abandoned.

Example:
  council "Drop the legacy billing tables"
  council -p security -p dba --proposal-file plan.md --context-file diff.txt
  council --headless -a security-1="Platform team" -o json "Rotate signing keys"
"#)]
pub struct Cli {
    /// The proposal to deliberate on
    pub proposal: Option<String>,

    /// Read the proposal from a file
    #[arg(long, value_name = "PATH", conflicts_with = "proposal")]
    pub proposal_file: Option<PathBuf>,

    /// Extra context appended to every persona prompt (diff, plan, notes)
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,

    /// Personas on the council (can be specified multiple times)
    #[arg(short, long, value_name = "PERSONA")]
    pub persona: Vec<String>,

    /// Weighted agreement needed to converge, in (0, 1]
    #[arg(long, value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Maximum number of rounds
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<usize>,

    /// Never wait for a human; unanswered critical questions abandon the run
    #[arg(long)]
    pub headless: bool,

    /// Preset answer for a request, by id or description (can be repeated)
    #[arg(short, long, value_name = "KEY=ANSWER", value_parser = parse_answer)]
    pub answer: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (key, answer) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=ANSWER, got `{}`", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("answer key is empty".to_string());
    }
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(format!("answer for `{}` is empty", key));
    }
    Ok((key.to_string(), answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "council",
            "-p",
            "security",
            "--persona",
            "dba",
            "--threshold",
            "0.8",
            "--max-rounds",
            "3",
            "--headless",
            "-a",
            "security-1=Platform team",
            "-o",
            "json",
            "-vv",
            "Drop the legacy tables",
        ])
        .unwrap();

        assert_eq!(cli.proposal.as_deref(), Some("Drop the legacy tables"));
        assert_eq!(cli.persona, vec!["security", "dba"]);
        assert_eq!(cli.threshold, Some(0.8));
        assert_eq!(cli.max_rounds, Some(3));
        assert!(cli.headless);
        assert_eq!(
            cli.answer,
            vec![("security-1".to_string(), "Platform team".to_string())]
        );
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["council", "Ship it"]).unwrap();
        assert!(cli.persona.is_empty());
        assert!(cli.output.is_none());
        assert!(!cli.headless);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_proposal_and_file_conflict() {
        let result = Cli::try_parse_from(["council", "--proposal-file", "plan.md", "Ship it"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(
            parse_answer("Who owns billing? = Team Atlas").unwrap(),
            ("Who owns billing?".to_string(), "Team Atlas".to_string())
        );
        assert!(parse_answer("no separator").is_err());
        assert!(parse_answer("=orphan").is_err());
        assert!(parse_answer("security-1=").is_err());
        assert!(parse_answer("security-1=   ").is_err());
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            council_domain::OutputFormat::from(OutputFormat::Verdict),
            council_domain::OutputFormat::Verdict
        );
    }
}
