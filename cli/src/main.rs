//! CLI entrypoint for persona-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    DeliberationProgress, DeliberationReport, NoProgress, PresetAnswerChannel,
    RunDeliberationError, RunDeliberationInput, RunDeliberationUseCase, UserChannelPort,
};
use council_domain::{DeliberationOutcome, InteractionMode, OutputFormat};
use council_infrastructure::{
    CommandPersonaGateway, ConfigLoader, FileConfig, GrepTextSearch, JsonlSummaryStore,
};
use council_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress, TerminalUserChannel,
    set_color_enabled,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status when the round budget ran out
const EXIT_EXHAUSTED: u8 = 2;
/// Exit status when a critical question went unanswered
const EXIT_ABANDONED: u8 = 3;
/// Exit status after Ctrl+C
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    check_config(&config)?;

    info!("Starting persona council");

    let proposal = read_proposal(&cli)?;
    let (mode, _) = config.interaction.parse_mode();
    let format = config.output.effective_format();
    if !config.output.use_color() {
        set_color_enabled(false);
    }

    // === Dependency Injection ===
    let gateway = CommandPersonaGateway::from_config(&config.personas)?;
    if !gateway.is_available() {
        warn!(
            "Persona command `{}` was not found; every persona call will fail",
            gateway.program()
        );
    }
    let search = GrepTextSearch::new().with_file_pattern(config.gatherer.file_pattern.clone());
    let store = JsonlSummaryStore::new(&config.gatherer.summaries_dir);

    let cancellation = CancellationToken::new();
    let channel: Arc<dyn UserChannelPort> = match mode {
        InteractionMode::Headless => {
            let answers = cli.answer.iter().cloned().collect();
            Arc::new(PresetAnswerChannel::new(answers))
        }
        InteractionMode::Interactive => {
            if !cli.answer.is_empty() {
                warn!("--answer is only used in headless mode; you will be asked instead");
            }
            Arc::new(TerminalUserChannel::new().with_cancellation(cancellation.clone()))
        }
    };

    {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; stopping after the current step");
                cancellation.cancel();
            }
        });
    }

    let use_case = RunDeliberationUseCase::new(
        Arc::new(gateway),
        Arc::new(search),
        Arc::new(store),
        channel,
        config.deliberation_params(),
    )
    .with_cancellation(cancellation);

    let mut input = RunDeliberationInput::new(proposal, config.personas.roster.clone());
    if let Some(path) = &cli.context_file {
        let context = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file {}", path.display()))?;
        input = input.with_context(context);
    }

    let progress: Box<dyn DeliberationProgress> = if cli.quiet || !config.output.progress {
        Box::new(NoProgress)
    } else if mode == InteractionMode::Headless {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let report = match use_case.execute_with_progress(input, progress.as_ref()).await {
        Ok(report) => report,
        Err(RunDeliberationError::Cancelled) => {
            eprintln!("Deliberation cancelled.");
            return Ok(ExitCode::from(EXIT_CANCELLED));
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", ConsoleFormatter.render(&report, format));
    Ok(exit_code(&report))
}

/// Install the stderr subscriber, plus a non-blocking file writer for `--log-file`
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(threshold) = cli.threshold {
        config.deliberation.threshold = threshold;
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.deliberation.max_rounds = max_rounds;
    }
    if !cli.persona.is_empty() {
        config.personas.roster = cli.persona.clone();
    }
    if cli.headless {
        config.interaction.mode = InteractionMode::Headless.as_str().to_string();
    }
    if let Some(output) = cli.output {
        config.output.format = Some(OutputFormat::from(output));
    }
}

/// Log warnings; refuse to run on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let (errors, warnings): (Vec<_>, Vec<_>) =
        config.validate().into_iter().partition(|issue| issue.is_error());

    for issue in &warnings {
        warn!("{}", issue.message);
    }

    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|issue| format!("  {}", issue)).collect();
        bail!("Invalid configuration:\n{}", lines.join("\n"));
    }
    Ok(())
}

fn read_proposal(cli: &Cli) -> Result<String> {
    let proposal = match (&cli.proposal, &cli.proposal_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read proposal file {}", path.display()))?,
        (None, None) => bail!("A proposal is required (argument or --proposal-file)."),
    };

    if proposal.trim().is_empty() {
        bail!("The proposal is empty.");
    }
    Ok(proposal)
}

fn exit_code(report: &DeliberationReport) -> ExitCode {
    match report.outcome {
        DeliberationOutcome::Converged { .. } => ExitCode::SUCCESS,
        DeliberationOutcome::Exhausted { .. } => ExitCode::from(EXIT_EXHAUSTED),
        DeliberationOutcome::Abandoned { .. } => ExitCode::from(EXIT_ABANDONED),
    }
}
