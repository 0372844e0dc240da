//! Progress reporting for deliberation runs

use colored::Colorize;
use council_application::ports::progress::DeliberationProgress;
use council_domain::{ConvergenceResult, InfoRequest, PersonaRecord};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one bar per round and a spinner while gathering
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    gather_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            gather_spinner: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn println(&self, line: String) {
        // Printing above the bars fails only when stderr is gone
        let _ = self.multi.println(line);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationProgress for ProgressReporter {
    fn on_round_start(&self, round: usize, personas: &[String]) {
        let pb = self.multi.add(ProgressBar::new(personas.len() as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}", round));
        pb.set_message(format!("consulting {}", personas.join(", ")));
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_persona_complete(&self, _round: usize, record: &PersonaRecord) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = match record.verdict {
                Some(verdict) if record.parse_success => {
                    format!("{} {} {}", "v".green(), record.persona, verdict)
                }
                _ => format!("{} {}", "x".red(), record.persona),
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: usize, result: &ConvergenceResult) {
        let Ok(mut slot) = self.round_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            let verdict = result
                .dominant_verdict
                .map_or_else(|| "-".to_string(), |v| v.to_string());
            let summary = format!(
                "{} {:.0}% ({})",
                verdict,
                result.agreement_ratio * 100.0,
                if result.converged {
                    "converged".green()
                } else {
                    "open".yellow()
                }
            );
            pb.finish_with_message(summary);
        }
        if !result.converged {
            self.println(format!("  {} round {}: {}", "->".cyan(), round, result.reason.dimmed()));
        }
    }

    fn on_gather_start(&self, requests: &[InfoRequest]) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Gathering");
        pb.set_message(format!("{} open requests", requests.len()));
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.gather_spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn on_gather_complete(&self, gathered: usize, missing: usize) {
        if let Ok(mut slot) = self.gather_spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} resolved, {} left for you", gathered, missing));
        }
    }

    fn on_persona_joined(&self, persona: &str, reason: &str) {
        self.println(format!("  {} {} joins: {}", "+".green(), persona.bold(), reason));
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl DeliberationProgress for SimpleProgress {
    fn on_round_start(&self, round: usize, personas: &[String]) {
        eprintln!(
            "{} {} ({} personas)",
            "->".cyan(),
            format!("Round {}", round).bold(),
            personas.len()
        );
    }

    fn on_persona_complete(&self, _round: usize, record: &PersonaRecord) {
        match record.verdict {
            Some(verdict) if record.parse_success => {
                eprintln!("  {} {} {}", "v".green(), record.persona, verdict)
            }
            _ => eprintln!("  {} {} (no usable answer)", "x".red(), record.persona),
        }
    }

    fn on_round_complete(&self, _round: usize, result: &ConvergenceResult) {
        eprintln!("  {}", result.reason.dimmed());
    }

    fn on_gather_complete(&self, gathered: usize, missing: usize) {
        eprintln!("  gathered {}, {} still open", gathered, missing);
    }

    fn on_persona_joined(&self, persona: &str, reason: &str) {
        eprintln!("  {} {} joins: {}", "+".green(), persona, reason);
    }
}
