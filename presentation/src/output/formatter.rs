//! Output formatter trait

use council_application::DeliberationReport;
use council_domain::OutputFormat;

/// Trait for formatting deliberation reports
pub trait OutputFormatter {
    /// Format the complete report: outcome, tally and every round
    fn format(&self, report: &DeliberationReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &DeliberationReport) -> String;

    /// Format the final verdict only (concise output)
    fn format_verdict_only(&self, report: &DeliberationReport) -> String;

    /// Dispatch on the configured format
    fn render(&self, report: &DeliberationReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Verdict => self.format_verdict_only(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
