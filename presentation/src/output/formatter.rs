//! Output formatter trait

use triage_domain::ProcessingResult;

/// Trait for formatting processing results
pub trait OutputFormatter {
    /// Format every stage result plus the outcome
    fn format(&self, result: &ProcessingResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &ProcessingResult) -> String;

    /// Format the outcome only (concise output)
    fn format_summary(&self, result: &ProcessingResult) -> String;

    /// Dispatch on the configured output format
    fn render(&self, result: &ProcessingResult, format: triage_domain::OutputFormat) -> String {
        match format {
            triage_domain::OutputFormat::Full => self.format(result),
            triage_domain::OutputFormat::Summary => self.format_summary(result),
            triage_domain::OutputFormat::Json => self.format_json(result),
        }
    }
}
