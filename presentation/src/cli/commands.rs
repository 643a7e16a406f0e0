//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for processing results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every stage result plus the outcome
    Full,
    /// Only the outcome
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for triage_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for ticket-triage
#[derive(Parser, Debug)]
#[command(name = "ticket-triage")]
#[command(author, version, about = "Customer support ticket triage pipeline")]
#[command(long_about = r#"
Ticket Triage runs a support ticket through four analysis stages and acts on
the outcome.

The stages run in a fixed order:
1. Classification: category and subcategory of the issue
2. Knowledge: similar resolved cases and a proposed solution
3. Sentiment: customer mood, urgency and churn risk
4. Decision: auto-resolve, or escalate to a human or a manager

Configuration files are loaded from (in priority order):
1. TRIAGE_* environment variables (e.g. TRIAGE_RETRY__MAX_RETRIES=5)
2. --config <path>     Explicit config file
3. ./triage.toml       Project-level config
4. ~/.config/ticket-triage/config.toml   Global config

Example:
  ticket-triage process --customer c-17 --subject "Charged twice" --body "Two charges for order 12345"
  ticket-triage batch tickets.json -j 8 -o json
  ticket-triage health
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (defaults to the config file, then summary)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Submit one ticket and run it through the pipeline
    Process {
        /// Customer identifier
        #[arg(long)]
        customer: String,

        /// Ticket subject line
        #[arg(long)]
        subject: String,

        /// Ticket body
        #[arg(long)]
        body: String,
    },

    /// Process every ticket in a JSON file, then list them
    Batch {
        /// JSON array of {"customer_id", "subject", "body"} objects
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Tickets processed at the same time (defaults to [batch].concurrency)
        #[arg(short = 'j', long, value_parser = clap::value_parser!(u16).range(1..))]
        concurrency: Option<u16>,

        /// Print the stored record of every processed ticket
        #[arg(long)]
        details: bool,
    },

    /// Probe every stage service and report its health
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process() {
        let cli = Cli::try_parse_from([
            "ticket-triage",
            "process",
            "--customer",
            "c-1",
            "--subject",
            "Login",
            "--body",
            "Cannot sign in",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Process {
                customer: "c-1".to_string(),
                subject: "Login".to_string(),
                body: "Cannot sign in".to_string(),
            }
        );
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["ticket-triage", "--no-config", "-q", "health"]).unwrap();
        assert_eq!(cli.command, Command::Health);
        assert!(cli.no_config);
        assert!(cli.quiet);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_process_requires_all_fields() {
        assert!(Cli::try_parse_from(["ticket-triage", "process", "--customer", "c-1"]).is_err());
    }

    #[test]
    fn test_parse_batch() {
        let cli =
            Cli::try_parse_from(["ticket-triage", "batch", "tickets.json", "-j", "8", "--details"])
                .unwrap();
        assert_eq!(
            cli.command,
            Command::Batch {
                file: PathBuf::from("tickets.json"),
                concurrency: Some(8),
                details: true,
            }
        );

        let cli = Cli::try_parse_from(["ticket-triage", "batch", "tickets.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Batch {
                concurrency: None,
                details: false,
                ..
            }
        ));
    }

    #[test]
    fn test_batch_rejects_zero_concurrency() {
        assert!(Cli::try_parse_from(["ticket-triage", "batch", "t.json", "-j", "0"]).is_err());
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            triage_domain::OutputFormat::from(OutputFormat::Full),
            triage_domain::OutputFormat::Full
        );
    }
}
