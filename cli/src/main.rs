//! CLI entrypoint for Ticket Triage
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod bootstrap;

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use triage_application::{
    PipelineProgress, ProcessTicketInput, TicketDetails, TicketQueryUseCase,
};
use triage_domain::{OutputFormat, ProcessingResult};
use triage_infrastructure::{ConfigLoader, FileConfig};
use triage_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};

/// One entry of a batch file.
#[derive(Debug, Deserialize)]
struct BatchTicket {
    customer_id: String,
    subject: String,
    body: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting Ticket Triage");

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue);
        } else {
            warn!("{}", issue);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("configuration is invalid; see the errors above");
    }

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = output_format(&cli, &config);

    // === Dependency Injection ===
    let app = bootstrap::build(&config).await?;

    match cli.command {
        Command::Process {
            customer,
            subject,
            body,
        } => {
            let input = ProcessTicketInput::new(customer, subject, body);
            let result = if cli.quiet || format == OutputFormat::Json {
                app.process.execute(input).await?
            } else {
                let progress = ProgressReporter::new();
                app.process.execute_with_progress(input, &progress).await?
            };
            println!("{}", ConsoleFormatter.render(&result, format));
        }
        Command::Batch {
            file,
            concurrency,
            details,
        } => {
            let tickets = read_batch(&file)?;
            let total = tickets.len();
            let concurrency = concurrency
                .map(usize::from)
                .unwrap_or(config.batch.concurrency)
                .max(1);
            let progress: Box<dyn PipelineProgress> = if cli.quiet || format == OutputFormat::Json {
                Box::new(triage_application::NoProgress)
            } else {
                Box::new(SimpleProgress)
            };
            info!("Processing {} tickets, {} at a time", total, concurrency);

            // Independent pipelines; `buffered` keeps results in input order.
            let process = &app.process;
            let progress = progress.as_ref();
            let outcomes: Vec<_> = stream::iter(tickets)
                .map(move |ticket| {
                    let input =
                        ProcessTicketInput::new(ticket.customer_id, ticket.subject, ticket.body);
                    process.execute_with_progress(input, progress)
                })
                .buffered(concurrency)
                .collect()
                .await;

            let mut results: Vec<ProcessingResult> = Vec::with_capacity(total);
            for outcome in outcomes {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(e) => error!("{}", e),
                }
            }
            let failures = total - results.len();

            let show_details = details || config.output.ticket_details;
            if format == OutputFormat::Json {
                if show_details {
                    let records = stored_details(&app.query, &results).await;
                    println!("{}", serde_json::to_string_pretty(&records)?);
                } else {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
            } else {
                for result in &results {
                    println!("{}", ConsoleFormatter.render(result, format));
                }
                if show_details {
                    for record in stored_details(&app.query, &results).await {
                        println!("{}", ConsoleFormatter::format_ticket_details(&record));
                    }
                }
                let limit = config.output.ticket_list_limit;
                if limit > 0 {
                    let tickets = app.query.list(Some(limit)).await?;
                    println!("{}", ConsoleFormatter::format_ticket_list(&tickets));
                }
            }

            let summary = app.metrics.summary();
            info!(
                "Processed {} tickets ({} failed); {} customer messages queued",
                summary.tickets_processed,
                summary.tickets_failed,
                app.outbox.queued().len()
            );
            if failures > 0 {
                bail!("{} of {} tickets failed", failures, total);
            }
        }
        Command::Health => {
            let report = app.health.execute().await;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", ConsoleFormatter::format_health(&report));
            }
            if !report.all_healthy() {
                bail!("one or more stages are not healthy");
            }
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level, optionally teeing to a file.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .with_context(|| format!("invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(
                directory.unwrap_or_else(|| Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn output_format(cli: &Cli, config: &FileConfig) -> OutputFormat {
    cli.output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default()
}

/// Stored records of the processed tickets. Tickets that only got a
/// temporary identity have none and are skipped.
async fn stored_details(
    query: &TicketQueryUseCase,
    results: &[ProcessingResult],
) -> Vec<TicketDetails> {
    let lookups = join_all(results.iter().map(|r| query.get(&r.ticket_id))).await;
    results
        .iter()
        .zip(lookups)
        .filter_map(|(result, lookup)| match lookup {
            Ok(details) => Some(details),
            Err(e) => {
                warn!("No stored record for ticket {}: {}", result.ticket_id, e);
                None
            }
        })
        .collect()
}

fn read_batch(path: &Path) -> Result<Vec<BatchTicket>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid batch file {}", path.display()))
}
