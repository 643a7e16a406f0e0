//! Console output formatter for triage results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use triage_application::{HealthReport, HealthStatus, TicketDetails};
use triage_domain::{DecisionKind, Priority, ProcessingResult, Stage, Ticket, WorkflowState};

/// Formats triage results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete processing result
    pub fn format(result: &ProcessingResult) -> String {
        let workflow = &result.workflow;
        let mut output = String::new();

        output.push_str(&Self::header("Ticket Triage Result"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Ticket:".cyan().bold(), result.ticket_id));

        // Stage 1: Classification
        let classification = &workflow.classification;
        output.push_str(&Self::section_header("Classification"));
        output.push_str(&format!(
            "  Category:    {} / {}\n",
            classification.category,
            classification.subcategory.as_deref().unwrap_or("N/A")
        ));
        output.push_str(&format!("  Confidence:  {:.2}\n", classification.confidence));
        if let Some(reason) = &classification.reason {
            output.push_str(&format!("  Reason:      {}\n", reason));
        }

        // Stage 2: Knowledge
        let knowledge = &workflow.knowledge;
        output.push_str(&Self::section_header("Knowledge"));
        output.push_str(&format!(
            "  Similar cases: {}\n",
            knowledge.similar_cases_found
        ));
        if let (Some(id), Some(score)) = (&knowledge.top_match_id, knowledge.similarity_score) {
            output.push_str(&format!("  Top match:     {} ({:.2})\n", id, score));
        }
        if let Some(solution) = &knowledge.solution {
            output.push_str(&format!(
                "  Solution ({:.2}):\n{}\n",
                knowledge.confidence_or_zero(),
                Self::indent(solution, "    ")
            ));
        }
        output.push_str(&format!(
            "  Solvable without escalation: {}\n",
            knowledge.solvable_without_escalation
        ));

        // Stage 3: Sentiment
        let sentiment = &workflow.sentiment;
        output.push_str(&Self::section_header("Sentiment"));
        output.push_str(&format!("  {}\n", sentiment.summary()));
        if sentiment.requires_human {
            output.push_str(&format!("  {}\n", "Requires a human".yellow()));
        }

        // Stage 4: Decision
        let decision = &workflow.decision;
        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!(
            "  {} ({:.2})\n",
            Self::decision_label(decision.decision),
            decision.confidence
        ));
        output.push_str(&format!("  Priority: {}\n", Self::priority_label(decision.priority)));
        if let Some(sla) = decision.sla_minutes {
            output.push_str(&format!("  SLA:      {} min\n", sla));
        }
        if let Some(reasoning) = &decision.reasoning {
            output.push_str(&format!("  Reasoning:\n{}\n", Self::indent(reasoning, "    ")));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &ProcessingResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the outcome only (concise output)
    pub fn format_summary(result: &ProcessingResult) -> String {
        let mut output = format!(
            "{} {}  {}  priority {}\n",
            "Ticket".cyan().bold(),
            result.ticket_id,
            Self::decision_label(result.decision),
            Self::priority_label(result.workflow.decision.priority)
        );
        if let Some(solution) = &result.solution {
            output.push_str(&format!("\n{}\n", solution));
        } else if let Some(reasoning) = &result.workflow.decision.reasoning {
            output.push_str(&format!("{} {}\n", "Reason:".dimmed(), reasoning));
        }
        output
    }

    /// Format a stage health report
    pub fn format_health(report: &HealthReport) -> String {
        let mut output = format!(
            "{:<14} {}\n",
            "orchestrator",
            Self::health_label(&report.orchestrator)
        );
        for (stage, status) in &report.stages {
            output.push_str(&format!("{:<14} {}", stage.as_str(), Self::health_label(status)));
            if let HealthStatus::Unreachable(error) = status {
                output.push_str(&format!(" ({})", error.dimmed()));
            }
            output.push('\n');
        }
        output
    }

    /// Format a ticket listing, one line per ticket
    pub fn format_ticket_list(tickets: &[Ticket]) -> String {
        if tickets.is_empty() {
            return format!("{}\n", "No tickets.".dimmed());
        }
        tickets
            .iter()
            .map(|ticket| {
                format!(
                    "{:<38} {:<20} {:<8} {}\n",
                    ticket.id,
                    Self::status_label(ticket.status),
                    ticket.priority,
                    ticket.subject
                )
            })
            .collect()
    }

    /// Format a stored ticket with the stage results recorded for it
    pub fn format_ticket_details(details: &TicketDetails) -> String {
        let ticket = &details.ticket;
        let workflow = &details.workflow;
        let mut output = format!(
            "{} {} {} ({})\n",
            "Ticket:".cyan().bold(),
            ticket.id,
            Self::status_label(ticket.status),
            if details.closed { "closed" } else { "open" }
        );
        output.push_str(&format!("{} {}\n", "Subject:".dimmed(), ticket.subject));
        output.push_str(&format!(
            "{} {}\n",
            "Priority:".dimmed(),
            Self::priority_label(ticket.priority)
        ));

        let recorded = [
            (Stage::Classification, workflow.classification.is_some()),
            (Stage::Knowledge, workflow.knowledge.is_some()),
            (Stage::Sentiment, workflow.sentiment.is_some()),
            (Stage::Decision, workflow.decision.is_some()),
        ];
        let stages: Vec<&str> = recorded
            .iter()
            .filter(|(_, present)| *present)
            .map(|(stage, _)| stage.as_str())
            .collect();
        output.push_str(&format!(
            "{} {}\n",
            "Recorded:".dimmed(),
            if stages.is_empty() {
                "none".to_string()
            } else {
                stages.join(", ")
            }
        ));

        if let Some(decision) = details.decision {
            output.push_str(&format!(
                "{} {}\n",
                "Decision:".dimmed(),
                Self::decision_label(decision)
            ));
        }
        if let Some(solution) = &details.solution {
            output.push_str(&format!("{} {}\n", "Solution:".dimmed(), solution));
        }
        output
    }

    fn decision_label(decision: DecisionKind) -> ColoredString {
        match decision {
            DecisionKind::AutoResolve => decision.as_str().green().bold(),
            DecisionKind::EscalateToHuman => decision.as_str().yellow().bold(),
            DecisionKind::EscalateToManager => decision.as_str().red().bold(),
        }
    }

    fn priority_label(priority: Priority) -> ColoredString {
        match priority {
            Priority::Low => priority.as_str().normal(),
            Priority::Medium => priority.as_str().yellow(),
            Priority::High | Priority::Urgent => priority.as_str().red().bold(),
        }
    }

    fn status_label(status: WorkflowState) -> ColoredString {
        match status {
            WorkflowState::Resolved => status.as_str().green(),
            WorkflowState::Escalated => status.as_str().yellow(),
            WorkflowState::Error => status.as_str().red(),
            _ => status.as_str().normal(),
        }
    }

    fn health_label(status: &HealthStatus) -> ColoredString {
        match status {
            HealthStatus::Healthy => status.as_str().green(),
            HealthStatus::Unhealthy => status.as_str().yellow(),
            HealthStatus::Unreachable(_) => status.as_str().red(),
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
    fn format(&self, result: &ProcessingResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &ProcessingResult) -> String {
        Self::format_json(result)
    }

    fn format_summary(&self, result: &ProcessingResult) -> String {
        Self::format_summary(result)
    }
}
