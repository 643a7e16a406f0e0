//! Progress reporting for ticket processing

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use triage_application::PipelineProgress;
use triage_domain::{ProcessingResult, Stage, TicketId, WorkflowState};

/// Reports pipeline progress with a single stage bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:24.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }

    fn ensure_bar(&self) {
        if let Ok(mut guard) = self.bar.lock()
            && guard.is_none()
        {
            let steps = WorkflowState::stage_sequence(WorkflowState::initial()).len();
            let bar = ProgressBar::new(steps as u64);
            bar.set_style(Self::stage_style());
            bar.set_prefix("Triage");
            bar.enable_steady_tick(Duration::from_millis(120));
            *guard = Some(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineProgress for ProgressReporter {
    fn on_ticket_created(&self, ticket_id: &TicketId) {
        self.ensure_bar();
        self.with_bar(|bar| bar.set_prefix(format!("Ticket {}", ticket_id)));
    }

    fn on_stage_start(&self, stage: Stage) {
        self.ensure_bar();
        self.with_bar(|bar| bar.set_message(format!("{}...", stage.display_name())));
    }

    fn on_stage_complete(&self, stage: Stage, success: bool) {
        if success {
            self.with_bar(|bar| {
                bar.set_message(format!("{} {}", "v".green(), stage.display_name()));
                bar.inc(1);
            });
        } else if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.abandon_with_message(format!("{} {} failed", "x".red(), stage.display_name()));
        }
    }

    fn on_retry(&self, stage: Stage, attempt: u32, delay: Duration, error: &str) {
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} {} attempt {} failed: {} (retrying in {:.1}s)",
                "!".yellow(),
                stage.display_name(),
                attempt,
                error,
                delay.as_secs_f64()
            ));
        });
    }

    fn on_outcome(&self, result: &ProcessingResult) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_with_message(format!("{}", result.decision.as_str().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl PipelineProgress for SimpleProgress {
    fn on_ticket_created(&self, ticket_id: &TicketId) {
        println!("{} {}", "->".cyan(), format!("Ticket {}", ticket_id).bold());
    }

    fn on_stage_start(&self, stage: Stage) {
        println!("  {} {}", "->".cyan(), stage.display_name());
    }

    fn on_stage_complete(&self, stage: Stage, success: bool) {
        if success {
            println!("  {} {}", "v".green(), stage.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), stage.display_name());
        }
    }

    fn on_retry(&self, stage: Stage, attempt: u32, delay: Duration, error: &str) {
        println!(
            "  {} {} attempt {} failed: {} (retrying in {:.1}s)",
            "!".yellow(),
            stage.display_name(),
            attempt,
            error,
            delay.as_secs_f64()
        );
    }

    fn on_outcome(&self, result: &ProcessingResult) {
        println!("  {} {}", "=".cyan(), result.decision);
        println!();
    }
}
