//! Ticket entities

use super::workflow::WorkflowState;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque ticket identity.
///
/// Persisted tickets carry the datastore's identity; when the datastore is
/// unavailable the orchestrator mints a temporary one (see [`TicketId::temporary`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub const TEMPORARY_PREFIX: &'static str = "TEMP_";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build a temporary identity from a random hex seed.
    ///
    /// Only the first 8 hex characters are kept, upper-cased.
    pub fn temporary(hex_seed: &str) -> Self {
        let suffix: String = hex_seed
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .take(8)
            .collect::<String>()
            .to_uppercase();
        Self(format!("{}{}", Self::TEMPORARY_PREFIX, suffix))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(Self::TEMPORARY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "URGENT" => Ok(Priority::Urgent),
            other => Err(DomainError::unknown("priority", other)),
        }
    }
}

/// A validated ticket submission, before it has an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub customer_id: String,
    pub subject: String,
    pub body: String,
}

impl NewTicket {
    /// Validate a submission. All three fields must contain non-whitespace text.
    pub fn new(
        customer_id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let ticket = Self {
            customer_id: customer_id.into(),
            subject: subject.into(),
            body: body.into(),
        };

        for (field, value) in [
            ("customer_id", &ticket.customer_id),
            ("subject", &ticket.subject),
            ("body", &ticket.body),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidTicket(format!("{} must not be empty", field)));
            }
        }

        Ok(ticket)
    }

    /// The text every analysis stage receives.
    pub fn text(&self) -> String {
        crate::core::string::ticket_text(&self.subject, &self.body)
    }
}

/// A support ticket record.
///
/// Created on submission; the orchestrator mutates `status` after each stage.
/// The core never deletes tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub customer_id: String,
    pub subject: String,
    pub body: String,
    pub status: WorkflowState,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Materialize a new ticket in the initial lifecycle state.
    pub fn open(id: TicketId, submission: NewTicket, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id: submission.customer_id,
            subject: submission.subject,
            body: submission.body,
            status: WorkflowState::initial(),
            priority: Priority::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn text(&self) -> String {
        crate::core::string::ticket_text(&self.subject, &self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_rejects_blank_fields() {
        assert!(NewTicket::new("c-1", "Subject", "Body").is_ok());

        let err = NewTicket::new("c-1", "   ", "Body").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTicket("subject must not be empty".to_string())
        );
        assert!(NewTicket::new("", "Subject", "Body").is_err());
        assert!(NewTicket::new("c-1", "Subject", "").is_err());
    }

    #[test]
    fn test_temporary_id_format() {
        let id = TicketId::temporary("3f2a9c1b-77de-4d21-9a0e-0c7c2f6a1b2c");
        assert_eq!(id.as_str(), "TEMP_3F2A9C1B");
        assert!(id.is_temporary());
        assert!(!TicketId::new("3f2a9c1b").is_temporary());
    }

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(Priority::High.to_string(), "HIGH");
        assert!("SOMEDAY".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_ticket_opens_in_initial_state() {
        let submission = NewTicket::new("c-1", "Charged twice", "Order #123").unwrap();
        let ticket = Ticket::open(TicketId::new("t-1"), submission, Utc::now());
        assert_eq!(ticket.status, WorkflowState::New);
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.text(), "Charged twice\n\nOrder #123");
    }
}
