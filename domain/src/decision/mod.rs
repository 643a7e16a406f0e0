//! Decision rules and escalation context.
//!
//! - [`rules`] - ordered deterministic overrides evaluated before arbitration
//! - [`context::EscalationContext`] - bundle handed to human handlers

pub mod context;
pub mod rules;
