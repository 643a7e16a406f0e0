//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - domain-level errors
//! - [`parsing::extract_json`] - structured output extraction from model text
//! - [`string::truncate`] - UTF-8 safe truncation used in summaries and log lines

pub mod error;
pub mod parsing;
pub mod string;
