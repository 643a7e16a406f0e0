//! Use cases (application services)
//!
//! - [`resolve_knowledge`] - similar-case retrieval with best-effort synthesis
//! - [`decide`] - override rules, then model-assisted arbitration
//! - [`stages`] - in-process stage clients and the stage registry
//! - [`process_ticket`] - the pipeline orchestrator
//! - [`ticket_query`] / [`health_check`] - read side and reachability

pub mod decide;
pub mod health_check;
pub mod process_ticket;
pub mod resolve_knowledge;
pub(crate) mod shared;
pub mod stages;
pub mod ticket_query;

#[cfg(test)]
pub(crate) mod test_support;
