//! Ports (interfaces) for external dependencies
//!
//! These traits define the boundaries between the application layer
//! and the infrastructure layer.

pub mod llm_gateway;
pub mod metrics;
pub mod notifier;
pub mod progress;
pub mod stage_client;
pub mod ticket_repository;
pub mod vector_store;
