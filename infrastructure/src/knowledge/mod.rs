//! Knowledge base adapters
//!
//! An in-process [`VectorStore`](triage_application::VectorStore) plus the
//! loader that seeds it with resolved cases.

mod in_memory;
mod seed;

pub use in_memory::InMemoryVectorStore;
pub use seed::{SeedCase, SeedError, load_seed_file, seed_store};
