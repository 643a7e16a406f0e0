//! Application-level configuration.
//!
//! - [`PipelineParams`] - retry, retrieval depth, temperatures, health bound

pub mod pipeline_params;

pub use pipeline_params::PipelineParams;
