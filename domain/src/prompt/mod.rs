//! Prompt domain
//!
//! Templates and output schemas for the model-assisted parts of the pipeline:
//! decision arbitration and solution adaptation.

mod template;

pub use template::{
    DECISION_TEMPERATURE, PromptTemplate, SOLUTION_TEMPERATURE, missing_required_fields,
};
