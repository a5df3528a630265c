// Iterative CV rewriting against a job posting.
// Every rewrite is re-parsed and re-scored; only strict improvements are kept.

pub mod handlers;
pub mod optimizer;
pub mod prompts;

pub use optimizer::{optimize_cv, OptimizationOptions, OptimizationResult};
