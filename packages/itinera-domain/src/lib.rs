pub mod assemble;
pub mod candidate;
pub mod embedding;
pub mod fallback_plan;
pub mod itinerary;
pub mod query;
pub mod rerank;
pub mod similarity;
pub mod validate;

mod error;

pub use error::{Error, Result};

/// Absolute tolerance used when comparing monetary sums.
pub const COST_TOLERANCE: f64 = 0.01;
