//! Core types and traits for commit-history analysis.

mod analyzer;
mod error;

pub use analyzer::{AnalysisContext, Analyzer};
pub use error::{Error, Result};
