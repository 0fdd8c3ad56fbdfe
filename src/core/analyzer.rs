//! Analyzer trait and common types.

use serde::Serialize;

use super::Result;
use crate::config::Config;
use crate::log::CommitRecord;

/// Trait implemented by all commit-history analyzers.
///
/// Analyzers are folds over the parsed commit slice: they never mutate
/// the records and always return a fresh result value.
pub trait Analyzer: Send + Sync {
    /// The result type produced by this analyzer.
    type Output: Serialize + Send;

    /// Unique identifier for this analyzer.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Run analysis and return results.
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output>;

    /// Configure the analyzer from config.
    fn configure(&mut self, _config: &Config) -> Result<()> {
        Ok(())
    }
}

/// Context shared by all analyzers during analysis.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// Parsed commit records.
    pub commits: &'a [CommitRecord],
    /// Configuration.
    pub config: &'a Config,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context.
    pub fn new(commits: &'a [CommitRecord], config: &'a Config) -> Self {
        Self { commits, config }
    }

    /// Iterate over the commit messages in log order.
    pub fn messages(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.commits.iter().map(|c| c.message.as_str())
    }
}
