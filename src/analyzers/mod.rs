//! Commit-history analyzers.

pub mod association;
pub mod coupling;
pub mod defect;
pub mod keywords;
pub mod stopwords;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::core::{Error, Result};

// Re-export analyzer types for convenience
pub use coupling::Analyzer as CouplingAnalyzer;
pub use defect::Analyzer as DefectAnalyzer;
pub use keywords::Analyzer as KeywordAnalyzer;

/// Compiles exclude globs; `None` when there are no patterns.
pub fn exclude_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("invalid exclude pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| Error::config(format!("invalid exclude patterns: {e}")))?;
    Ok(Some(set))
}
