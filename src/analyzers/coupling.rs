//! File co-change coupling.
//!
//! Counts, for every unordered pair of files touched by the same commit,
//! how many commits touch both. Files are deduplicated and sorted per
//! commit, so each pair is generated once in canonical `(a, b)` order with
//! `a < b`.
//!
//! # Coupling Strength
//!
//! Uses a symmetric formula: `cochanges / max(commits_a, commits_b)`
//! - 0.5 threshold for "strong" coupling is a heuristic
//!
//! Pair generation is quadratic in the number of files per commit; very
//! large commits (mass renames, reformatting) dominate the running time.

use std::collections::HashMap;

use globset::GlobSet;
use serde::{Deserialize, Serialize};

use super::exclude_set;
use crate::config;
use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::log::CommitRecord;
use crate::output::{Table, Tabular};

/// Default number of pairs to report.
pub const DEFAULT_TOP: usize = 10;

/// Default minimum number of co-changes to report a pair.
pub const DEFAULT_MIN_COCHANGES: u32 = 1;

/// Threshold for considering coupling "strong" (>= 0.5).
pub const STRONG_COUPLING_THRESHOLD: f64 = 0.5;

/// Coupling analyzer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of pairs to keep; `None` keeps the full ranking.
    pub top: Option<usize>,
    /// Minimum co-change count to report.
    pub min_cochanges: u32,
    /// Files matching these globs are ignored.
    pub exclude: Option<GlobSet>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top: Some(DEFAULT_TOP),
            min_cochanges: DEFAULT_MIN_COCHANGES,
            exclude: None,
        }
    }
}

/// Co-change coupling analyzer.
#[derive(Default)]
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Keeps only the `top` highest-ranked pairs.
    pub fn with_top(mut self, top: usize) -> Self {
        self.config.top = Some(top);
        self
    }

    /// Keeps the full ranking.
    pub fn unlimited(mut self) -> Self {
        self.config.top = None;
        self
    }

    pub fn with_min_cochanges(mut self, min: u32) -> Self {
        self.config.min_cochanges = min;
        self
    }

    /// Counts co-changes across `commits` and ranks the pairs.
    pub fn analyze_commits(&self, commits: &[CommitRecord]) -> Analysis {
        let counts = count_pairs(commits, self.config.exclude.as_ref());
        let total_files = counts.file_commits.len();

        let mut couplings: Vec<FileCoupling> = counts
            .pairs
            .into_iter()
            .filter(|(_, count)| *count >= self.config.min_cochanges)
            .map(|(pair, cochange_count)| {
                let commits_a = counts.file_commits.get(&pair.a).copied().unwrap_or(0);
                let commits_b = counts.file_commits.get(&pair.b).copied().unwrap_or(0);
                FileCoupling {
                    coupling_strength: calculate_coupling_strength(
                        cochange_count,
                        commits_a,
                        commits_b,
                    ),
                    file_a: pair.a,
                    file_b: pair.b,
                    cochange_count,
                    commits_a,
                    commits_b,
                }
            })
            .collect();

        rank(&mut couplings);
        let summary = calculate_summary(&couplings, total_files);
        if let Some(top) = self.config.top {
            couplings.truncate(top);
        }

        Analysis { couplings, summary }
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "coupling"
    }

    fn description(&self) -> &'static str {
        "Find files that change together"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let analysis = self.analyze_commits(ctx.commits);
        tracing::info!(
            "Found {} co-changing pairs across {} files",
            analysis.summary.total_couplings,
            analysis.summary.total_files_analyzed
        );
        Ok(analysis)
    }

    fn configure(&mut self, config: &config::Config) -> Result<()> {
        self.config.top = Some(config.coupling.top);
        self.config.min_cochanges = config.coupling.min_cochanges;
        self.config.exclude = exclude_set(&config.exclude_patterns)?;
        Ok(())
    }
}

/// Represents an unordered pair of files (normalized alphabetically).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilePair {
    pub a: String,
    pub b: String,
}

impl FilePair {
    /// Creates a normalized file pair (alphabetically ordered).
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                a: a.to_string(),
                b: b.to_string(),
            }
        } else {
            Self {
                a: b.to_string(),
                b: a.to_string(),
            }
        }
    }
}

/// Raw co-change and per-file commit counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairCounts {
    pub pairs: HashMap<FilePair, u32>,
    pub file_commits: HashMap<String, u32>,
}

/// Counts co-changes. Duplicate files within a commit count once.
pub fn count_pairs(commits: &[CommitRecord], exclude: Option<&GlobSet>) -> PairCounts {
    let mut counts = PairCounts::default();

    for commit in commits {
        let files: Vec<&str> = commit
            .unique_files()
            .into_iter()
            .filter(|f| exclude.map_or(true, |set| !set.is_match(f)))
            .collect();

        for file in &files {
            *counts.file_commits.entry(file.to_string()).or_insert(0) += 1;
        }

        // `files` is sorted, so (files[i], files[j]) with i < j is canonical.
        for i in 0..files.len() {
            for j in (i + 1)..files.len() {
                let pair = FilePair {
                    a: files[i].to_string(),
                    b: files[j].to_string(),
                };
                *counts.pairs.entry(pair).or_insert(0) += 1;
            }
        }
    }

    counts
}

/// Descending by co-change count, ties by the pair's lexicographic order.
fn rank(couplings: &mut [FileCoupling]) {
    couplings.sort_by(|x, y| {
        y.cochange_count
            .cmp(&x.cochange_count)
            .then_with(|| x.file_a.cmp(&y.file_a))
            .then_with(|| x.file_b.cmp(&y.file_b))
    });
}

/// Calculates the coupling strength between two files.
/// Strength = cochanges / max(commits_a, commits_b), capped at 1.0.
pub fn calculate_coupling_strength(cochanges: u32, commits_a: u32, commits_b: u32) -> f64 {
    let max_commits = commits_a.max(commits_b);
    if max_commits == 0 {
        return 0.0;
    }
    let strength = f64::from(cochanges) / f64::from(max_commits);
    strength.min(1.0)
}

/// Calculates summary statistics from couplings.
fn calculate_summary(couplings: &[FileCoupling], total_files: usize) -> Summary {
    if couplings.is_empty() {
        return Summary {
            total_files_analyzed: total_files,
            ..Summary::default()
        };
    }

    let mut sum = 0.0;
    let mut max = 0.0_f64;
    let mut strong_count = 0;
    for c in couplings {
        sum += c.coupling_strength;
        max = max.max(c.coupling_strength);
        if c.coupling_strength >= STRONG_COUPLING_THRESHOLD {
            strong_count += 1;
        }
    }

    Summary {
        total_couplings: couplings.len(),
        strong_couplings: strong_count,
        avg_coupling_strength: sum / couplings.len() as f64,
        max_coupling_strength: max,
        total_files_analyzed: total_files,
    }
}

/// Coupling analysis result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// File couplings, most co-changes first.
    pub couplings: Vec<FileCoupling>,
    /// Summary statistics over all pairs, before truncation.
    pub summary: Summary,
}

impl Analysis {
    /// The `n` highest-ranked pairs.
    pub fn top(&self, n: usize) -> &[FileCoupling] {
        &self.couplings[..n.min(self.couplings.len())]
    }

    /// Co-change count for a pair, in either order.
    pub fn cochanges(&self, a: &str, b: &str) -> u32 {
        let pair = FilePair::new(a, b);
        self.couplings
            .iter()
            .find(|c| c.file_a == pair.a && c.file_b == pair.b)
            .map_or(0, |c| c.cochange_count)
    }

    /// `(other file, co-change count)` for every pair containing `file`.
    pub fn pairs_involving<'a>(&'a self, file: &'a str) -> impl Iterator<Item = (&'a str, u32)> + 'a {
        self.couplings.iter().filter_map(move |c| {
            if c.file_a == file {
                Some((c.file_b.as_str(), c.cochange_count))
            } else if c.file_b == file {
                Some((c.file_a.as_str(), c.cochange_count))
            } else {
                None
            }
        })
    }
}

/// Represents the co-change coupling between two files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoupling {
    /// First file in the pair (lexicographically smaller).
    pub file_a: String,
    /// Second file in the pair.
    pub file_b: String,
    /// Number of commits touching both files.
    pub cochange_count: u32,
    /// Coupling strength (0.0 - 1.0).
    pub coupling_strength: f64,
    /// Total commits touching file_a.
    pub commits_a: u32,
    /// Total commits touching file_b.
    pub commits_b: u32,
}

/// Aggregate statistics for coupling analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total number of file pairs found.
    pub total_couplings: usize,
    /// Number of strong couplings (strength >= 0.5).
    pub strong_couplings: usize,
    /// Average coupling strength across all pairs.
    pub avg_coupling_strength: f64,
    /// Maximum coupling strength found.
    pub max_coupling_strength: f64,
    /// Total number of files analyzed.
    pub total_files_analyzed: usize,
}

impl Tabular for Analysis {
    fn tables(&self) -> Vec<Table> {
        let mut table = Table::new(
            "Files That Change Together",
            vec!["File A", "File B", "Co-changes", "Strength"],
        );
        for c in &self.couplings {
            table.push_row([
                c.file_a.clone(),
                c.file_b.clone(),
                c.cochange_count.to_string(),
                format!("{:.2}", c.coupling_strength),
            ]);
        }
        vec![table.footer(format!(
            "Total pairs: {} ({} strong) across {} files",
            self.summary.total_couplings,
            self.summary.strong_couplings,
            self.summary.total_files_analyzed
        ))]
    }
}
