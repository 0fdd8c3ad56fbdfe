//! Defect-related commit classification and monthly trends.
//!
//! A commit is defect-related when its lowercased message contains any
//! configured keyword as a substring. Matching is deliberately loose:
//! `fix` also matches `prefix` and `fixture`.
//!
//! Counts are bucketed by the `YYYY-MM` prefix of the commit timestamp,
//! globally and (when the log carries file lists) per changed file.

use std::collections::{BTreeMap, BTreeSet};

use globset::GlobSet;
use serde::{Deserialize, Serialize};

use super::exclude_set;
use crate::config;
use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::log::CommitRecord;
use crate::output::{Table, Tabular};

/// Keywords used when none are configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["fix", "error", "bug", "issue"];

/// Default number of files reported with a monthly series.
pub const DEFAULT_TOP_FILES: usize = 2;

/// Decides whether a commit message describes a defect fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    keywords: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl Classifier {
    /// Keywords are lowercased; empty keywords are dropped since they
    /// would match every message.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        keywords.dedup();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_defect(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.keywords.iter().any(|k| message.contains(k.as_str()))
    }
}

/// Defect analyzer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub classifier: Classifier,
    /// Number of files reported with a monthly series.
    pub top_files: usize,
    /// Files matching these globs get no per-file counts.
    pub exclude: Option<GlobSet>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: Classifier::default(),
            top_files: DEFAULT_TOP_FILES,
            exclude: None,
        }
    }
}

/// Defect trend analyzer.
#[derive(Default)]
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.classifier = Classifier::new(keywords);
        self
    }

    pub fn with_top_files(mut self, top_files: usize) -> Self {
        self.config.top_files = top_files;
        self
    }

    /// Folds the commits into monthly and per-file defect counts.
    pub fn analyze_commits(&self, commits: &[CommitRecord]) -> Analysis {
        let mut analysis = Analysis::default();

        for commit in commits {
            analysis.summary.total_commits += 1;
            if !self.config.classifier.is_defect(&commit.message) {
                continue;
            }
            analysis.summary.defect_commits += 1;

            let month = commit.month();
            *analysis.per_month.entry(month.to_string()).or_insert(0) += 1;

            // Every listed entry counts, repeats included.
            for file in commit
                .changed_files
                .iter()
                .filter(|f| !self.is_excluded(f))
            {
                *analysis.per_file.entry(file.to_string()).or_insert(0) += 1;
                *analysis
                    .per_file_month
                    .entry(file.to_string())
                    .or_default()
                    .entry(month.to_string())
                    .or_insert(0) += 1;
            }
        }

        analysis.summary.months = analysis.per_month.len();
        analysis.summary.files = analysis.per_file.len();
        analysis.summary.defect_rate = if analysis.summary.total_commits == 0 {
            0.0
        } else {
            analysis.summary.defect_commits as f64 / analysis.summary.total_commits as f64
        };
        analysis.top_files = analysis.top_files(self.config.top_files);
        analysis
    }

    fn is_excluded(&self, file: &str) -> bool {
        self.config
            .exclude
            .as_ref()
            .is_some_and(|set| set.is_match(file))
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "defects"
    }

    fn description(&self) -> &'static str {
        "Track defect-related commits per month and per file"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let analysis = self.analyze_commits(ctx.commits);
        tracing::info!(
            "Classified {} of {} commits as defect-related across {} months",
            analysis.summary.defect_commits,
            analysis.summary.total_commits,
            analysis.summary.months
        );
        Ok(analysis)
    }

    fn configure(&mut self, config: &config::Config) -> Result<()> {
        self.config.classifier = Classifier::new(&config.defect.keywords);
        self.config.top_files = config.defect.top_files;
        self.config.exclude = exclude_set(&config.exclude_patterns)?;
        Ok(())
    }
}

/// Defect trend result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Defect commits per month, ascending.
    pub per_month: BTreeMap<String, u32>,
    /// Defect commits per file.
    pub per_file: BTreeMap<String, u32>,
    /// Defect commits per file per month.
    pub per_file_month: BTreeMap<String, BTreeMap<String, u32>>,
    /// Files with the most defect commits.
    pub top_files: Vec<FileDefects>,
    pub summary: Summary,
}

/// One month bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: String,
    pub count: u32,
}

/// A file's defect total with its monthly breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDefects {
    pub file: String,
    pub total: u32,
    pub months: Vec<MonthCount>,
}

/// Zero-filled monthly counts for a set of files over a shared month axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub months: Vec<String>,
    pub series: Vec<FileSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSeries {
    pub file: String,
    /// One count per entry of [`MonthlySeries::months`].
    pub counts: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_commits: usize,
    pub defect_commits: usize,
    /// `defect_commits / total_commits`, 0 for an empty log.
    pub defect_rate: f64,
    /// Number of months with at least one defect commit.
    pub months: usize,
    /// Number of files touched by at least one defect commit.
    pub files: usize,
}

impl Analysis {
    /// Global month buckets in ascending order.
    pub fn months(&self) -> Vec<MonthCount> {
        to_rows(&self.per_month)
    }

    /// The `n` files with the most defect commits (ties by path).
    pub fn top_files(&self, n: usize) -> Vec<FileDefects> {
        let mut files: Vec<(&String, &u32)> = self.per_file.iter().collect();
        files.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        files
            .into_iter()
            .take(n)
            .map(|(file, &total)| FileDefects {
                file: file.clone(),
                total,
                months: self
                    .per_file_month
                    .get(file)
                    .map(to_rows)
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Aligns the given files on the union of their months. Unknown files
    /// get an all-zero series.
    pub fn monthly_series(&self, files: &[&str]) -> MonthlySeries {
        let months: BTreeSet<&String> = files
            .iter()
            .filter_map(|f| self.per_file_month.get(*f))
            .flat_map(|m| m.keys())
            .collect();
        let months: Vec<String> = months.into_iter().cloned().collect();

        let series = files
            .iter()
            .map(|file| {
                let buckets = self.per_file_month.get(*file);
                FileSeries {
                    file: file.to_string(),
                    counts: months
                        .iter()
                        .map(|m| buckets.and_then(|b| b.get(m)).copied().unwrap_or(0))
                        .collect(),
                }
            })
            .collect();

        MonthlySeries { months, series }
    }
}

fn to_rows(buckets: &BTreeMap<String, u32>) -> Vec<MonthCount> {
    buckets
        .iter()
        .map(|(month, &count)| MonthCount {
            month: month.clone(),
            count,
        })
        .collect()
}

impl Tabular for Analysis {
    fn tables(&self) -> Vec<Table> {
        let mut months = Table::new("Defect-Related Commits Per Month", vec!["Month", "Count"]);
        for row in self.months() {
            months.push_row([row.month, row.count.to_string()]);
        }
        let months = months.footer(format!(
            "Total months: {} ({} of {} commits defect-related, {:.1}%)",
            self.summary.months,
            self.summary.defect_commits,
            self.summary.total_commits,
            self.summary.defect_rate * 100.0
        ));

        let mut files = Table::new("Top Files by Defect Commits", vec!["File", "Count", "Months"]);
        for entry in &self.top_files {
            let breakdown: Vec<String> = entry
                .months
                .iter()
                .map(|m| format!("{}:{}", m.month, m.count))
                .collect();
            files.push_row([entry.file.clone(), entry.total.to_string(), breakdown.join(" ")]);
        }

        vec![months, files]
    }
}
