//! Source-to-test file association.
//!
//! Name matching always wins: a catalog entry whose file name contains the
//! target's stem (`parser` for `src/parser.py`) is returned directly. Only
//! when no name matches are co-change counts consulted. Catalog order
//! decides between several name matches and between equal coupling sums;
//! callers that need reproducible results should pass a sorted catalog.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::coupling;
use crate::core::{Error, Result};
use crate::output::{Table, Tabular};

/// Ordered list of candidate test files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCatalog {
    files: Vec<String>,
}

impl TestCatalog {
    /// Uses the given paths as-is, in the given order.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Lists files under `dir`, sorted by file name within each directory.
    /// Paths are relative to `dir` with `/` separators. With `tests_only`,
    /// files that don't look like tests are skipped.
    pub fn from_dir(dir: impl AsRef<Path>, tests_only: bool) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable catalog entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if tests_only && !is_test_file(&path) {
                continue;
            }
            files.push(path);
        }

        tracing::debug!("Catalogued {} candidate test files in {}", files.len(), dir.display());
        Ok(Self { files })
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// How an association was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// The test file's name contains the target's stem.
    Name,
    /// The test file co-changed most often with the target.
    Coupling,
}

/// A proposed test file for a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub test_file: String,
    pub strategy: Strategy,
    /// Summed co-change count, for coupling matches.
    pub cochanges: Option<u32>,
}

/// Association result for one target, serializable even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub target: String,
    pub association: Option<Association>,
}

/// Finds the best test file for `target`.
pub fn associate(
    target: &str,
    catalog: &TestCatalog,
    coupling: &coupling::Analysis,
) -> Option<Association> {
    if let Some(found) = match_by_name(target, catalog) {
        return Some(Association {
            test_file: found.to_string(),
            strategy: Strategy::Name,
            cochanges: None,
        });
    }
    match_by_coupling(target, catalog, coupling).map(|(found, count)| Association {
        test_file: found.to_string(),
        strategy: Strategy::Coupling,
        cochanges: Some(count),
    })
}

/// Runs [`associate`] and wraps the outcome in a [`Report`].
pub fn report(target: &str, catalog: &TestCatalog, coupling: &coupling::Analysis) -> Report {
    let association = associate(target, catalog, coupling);
    match &association {
        Some(a) => tracing::info!("Associated {target} with {} by {:?}", a.test_file, a.strategy),
        None => tracing::info!("No test file associated with {target}"),
    }
    Report {
        target: target.to_string(),
        association,
    }
}

/// First catalog entry whose file name contains the target's stem.
pub fn match_by_name<'a>(target: &str, catalog: &'a TestCatalog) -> Option<&'a str> {
    let stem = Path::new(target).file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    catalog
        .files
        .iter()
        .map(String::as_str)
        .find(|candidate| file_name(candidate).contains(stem))
}

/// Catalog entry with the highest summed co-change count with `target`.
/// Ties go to the earlier catalog entry; zero sums never match.
pub fn match_by_coupling<'a>(
    target: &str,
    catalog: &'a TestCatalog,
    coupling: &coupling::Analysis,
) -> Option<(&'a str, u32)> {
    let mut partners: HashMap<&str, u32> = HashMap::new();
    for (other, count) in coupling.pairs_involving(target) {
        *partners.entry(other).or_insert(0) += count;
    }
    if partners.is_empty() {
        return None;
    }

    let mut best: Option<(&'a str, u32)> = None;
    for candidate in catalog.files.iter().map(String::as_str) {
        let total: u32 = partners
            .iter()
            .filter(|(other, _)| refers_to(other, candidate))
            .map(|(_, count)| *count)
            .sum();
        if total > 0 && best.map_or(true, |(_, b)| total > b) {
            best = Some((candidate, total));
        }
    }
    best
}

/// A repository path refers to a catalog entry if they are equal or the
/// entry is a bare file name equal to the path's file name.
fn refers_to(path: &str, entry: &str) -> bool {
    path == entry || (!entry.contains('/') && file_name(path) == entry)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns true if the path looks like a test file.
pub fn is_test_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    let parts: Vec<&str> = lower.split('/').collect();

    // Directory-based patterns
    let dirs = &parts[..parts.len().saturating_sub(1)];
    if dirs
        .iter()
        .any(|part| matches!(*part, "test" | "tests" | "spec" | "specs" | "__tests__"))
    {
        return true;
    }

    // Filename-based patterns
    if let Some(filename) = parts.last() {
        // _test.go, _spec.rb, etc.
        if filename.contains("_test.") || filename.contains("_spec.") {
            return true;
        }
        // test_*.py
        if filename.starts_with("test_") {
            return true;
        }
        // *.test.ts, *.spec.js, etc.
        let dot_parts: Vec<&str> = filename.split('.').collect();
        if dot_parts.len() >= 3 {
            let second_last = dot_parts[dot_parts.len() - 2];
            if second_last == "test" || second_last == "spec" {
                return true;
            }
        }
    }

    false
}

impl Tabular for Report {
    fn tables(&self) -> Vec<Table> {
        let mut table = Table::new(
            format!("Test File for {}", self.target),
            vec!["Test File", "Strategy", "Co-changes"],
        );
        match &self.association {
            Some(a) => {
                let strategy = match a.strategy {
                    Strategy::Name => "name",
                    Strategy::Coupling => "coupling",
                };
                let cochanges = a.cochanges.map_or_else(|| "-".to_string(), |c| c.to_string());
                table.push_row([a.test_file.clone(), strategy.to_string(), cochanges]);
                vec![table]
            }
            None => vec![table.footer("No associated test file found")],
        }
    }
}
