//! Line-oriented parsers for the supported log layouts.
//!
//! All three layouts share one rule: a line that starts a commit always
//! wins over any other interpretation. A file whose path happens to be a
//! bare 40-character hex string therefore opens a new record; such lines
//! are counted in [`ParseStats::ambiguous_boundaries`] where they can be
//! told apart from real boundaries.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::record::{is_commit_hash, is_hex, CommitRecord, HASH_LEN};

/// Layout of the log text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `git log --format=%H%x09%ad%x09%s`: one commit per line.
    #[default]
    Oneline,
    /// `git log --name-only --format=%H`: a hash line followed by file lines.
    Block,
    /// `git log --name-only --format=%H%x09%ad%x09%s`: a oneline header
    /// followed by file lines.
    Detailed,
}

impl LogFormat {
    /// Whether records in this layout carry a changed-file list.
    pub fn has_files(self) -> bool {
        !matches!(self, Self::Oneline)
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oneline" | "line" => Ok(Self::Oneline),
            "block" | "files" => Ok(Self::Block),
            "detailed" | "full" => Ok(Self::Detailed),
            _ => Err(format!(
                "Unknown log format: {s}. Use 'oneline', 'block', or 'detailed'"
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Oneline => "oneline",
            Self::Block => "block",
            Self::Detailed => "detailed",
        };
        f.write_str(name)
    }
}

/// Diagnostics collected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Number of records produced.
    pub records: usize,
    /// Non-blank lines that matched no grammar and belonged to no record.
    pub skipped_lines: usize,
    /// Commit-start lines that could also have been file entries.
    pub ambiguous_boundaries: usize,
}

/// Parsed records plus parse diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLog {
    pub commits: Vec<CommitRecord>,
    pub stats: ParseStats,
}

impl ParsedLog {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Parses `text` using the given layout.
pub fn parse(text: &str, format: LogFormat) -> ParsedLog {
    match format {
        LogFormat::Oneline => parse_oneline(text),
        LogFormat::Block => parse_block(text),
        LogFormat::Detailed => parse_detailed(text),
    }
}

/// Parses one-commit-per-line logs. Records have no file list.
pub fn parse_oneline(text: &str) -> ParsedLog {
    let mut log = ParsedLog::default();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        match parse_header(line) {
            Some(record) => log.commits.push(record),
            None => {
                tracing::debug!("Skipping malformed log line: {line}");
                log.stats.skipped_lines += 1;
            }
        }
    }
    log.stats.records = log.commits.len();
    log
}

/// Parses hash-then-files logs.
pub fn parse_block(text: &str) -> ParsedLog {
    let mut collector = Collector::default();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if is_commit_hash(line) {
            collector.open(CommitRecord::new(line, "", ""), false);
        } else {
            collector.add_file(line);
        }
    }
    collector.finish()
}

/// Parses header-then-files logs. Bare hash lines are also accepted as
/// headers, but since headers in this layout normally carry a date and a
/// message, a bare hash inside an open file list is counted as ambiguous.
pub fn parse_detailed(text: &str) -> ParsedLog {
    let mut collector = Collector::default();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Some(record) = parse_header(line) {
            collector.open(record, false);
        } else if is_commit_hash(line) {
            let ambiguous = collector.has_files();
            collector.open(CommitRecord::new(line, "", ""), ambiguous);
        } else {
            collector.add_file(line);
        }
    }
    collector.finish()
}

/// Parses `<hash>\t<timestamp>\t<message>`. The message keeps any further
/// tabs; a header without a message gets an empty one.
fn parse_header(line: &str) -> Option<CommitRecord> {
    let bytes = line.as_bytes();
    if bytes.len() <= HASH_LEN || bytes[HASH_LEN] != b'\t' || !is_hex(&bytes[..HASH_LEN]) {
        return None;
    }
    let (hash, rest) = line.split_at(HASH_LEN);
    let rest = &rest[1..];
    let (timestamp, message) = rest.split_once('\t').unwrap_or((rest, ""));
    Some(CommitRecord::new(hash, timestamp, message))
}

/// Accumulates block-style records, flushing the open one on each boundary.
#[derive(Default)]
struct Collector {
    log: ParsedLog,
    open: Option<CommitRecord>,
    seen: HashSet<String>,
}

impl Collector {
    fn open(&mut self, record: CommitRecord, ambiguous: bool) {
        // Hashes are unique within a log; a repeat is most likely a file path.
        let repeated = !self.seen.insert(record.hash.clone());
        if ambiguous || repeated {
            self.mark_ambiguous(&record.hash);
        }
        if let Some(prev) = self.open.replace(record) {
            self.log.commits.push(prev);
        }
    }

    fn add_file(&mut self, line: &str) {
        match self.open.as_mut() {
            Some(record) => record.changed_files.push(line.to_string()),
            None => {
                tracing::debug!("Skipping line outside any commit: {line}");
                self.log.stats.skipped_lines += 1;
            }
        }
    }

    fn has_files(&self) -> bool {
        self.open
            .as_ref()
            .is_some_and(|r| !r.changed_files.is_empty())
    }

    fn mark_ambiguous(&mut self, line: &str) {
        tracing::debug!("Treating hash-like line as a commit boundary: {line}");
        self.log.stats.ambiguous_boundaries += 1;
    }

    fn finish(mut self) -> ParsedLog {
        if let Some(last) = self.open.take() {
            self.log.commits.push(last);
        }
        self.log.stats.records = self.log.commits.len();
        self.log
    }
}
