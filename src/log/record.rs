//! Commit records produced by the log parser.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Length of a full commit hash in hex characters.
pub const HASH_LEN: usize = 40;

/// Length of a `YYYY-MM` month key.
const MONTH_LEN: usize = 7;

/// A single commit parsed from log text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full 40-character commit hash.
    pub hash: String,
    /// Commit date as printed in the log. Empty for block-format records.
    pub timestamp: String,
    /// Commit message with its original casing.
    pub message: String,
    /// Files touched by the commit, in log order.
    pub changed_files: Vec<String>,
}

impl CommitRecord {
    /// Creates a record without a file list.
    pub fn new(
        hash: impl Into<String>,
        timestamp: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            timestamp: timestamp.into(),
            message: message.into(),
            changed_files: Vec::new(),
        }
    }

    /// Replaces the changed-file list.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// The `YYYY-MM` bucket of this commit: the first seven characters
    /// of the timestamp (or the whole timestamp if it is shorter).
    pub fn month(&self) -> &str {
        match self.timestamp.char_indices().nth(MONTH_LEN) {
            Some((idx, _)) => &self.timestamp[..idx],
            None => &self.timestamp,
        }
    }

    /// Changed files with duplicates removed, in sorted order.
    pub fn unique_files(&self) -> BTreeSet<&str> {
        self.changed_files.iter().map(String::as_str).collect()
    }
}

/// Returns true if `s` is exactly a 40-character lowercase hex hash.
pub fn is_commit_hash(s: &str) -> bool {
    s.len() == HASH_LEN && is_hex(s.as_bytes())
}

pub(crate) fn is_hex(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
