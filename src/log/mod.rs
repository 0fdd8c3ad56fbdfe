//! Commit-log reading and parsing.
//!
//! Logs are plain text exported with `git log`; this crate never talks to
//! a repository itself. See [`LogFormat`] for the accepted layouts.

mod decode;
mod parser;
mod record;

use std::path::Path;

use crate::core::{Error, Result};

pub use decode::decode;
pub use parser::{
    parse, parse_block, parse_detailed, parse_oneline, LogFormat, ParseStats, ParsedLog,
};
pub use record::{is_commit_hash, CommitRecord, HASH_LEN};

/// Reads, decodes and parses the log at `path`.
///
/// Any read or decode failure aborts with an error; no partial results
/// are returned.
pub fn read_log(path: impl AsRef<Path>, format: LogFormat) -> Result<ParsedLog> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io_at(path, e))?;
    let text = decode(path, bytes)?;
    let log = parse(&text, format);

    tracing::info!(
        "Parsed {} commits from {} ({} format, {} lines skipped, {} ambiguous boundaries)",
        log.stats.records,
        path.display(),
        format,
        log.stats.skipped_lines,
        log.stats.ambiguous_boundaries
    );
    Ok(log)
}
