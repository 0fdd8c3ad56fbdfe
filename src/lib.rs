//! commitlens - commit-history mining library.
//!
//! commitlens reads commit logs exported with `git log` and reports the
//! dominant commit-message keywords, defect-related commit trends per
//! month and per file, file co-change coupling, and the test file most
//! likely associated with a source file.
//!
//! # Log Formats
//!
//! Oneline (`%H%x09%ad%x09%s`), block (`--name-only --format=%H`) and
//! detailed (`--name-only --format=%H%x09%ad%x09%s`).
//!
//! # Example
//!
//! ```no_run
//! use commitlens::analyzers::coupling::Analyzer as CouplingAnalyzer;
//! use commitlens::config::Config;
//! use commitlens::core::{AnalysisContext, Analyzer};
//! use commitlens::log::{read_log, LogFormat};
//!
//! let config = Config::default();
//! let log = read_log("commit_files.txt", LogFormat::Block).unwrap();
//! let ctx = AnalysisContext::new(&log.commits, &config);
//! let analyzer = CouplingAnalyzer::new();
//! let result = analyzer.analyze(&ctx).unwrap();
//! println!("Found {} co-changing pairs", result.summary.total_couplings);
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod core;
pub mod log;
pub mod output;
pub mod report;

pub use core::{AnalysisContext, Analyzer};
