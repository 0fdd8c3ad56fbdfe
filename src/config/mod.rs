//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::analyzers::{coupling, defect, keywords};
use crate::core::{Error, Result};
use crate::log::LogFormat;
use crate::output::Format;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File paths matching these globs are ignored by file-based analyses.
    #[serde(rename = "exclude")]
    pub exclude_patterns: Vec<String>,
    /// Input log configuration.
    pub log: LogConfig,
    /// Keyword frequency configuration.
    pub keywords: KeywordsConfig,
    /// Defect classification configuration.
    pub defect: DefectConfig,
    /// Co-change coupling configuration.
    pub coupling: CouplingConfig,
    /// Test-file association configuration.
    pub association: AssociationConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config` flags.
    /// Env vars with `COMMITLENS_` prefix override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file_exact(path))
            .merge(Env::prefixed("COMMITLENS_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))
    }

    /// Load configuration from directory, looking for commitlens.toml or
    /// .commitlens/commitlens.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join("commitlens.toml")))
            .merge(Toml::file(dir.join(".commitlens/commitlens.toml")))
            .merge(Env::prefixed("COMMITLENS_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))
    }

    /// Create default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Input log configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Path of the exported log.
    pub path: Option<PathBuf>,
    /// Layout of the exported log.
    pub format: LogFormat,
}

/// Keyword analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordsConfig {
    /// Number of keywords to report.
    pub top: usize,
    /// Include the built-in English stopword list.
    pub default_stopwords: bool,
    /// Additional stopwords.
    pub stopwords: Vec<String>,
    /// File with one stopword per line.
    pub stopwords_file: Option<PathBuf>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            top: keywords::DEFAULT_TOP,
            default_stopwords: true,
            stopwords: Vec::new(),
            stopwords_file: None,
        }
    }
}

/// Defect classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectConfig {
    /// Substrings marking a commit message as defect-related.
    pub keywords: Vec<String>,
    /// Number of files to report with monthly series.
    pub top_files: usize,
}

impl Default for DefectConfig {
    fn default() -> Self {
        Self {
            keywords: defect::DEFAULT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            top_files: defect::DEFAULT_TOP_FILES,
        }
    }
}

/// Co-change coupling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    /// Number of pairs to report.
    pub top: usize,
    /// Minimum co-change count to report.
    pub min_cochanges: u32,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            top: coupling::DEFAULT_TOP,
            min_cochanges: coupling::DEFAULT_MIN_COCHANGES,
        }
    }
}

/// Test-file association configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Directory holding candidate test files.
    pub test_dir: Option<PathBuf>,
    /// Only catalog files that look like tests.
    pub tests_only: bool,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            test_dir: None,
            tests_only: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: Format,
    /// Color output.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            color: true,
        }
    }
}
