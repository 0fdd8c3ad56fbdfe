//! Commit-message keyword frequency.
//!
//! Messages are lowercased, punctuation other than hyphens becomes
//! whitespace, and the remaining words are counted after stopword
//! removal. There is no stemming: `fix`, `fixes` and `fixed` are
//! distinct keywords.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::stopwords::Stopwords;
use crate::config;
use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::output::{Table, Tabular};

/// Default number of keywords to report.
pub const DEFAULT_TOP: usize = 50;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Keyword analyzer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of keywords to report.
    pub top: usize,
    /// Words to drop.
    pub stopwords: Stopwords,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            stopwords: Stopwords::english(),
        }
    }
}

/// Keyword frequency analyzer.
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

    pub fn with_top(mut self, top: usize) -> Self {
        self.config.top = top;
        self
    }

    pub fn with_stopwords(mut self, stopwords: Stopwords) -> Self {
        self.config.stopwords = stopwords;
        self
    }

    /// Counts keywords across `messages`.
    pub fn analyze_messages<'a, I>(&self, messages: I) -> Analysis
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally = Tally::default();
        let mut message_count = 0;
        for message in messages {
            message_count += 1;
            for token in tokenize(message, &self.config.stopwords) {
                tally.add(token);
            }
        }

        let total_tokens = tally.total;
        let mut keywords = tally.ranked();
        let unique_tokens = keywords.len();
        keywords.truncate(self.config.top);

        Analysis {
            keywords,
            summary: Summary {
                messages: message_count,
                total_tokens,
                unique_tokens,
            },
        }
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "keywords"
    }

    fn description(&self) -> &'static str {
        "Rank the most frequent words in commit messages"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let analysis = self.analyze_messages(ctx.messages());
        tracing::info!(
            "Counted {} tokens ({} unique) across {} messages",
            analysis.summary.total_tokens,
            analysis.summary.unique_tokens,
            analysis.summary.messages
        );
        Ok(analysis)
    }

    fn configure(&mut self, config: &config::Config) -> Result<()> {
        self.config.top = config.keywords.top;
        self.config.stopwords = Stopwords::from_config(&config.keywords)?;
        Ok(())
    }
}

/// Splits a message into lowercase tokens, dropping stopwords.
/// Repeated words are kept.
pub fn tokenize(message: &str, stopwords: &Stopwords) -> Vec<String> {
    let lower = message.to_lowercase();
    NON_WORD
        .replace_all(&lower, " ")
        .split_whitespace()
        .filter(|w| !stopwords.contains(w))
        .map(str::to_string)
        .collect()
}

/// Counts in first-seen order so that ranking ties stay stable.
#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<KeywordCount>,
    total: usize,
}

impl Tally {
    fn add(&mut self, word: String) {
        self.total += 1;
        match self.index.get(&word) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(word.clone(), self.entries.len());
                self.entries.push(KeywordCount { word, count: 1 });
            }
        }
    }

    /// Descending by count; `sort_by` is stable so ties keep first-seen order.
    fn ranked(mut self) -> Vec<KeywordCount> {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries
    }
}

/// Keyword frequency result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Top keywords, most frequent first.
    pub keywords: Vec<KeywordCount>,
    pub summary: Summary,
}

/// A keyword and its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of messages read.
    pub messages: usize,
    /// Tokens kept after stopword removal.
    pub total_tokens: usize,
    /// Distinct tokens kept after stopword removal.
    pub unique_tokens: usize,
}

impl Tabular for Analysis {
    fn tables(&self) -> Vec<Table> {
        let mut table = Table::new("Top Keywords in Commit Messages", vec!["Keyword", "Count"]);
        for kw in &self.keywords {
            table.push_row([kw.word.clone(), kw.count.to_string()]);
        }
        vec![table.footer(format!("Total unique keywords: {}", self.keywords.len()))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_of(analysis: &Analysis, word: &str) -> Option<usize> {
        analysis
            .keywords
            .iter()
            .find(|k| k.word == word)
            .map(|k| k.count)
    }

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        let tokens = tokenize("Fix: crash (in parser)!", &Stopwords::none());
        assert_eq!(tokens, vec!["fix", "crash", "in", "parser"]);
    }

    #[test]
    fn test_tokenize_keeps_hyphens_and_underscores() {
        let tokens = tokenize("Re-enable snake_case check", &Stopwords::none());
        assert_eq!(tokens, vec!["re-enable", "snake_case", "check"]);
    }

    #[test]
    fn test_tokenize_drops_stopwords() {
        let tokens = tokenize("Fix the bug in the parser", &Stopwords::english());
        assert_eq!(tokens, vec!["fix", "bug", "parser"]);
    }

    #[test]
    fn test_tokenize_keeps_repeats() {
        let tokens = tokenize("fix fix fix", &Stopwords::none());
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_tokenize_empty_message() {
        assert!(tokenize("", &Stopwords::none()).is_empty());
        assert!(tokenize("!!! ...", &Stopwords::none()).is_empty());
    }

    #[test]
    fn test_keyword_counts() {
        let analyzer = Analyzer::new().with_stopwords(Stopwords::none());
        let analysis = analyzer.analyze_messages(["Fix bug", "Fix typo", "bug fix"]);
        assert_eq!(count_of(&analysis, "fix"), Some(3));
        assert_eq!(count_of(&analysis, "bug"), Some(2));
        assert_eq!(count_of(&analysis, "typo"), Some(1));
        assert_eq!(analysis.keywords[0].word, "fix");
        assert_eq!(analysis.summary.messages, 3);
        assert_eq!(analysis.summary.total_tokens, 6);
        assert_eq!(analysis.summary.unique_tokens, 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let analyzer = Analyzer::new().with_stopwords(Stopwords::none());
        let analysis = analyzer.analyze_messages(["zeta alpha", "alpha zeta", "mid"]);
        let words: Vec<&str> = analysis.keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_top_truncates() {
        let analyzer = Analyzer::new()
            .with_stopwords(Stopwords::none())
            .with_top(2);
        let analysis = analyzer.analyze_messages(["a b c d", "a b", "a"]);
        assert_eq!(analysis.keywords.len(), 2);
        assert_eq!(analysis.keywords[0], KeywordCount { word: "a".into(), count: 3 });
        assert_eq!(analysis.summary.unique_tokens, 4);
    }

    #[test]
    fn test_top_zero() {
        let analyzer = Analyzer::new().with_top(0);
        let analysis = analyzer.analyze_messages(["fix bug"]);
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let analysis = Analyzer::new().analyze_messages(std::iter::empty());
        assert!(analysis.keywords.is_empty());
        assert_eq!(analysis.summary, Summary::default());
    }

    #[test]
    fn test_configure_from_config() {
        let mut config = config::Config::default();
        config.keywords.top = 7;
        config.keywords.default_stopwords = false;
        let mut analyzer = Analyzer::new();
        analyzer.configure(&config).unwrap();
        assert_eq!(analyzer.config.top, 7);
        assert!(analyzer.config.stopwords.is_empty());
    }

    #[test]
    fn test_table_rows() {
        let analyzer = Analyzer::new().with_stopwords(Stopwords::none());
        let tables = analyzer.analyze_messages(["fix bug", "fix"]).tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0], vec!["fix", "2"]);
        assert_eq!(
            tables[0].footer.as_deref(),
            Some("Total unique keywords: 2")
        );
    }
}
