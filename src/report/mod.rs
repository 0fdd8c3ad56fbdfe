//! Combined report produced by the `all` command.

use serde::{Deserialize, Serialize};

use crate::analyzers::{coupling, defect, keywords};
use crate::config::Config;
use crate::core::{AnalysisContext, Analyzer, Result};
use crate::log::{ParseStats, ParsedLog};
use crate::output::{Table, Tabular};

/// Keyword, defect and coupling results for one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// RFC 3339 time the report was generated.
    pub generated_at: String,
    pub log: ParseStats,
    pub keywords: keywords::Analysis,
    pub defects: defect::Analysis,
    pub coupling: coupling::Analysis,
}

/// Runs every log analyzer over `log`.
///
/// The keyword analyzer runs alongside the defect and coupling analyzers;
/// all three only read the shared record slice.
pub fn run_all(log: &ParsedLog, config: &Config) -> Result<Report> {
    let mut keyword_analyzer = keywords::Analyzer::new();
    keyword_analyzer.configure(config)?;
    let mut defect_analyzer = defect::Analyzer::new();
    defect_analyzer.configure(config)?;
    let mut coupling_analyzer = coupling::Analyzer::new();
    coupling_analyzer.configure(config)?;

    let ctx = AnalysisContext::new(&log.commits, config);
    let (keywords, (defects, coupling)) = rayon::join(
        || keyword_analyzer.analyze(&ctx),
        || {
            rayon::join(
                || defect_analyzer.analyze(&ctx),
                || coupling_analyzer.analyze(&ctx),
            )
        },
    );

    Ok(Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        log: log.stats.clone(),
        keywords: keywords?,
        defects: defects?,
        coupling: coupling?,
    })
}

impl Tabular for Report {
    fn tables(&self) -> Vec<Table> {
        let log = Table::new("Commit Log", vec!["Records", "Skipped Lines", "Ambiguous"])
            .row([
                self.log.records,
                self.log.skipped_lines,
                self.log.ambiguous_boundaries,
            ])
            .footer(format!("Generated at {}", self.generated_at));

        let mut tables = vec![log];
        tables.extend(self.keywords.tables());
        tables.extend(self.defects.tables());
        tables.extend(self.coupling.tables());
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{parse, LogFormat};

    const DETAILED: &str = "\
1111111111111111111111111111111111111111\t2024-01-05\tFix parser crash
src/parser.rs
tests/parser_test.rs
2222222222222222222222222222222222222222\t2024-02-10\tAdd lexer
src/lexer.rs
src/parser.rs
3333333333333333333333333333333333333333\t2024-02-11\tFix lexer bug
src/lexer.rs
src/parser.rs
";

    #[test]
    fn test_run_all() {
        let log = parse(DETAILED, LogFormat::Detailed);
        let report = run_all(&log, &Config::default()).unwrap();

        assert_eq!(report.log.records, 3);
        assert_eq!(report.defects.summary.defect_commits, 2);
        assert_eq!(report.defects.per_month.get("2024-01"), Some(&1));
        assert_eq!(report.defects.per_month.get("2024-02"), Some(&1));
        assert_eq!(report.coupling.couplings[0].file_a, "src/lexer.rs");
        assert_eq!(report.coupling.couplings[0].file_b, "src/parser.rs");
        assert_eq!(report.coupling.couplings[0].cochange_count, 2);
        assert!(report.keywords.keywords.iter().any(|k| k.word == "lexer"));
        assert!(!report.generated_at.is_empty());
    }

    #[test]
    fn test_run_all_respects_config() {
        let log = parse(DETAILED, LogFormat::Detailed);
        let mut config = Config::default();
        config.keywords.top = 1;
        config.coupling.min_cochanges = 2;
        config.defect.keywords = vec!["crash".to_string()];

        let report = run_all(&log, &config).unwrap();
        assert_eq!(report.keywords.keywords.len(), 1);
        assert_eq!(report.coupling.couplings.len(), 1);
        assert_eq!(report.defects.summary.defect_commits, 1);
    }

    #[test]
    fn test_run_all_empty_log() {
        let report = run_all(&ParsedLog::default(), &Config::default()).unwrap();
        assert!(report.keywords.keywords.is_empty());
        assert!(report.defects.per_month.is_empty());
        assert!(report.coupling.couplings.is_empty());
    }

    #[test]
    fn test_report_tables() {
        let log = parse(DETAILED, LogFormat::Detailed);
        let report = run_all(&log, &Config::default()).unwrap();
        let tables = report.tables();
        assert_eq!(tables[0].title, "Commit Log");
        assert_eq!(tables[0].rows[0], vec!["3", "0", "0"]);
        assert_eq!(tables.len(), 5);
    }

    #[test]
    fn test_invalid_exclude_fails() {
        let mut config = Config::default();
        config.exclude_patterns = vec!["a[".to_string()];
        assert!(run_all(&ParsedLog::default(), &config).is_err());
    }
}
