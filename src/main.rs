//! commitlens CLI - commit-history mining from exported git logs.

use std::io::{stdout, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commitlens::analyzers::association::{self, TestCatalog};
use commitlens::analyzers::{CouplingAnalyzer, DefectAnalyzer, KeywordAnalyzer};
use commitlens::cli::{AssociateArgs, Cli, Command};
use commitlens::config::Config;
use commitlens::core::{AnalysisContext, Analyzer};
use commitlens::log::{read_log, ParsedLog};
use commitlens::output::Tabular;
use commitlens::report;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(".")?,
    };
    if let Some(log) = &cli.log {
        config.log.path = Some(log.clone());
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Command::Keywords(args) => {
            if let Some(limit) = args.limit {
                config.keywords.top = limit;
            }
            if args.stopwords.is_some() {
                config.keywords.stopwords_file = args.stopwords;
            }
            if args.no_default_stopwords {
                config.keywords.default_stopwords = false;
            }
            let log = load_log(&config)?;
            run_analyzer::<KeywordAnalyzer>(&log, &config)?;
        }
        Command::Defects(args) => {
            if !args.keywords.is_empty() {
                config.defect.keywords = args.keywords;
            }
            if let Some(top_files) = args.top_files {
                config.defect.top_files = top_files;
            }
            let log = load_log(&config)?;
            run_analyzer::<DefectAnalyzer>(&log, &config)?;
        }
        Command::Coupling(args) => {
            if let Some(limit) = args.limit {
                config.coupling.top = limit;
            }
            if let Some(min) = args.min_cochanges {
                config.coupling.min_cochanges = min;
            }
            let log = load_log(&config)?;
            run_analyzer::<CouplingAnalyzer>(&log, &config)?;
        }
        Command::Associate(args) => {
            let log = load_log(&config)?;
            run_associate(args, &log, &config)?;
        }
        Command::All(args) => {
            if let Some(limit) = args.limit {
                config.keywords.top = limit;
                config.coupling.top = limit;
            }
            let log = load_log(&config)?;
            let report = report::run_all(&log, &config)?;
            write_output(&report, &config)?;
        }
    }

    Ok(())
}

fn load_log(config: &Config) -> anyhow::Result<ParsedLog> {
    let Some(path) = &config.log.path else {
        bail!("no commit log given; pass --log or set log.path in commitlens.toml");
    };
    read_log(path, config.log.format)
        .with_context(|| format!("failed to read commit log {}", path.display()))
}

fn run_analyzer<A>(log: &ParsedLog, config: &Config) -> anyhow::Result<()>
where
    A: Analyzer + Default,
    A::Output: Tabular,
{
    let mut analyzer = A::default();
    analyzer.configure(config)?;
    tracing::debug!("Running {}: {}", analyzer.name(), analyzer.description());
    let ctx = AnalysisContext::new(&log.commits, config);
    let result = analyzer.analyze(&ctx)?;
    write_output(&result, config)
}

fn run_associate(args: AssociateArgs, log: &ParsedLog, config: &Config) -> anyhow::Result<()> {
    let catalog = if !args.candidates.is_empty() {
        TestCatalog::from_paths(args.candidates)
    } else {
        let Some(dir) = args.test_dir.or_else(|| config.association.test_dir.clone()) else {
            bail!("no test catalog given; pass --candidate or --test-dir");
        };
        TestCatalog::from_dir(&dir, config.association.tests_only)
            .with_context(|| format!("failed to list test files in {}", dir.display()))?
    };

    let mut coupling = CouplingAnalyzer::default();
    coupling.configure(config)?;
    let coupling = coupling.unlimited().with_min_cochanges(1);
    let ctx = AnalysisContext::new(&log.commits, config);
    let pairs = coupling.analyze(&ctx)?;

    let result = association::report(&args.file, &catalog, &pairs);
    write_output(&result, config)
}

fn write_output<T: Serialize + Tabular>(data: &T, config: &Config) -> anyhow::Result<()> {
    let mut out = stdout().lock();
    config
        .output
        .format
        .write(data, &mut out, config.output.color)?;
    out.flush()?;
    Ok(())
}
