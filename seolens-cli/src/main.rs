#![deny(missing_docs)]
//! SeoLens command-line interface.
//!
//! Analyses pages, compares a page against a competitor and lists the stored
//! history of both.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use seolens_core::{
    AnalysisReport, Analyzer, ComparisonReport, FetchConfig, HistorySnapshot, HistoryStore,
    JsonFileBackend, PageAddress, PageFetcher, compare_reports, comparison_file_name,
    comparison_share_text, render_analysis_markdown, render_analysis_text,
    render_comparison_markdown, render_comparison_text, render_history_markdown,
    render_history_text, render_json, report_file_name, share_text,
};
#[cfg(not(test))]
use seolens_core::HttpFetcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "seolens", version, about = "SeoLens page quality analyzer")]
struct Cli {
    #[command(flatten)]
    fetch: FetchArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct FetchArgs {
    /// Seconds to wait for a page before falling back to an estimate.
    #[arg(
        long = "timeout",
        env = "SEOLENS_TIMEOUT_SECS",
        default_value_t = 10,
        global = true
    )]
    timeout_secs: u64,
    /// User-Agent header sent when fetching pages.
    #[arg(long, env = "SEOLENS_USER_AGENT", global = true)]
    user_agent: Option<String>,
}

impl FetchArgs {
    fn config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["url", "file"])
))]
struct SourceArgs {
    /// Address of the page to analyze.
    url: Option<String>,
    /// File containing page addresses (one per line).
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct HistoryArgs {
    /// JSON file holding the analysis history.
    #[arg(long, env = "SEOLENS_HISTORY", default_value = "seolens-history.json")]
    history_file: PathBuf,
    /// Do not record this run in the history file.
    #[arg(long)]
    no_history: bool,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
    /// Also export each report as a timestamped JSON file into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Print a one-line share message after the report.
    #[arg(long)]
    share: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one page, or every page listed in a file.
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
        /// Skip fetching and show an estimated preview.
        #[arg(long)]
        offline: bool,
        /// Maximum number of concurrent analyses.
        #[arg(short = 'j', long, default_value_t = 5)]
        concurrency: usize,
        #[command(flatten)]
        history: HistoryArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Compare a page against a competitor.
    Compare {
        /// Address of your page.
        primary: String,
        /// Address of the competitor's page.
        competitor: String,
        /// Skip fetching and compare estimated previews.
        #[arg(long)]
        offline: bool,
        #[command(flatten)]
        history: HistoryArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Show recent analyses and comparisons.
    History {
        /// JSON file holding the analysis history.
        #[arg(long, env = "SEOLENS_HISTORY", default_value = "seolens-history.json")]
        history_file: PathBuf,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    // The blocking HTTP client spins up its own runtime, so it is built before
    // ours starts and dropped after ours shuts down.
    let analyzer = Arc::new(Analyzer::new(HttpFetcher::new(&cli.fetch.config())?));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli.command, analyzer.clone()));
    drop(runtime);
    result
}

#[cfg(test)]
fn main() {}

async fn run<F>(command: Commands, analyzer: Arc<Analyzer<F>>) -> CliResult<()>
where
    F: PageFetcher + Send + Sync + 'static,
{
    match command {
        Commands::Analyze {
            source,
            offline,
            concurrency,
            history,
            report,
        } => {
            let targets = load_targets(&source).await?;
            run_analyze(analyzer, targets, offline, concurrency, &history, &report).await
        }
        Commands::Compare {
            primary,
            competitor,
            offline,
            history,
            report,
        } => run_compare(analyzer, &primary, &competitor, offline, &history, &report).await,
        Commands::History {
            history_file,
            report,
        } => run_history(history_file, &report).await,
    }
}

async fn run_analyze<F>(
    analyzer: Arc<Analyzer<F>>,
    targets: Vec<String>,
    offline: bool,
    concurrency: usize,
    history: &HistoryArgs,
    report: &OutputArgs,
) -> CliResult<()>
where
    F: PageFetcher + Send + Sync + 'static,
{
    let addresses = parse_addresses(&targets)?;
    if addresses.is_empty() {
        println!("No addresses found to analyze.");
        return Ok(());
    }

    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (index, address) in addresses.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let analyzer = analyzer.clone();
        tasks.spawn(async move {
            let _permit = permit;
            (index, analyze_address(analyzer, address, offline).await)
        });
    }

    let mut indexed = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(entry) => indexed.push(entry),
            Err(err) => log::error!("analysis task failed: {err}"),
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    let reports: Vec<AnalysisReport> = indexed.into_iter().map(|(_, report)| report).collect();

    if let Some(dir) = &report.export_dir {
        let millis = chrono::Utc::now().timestamp_millis();
        for analysis in &reports {
            let path = dir.join(report_file_name(analysis, millis));
            write_file(&path, render_json(analysis)?).await?;
        }
    }

    record_history(history, reports.clone(), None).await;
    emit_analysis_reports(&reports, report).await?;

    if report.share {
        for analysis in &reports {
            println!("{}", share_text(analysis));
        }
    }

    Ok(())
}

async fn analyze_address<F>(
    analyzer: Arc<Analyzer<F>>,
    address: PageAddress,
    offline: bool,
) -> AnalysisReport
where
    F: PageFetcher + Send + Sync + 'static,
{
    let fallback = address.clone();
    let estimator = analyzer.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        if offline {
            analyzer.preview(&address)
        } else {
            analyzer.analyze(&address)
        }
    })
    .await;

    match outcome {
        Ok(report) => report,
        Err(err) => {
            log::warn!("analysis of {fallback} failed, using an estimate: {err}");
            estimator.estimate(&fallback)
        }
    }
}

async fn run_compare<F>(
    analyzer: Arc<Analyzer<F>>,
    primary: &str,
    competitor: &str,
    offline: bool,
    history: &HistoryArgs,
    report: &OutputArgs,
) -> CliResult<()>
where
    F: PageFetcher + Send + Sync + 'static,
{
    let primary = PageAddress::parse(primary)?;
    let competitor = PageAddress::parse(competitor)?;

    let comparison = tokio::task::spawn_blocking(move || {
        if offline {
            compare_reports(
                analyzer.preview(&primary),
                analyzer.preview(&competitor),
                chrono::Utc::now().to_rfc3339(),
            )
        } else {
            analyzer.compare(&primary, &competitor)
        }
    })
    .await?;

    if let Some(dir) = &report.export_dir {
        let millis = chrono::Utc::now().timestamp_millis();
        let path = dir.join(comparison_file_name(&comparison, millis));
        write_file(&path, render_json(&comparison)?).await?;
    }

    record_history(history, Vec::new(), Some(comparison.clone())).await;
    emit_comparison_report(&comparison, report).await?;

    if report.share {
        println!("{}", comparison_share_text(&comparison));
    }

    Ok(())
}

async fn run_history(history_file: PathBuf, report: &OutputArgs) -> CliResult<()> {
    let (analyses, comparisons) = tokio::task::spawn_blocking(move || {
        HistoryStore::open(JsonFileBackend::new(history_file))
            .map(|store| (store.analyses().to_vec(), store.comparisons().to_vec()))
    })
    .await??;

    let contents = match report.format {
        OutputFormat::Text => render_history_text(&analyses, &comparisons),
        OutputFormat::Markdown => render_history_markdown(&analyses, &comparisons),
        OutputFormat::Json => render_json(&HistorySnapshot {
            analyses,
            comparisons,
        })?,
    };
    emit_output(report, contents).await
}

/// Record finished work in the history file. Failures are logged and never
/// affect the command's result.
async fn record_history(
    settings: &HistoryArgs,
    analyses: Vec<AnalysisReport>,
    comparison: Option<ComparisonReport>,
) {
    if settings.no_history {
        return;
    }
    let path = settings.history_file.clone();
    let outcome = tokio::task::spawn_blocking(move || -> seolens_core::Result<()> {
        let mut store = HistoryStore::open(JsonFileBackend::new(path))?;
        for analysis in &analyses {
            store.record_analysis(analysis)?;
        }
        if let Some(comparison) = &comparison {
            store.record_comparison(comparison)?;
        }
        Ok(())
    })
    .await;

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::warn!("could not update history: {err}"),
        Err(err) => log::warn!("history task failed: {err}"),
    }
}

async fn load_targets(source: &SourceArgs) -> CliResult<Vec<String>> {
    if let Some(file) = &source.file {
        return load_url_list(file).await;
    }
    if let Some(url) = &source.url {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("url cannot be empty".into());
        }
        return Ok(vec![trimmed.to_string()]);
    }
    Err("no page source provided".into())
}

async fn load_url_list(path: &Path) -> CliResult<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let urls = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(urls)
}

fn parse_addresses(targets: &[String]) -> CliResult<Vec<PageAddress>> {
    targets
        .iter()
        .map(|target| PageAddress::parse(target).map_err(Into::into))
        .collect()
}

async fn emit_analysis_reports(reports: &[AnalysisReport], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => reports
            .iter()
            .map(render_analysis_text)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Markdown => render_analysis_markdown(reports),
        OutputFormat::Json => render_json(reports)?,
    };
    emit_output(output, contents).await
}

async fn emit_comparison_report(report: &ComparisonReport, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_comparison_text(report),
        OutputFormat::Markdown => render_comparison_markdown(report),
        OutputFormat::Json => render_json(report)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        write_file(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

async fn write_file(path: &Path, contents: String) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}
