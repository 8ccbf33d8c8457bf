//! novaclaim: command-line front end for the NovaClaim knowledge index,
//! analysis pipeline and advisory queries.
//!
//! Results are written to stdout as JSON (CSV for `export`); logs go to
//! stderr.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use novaclaim_core::{GenerationBackend, IpType, JobStatus, RiskLevel};
use novaclaim_inference::GeminiBackend;
use novaclaim_jobs::{AdvisoryService, AnalysisPipeline, JobPoller, PipelineConfig};
use novaclaim_search::{
    detect_gaps, explore, export_csv, AdvancedFilter, ExplorerFacet, KnowledgeIndex,
    MatchResult,
};

#[derive(Parser)]
#[command(name = "novaclaim")]
#[command(author, version, about = "Strategic IP intelligence over a knowledge index")]
#[command(propagate_version = true)]
struct Cli {
    /// JSON array of knowledge entries to use instead of the demo corpus
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank knowledge entries against a free-text query
    Search {
        /// Query text; omit to list every entry
        query: Option<String>,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Filter the whole corpus by facet and secondary filters
    Explore {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Export filtered explorer rows as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report per-domain coverage and sparse domains
    Gaps,

    /// Run a document through the analysis pipeline
    Analyze {
        /// Document to analyze
        input: PathBuf,

        /// File name reported to the pipeline (default: the input's file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Deep analysis of one knowledge entry
    DeepAnalyze {
        /// Knowledge entry id (e.g. PAT-US-9021)
        id: String,
    },

    /// Strategic investment vectors for an infrastructure layer
    Recommend {
        layer: String,

        /// Requesting role, passed to the model as a label
        #[arg(short, long, default_value = "Analyst")]
        role: String,
    },

    /// Failure-propagation graph for an infrastructure layer
    Graph {
        layer: String,

        /// Requesting role, passed to the model as a label
        #[arg(short, long, default_value = "Analyst")]
        role: String,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// all, trademark (phonetic), high-similarity (cluster), high-risk (litigation)
    #[arg(short, long, default_value = "all")]
    facet: ExplorerFacet,

    /// Keep rows with this conflict level (Low, Medium, High)
    #[arg(long)]
    risk_level: Option<RiskLevel>,

    /// Keep rows of this IP type
    #[arg(long = "type")]
    ip_type: Option<IpType>,

    /// Minimum similarity as a percentage (80 means 0.80)
    #[arg(long)]
    similarity_threshold: Option<f64>,
}

impl FilterArgs {
    fn advanced(&self) -> AdvancedFilter {
        AdvancedFilter {
            risk_level: self.risk_level,
            ip_type: self.ip_type,
            similarity_threshold: self.similarity_threshold,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Environment variables:
///   LOG_FORMAT - "json" or "text" (default: "text")
///   LOG_ANSI   - "true"/"false" override ANSI colors
///   RUST_LOG   - standard env filter (default: "novaclaim=info")
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "novaclaim=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let index = Arc::new(load_index(cli.corpus.as_deref())?);

    match cli.command {
        Commands::Search { query, limit } => cmd_search(&index, query.as_deref(), limit),
        Commands::Explore { filters } => {
            let rows = explore(&index, filters.facet, &filters.advanced());
            print_json(&rows)
        }
        Commands::Export { filters, output } => {
            let rows = explore(&index, filters.facet, &filters.advanced());
            let csv = export_csv(&rows);
            match output {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), rows = rows.len(), "Exported explorer rows");
                }
                None => println!("{}", csv),
            }
            Ok(())
        }
        Commands::Gaps => print_json(&detect_gaps(&index)),
        Commands::Analyze { input, name } => cmd_analyze(index, &input, name).await,
        Commands::DeepAnalyze { id } => {
            let analysis = advisory(index)?.deep_analyze(&id).await?;
            print_json(&analysis)
        }
        Commands::Recommend { layer, role } => {
            let ideas = advisory(index)?.recommendations(&layer, &role).await;
            print_json(&ideas)
        }
        Commands::Graph { layer, role } => {
            let graph = advisory(index)?.dependency_graph(&layer, &role).await;
            print_json(&graph)
        }
    }
}

fn load_index(corpus: Option<&Path>) -> anyhow::Result<KnowledgeIndex> {
    let Some(path) = corpus else {
        return Ok(KnowledgeIndex::demo());
    };
    let file =
        File::open(path).with_context(|| format!("Failed to open corpus {}", path.display()))?;
    let index = KnowledgeIndex::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load corpus {}", path.display()))?;
    debug!(path = %path.display(), entries = index.len(), "Loaded corpus");
    Ok(index)
}

fn backend() -> anyhow::Result<Arc<dyn GenerationBackend>> {
    let backend = GeminiBackend::from_env().context("Failed to configure Gemini backend")?;
    Ok(Arc::new(backend))
}

fn advisory(index: Arc<KnowledgeIndex>) -> anyhow::Result<AdvisoryService> {
    Ok(AdvisoryService::new(index, backend()?))
}

fn cmd_search(
    index: &KnowledgeIndex,
    query: Option<&str>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let matches = match query {
        Some(query) => index.match_query(query),
        None => index.browse(),
    };
    let rows: Vec<_> = matches
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(MatchResult::to_conflict)
        .collect();
    print_json(&rows)
}

async fn cmd_analyze(
    index: Arc<KnowledgeIndex>,
    input: &Path,
    name: Option<String>,
) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let file_name = name
        .or_else(|| {
            input
                .file_name()
                .and_then(|f| f.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| input.display().to_string());

    let config = PipelineConfig::from_env();
    let poll_interval = config.poll_interval;
    let pipeline = AnalysisPipeline::new(index, backend()?, config);

    let job_id = pipeline.submit(&file_name, &content).await?;
    eprintln!("Submitted job {} for {}", job_id, file_name);

    let poller = JobPoller::start(pipeline, job_id, poll_interval);
    let mut updates = poller.subscribe();
    let mut last_status = None;
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if let Some(job) = snapshot {
            if last_status != Some(job.status) {
                eprintln!("{:>10} {:>3}%", job.status.to_string(), job.progress);
                last_status = Some(job.status);
            }
        }
    }

    let Some(job) = poller.finished().await else {
        bail!("Polling stopped before job {} finished", job_id);
    };
    match (job.status, job.result) {
        (JobStatus::Completed, Some(result)) => print_json(&*result),
        _ => bail!(
            "Analysis failed: {}",
            job.error.unwrap_or_else(|| "unknown error".to_string())
        ),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
