//! Multi-stage analysis pipeline for submitted documents.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use novaclaim_core::defaults::{
    DEMO_MARKER, DISPATCH_DELAY_MS, EMBED_DELAY_MS, EVENT_BUS_CAPACITY, EXTRACT_DELAY_MS,
    POLL_INTERVAL_MS,
};
use novaclaim_core::{
    AnalysisJob, AnalysisResult, Error, GeneratedAnalysis, GenerationBackend, JobStatus,
    ModelTier, Result, StructuredRequest,
};
use novaclaim_inference::{parse_structured, prompts, schema, EmptyShape};
use novaclaim_search::KnowledgeIndex;

use crate::store::JobStore;

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Wait between registration and the first transition.
    pub dispatch_delay: Duration,
    /// Simulated extraction stage latency.
    pub extract_delay: Duration,
    /// Simulated embedding stage latency.
    pub embed_delay: Duration,
    /// Upper bound on the generation call. `None` waits indefinitely.
    pub analysis_timeout: Option<Duration>,
    /// File name fragment that selects the demo fast path.
    pub demo_marker: String,
    /// Suggested interval for status polling.
    pub poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dispatch_delay: Duration::from_millis(DISPATCH_DELAY_MS),
            extract_delay: Duration::from_millis(EXTRACT_DELAY_MS),
            embed_delay: Duration::from_millis(EMBED_DELAY_MS),
            analysis_timeout: None,
            demo_marker: DEMO_MARKER.to_string(),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `ANALYSIS_DISPATCH_DELAY_MS` | `100` | Delay before the first transition |
    /// | `ANALYSIS_EXTRACT_DELAY_MS` | `1500` | Extraction stage latency |
    /// | `ANALYSIS_EMBED_DELAY_MS` | `1500` | Embedding stage latency |
    /// | `ANALYSIS_TIMEOUT_SECS` | unset | Generation call timeout |
    /// | `ANALYSIS_DEMO_MARKER` | `demo_patent.pdf` | Demo fast-path file name fragment |
    /// | `ANALYSIS_POLL_INTERVAL_MS` | `1000` | Status poll interval |
    pub fn from_env() -> Self {
        fn millis(var: &str, default: u64) -> Duration {
            Duration::from_millis(
                std::env::var(var)
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(default),
            )
        }

        let analysis_timeout = std::env::var("ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let demo_marker = std::env::var("ANALYSIS_DEMO_MARKER")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEMO_MARKER.to_string());

        Self {
            dispatch_delay: millis("ANALYSIS_DISPATCH_DELAY_MS", DISPATCH_DELAY_MS),
            extract_delay: millis("ANALYSIS_EXTRACT_DELAY_MS", EXTRACT_DELAY_MS),
            embed_delay: millis("ANALYSIS_EMBED_DELAY_MS", EMBED_DELAY_MS),
            analysis_timeout,
            demo_marker,
            poll_interval: millis("ANALYSIS_POLL_INTERVAL_MS", POLL_INTERVAL_MS),
        }
    }

    pub fn with_dispatch_delay(mut self, delay: Duration) -> Self {
        self.dispatch_delay = delay;
        self
    }

    /// Set both simulated stage latencies.
    pub fn with_stage_delays(mut self, extract: Duration, embed: Duration) -> Self {
        self.extract_delay = extract;
        self.embed_delay = embed;
        self
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = Some(timeout);
        self
    }

    pub fn with_demo_marker(mut self, marker: impl Into<String>) -> Self {
        self.demo_marker = marker.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Event emitted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A job was registered.
    JobQueued { job_id: Uuid, file_name: String },
    /// A job entered a new non-terminal stage.
    JobProgress {
        job_id: Uuid,
        status: JobStatus,
        percent: u8,
    },
    /// A job completed successfully.
    JobCompleted { job_id: Uuid },
    /// A job failed.
    JobFailed { job_id: Uuid, error: String },
}

impl PipelineEvent {
    pub fn job_id(&self) -> Uuid {
        match self {
            PipelineEvent::JobQueued { job_id, .. }
            | PipelineEvent::JobProgress { job_id, .. }
            | PipelineEvent::JobCompleted { job_id }
            | PipelineEvent::JobFailed { job_id, .. } => *job_id,
        }
    }
}

/// Runs one background task per submitted document.
///
/// Clones share the store, backend and event channel.
#[derive(Clone)]
pub struct AnalysisPipeline {
    index: Arc<KnowledgeIndex>,
    backend: Arc<dyn GenerationBackend>,
    config: Arc<PipelineConfig>,
    store: JobStore,
    event_tx: broadcast::Sender<PipelineEvent>,
}

impl AnalysisPipeline {
    pub fn new(
        index: Arc<KnowledgeIndex>,
        backend: Arc<dyn GenerationBackend>,
        config: PipelineConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            index,
            backend,
            config: Arc::new(config),
            store: JobStore::new(),
            event_tx,
        }
    }

    /// Use an existing store instead of a fresh one.
    pub fn with_store(mut self, store: JobStore) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Get a receiver for pipeline events.
    pub fn events(&self) -> broadcast::Receiver<PipelineEvent> {
        self.event_tx.subscribe()
    }

    /// Register a job and start processing it in the background.
    ///
    /// Returns as soon as the QUEUED record exists; the returned id can be
    /// polled with [`get_status`](Self::get_status).
    pub async fn submit(&self, file_name: &str, content: &str) -> Result<Uuid> {
        if file_name.trim().is_empty() {
            return Err(Error::InvalidInput("File name must not be empty".into()));
        }

        let job = self.store.create(file_name).await;
        let job_id = job.id;
        let demo = file_name.contains(self.config.demo_marker.as_str());

        info!(
            subsystem = "jobs",
            component = "pipeline",
            op = "submit",
            %job_id,
            file_name,
            content_len = content.len(),
            demo,
            "Analysis job submitted"
        );

        let _ = self.event_tx.send(PipelineEvent::JobQueued {
            job_id,
            file_name: file_name.to_string(),
        });

        let runner = self.clone();
        let file_name = file_name.to_string();
        let content = content.to_string();
        tokio::spawn(async move {
            runner.run_job(job_id, file_name, content, demo).await;
        });

        Ok(job_id)
    }

    /// Current snapshot of a job, or a FAILED "Job not found" record.
    pub async fn get_status(&self, job_id: Uuid) -> AnalysisJob {
        match self.store.get(job_id).await {
            Some(job) => job,
            None => {
                debug!(%job_id, "Status requested for unknown job");
                AnalysisJob::not_found(job_id)
            }
        }
    }

    /// Number of jobs ever submitted.
    pub async fn job_count(&self) -> usize {
        self.store.len().await
    }

    async fn run_job(&self, job_id: Uuid, file_name: String, content: String, demo: bool) {
        let start = Instant::now();
        sleep(self.config.dispatch_delay).await;

        match self.execute(job_id, &file_name, &content, demo).await {
            Ok(result) => match self.store.complete(job_id, result).await {
                Ok(_) => {
                    info!(
                        subsystem = "jobs",
                        component = "pipeline",
                        %job_id,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Analysis job completed"
                    );
                    let _ = self.event_tx.send(PipelineEvent::JobCompleted { job_id });
                }
                Err(e) => error!(error = %e, %job_id, "Failed to mark job as completed"),
            },
            Err(cause) => {
                let message = cause.to_string();
                match self.store.fail(job_id, message.clone()).await {
                    Ok(job) => {
                        warn!(
                            subsystem = "jobs",
                            component = "pipeline",
                            %job_id,
                            progress = job.progress,
                            error = %message,
                            duration_ms = start.elapsed().as_millis() as u64,
                            "Analysis job failed"
                        );
                        let _ = self.event_tx.send(PipelineEvent::JobFailed {
                            job_id,
                            error: message,
                        });
                    }
                    Err(e) => error!(error = %e, %job_id, "Failed to mark job as failed"),
                }
            }
        }
    }

    async fn execute(
        &self,
        job_id: Uuid,
        file_name: &str,
        content: &str,
        demo: bool,
    ) -> Result<AnalysisResult> {
        if !demo {
            self.transition(job_id, JobStatus::Extracting).await?;
            sleep(self.config.extract_delay).await;
            self.transition(job_id, JobStatus::Embedding).await?;
            sleep(self.config.embed_delay).await;
            self.transition(job_id, JobStatus::Analyzing).await?;
        }

        let analysis = match self.config.analysis_timeout {
            Some(limit) => tokio::time::timeout(limit, self.analyze(file_name, content))
                .await
                .map_err(|_| {
                    Error::Inference(format!(
                        "Analysis exceeded timeout of {}ms",
                        limit.as_millis()
                    ))
                })??,
            None => self.analyze(file_name, content).await?,
        };

        let query = if content.is_empty() { file_name } else { content };
        let matches = self.index.internal_matches(query);
        debug!(
            %job_id,
            conflicts = matches.conflicts.len(),
            patents = matches.patents.len(),
            "Merged knowledge matches"
        );

        Ok(AnalysisResult {
            analysis,
            top_similar_patents: matches.patents,
            conflicts: matches.conflicts,
        })
    }

    async fn analyze(&self, file_name: &str, content: &str) -> Result<GeneratedAnalysis> {
        let prompt = prompts::analysis_prompt(file_name, content, &self.index.stats());
        let request = StructuredRequest::new(ModelTier::Analysis, prompt, schema::analysis_schema());
        let text = self.backend.generate_structured(&request).await?;
        parse_structured(&text, EmptyShape::Object)
    }

    async fn transition(&self, job_id: Uuid, status: JobStatus) -> Result<()> {
        let job = self.store.advance(job_id, status).await?;
        debug!(%job_id, status = %job.status, progress = job.progress, "Job stage transition");
        let _ = self.event_tx.send(PipelineEvent::JobProgress {
            job_id,
            status: job.status,
            percent: job.progress,
        });
        Ok(())
    }
}
