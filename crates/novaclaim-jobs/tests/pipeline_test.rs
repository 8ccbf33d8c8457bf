//! Integration tests for the analysis pipeline and status poller.
//!
//! Every test runs on tokio's paused clock, so the stage delays (100ms
//! dispatch, 1500ms extract, 1500ms embed) elapse instantly but in order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;
use uuid::Uuid;

use novaclaim_inference::mock::MockGenerationBackend;
use novaclaim_jobs::{
    AnalysisPipeline, Error, JobPoller, JobStatus, JobStore, ModelTier, PatentableDecision,
    PipelineConfig, PipelineEvent, JOB_NOT_FOUND,
};
use novaclaim_search::KnowledgeIndex;

const ANALYSIS_JSON: &str = r#"{
    "ip_type": "Patent",
    "similarity_score": 0.42,
    "novelty_score": 0.77,
    "patentable_probability": "High",
    "patentable_decision": "YES",
    "innovation_type": "adjacent",
    "summary": "Graphene composite layup for wing spars",
    "strategic_recommendation": "File a continuation",
    "domains": [{
        "name": "Materials",
        "children": [{"name": "Graphene", "size": 12, "maturity": "Emerging", "ipStrength": 0.8}]
    }],
    "projects": [{"id": "P1", "name": "Wing spar", "x": 0.7, "y": 0.4, "z": 0.3, "action": "BUILD"}]
}"#;

fn pipeline_with(backend: &MockGenerationBackend, config: PipelineConfig) -> AnalysisPipeline {
    AnalysisPipeline::new(
        Arc::new(KnowledgeIndex::demo()),
        Arc::new(backend.clone()),
        config,
    )
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

async fn events_for(
    rx: &mut broadcast::Receiver<PipelineEvent>,
    job_id: Uuid,
) -> Vec<PipelineEvent> {
    let mut out = Vec::new();
    loop {
        let event = rx.recv().await.unwrap();
        if event.job_id() != job_id {
            continue;
        }
        let done = matches!(
            event,
            PipelineEvent::JobCompleted { .. } | PipelineEvent::JobFailed { .. }
        );
        out.push(event);
        if done {
            return out;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_new_job_is_queued_first() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    let job = pipeline.get_status(job_id).await;

    assert_eq!(job.id, job_id);
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.progress, 0);
    assert!(job.result.is_none());
    assert!(job.error.is_none());

    sleep(ms(50)).await;
    assert_eq!(pipeline.get_status(job_id).await.status, JobStatus::Queued);
}

#[tokio::test(start_paused = true)]
async fn test_stage_timeline() {
    let backend = MockGenerationBackend::new()
        .with_fixed_response(ANALYSIS_JSON)
        .with_latency_ms(500);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();

    // (elapsed ms, expected status, expected progress)
    let checkpoints = [
        (150, JobStatus::Extracting, 20),
        (1650, JobStatus::Embedding, 50),
        (3150, JobStatus::Analyzing, 80),
        (3650, JobStatus::Completed, 100),
    ];

    let mut elapsed = 0;
    for (at, status, progress) in checkpoints {
        sleep(ms(at - elapsed)).await;
        elapsed = at;
        let job = pipeline.get_status(job_id).await;
        assert_eq!((job.status, job.progress), (status, progress), "at {}ms", at);
    }
}

#[tokio::test(start_paused = true)]
async fn test_progress_events_in_order() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    let events = events_for(&mut rx, job_id).await;

    assert_eq!(
        events,
        vec![
            PipelineEvent::JobQueued {
                job_id,
                file_name: "invention.txt".to_string()
            },
            PipelineEvent::JobProgress {
                job_id,
                status: JobStatus::Extracting,
                percent: 20
            },
            PipelineEvent::JobProgress {
                job_id,
                status: JobStatus::Embedding,
                percent: 50
            },
            PipelineEvent::JobProgress {
                job_id,
                status: JobStatus::Analyzing,
                percent: 80
            },
            PipelineEvent::JobCompleted { job_id },
        ]
    );
    assert_eq!(pipeline.get_status(job_id).await.progress, 100);
}

#[tokio::test(start_paused = true)]
async fn test_graphene_scenario_merges_knowledge_matches() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline
        .submit("wing.txt", "graphene composite aerospace")
        .await
        .unwrap();
    events_for(&mut rx, job_id).await;

    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());

    let result = job.result.unwrap();
    assert_eq!(result.analysis.patentable_decision, PatentableDecision::Yes);
    assert_eq!(
        result.analysis.summary,
        "Graphene composite layup for wing spars"
    );
    assert_eq!(result.top_similar_patents[0].id, "PAT-JP-8812");
    assert_eq!(result.conflicts[0].id, "PAT-JP-8812");
    assert_eq!(result.conflicts[0].similarity, 0.75);
    assert!(result.conflicts.iter().any(|c| c.id == "CPY-CODE-101"));
    assert!(result.analysis.innovation_gaps.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_content_matches_on_file_name() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("quantum", "").await.unwrap();
    events_for(&mut rx, job_id).await;

    let result = pipeline.get_status(job_id).await.result.unwrap();
    let ids: Vec<&str> = result.conflicts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["RES-2024-NATURE", "TM-2024-X-12"]);
    assert!(result.top_similar_patents.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_prompt_carries_file_name_and_corpus_stats() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let content = "z".repeat(6000);
    let job_id = pipeline.submit("invention.txt", &content).await.unwrap();
    events_for(&mut rx, job_id).await;

    let calls = backend.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tier, ModelTier::Analysis);
    assert!(calls[0].prompt.contains("\"invention.txt\""));
    assert!(calls[0]
        .prompt
        .contains("Scanning 9 assets: 3 Patents, 2 Research Papers."));
    assert!(calls[0].prompt.contains(&"z".repeat(4000)));
    assert!(!calls[0].prompt.contains(&"z".repeat(4001)));
}

#[tokio::test(start_paused = true)]
async fn test_demo_fast_path() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline
        .submit("uploads/demo_patent.pdf", "graphene")
        .await
        .unwrap();

    sleep(ms(50)).await;
    assert_eq!(pipeline.get_status(job_id).await.status, JobStatus::Queued);

    sleep(ms(100)).await;
    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);

    let events = events_for(&mut rx, job_id).await;
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], PipelineEvent::JobQueued { .. }));
    assert_eq!(events[1], PipelineEvent::JobCompleted { job_id });

    // The fast path still asks the generation service.
    assert_eq!(backend.call_count(ModelTier::Analysis), 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_demo_marker() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let config = PipelineConfig::default().with_demo_marker("sample.pdf");
    let pipeline = pipeline_with(&backend, config);

    let job_id = pipeline.submit("sample.pdf", "x").await.unwrap();
    sleep(ms(150)).await;
    assert_eq!(pipeline.get_status(job_id).await.status, JobStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_external_failure_fails_job_with_frozen_progress() {
    let backend = MockGenerationBackend::new().with_failure_rate(1.0);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    let events = events_for(&mut rx, job_id).await;

    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress, 80);
    assert!(job.result.is_none());
    let error = job.error.unwrap();
    assert!(error.contains("Simulated failure"), "{}", error);

    assert!(matches!(
        events.last(),
        Some(PipelineEvent::JobFailed { error: e, .. }) if e.contains("Simulated failure")
    ));
}

#[tokio::test(start_paused = true)]
async fn test_demo_failure_keeps_zero_progress() {
    let backend = MockGenerationBackend::new().with_failure_rate(1.0);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let job_id = pipeline.submit("demo_patent.pdf", "").await.unwrap();
    sleep(ms(150)).await;

    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress, 0);
}

#[tokio::test(start_paused = true)]
async fn test_schema_mismatch_fails_job() {
    let backend =
        MockGenerationBackend::new().with_fixed_response(r#"{"summary": "missing fields"}"#);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    events_for(&mut rx, job_id).await;

    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.result.is_none());
    assert!(job.error.unwrap().starts_with("Schema error"));
}

#[tokio::test(start_paused = true)]
async fn test_empty_response_fails_job() {
    let backend = MockGenerationBackend::new().with_fixed_response("");
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    events_for(&mut rx, job_id).await;

    assert_eq!(pipeline.get_status(job_id).await.status, JobStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_fails_job_when_configured() {
    let backend = MockGenerationBackend::new()
        .with_fixed_response(ANALYSIS_JSON)
        .with_latency_ms(60_000);
    let config = PipelineConfig::default().with_analysis_timeout(Duration::from_secs(2));
    let pipeline = pipeline_with(&backend, config);
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    events_for(&mut rx, job_id).await;

    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress, 80);
    assert!(job.error.unwrap().contains("timeout"));
}

#[tokio::test(start_paused = true)]
async fn test_without_timeout_a_hung_call_stays_analyzing() {
    let backend = MockGenerationBackend::new()
        .with_fixed_response(ANALYSIS_JSON)
        .with_latency_ms(3_600_000);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    sleep(Duration::from_secs(600)).await;

    let job = pipeline.get_status(job_id).await;
    assert_eq!(job.status, JobStatus::Analyzing);
    assert_eq!(job.progress, 80);
}

#[tokio::test(start_paused = true)]
async fn test_terminal_snapshots_are_stable() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    events_for(&mut rx, job_id).await;

    let first = pipeline.get_status(job_id).await;
    sleep(Duration::from_secs(30)).await;
    let second = pipeline.get_status(job_id).await;

    assert_eq!(first, second);
    assert!(Arc::ptr_eq(
        first.result.as_ref().unwrap(),
        second.result.as_ref().unwrap()
    ));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_job_is_not_found_snapshot() {
    let backend = MockGenerationBackend::new();
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let id = Uuid::new_v4();
    let job = pipeline.get_status(id).await;
    assert_eq!(job.id, id);
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress, 0);
    assert_eq!(job.error.as_deref(), Some(JOB_NOT_FOUND));
    assert!(job.is_not_found());
    assert_eq!(pipeline.job_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_empty_file_name_rejected() {
    let backend = MockGenerationBackend::new();
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let result = pipeline.submit("  ", "content").await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(pipeline.job_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_jobs_are_independent() {
    let backend = MockGenerationBackend::new()
        .with_fixed_response(ANALYSIS_JSON)
        .with_response_mapping("bad.txt", "not json");
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let good = pipeline.submit("good.txt", "graphene").await.unwrap();
    let bad = pipeline.submit("bad.txt", "graphene").await.unwrap();
    let demo = pipeline.submit("demo_patent.pdf", "graphene").await.unwrap();
    assert_eq!(pipeline.job_count().await, 3);

    let mut finished = 0;
    while finished < 3 {
        match rx.recv().await.unwrap() {
            PipelineEvent::JobCompleted { .. } | PipelineEvent::JobFailed { .. } => finished += 1,
            _ => {}
        }
    }

    assert_eq!(pipeline.get_status(good).await.status, JobStatus::Completed);
    assert_eq!(pipeline.get_status(bad).await.status, JobStatus::Failed);
    assert_eq!(pipeline.get_status(demo).await.status, JobStatus::Completed);
    assert_eq!(pipeline.job_count().await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_store_grows_and_keeps_completed_jobs() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let store = JobStore::new();
    let pipeline = pipeline_with(&backend, PipelineConfig::default()).with_store(store.clone());
    let mut rx = pipeline.events();

    for i in 0..5 {
        let job_id = pipeline
            .submit(&format!("doc-{}.txt", i), "graphene")
            .await
            .unwrap();
        events_for(&mut rx, job_id).await;
        assert_eq!(store.len().await, i + 1);
    }
    assert_eq!(pipeline.job_count().await, 5);
}

#[tokio::test(start_paused = true)]
async fn test_poller_reaches_terminal_snapshot() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    let poller = JobPoller::start(pipeline.clone(), job_id, ms(1000));
    let mut updates = poller.subscribe();

    let mut seen = Vec::new();
    while updates.changed().await.is_ok() {
        if let Some(job) = updates.borrow_and_update().clone() {
            seen.push(job.progress);
        }
    }

    let job = poller.finished().await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(poller.is_finished());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{:?}", seen);
    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&100));
}

#[tokio::test(start_paused = true)]
async fn test_stopping_poller_does_not_cancel_job() {
    let backend = MockGenerationBackend::new().with_fixed_response(ANALYSIS_JSON);
    let pipeline = pipeline_with(&backend, PipelineConfig::default());
    let mut rx = pipeline.events();

    let job_id = pipeline.submit("invention.txt", "graphene").await.unwrap();
    let poller = JobPoller::start(pipeline.clone(), job_id, ms(1000));
    sleep(ms(10)).await;
    assert_eq!(poller.latest().unwrap().status, JobStatus::Queued);

    poller.stop();
    assert!(poller.finished().await.is_none());

    events_for(&mut rx, job_id).await;
    assert_eq!(pipeline.get_status(job_id).await.status, JobStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_poller_on_unknown_job_stops_immediately() {
    let backend = MockGenerationBackend::new();
    let pipeline = pipeline_with(&backend, PipelineConfig::default());

    let poller = JobPoller::start(pipeline, Uuid::new_v4(), ms(1000));
    let job = poller.finished().await.unwrap();
    assert!(job.is_not_found());
}
