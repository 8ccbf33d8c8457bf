//! # novaclaim-jobs
//!
//! Analysis job pipeline for NovaClaim.
//!
//! This crate provides:
//! - An in-memory job store with a validated status state machine
//! - A multi-stage pipeline that runs one background task per document
//! - Progress notifications via broadcast channels
//! - Consumer-driven status polling
//! - Advisory queries (deep analysis, recommendations, dependency graph)
//!   that degrade to fixed defaults
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use novaclaim_inference::GeminiBackend;
//! use novaclaim_jobs::{AnalysisPipeline, JobPoller, PipelineConfig};
//! use novaclaim_search::KnowledgeIndex;
//!
//! let config = PipelineConfig::from_env();
//! let poll_interval = config.poll_interval;
//! let pipeline = AnalysisPipeline::new(
//!     Arc::new(KnowledgeIndex::demo()),
//!     Arc::new(GeminiBackend::from_env()?),
//!     config,
//! );
//!
//! // Listen for events
//! let mut events = pipeline.events();
//!
//! let job_id = pipeline.submit("battery.txt", "solid-state anode lattice").await?;
//! let poller = JobPoller::start(pipeline.clone(), job_id, poll_interval);
//! let job = poller.finished().await;
//! ```

pub mod advisory;
pub mod pipeline;
pub mod poller;
pub mod store;

// Re-export core types
pub use novaclaim_core::*;

pub use advisory::{default_graph, default_recommendations, AdvisoryService};
pub use pipeline::{AnalysisPipeline, PipelineConfig, PipelineEvent};
pub use poller::{JobPoller, PollHandle};
pub use store::JobStore;
