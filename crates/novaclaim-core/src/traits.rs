//! Core traits for NovaClaim abstractions.
//!
//! These traits define the seams that concrete implementations satisfy,
//! enabling pluggable generation backends and testability.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;

// =============================================================================
// GENERATION TRAITS
// =============================================================================

/// Which model a structured request should run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    /// Full document analysis (the job pipeline).
    Analysis,
    /// Advisory queries: deep analysis, recommendations, graphs.
    Advisory,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Analysis => "analysis",
            ModelTier::Advisory => "advisory",
        }
    }
}

/// A prompt constrained to return JSON matching `schema`.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub tier: ModelTier,
    pub prompt: String,
    pub schema: JsonValue,
}

impl StructuredRequest {
    pub fn new(tier: ModelTier, prompt: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            tier,
            prompt: prompt.into(),
            schema,
        }
    }
}

/// Backend for the external generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate content for a structured request.
    ///
    /// Returns the raw response text, which is expected (but not guaranteed)
    /// to be JSON matching the request schema. Parsing is the caller's job.
    async fn generate_structured(&self, request: &StructuredRequest) -> Result<String>;

    /// Model name used for the given tier.
    fn model_name(&self, tier: ModelTier) -> &str;
}
