//! Read-only advisory queries backed by the generation service.
//!
//! Unlike the analysis pipeline, these queries serve a fixed default payload
//! when generation fails. Only an unknown record id is reported as an error.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use novaclaim_core::{
    DeepAnalysis, Error, GenerationBackend, GraphData, GraphLink, GraphNode, InnovationIdea,
    Likelihood, ModelTier, Result, StructuredRequest,
};
use novaclaim_inference::{parse_structured, prompts, schema, EmptyShape};
use novaclaim_search::KnowledgeIndex;

/// Risk score of the fallback dependency graph.
pub const DEFAULT_GRAPH_RISK_SCORE: f64 = 65.0;

/// Recommendation served when generation fails.
pub fn default_recommendations(layer: &str) -> Vec<InnovationIdea> {
    vec![InnovationIdea {
        id: "REC-DEF-001".to_string(),
        title: format!("{} Optimization Vector", layer),
        description: format!(
            "Refining systemic inter-dependencies within the {} to maximize throughput.",
            layer
        ),
        potential_impact: Likelihood::High,
        domain: layer.to_string(),
    }]
}

/// Dependency graph served when generation fails.
pub fn default_graph() -> GraphData {
    let node = |id: &str, name: &str, val: f64| GraphNode {
        id: id.to_string(),
        name: name.to_string(),
        val,
    };
    let link = |source: &str, target: &str, value: f64| GraphLink {
        source: source.to_string(),
        target: target.to_string(),
        value,
    };

    GraphData {
        nodes: vec![
            node("1", "Database", 70.0),
            node("2", "Auth", 50.0),
            node("3", "Gateway", 90.0),
            node("4", "Edge", 30.0),
            node("5", "Cache", 60.0),
        ],
        links: vec![
            link("1", "2", 0.5),
            link("2", "3", 0.7),
            link("3", "4", 0.9),
            link("5", "1", 0.2),
        ],
        risk_score: DEFAULT_GRAPH_RISK_SCORE,
    }
}

/// Advisory queries over the knowledge index.
#[derive(Clone)]
pub struct AdvisoryService {
    index: Arc<KnowledgeIndex>,
    backend: Arc<dyn GenerationBackend>,
}

impl AdvisoryService {
    pub fn new(index: Arc<KnowledgeIndex>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { index, backend }
    }

    /// Deep analysis of one knowledge entry.
    ///
    /// Returns `Error::NotFound` for an unknown id. Any generation or parse
    /// failure yields [`DeepAnalysis::fallback`].
    pub async fn deep_analyze(&self, id: &str) -> Result<DeepAnalysis> {
        let entry = self
            .index
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Knowledge entry {}", id)))?;

        let prompt = prompts::deep_analysis_prompt(entry);
        match self
            .query(prompt, schema::deep_analysis_schema(), EmptyShape::Object)
            .await
        {
            Ok(analysis) => Ok(analysis),
            Err(e) => {
                warn!(
                    subsystem = "jobs",
                    component = "advisory",
                    op = "deep_analyze",
                    entry_id = id,
                    error = %e,
                    fallback = true,
                    "Deep analysis failed, serving fallback"
                );
                Ok(DeepAnalysis::fallback(entry))
            }
        }
    }

    /// Strategic investment vectors for an infrastructure layer.
    ///
    /// `role` is only passed through to the prompt as a label.
    pub async fn recommendations(&self, layer: &str, role: &str) -> Vec<InnovationIdea> {
        let prompt = prompts::recommendations_prompt(layer, role);
        self.query(prompt, schema::recommendations_schema(), EmptyShape::Array)
            .await
            .unwrap_or_else(|e| {
                warn!(
                    subsystem = "jobs",
                    component = "advisory",
                    op = "recommendations",
                    layer,
                    error = %e,
                    fallback = true,
                    "Recommendations failed, serving fallback"
                );
                default_recommendations(layer)
            })
    }

    /// Failure-propagation graph for an infrastructure layer.
    pub async fn dependency_graph(&self, layer: &str, role: &str) -> GraphData {
        let prompt = prompts::graph_prompt(layer, role);
        self.query(prompt, schema::graph_schema(), EmptyShape::Object)
            .await
            .unwrap_or_else(|e| {
                warn!(
                    subsystem = "jobs",
                    component = "advisory",
                    op = "dependency_graph",
                    layer,
                    error = %e,
                    fallback = true,
                    "Dependency graph failed, serving fallback"
                );
                default_graph()
            })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: JsonValue,
        empty: EmptyShape,
    ) -> Result<T> {
        let request = StructuredRequest::new(ModelTier::Advisory, prompt, schema);
        let text = self.backend.generate_structured(&request).await?;
        debug!(
            subsystem = "jobs",
            component = "advisory",
            model = self.backend.model_name(ModelTier::Advisory),
            response_len = text.len(),
            "Advisory response received"
        );
        parse_structured(&text, empty)
    }
}
