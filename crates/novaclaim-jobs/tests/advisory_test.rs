use std::sync::Arc;

use novaclaim_inference::mock::MockGenerationBackend;
use novaclaim_jobs::{
    default_graph, default_recommendations, AdvisoryService, DeepAnalysis, Error, Likelihood,
    ModelTier, PatentableDecision,
};
use novaclaim_search::KnowledgeIndex;

fn service(backend: &MockGenerationBackend) -> AdvisoryService {
    AdvisoryService::new(Arc::new(KnowledgeIndex::demo()), Arc::new(backend.clone()))
}

#[tokio::test]
async fn test_deep_analyze_unknown_id_is_not_found() {
    let backend = MockGenerationBackend::new();
    let result = service(&backend).deep_analyze("PAT-XX-0000").await;

    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(backend.get_calls().is_empty());
}

#[tokio::test]
async fn test_deep_analyze_parses_response() {
    let backend = MockGenerationBackend::new().with_tier_response(
        ModelTier::Advisory,
        r#"{"novelty_score": 0.91, "patentable_decision": "RISKY", "risk_flags": ["Prior art in JP"]}"#,
    );
    let analysis = service(&backend).deep_analyze("PAT-JP-8812").await.unwrap();

    assert_eq!(analysis.novelty_score, Some(0.91));
    assert_eq!(analysis.patentable_decision, Some(PatentableDecision::Risky));
    assert_eq!(analysis.risk_flags, vec!["Prior art in JP".to_string()]);
    assert!(analysis.summary.is_none());

    let calls = backend.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tier, ModelTier::Advisory);
    assert!(calls[0].prompt.contains("ID: PAT-JP-8812"));
    assert!(calls[0]
        .prompt
        .contains("TITLE: Graphene-Reinforced Composite for Aerospace Structural Components"));
}

#[tokio::test]
async fn test_deep_analyze_empty_response_is_empty_analysis() {
    let backend = MockGenerationBackend::new().with_fixed_response("");
    let analysis = service(&backend).deep_analyze("PAT-US-9021").await.unwrap();
    assert!(analysis.is_empty());
}

#[tokio::test]
async fn test_deep_analyze_failure_serves_fallback() {
    let index = KnowledgeIndex::demo();
    let backend = MockGenerationBackend::new().with_failure_rate(1.0);
    let analysis = service(&backend).deep_analyze("RES-2024-NATURE").await.unwrap();

    let entry = index.get("RES-2024-NATURE").unwrap();
    assert_eq!(analysis, DeepAnalysis::fallback(entry));
    assert_eq!(analysis.risk_flags, vec!["High risk category".to_string()]);
    assert!(analysis.novelty_score.is_none());
}

#[tokio::test]
async fn test_deep_analyze_malformed_response_serves_fallback() {
    let backend = MockGenerationBackend::new().with_fixed_response("I cannot help with that.");
    let analysis = service(&backend).deep_analyze("TM-2023-V-99").await.unwrap();
    assert_eq!(
        analysis.strategic_recommendation.as_deref(),
        Some("Automated analysis unavailable for TM-2023-V-99; manual review recommended.")
    );
}

#[tokio::test]
async fn test_recommendations_parse_and_carry_role() {
    let backend = MockGenerationBackend::new().with_tier_response(
        ModelTier::Advisory,
        r#"[
            {"id": "REC-1", "title": "Edge cache tiering", "description": "d1", "potentialImpact": "Medium", "domain": "Network"},
            {"id": "REC-2", "title": "Zero-trust mesh", "description": "d2", "potentialImpact": "High", "domain": "Network"}
        ]"#,
    );
    let ideas = service(&backend).recommendations("Network", "CTO").await;

    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].id, "REC-1");
    assert_eq!(ideas[1].potential_impact, Likelihood::High);

    let prompt = &backend.get_calls()[0].prompt;
    assert!(prompt.contains("\"Network\""));
    assert!(prompt.contains("(requested by: CTO)"));
}

#[tokio::test]
async fn test_recommendations_failure_serves_default() {
    let backend = MockGenerationBackend::new().with_failure_rate(1.0);
    let ideas = service(&backend).recommendations("Storage", "Analyst").await;
    assert_eq!(ideas, default_recommendations("Storage"));
}

#[tokio::test]
async fn test_recommendations_wrong_shape_serves_default() {
    let backend = MockGenerationBackend::new().with_fixed_response(r#"{"id": "REC-1"}"#);
    let ideas = service(&backend).recommendations("Compute", "Analyst").await;
    assert_eq!(ideas[0].id, "REC-DEF-001");
    assert_eq!(ideas[0].title, "Compute Optimization Vector");
}

#[tokio::test]
async fn test_recommendations_empty_response_is_empty_list() {
    let backend = MockGenerationBackend::new().with_fixed_response("");
    let ideas = service(&backend).recommendations("Compute", "Analyst").await;
    assert!(ideas.is_empty());
}

#[tokio::test]
async fn test_dependency_graph_parses_fenced_response() {
    let backend = MockGenerationBackend::new().with_fixed_response(
        "```json\n{\"risk_score\": 42, \"nodes\": [{\"id\": \"a\", \"name\": \"API\", \"val\": 10}], \"links\": []}\n```",
    );
    let graph = service(&backend).dependency_graph("Gateway", "SRE").await;

    assert_eq!(graph.risk_score, 42.0);
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].name, "API");
    assert!(graph.links.is_empty());
}

#[tokio::test]
async fn test_dependency_graph_empty_response_serves_default() {
    let backend = MockGenerationBackend::new().with_fixed_response("");
    let graph = service(&backend).dependency_graph("Gateway", "SRE").await;
    assert_eq!(graph, default_graph());
}

#[tokio::test]
async fn test_dependency_graph_failure_serves_default() {
    let backend = MockGenerationBackend::new().with_failure_rate(1.0);
    let graph = service(&backend).dependency_graph("Gateway", "SRE").await;

    assert_eq!(graph.risk_score, 65.0);
    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(backend.call_count(ModelTier::Advisory), 1);
}
