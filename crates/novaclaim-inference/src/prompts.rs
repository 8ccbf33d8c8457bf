//! Prompt builders for structured generation requests.

use novaclaim_core::defaults::CONTENT_EXCERPT_CHARS;
use novaclaim_core::{CorpusStats, KnowledgeEntry};

/// First `CONTENT_EXCERPT_CHARS` characters of `content`.
pub fn content_excerpt(content: &str) -> &str {
    match content.char_indices().nth(CONTENT_EXCERPT_CHARS) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// One-line corpus summary given to the model as comparison context.
pub fn corpus_summary(stats: &CorpusStats) -> String {
    format!(
        "Scanning {} assets: {} Patents, {} Research Papers.",
        stats.total, stats.patents, stats.papers
    )
}

/// Prompt for a full document analysis.
pub fn analysis_prompt(file_name: &str, content: &str, stats: &CorpusStats) -> String {
    format!(
        "Perform Strategic IP Intelligence analysis on: \"{}\".\n\
         Compare against database summary: {}\n\n\
         CONTENT:\n{}\n\n\
         STRICT SCHEMA REQUIRED.",
        file_name,
        corpus_summary(stats),
        content_excerpt(content)
    )
}

/// Prompt for a deep analysis of one knowledge entry.
pub fn deep_analysis_prompt(entry: &KnowledgeEntry) -> String {
    format!(
        "Perform a deep strategic IP analysis on the following asset:\n\
         ID: {}\n\
         TITLE: {}\n\
         ABSTRACT: {}\n\n\
         Provide a novelty score, patentability decision, and specific risk reasonings.",
        entry.id, entry.title, entry.abstract_text
    )
}

/// Prompt for layer-scoped investment recommendations.
pub fn recommendations_prompt(layer: &str, role: &str) -> String {
    format!(
        "Strategist Audit for infrastructure layer: \"{}\" (requested by: {}).\n\
         Return 3 unique strategic investment vectors.",
        layer, role
    )
}

/// Prompt for a layer failure-propagation graph.
pub fn graph_prompt(layer: &str, role: &str) -> String {
    format!(
        "Generate a failure propagation graph for the \"{}\" layer (requested by: {}).\n\
         5 nodes, 4 links.",
        layer, role
    )
}
