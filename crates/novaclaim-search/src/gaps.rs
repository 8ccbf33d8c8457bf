//! Domain coverage and gap detection.

use std::collections::HashMap;

use tracing::debug;

use novaclaim_core::defaults::{GAP_MEAN_FRACTION, GAP_MIN_THRESHOLD, GAP_REPRESENTATIVE_TERMS};
use novaclaim_core::{DomainInsight, KnowledgeEntry};

use crate::index::KnowledgeIndex;

/// Group the corpus by technology domain and flag sparse domains.
///
/// A domain is a gap when its size is at most
/// `max(2, floor(mean_size * 0.3))`. Domains appear in first-seen order.
pub fn detect_gaps(index: &KnowledgeIndex) -> Vec<DomainInsight> {
    let total = index.len();
    if total == 0 {
        return Vec::new();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&KnowledgeEntry>> = HashMap::new();
    for entry in index.entries() {
        let domain = entry.technology_domain.as_str();
        groups
            .entry(domain)
            .or_insert_with(|| {
                order.push(domain);
                Vec::new()
            })
            .push(entry);
    }

    let mean_size = total as f64 / order.len() as f64;
    let gap_threshold = ((mean_size * GAP_MEAN_FRACTION).floor() as usize).max(GAP_MIN_THRESHOLD);

    let insights: Vec<DomainInsight> = order
        .iter()
        .filter_map(|domain| groups.get(domain).map(|members| (*domain, members)))
        .map(|(domain, members)| {
            let representative_terms = members
                .first()
                .map(|entry| {
                    entry
                        .title
                        .split_whitespace()
                        .take(GAP_REPRESENTATIVE_TERMS)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            DomainInsight {
                domain: domain.to_string(),
                size: members.len(),
                density_score: members.len() as f64 / total as f64,
                is_gap: members.len() <= gap_threshold,
                representative_terms,
            }
        })
        .collect();

    debug!(
        subsystem = "search",
        component = "gap_detection",
        domains = insights.len(),
        gap_threshold,
        gaps = insights.iter().filter(|i| i.is_gap).count(),
        "Gap detection complete"
    );
    insights
}
