//! Explorer facets and advanced filters over conflict rows.
//!
//! Every filter is a pure predicate; they are AND-composed, so the order in
//! which they run never changes the final set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use novaclaim_core::defaults::HIGH_SIMILARITY;
use novaclaim_core::{ConflictDetail, Error, IpType, RiskLevel};

use crate::index::{KnowledgeIndex, MatchResult};

/// Primary explorer facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorerFacet {
    /// No facet restriction.
    #[default]
    All,
    /// Trademarks only.
    #[serde(alias = "phonetic")]
    Trademark,
    /// Similarity strictly above 0.85.
    #[serde(alias = "cluster")]
    HighSimilarity,
    /// High-risk conflicts only.
    #[serde(alias = "litigation")]
    HighRisk,
}

impl ExplorerFacet {
    pub fn accepts(&self, row: &ConflictDetail) -> bool {
        match self {
            ExplorerFacet::All => true,
            ExplorerFacet::Trademark => row.ip_type == IpType::Trademark,
            ExplorerFacet::HighSimilarity => row.similarity > HIGH_SIMILARITY,
            ExplorerFacet::HighRisk => row.conflict_level == RiskLevel::High,
        }
    }
}

impl std::str::FromStr for ExplorerFacet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(ExplorerFacet::All),
            "trademark" | "phonetic" => Ok(ExplorerFacet::Trademark),
            "high_similarity" | "cluster" => Ok(ExplorerFacet::HighSimilarity),
            "high_risk" | "litigation" => Ok(ExplorerFacet::HighRisk),
            _ => Err(Error::InvalidInput(format!("Unknown explorer facet: {}", s))),
        }
    }
}

/// Optional secondary filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilter {
    #[serde(default, rename = "riskLevel")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, rename = "type")]
    pub ip_type: Option<IpType>,
    /// Minimum similarity as a percentage (80 means 0.80).
    #[serde(default, rename = "similarityThreshold")]
    pub similarity_threshold: Option<f64>,
}

impl AdvancedFilter {
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }

    pub fn with_type(mut self, ip_type: IpType) -> Self {
        self.ip_type = Some(ip_type);
        self
    }

    pub fn with_similarity_threshold(mut self, percent: f64) -> Self {
        self.similarity_threshold = Some(percent);
        self
    }

    pub fn accepts(&self, row: &ConflictDetail) -> bool {
        self.risk_level.map_or(true, |risk| row.conflict_level == risk)
            && self.ip_type.map_or(true, |ip_type| row.ip_type == ip_type)
            && self
                .similarity_threshold
                .map_or(true, |percent| row.similarity >= percent / 100.0)
    }
}

/// Keep the rows accepted by `facet` and `advanced`, preserving order.
pub fn filter(
    rows: &[ConflictDetail],
    facet: ExplorerFacet,
    advanced: &AdvancedFilter,
) -> Vec<ConflictDetail> {
    let filtered: Vec<ConflictDetail> = rows
        .iter()
        .filter(|row| facet.accepts(row))
        .filter(|row| advanced.accepts(row))
        .cloned()
        .collect();

    debug!(
        subsystem = "search",
        component = "explorer",
        op = "filter",
        ?facet,
        input_count = rows.len(),
        result_count = filtered.len(),
        "Explorer filter applied"
    );
    filtered
}

/// Filter the full corpus for the explorer view.
pub fn explore(
    index: &KnowledgeIndex,
    facet: ExplorerFacet,
    advanced: &AdvancedFilter,
) -> Vec<ConflictDetail> {
    let rows: Vec<ConflictDetail> = index.browse().iter().map(MatchResult::to_conflict).collect();
    filter(&rows, facet, advanced)
}
