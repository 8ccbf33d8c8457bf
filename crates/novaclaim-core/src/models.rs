//! Core data models for NovaClaim.
//!
//! These types are shared across all NovaClaim crates and keep the wire
//! names of the JSON contract consumed by the view layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// KNOWLEDGE TYPES
// =============================================================================

/// Kind of record stored in the knowledge index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Patent,
    Trademark,
    Copyright,
    #[serde(rename = "Research Paper")]
    ResearchPaper,
    Thesis,
}

impl SourceType {
    /// View-facing IP type. Theses are presented as research papers.
    pub fn ip_type(self) -> IpType {
        match self {
            SourceType::Patent => IpType::Patent,
            SourceType::Trademark => IpType::Trademark,
            SourceType::Copyright => IpType::Copyright,
            SourceType::ResearchPaper | SourceType::Thesis => IpType::ResearchPaper,
        }
    }
}

/// IP type as presented to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpType {
    Patent,
    Trademark,
    Copyright,
    #[serde(rename = "Research Paper")]
    ResearchPaper,
}

impl IpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpType::Patent => "Patent",
            IpType::Trademark => "Trademark",
            IpType::Copyright => "Copyright",
            IpType::ResearchPaper => "Research Paper",
        }
    }
}

impl std::fmt::Display for IpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "patent" => Ok(IpType::Patent),
            "trademark" => Ok(IpType::Trademark),
            "copyright" => Ok(IpType::Copyright),
            "research paper" | "paper" => Ok(IpType::ResearchPaper),
            _ => Err(Error::InvalidInput(format!("Unknown IP type: {}", s))),
        }
    }
}

/// Risk category of a knowledge entry; also the conflict level of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(Error::InvalidInput(format!("Unknown risk level: {}", s))),
        }
    }
}

/// A static IP record in the knowledge index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub content_text: String,
    pub technology_domain: String,
    #[serde(default)]
    pub innovation_tags: Vec<String>,
    pub source_type: SourceType,
    pub risk_category: RiskLevel,
    pub ip_status: String,
    pub year: u16,
    pub organization: String,
}

impl KnowledgeEntry {
    /// Lower-cased text that query tokens are matched against.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title, self.abstract_text, self.technology_domain
        )
        .to_lowercase()
    }
}

/// Counts of indexed assets, reported to the generation service as context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total: usize,
    pub patents: usize,
    pub papers: usize,
    pub theses: usize,
    pub trademarks: usize,
    pub copyrights: usize,
}

/// View-facing projection of a knowledge match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub ip_type: IpType,
    pub title: String,
    pub owner: String,
    pub similarity: f64,
    pub conflict_level: RiskLevel,
    pub reasoning: String,
}

/// Patent-shaped projection of a knowledge match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentDocument {
    pub id: String,
    pub title: String,
    pub assignee: String,
    pub date: String,
    pub similarity: f64,
    pub status: String,
    pub exposure: RiskLevel,
}

/// Per-domain coverage of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInsight {
    pub domain: String,
    pub size: usize,
    /// Share of the corpus in this domain, in `[0, 1]`.
    pub density_score: f64,
    pub is_gap: bool,
    pub representative_terms: Vec<String>,
}

// =============================================================================
// ANALYSIS TYPES
// =============================================================================

/// Coarse probability rating used for patentability and impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Likelihood {
    Low,
    Medium,
    High,
}

/// Patentability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatentableDecision {
    Yes,
    No,
    Risky,
}

/// How far an innovation departs from existing art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InnovationType {
    Incremental,
    Adjacent,
    Breakthrough,
}

/// Recommended action for a strategic project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectAction {
    Build,
    Partner,
    Acquire,
}

/// Sized leaf of the domain-cluster tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainLeaf {
    pub name: String,
    pub size: f64,
    pub maturity: String,
    #[serde(rename = "ipStrength")]
    pub ip_strength: f64,
}

/// Named group of the domain-cluster tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCluster {
    pub name: String,
    pub children: Vec<DomainLeaf>,
}

/// A point in impact (x) / maturity (y) / effort (z) space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicProject {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub action: ProjectAction,
}

/// Structured payload returned by the generation service for a document.
///
/// Every field except `innovation_gaps` and `risk_flags` is required; a
/// response missing one is rejected rather than partially accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAnalysis {
    pub ip_type: IpType,
    pub similarity_score: f64,
    pub novelty_score: f64,
    pub patentable_probability: Likelihood,
    pub patentable_decision: PatentableDecision,
    pub innovation_type: InnovationType,
    pub summary: String,
    pub strategic_recommendation: String,
    #[serde(default)]
    pub innovation_gaps: Vec<String>,
    #[serde(default)]
    pub risk_flags: Vec<String>,
    pub domains: Vec<DomainCluster>,
    pub projects: Vec<StrategicProject>,
}

/// Terminal payload of a completed analysis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub analysis: GeneratedAnalysis,
    pub top_similar_patents: Vec<PatentDocument>,
    pub conflicts: Vec<ConflictDetail>,
}

/// Partial analysis of a single knowledge entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patentable_decision: Option<PatentableDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategic_recommendation: Option<String>,
    #[serde(default)]
    pub risk_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl DeepAnalysis {
    /// Default served when generation fails: the record's own abstract and
    /// risk category, with no score or verdict.
    pub fn fallback(entry: &KnowledgeEntry) -> Self {
        Self {
            novelty_score: None,
            patentable_decision: None,
            strategic_recommendation: Some(format!(
                "Automated analysis unavailable for {}; manual review recommended.",
                entry.id
            )),
            risk_flags: vec![format!("{} risk category", entry.risk_category)],
            summary: Some(entry.abstract_text.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.novelty_score.is_none()
            && self.patentable_decision.is_none()
            && self.strategic_recommendation.is_none()
            && self.risk_flags.is_empty()
            && self.summary.is_none()
    }
}

/// Strategic investment vector for an infrastructure layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnovationIdea {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "potentialImpact")]
    pub potential_impact: Likelihood,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub val: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Failure-propagation graph for an infrastructure layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub risk_score: f64,
}

// =============================================================================
// JOB TYPES
// =============================================================================

/// Status of an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Queued,
    Extracting,
    Embedding,
    Analyzing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Extracting => "EXTRACTING",
            JobStatus::Embedding => "EMBEDDING",
            JobStatus::Analyzing => "ANALYZING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Terminal states absorb: no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Progress percent recorded on entering this state.
    ///
    /// `Failed` has none: a failing job keeps the progress it had.
    pub fn default_progress(&self) -> Option<u8> {
        match self {
            JobStatus::Queued => Some(0),
            JobStatus::Extracting => Some(20),
            JobStatus::Embedding => Some(50),
            JobStatus::Analyzing => Some(80),
            JobStatus::Completed => Some(100),
            JobStatus::Failed => None,
        }
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        match (self, next) {
            (Completed | Failed, _) => false,
            (_, Failed) => true,
            (Queued, Extracting) | (Queued, Completed) => true,
            (Extracting, Embedding) => true,
            (Embedding, Analyzing) => true,
            (Analyzing, Completed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error message reported for an unknown job id.
pub const JOB_NOT_FOUND: &str = "Job not found";

/// Snapshot of an analysis job.
///
/// `result` is present iff `status` is `Completed`; `error` is present iff
/// `status` is `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub id: Uuid,
    pub file_name: String,
    pub status: JobStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Arc<AnalysisResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisJob {
    /// A freshly queued job.
    pub fn queued(id: Uuid, file_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            file_name: file_name.into(),
            status: JobStatus::Queued,
            progress: 0,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Synthesized record returned for ids the store has never seen.
    pub fn not_found(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            file_name: String::new(),
            status: JobStatus::Failed,
            progress: 0,
            result: None,
            error: Some(JOB_NOT_FOUND.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == JobStatus::Failed && self.error.as_deref() == Some(JOB_NOT_FOUND)
    }
}
