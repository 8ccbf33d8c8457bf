//! In-memory knowledge index with keyword-scoring match.

use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, trace};

use novaclaim_core::defaults::{
    BROWSE_SCORE, MATCH_SCORE_CAP, MATCH_SCORE_FLOOR, MATCH_TOKEN_WEIGHT, MAX_CONFLICTS,
    MAX_PATENTS,
};
use novaclaim_core::{
    ConflictDetail, CorpusStats, Error, KnowledgeEntry, PatentDocument, Result, SourceType,
};

use crate::corpus::demo_entries;

/// A corpus entry paired with its relevance to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a KnowledgeEntry,
    /// Relevance in `[0, MATCH_SCORE_CAP]`.
    pub score: f64,
}

impl MatchResult<'_> {
    /// Project into the view-facing conflict row.
    pub fn to_conflict(&self) -> ConflictDetail {
        ConflictDetail {
            id: self.entry.id.clone(),
            ip_type: self.entry.source_type.ip_type(),
            title: self.entry.title.clone(),
            owner: self.entry.organization.clone(),
            similarity: self.score,
            conflict_level: self.entry.risk_category,
            reasoning: format!(
                "Semantic match detected in {} domain.",
                self.entry.technology_domain
            ),
        }
    }

    /// Project into a patent row.
    pub fn to_patent(&self) -> PatentDocument {
        PatentDocument {
            id: self.entry.id.clone(),
            title: self.entry.title.clone(),
            assignee: self.entry.organization.clone(),
            date: format!("{}-01-01", self.entry.year),
            similarity: self.score,
            status: self.entry.ip_status.clone(),
            exposure: self.entry.risk_category,
        }
    }
}

/// Knowledge matches projected for an analysis result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalMatches {
    pub conflicts: Vec<ConflictDetail>,
    pub patents: Vec<PatentDocument>,
}

/// Score one entry against already lower-cased query tokens.
pub fn score_entry(entry: &KnowledgeEntry, tokens: &[String]) -> f64 {
    let searchable = entry.searchable_text();
    let hits = tokens
        .iter()
        .filter(|token| searchable.contains(token.as_str()))
        .count();
    (hits as f64 * MATCH_TOKEN_WEIGHT).min(MATCH_SCORE_CAP)
}

/// Split a query into lower-cased whitespace tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Static, read-only collection of IP records.
#[derive(Debug, Clone)]
pub struct KnowledgeIndex {
    entries: Vec<KnowledgeEntry>,
    positions: HashMap<String, usize>,
}

impl KnowledgeIndex {
    /// Build an index from entries. Ids must be non-empty and unique.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "Knowledge entry at position {} has an empty id",
                    position
                )));
            }
            if positions.insert(entry.id.clone(), position).is_some() {
                return Err(Error::InvalidInput(format!(
                    "Duplicate knowledge entry id: {}",
                    entry.id
                )));
            }
        }

        debug!(
            subsystem = "search",
            component = "knowledge_index",
            entries = entries.len(),
            "Knowledge index loaded"
        );

        Ok(Self { entries, positions })
    }

    /// The built-in demo corpus.
    pub fn demo() -> Self {
        let entries = demo_entries();
        let positions = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.id.clone(), position))
            .collect();
        Self { entries, positions }
    }

    /// Load entries from a JSON array.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<KnowledgeEntry> = serde_json::from_reader(reader)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.positions.get(id).map(|&position| &self.entries[position])
    }

    /// Counts by source type.
    pub fn stats(&self) -> CorpusStats {
        let mut stats = CorpusStats {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.source_type {
                SourceType::Patent => stats.patents += 1,
                SourceType::ResearchPaper => stats.papers += 1,
                SourceType::Thesis => stats.theses += 1,
                SourceType::Trademark => stats.trademarks += 1,
                SourceType::Copyright => stats.copyrights += 1,
            }
        }
        stats
    }

    /// Score every entry against `query` and keep those above the floor.
    ///
    /// Results are ordered by descending score; equal scores keep corpus
    /// order. A query with no tokens matches nothing.
    pub fn match_query(&self, query: &str) -> Vec<MatchResult<'_>> {
        let tokens = tokenize(query);

        let mut matches: Vec<MatchResult<'_>> = self
            .entries
            .iter()
            .map(|entry| {
                let score = score_entry(entry, &tokens);
                trace!(entry_id = %entry.id, score, "Scored knowledge entry");
                MatchResult { entry, score }
            })
            .filter(|m| m.score > MATCH_SCORE_FLOOR)
            .collect();

        // Vec::sort_by is stable, which keeps ties in corpus order.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            subsystem = "search",
            component = "knowledge_index",
            op = "match",
            query,
            result_count = matches.len(),
            "Knowledge match complete"
        );
        matches
    }

    /// Every entry in corpus order with the browse baseline score.
    pub fn browse(&self) -> Vec<MatchResult<'_>> {
        self.entries
            .iter()
            .map(|entry| MatchResult {
                entry,
                score: BROWSE_SCORE,
            })
            .collect()
    }

    /// Top conflicts and top patents for a query.
    pub fn internal_matches(&self, query: &str) -> InternalMatches {
        let matches = self.match_query(query);

        let conflicts = matches
            .iter()
            .take(MAX_CONFLICTS)
            .map(MatchResult::to_conflict)
            .collect();

        let patents = matches
            .iter()
            .filter(|m| m.entry.source_type == SourceType::Patent)
            .take(MAX_PATENTS)
            .map(MatchResult::to_patent)
            .collect();

        InternalMatches { conflicts, patents }
    }
}

impl Default for KnowledgeIndex {
    fn default() -> Self {
        Self::demo()
    }
}
