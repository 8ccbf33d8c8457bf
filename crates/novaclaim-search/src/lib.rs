//! # novaclaim-search
//!
//! Knowledge index for NovaClaim.
//!
//! This crate provides:
//! - A static in-memory corpus of IP records (patents, papers, theses,
//!   trademarks, copyrights)
//! - Keyword-scoring match with a relevance floor and cap
//! - Explorer facets and advanced filters over conflict rows
//! - CSV export and per-domain gap detection
//!
//! ## Example
//!
//! ```ignore
//! use novaclaim_search::{explore, AdvancedFilter, ExplorerFacet, IpType, KnowledgeIndex};
//!
//! let index = KnowledgeIndex::demo();
//!
//! // Ranked keyword match
//! for m in index.match_query("graphene aerospace") {
//!     println!("{} {:.2}", m.entry.id, m.score);
//! }
//!
//! // Explorer view: high-risk trademarks
//! let rows = explore(
//!     &index,
//!     ExplorerFacet::HighRisk,
//!     &AdvancedFilter::default().with_type(IpType::Trademark),
//! );
//! ```

pub mod corpus;
pub mod export;
pub mod filter;
pub mod gaps;
pub mod index;

// Re-export core types
pub use novaclaim_core::*;

pub use export::{export_csv, CSV_HEADER};
pub use filter::{explore, filter, AdvancedFilter, ExplorerFacet};
pub use gaps::detect_gaps;
pub use index::{score_entry, tokenize, InternalMatches, KnowledgeIndex, MatchResult};
