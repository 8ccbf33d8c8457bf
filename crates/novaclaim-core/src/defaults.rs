//! Centralized default constants for NovaClaim.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// KNOWLEDGE INDEX
// =============================================================================

/// Score contributed by each query token found in an entry's searchable text.
pub const MATCH_TOKEN_WEIGHT: f64 = 0.25;

/// Upper clamp for a match score.
pub const MATCH_SCORE_CAP: f64 = 0.96;

/// Matches scoring at or below this value are discarded.
pub const MATCH_SCORE_FLOOR: f64 = 0.15;

/// Score assigned to every entry on the explicit browse-all path.
pub const BROWSE_SCORE: f64 = 0.25;

/// Maximum conflicts returned by an internal knowledge match.
pub const MAX_CONFLICTS: usize = 15;

/// Maximum patents returned by an internal knowledge match.
pub const MAX_PATENTS: usize = 10;

/// Similarity above which a result counts as "high similarity" in the explorer.
pub const HIGH_SIMILARITY: f64 = 0.85;

// =============================================================================
// GAP DETECTION
// =============================================================================

/// Fraction of the mean domain size below which a domain is a gap.
pub const GAP_MEAN_FRACTION: f64 = 0.3;

/// Domains this small are always gaps.
pub const GAP_MIN_THRESHOLD: usize = 2;

/// Number of title words kept as representative terms.
pub const GAP_REPRESENTATIVE_TERMS: usize = 3;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Gemini REST endpoint.
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for full document analysis.
pub const ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Model used for advisory queries (deep analysis, recommendations, graphs).
pub const ADVISORY_MODEL: &str = "gemini-3-flash-preview";

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Maximum characters of submitted content sent to the generation service.
pub const CONTENT_EXCERPT_CHARS: usize = 4000;

// =============================================================================
// ANALYSIS PIPELINE
// =============================================================================

/// Delay before a queued job starts extracting (milliseconds).
pub const DISPATCH_DELAY_MS: u64 = 100;

/// Simulated extraction stage latency (milliseconds).
pub const EXTRACT_DELAY_MS: u64 = 1500;

/// Simulated embedding stage latency (milliseconds).
pub const EMBED_DELAY_MS: u64 = 1500;

/// File name fragment that routes a submission down the demo fast path.
pub const DEMO_MARKER: &str = "demo_patent.pdf";

/// Default consumer poll interval (milliseconds).
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Pipeline event broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;
