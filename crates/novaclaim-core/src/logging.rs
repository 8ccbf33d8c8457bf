//! Structured logging schema and field name constants for NovaClaim.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query by the same keys across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied, job failed |
//! | INFO  | Lifecycle events (job submitted, job completed) |
//! | DEBUG | Decision points, stage transitions, config choices |
//! | TRACE | Per-entry scoring, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "search", "inference", "jobs", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "knowledge_index", "gemini", "pipeline", "poller", "advisory"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "match", "generate_structured", "submit", "deep_analyze"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Analysis job UUID.
pub const JOB_ID: &str = "job_id";

/// Job status after a transition.
pub const STATUS: &str = "status";

/// Job progress percent.
pub const PROGRESS: &str = "progress";

/// Knowledge entry identifier.
pub const ENTRY_ID: &str = "entry_id";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a match or filter.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Model tier ("analysis", "advisory").
pub const TIER: &str = "tier";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Whether a fallback payload was served.
pub const FALLBACK: &str = "fallback";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_distinct() {
        let fields = [
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            JOB_ID,
            STATUS,
            PROGRESS,
            ENTRY_ID,
            QUERY,
            DURATION_MS,
            RESULT_COUNT,
            PROMPT_LEN,
            RESPONSE_LEN,
            MODEL,
            TIER,
            ERROR_MSG,
            FALLBACK,
        ];
        let unique: HashSet<&str> = fields.iter().copied().collect();
        assert_eq!(unique.len(), fields.len());
    }
}
