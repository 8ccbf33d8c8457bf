//! CSV export of conflict rows.
//!
//! Fields are comma-joined without quoting, so a comma inside a title or
//! reasoning string shifts the columns of that row.

use novaclaim_core::ConflictDetail;

/// Header line of every export.
pub const CSV_HEADER: &str = "ID,Title,Type,Owner,Similarity,Risk Level,Reasoning";

/// Render rows as CSV, one line per row, joined with `\n`.
pub fn export_csv(rows: &[ConflictDetail]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(rows.iter().map(|row| {
        [
            row.id.as_str(),
            row.title.as_str(),
            row.ip_type.as_str(),
            row.owner.as_str(),
            &row.similarity.to_string(),
            row.conflict_level.as_str(),
            row.reasoning.as_str(),
        ]
        .join(",")
    }));
    lines.join("\n")
}
