//! Decoding of structured generation responses.

use serde::de::DeserializeOwned;

use novaclaim_core::{Error, Result};

/// JSON shape substituted when the response text is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyShape {
    /// `{}`
    Object,
    /// `[]`
    Array,
}

impl EmptyShape {
    fn literal(self) -> &'static str {
        match self {
            EmptyShape::Object => "{}",
            EmptyShape::Array => "[]",
        }
    }
}

/// Strip a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Parse response text into `T`.
///
/// Empty or whitespace-only text is read as the `empty` shape. Invalid JSON
/// and JSON that does not match `T` both yield [`Error::Schema`].
pub fn parse_structured<T: DeserializeOwned>(text: &str, empty: EmptyShape) -> Result<T> {
    let body = strip_code_fence(text);
    let body = if body.is_empty() { empty.literal() } else { body };

    serde_json::from_str(body).map_err(|e| {
        Error::Schema(format!(
            "Response does not match {}: {}",
            std::any::type_name::<T>(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use novaclaim_core::{DeepAnalysis, GeneratedAnalysis, GraphData, InnovationIdea};

    #[test]
    fn test_empty_text_reads_as_empty_object() {
        let deep: DeepAnalysis = parse_structured("", EmptyShape::Object).unwrap();
        assert!(deep.is_empty());
    }

    #[test]
    fn test_empty_text_reads_as_empty_array() {
        let ideas: Vec<InnovationIdea> = parse_structured("  \n", EmptyShape::Array).unwrap();
        assert!(ideas.is_empty());
    }

    #[test]
    fn test_empty_text_fails_required_fields() {
        let result = parse_structured::<GeneratedAnalysis>("", EmptyShape::Object);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_invalid_json_is_schema_error() {
        let result = parse_structured::<GraphData>("{\"nodes\": [", EmptyShape::Object);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_wrong_shape_is_schema_error() {
        let result = parse_structured::<Vec<InnovationIdea>>("{}", EmptyShape::Array);
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(err.to_string().contains("InnovationIdea"));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let text = "```json\n{\"nodes\": [], \"links\": [], \"risk_score\": 12}\n```";
        let graph: GraphData = parse_structured(text, EmptyShape::Object).unwrap();
        assert_eq!(graph.risk_score, 12.0);
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("```{}```"), "{}");
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }
}
