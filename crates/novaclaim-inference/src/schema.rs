//! Response schemas declared to the generation service.
//!
//! Schemas use the Gemini OpenAPI subset (`OBJECT`, `ARRAY`, `STRING`,
//! `NUMBER`). Enumerated fields carry an `enum` list matching the serde wire
//! names in `novaclaim_core::models`, so a conforming response always
//! deserializes.

use serde_json::{json, Value as JsonValue};

fn string() -> JsonValue {
    json!({ "type": "STRING" })
}

fn number() -> JsonValue {
    json!({ "type": "NUMBER" })
}

fn string_enum(values: &[&str]) -> JsonValue {
    json!({ "type": "STRING", "enum": values })
}

fn string_array() -> JsonValue {
    json!({ "type": "ARRAY", "items": string() })
}

/// Schema for a full document analysis (`GeneratedAnalysis`).
pub fn analysis_schema() -> JsonValue {
    json!({
        "type": "OBJECT",
        "properties": {
            "ip_type": string_enum(&["Patent", "Trademark", "Copyright", "Research Paper"]),
            "similarity_score": number(),
            "novelty_score": number(),
            "patentable_probability": string_enum(&["Low", "Medium", "High"]),
            "patentable_decision": string_enum(&["YES", "NO", "RISKY"]),
            "innovation_type": string_enum(&["incremental", "adjacent", "breakthrough"]),
            "summary": string(),
            "strategic_recommendation": string(),
            "innovation_gaps": string_array(),
            "risk_flags": string_array(),
            "domains": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": string(),
                        "children": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": string(),
                                    "size": number(),
                                    "maturity": string(),
                                    "ipStrength": number()
                                },
                                "required": ["name", "size", "maturity", "ipStrength"]
                            }
                        }
                    },
                    "required": ["name", "children"]
                }
            },
            "projects": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": string(),
                        "name": string(),
                        "x": number(),
                        "y": number(),
                        "z": number(),
                        "action": string_enum(&["BUILD", "PARTNER", "ACQUIRE"])
                    },
                    "required": ["id", "name", "x", "y", "z", "action"]
                }
            }
        },
        "required": [
            "ip_type",
            "similarity_score",
            "novelty_score",
            "patentable_probability",
            "patentable_decision",
            "innovation_type",
            "summary",
            "strategic_recommendation",
            "domains",
            "projects"
        ]
    })
}

/// Schema for a deep analysis of one record. Every field is optional.
pub fn deep_analysis_schema() -> JsonValue {
    json!({
        "type": "OBJECT",
        "properties": {
            "novelty_score": number(),
            "patentable_decision": string_enum(&["YES", "NO", "RISKY"]),
            "strategic_recommendation": string(),
            "risk_flags": string_array(),
            "summary": string()
        }
    })
}

/// Schema for a list of layer recommendations.
pub fn recommendations_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": string(),
                "title": string(),
                "description": string(),
                "potentialImpact": string_enum(&["Low", "Medium", "High"]),
                "domain": string()
            },
            "required": ["id", "title", "description", "potentialImpact", "domain"]
        }
    })
}

/// Schema for a failure-propagation graph.
pub fn graph_schema() -> JsonValue {
    json!({
        "type": "OBJECT",
        "properties": {
            "risk_score": number(),
            "nodes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": string(),
                        "name": string(),
                        "val": number()
                    },
                    "required": ["id", "name", "val"]
                }
            },
            "links": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "source": string(),
                        "target": string(),
                        "value": number()
                    },
                    "required": ["source", "target", "value"]
                }
            }
        },
        "required": ["risk_score", "nodes", "links"]
    })
}
