//! # novaclaim-inference
//!
//! Structured-output generation for NovaClaim.
//!
//! This crate provides:
//! - Gemini `generateContent` backend implementing
//!   [`novaclaim_core::GenerationBackend`]
//! - Response schemas declared with each request
//! - Lenient parsing of structured responses into core models
//! - Prompt builders for analysis and advisory queries
//! - Mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable [`mock::MockGenerationBackend`] outside this crate's tests
//!
//! # Example
//!
//! ```rust,no_run
//! use novaclaim_inference::{parse_structured, EmptyShape, GeminiBackend, GraphData};
//! use novaclaim_inference::{prompts, schema, GenerationBackend, ModelTier, StructuredRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = GeminiBackend::from_env().unwrap();
//!     let request = StructuredRequest::new(
//!         ModelTier::Advisory,
//!         prompts::graph_prompt("Storage", "Strategist"),
//!         schema::graph_schema(),
//!     );
//!     let text = backend.generate_structured(&request).await.unwrap();
//!     let graph: GraphData = parse_structured(&text, EmptyShape::Object).unwrap();
//! }
//! ```

pub mod gemini;
pub mod parse;
pub mod prompts;
pub mod schema;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use novaclaim_core::*;

pub use gemini::{GeminiBackend, GeminiConfig, GeminiErrorCode};
pub use parse::{parse_structured, strip_code_fence, EmptyShape};
