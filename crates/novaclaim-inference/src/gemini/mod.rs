//! Gemini structured-output backend.
//!
//! Speaks the `generateContent` REST API with a declared response schema,
//! so the model is asked to return JSON of a known shape. The returned text
//! is handed back unparsed; see [`crate::parse`] for decoding.
//!
//! # Example
//!
//! ```rust,no_run
//! use novaclaim_core::{GenerationBackend, ModelTier, StructuredRequest};
//! use novaclaim_inference::gemini::{GeminiBackend, GeminiConfig};
//! use novaclaim_inference::schema;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = GeminiBackend::from_env().unwrap();
//!
//!     // Or pointed at a local proxy
//!     let config = GeminiConfig {
//!         base_url: "http://localhost:8089/v1beta".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = GeminiBackend::new(config).unwrap();
//!
//!     let request = StructuredRequest::new(
//!         ModelTier::Advisory,
//!         "Suggest innovation vectors for the Storage layer",
//!         schema::recommendations_schema(),
//!     );
//!     let text = backend.generate_structured(&request).await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    GeminiBackend, GeminiConfig, DEFAULT_ADVISORY_MODEL, DEFAULT_ANALYSIS_MODEL,
    DEFAULT_GEMINI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_novaclaim_error, GeminiErrorCode};
pub use types::*;
