//! Gemini structured-output backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use novaclaim_core::defaults::{ADVISORY_MODEL, ANALYSIS_MODEL, GEMINI_URL, GEN_TIMEOUT_SECS};
use novaclaim_core::{Error, GenerationBackend, ModelTier, Result, StructuredRequest};

use super::error::{to_novaclaim_error, GeminiErrorCode};
use super::types::*;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_URL: &str = GEMINI_URL;

/// Default model for document analysis.
pub const DEFAULT_ANALYSIS_MODEL: &str = ANALYSIS_MODEL;

/// Default model for advisory queries.
pub const DEFAULT_ADVISORY_MODEL: &str = ADVISORY_MODEL;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = GEN_TIMEOUT_SECS;

/// Configuration for the Gemini backend.
///
/// | Variable | Default |
/// |----------|---------|
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta` |
/// | `GEMINI_API_KEY` (falls back to `API_KEY`) | unset |
/// | `GEMINI_ANALYSIS_MODEL` | `gemini-3-pro-preview` |
/// | `GEMINI_ADVISORY_MODEL` | `gemini-3-flash-preview` |
/// | `GEMINI_TIMEOUT` | `120` |
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key sent as `x-goog-api-key`.
    pub api_key: Option<String>,
    /// Model used for `ModelTier::Analysis`.
    pub analysis_model: String,
    /// Model used for `ModelTier::Advisory`.
    pub advisory_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key: None,
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            advisory_model: DEFAULT_ADVISORY_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string()),
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok()
                .filter(|key| !key.is_empty()),
            analysis_model: std::env::var("GEMINI_ANALYSIS_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANALYSIS_MODEL.to_string()),
            advisory_model: std::env::var("GEMINI_ADVISORY_MODEL")
                .unwrap_or_else(|_| DEFAULT_ADVISORY_MODEL.to_string()),
            timeout_seconds: std::env::var("GEMINI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Backend for the Gemini `generateContent` API.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            warn!(
                subsystem = "inference",
                component = "gemini",
                "No Gemini API key configured; requests will be rejected upstream"
            );
        }

        info!(
            subsystem = "inference",
            component = "gemini",
            url = %config.base_url,
            analysis_model = %config.analysis_model,
            advisory_model = %config.advisory_model,
            "Initializing Gemini backend"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(GeminiConfig::default())
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build a `generateContent` request for `model`.
    fn build_request(&self, model: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-goog-api-key", api_key);
        }

        req.header("Content-Type", "application/json")
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[instrument(skip(self, request), fields(subsystem = "inference", component = "gemini", op = "generate_structured", tier = request.tier.as_str(), model = %self.model_name(request.tier), prompt_len = request.prompt.len()))]
    async fn generate_structured(&self, request: &StructuredRequest) -> Result<String> {
        let model = self.model_name(request.tier).to_string();
        let start = Instant::now();

        let body = GenerateContentRequest::structured(&request.prompt, request.schema.clone());

        let response = self
            .build_request(&model)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: GeminiErrorResponse = response.json().await.unwrap_or(GeminiErrorResponse {
                error: GeminiError {
                    code: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string(),
                    status: String::new(),
                },
            });
            let code = GeminiErrorCode::from_response(status.as_u16(), &body.error.status);
            warn!(
                http_status = status.as_u16(),
                error_code = ?code,
                error = %body.error.message,
                "Gemini request rejected"
            );
            return Err(to_novaclaim_error(
                code,
                &format!("Gemini returned {}: {}", status, body.error.message),
            ));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let text = result.text();
        if result.candidates.is_empty() {
            debug!("Gemini returned no candidates");
        }

        debug!(
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(text)
    }

    fn model_name(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Analysis => &self.config.analysis_model,
            ModelTier::Advisory => &self.config.advisory_model,
        }
    }
}
