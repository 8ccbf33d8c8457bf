//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use novaclaim_core::ModelTier;
//! use novaclaim_inference::mock::MockGenerationBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockGenerationBackend::new()
//!         .with_fixed_response(r#"{"summary": "ok"}"#)
//!         .with_tier_response(ModelTier::Advisory, "[]")
//!         .with_latency_ms(50);
//!     // pass `Arc::new(backend.clone())` into the code under test,
//!     // then assert on `backend.get_calls()`
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use novaclaim_core::{Error, GenerationBackend, ModelTier, Result, StructuredRequest};

/// Mock generation backend for testing.
///
/// Clones share configuration and call log, so a test can keep one handle
/// while the code under test owns another.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    tier_responses: HashMap<ModelTier, String>,
    prompt_mappings: Vec<(String, String)>,
    analysis_model: String,
    advisory_model: String,
    latency_ms: u64,
    failure_rate: f64,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub tier: ModelTier,
    pub prompt: String,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "{}".to_string(),
            tier_responses: HashMap::new(),
            prompt_mappings: Vec::new(),
            analysis_model: "mock-analysis".to_string(),
            advisory_model: "mock-advisory".to_string(),
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned when nothing more specific matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Set the response for every request on `tier`.
    pub fn with_tier_response(mut self, tier: ModelTier, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config)
            .tier_responses
            .insert(tier, response.into());
        self
    }

    /// Return `output` for any prompt containing `fragment`.
    ///
    /// Mappings are checked in insertion order and win over tier responses.
    pub fn with_response_mapping(
        mut self,
        fragment: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .prompt_mappings
            .push((fragment.into(), output.into()));
        self
    }

    /// Set simulated latency for all calls.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.log().clear()
    }

    /// Number of calls made on `tier`.
    pub fn call_count(&self, tier: ModelTier) -> usize {
        self.log().iter().filter(|c| c.tier == tier).count()
    }

    fn log(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn log_call(&self, request: &StructuredRequest) {
        self.log().push(MockCall {
            tier: request.tier,
            prompt: request.prompt.clone(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        if self.config.failure_rate > 0.0 {
            rand::thread_rng().gen::<f64>() < self.config.failure_rate
        } else {
            false
        }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn response_for(&self, request: &StructuredRequest) -> String {
        if let Some((_, output)) = self
            .config
            .prompt_mappings
            .iter()
            .find(|(fragment, _)| request.prompt.contains(fragment.as_str()))
        {
            return output.clone();
        }
        self.config
            .tier_responses
            .get(&request.tier)
            .unwrap_or(&self.config.default_response)
            .clone()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_structured(&self, request: &StructuredRequest) -> Result<String> {
        self.log_call(request);
        self.simulate_latency().await;

        if self.should_fail() {
            return Err(MockError::SimulatedFailure.into());
        }

        Ok(self.response_for(request))
    }

    fn model_name(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Analysis => &self.config.analysis_model,
            ModelTier::Advisory => &self.config.advisory_model,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Simulated failure for testing")]
    SimulatedFailure,
}

impl From<MockError> for Error {
    fn from(e: MockError) -> Self {
        Error::Inference(e.to_string())
    }
}
