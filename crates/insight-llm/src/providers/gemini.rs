//! Google Gemini provider implementation
//!
//! This module implements the LLMProvider trait for the Gemini
//! `generateContent` endpoint, including structured JSON output.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use insight_llm::{Credential, GenerateRequest, LLMProvider, ResponseSchema};
//! use insight_llm::providers::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::new()?;
//!
//!     let request = GenerateRequest::builder("gemini-2.5-flash")
//!         .prompt("Describe Rust in one sentence.")
//!         .json_schema(ResponseSchema::object([("answer", ResponseSchema::string())]))
//!         .build();
//!
//!     let response = provider.generate(request, &Credential::new("AIza...")).await?;
//!     println!("{}", response.text.unwrap_or_default());
//!     Ok(())
//! }
//! ```

use crate::{
    Credential, FinishReason, GenerateRequest, GenerateResponse, LLMError, LLMProvider,
    ResponseSchema, Result, TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the API (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Optional request timeout; `None` waits for the server indefinitely
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom API base URL (proxies, regional endpoints)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: None,
        }
    }
}

/// Gemini provider
///
/// Holds the HTTP client only. The API key is supplied per call.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(GeminiConfig::default())
    }

    /// Create a provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// The active configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request, credential), fields(model = %request.model))]
    async fn generate(
        &self,
        request: GenerateRequest,
        credential: &Credential,
    ) -> Result<GenerateResponse> {
        if credential.is_empty() {
            return Err(LLMError::MissingApiKey);
        }

        debug!("Sending request to Gemini API");

        let model = request.model.clone();
        let body = GeminiRequest::from(request);

        let response = self
            .client
            .post(self.endpoint(&model))
            .header(API_KEY_HEADER, credential.expose())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(status_error(status, error_text, model));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            LLMError::MalformedBody(e.to_string())
        })?;

        let converted = gemini_response.into_generate_response()?;
        debug!(
            "Received response - finish_reason: {:?}, tokens: {:?}",
            converted.finish_reason,
            converted.usage.map(|u| u.total())
        );

        Ok(converted)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

fn status_error(status: StatusCode, error_text: String, model: String) -> LLMError {
    // Gemini answers an invalid key with 400 API_KEY_INVALID
    if error_text.contains("API_KEY_INVALID") {
        return LLMError::InvalidApiKey;
    }

    let message = serde_json::from_str::<GeminiErrorBody>(&error_text)
        .map(|body| body.error.message)
        .unwrap_or(error_text);

    match status.as_u16() {
        401 | 403 => LLMError::InvalidApiKey,
        429 => LLMError::QuotaExceeded(message),
        400 => LLMError::BadRequest(message),
        404 => LLMError::UnknownModel(model),
        code => LLMError::Status {
            status: code,
            message,
        },
    }
}

/// `{"error": {"code": .., "message": .., "status": ..}}`
#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

// Gemini-specific request/response types
// These match the generateContent wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<ResponseSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl From<GenerateRequest> for GeminiRequest {
    fn from(request: GenerateRequest) -> Self {
        let has_config = request.response_mime_type.is_some()
            || request.response_schema.is_some()
            || request.temperature.is_some();

        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt),
                }],
            }],
            generation_config: has_config.then_some(GenerationConfig {
                response_mime_type: request.response_mime_type,
                response_schema: request.response_schema,
                temperature: request.temperature,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GeminiResponse {
    fn into_generate_response(self) -> Result<GenerateResponse> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LLMError::Blocked(reason));
        }

        let usage = self.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(GenerateResponse {
                text: None,
                finish_reason: None,
                usage,
            });
        };

        let finish_reason = candidate.finish_reason.as_deref().map(|reason| match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            other => {
                warn!("Unknown finish reason: {other}");
                FinishReason::Other
            }
        });

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        Ok(GenerateResponse {
            text: (!text.is_empty()).then_some(text),
            finish_reason,
            usage,
        })
    }
}
