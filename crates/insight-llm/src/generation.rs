//! Generation request and response types

use crate::ResponseSchema;
use serde::{Deserialize, Serialize};

/// MIME type asking the model for a JSON answer
pub const JSON_MIME_TYPE: &str = "application/json";

/// Request for a single-turn generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// Full prompt text
    pub prompt: String,

    /// MIME type of the expected answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Shape the answer must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<ResponseSchema>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response from a generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text, `None` when the provider returned no payload
    pub text: Option<String>,

    /// Why the model stopped
    pub finish_reason: Option<FinishReason>,

    /// Token usage statistics, when reported
    pub usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// A response carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some(FinishReason::Stop),
            usage: None,
        }
    }

    /// A response without any payload
    pub fn empty() -> Self {
        Self::default()
    }

    /// The text if it holds anything besides whitespace
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Hit the token limit
    MaxTokens,
    /// Blocked by safety filters
    Safety,
    /// Blocked for reciting training data
    Recitation,
    /// Anything else the provider reports
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub input_tokens: usize,

    /// Number of generated tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl GenerateRequest {
    /// Create a builder for generation requests
    pub fn builder(model: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(model)
    }
}

/// Builder for GenerateRequest
pub struct GenerateRequestBuilder {
    model: String,
    prompt: String,
    response_mime_type: Option<String>,
    response_schema: Option<ResponseSchema>,
    temperature: Option<f32>,
}

impl GenerateRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: String::new(),
            response_mime_type: None,
            response_schema: None,
            temperature: None,
        }
    }

    /// Set the prompt text
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Ask for a JSON answer matching `schema`
    pub fn json_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_mime_type = Some(JSON_MIME_TYPE.to_string());
        self.response_schema = Some(schema);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the generation request
    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            model: self.model,
            prompt: self.prompt,
            response_mime_type: self.response_mime_type,
            response_schema: self.response_schema,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = GenerateRequest::builder("gemini-2.5-flash")
            .prompt("Summarize")
            .json_schema(ResponseSchema::string())
            .temperature(0.2)
            .build();

        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.prompt, "Summarize");
        assert_eq!(request.response_mime_type.as_deref(), Some(JSON_MIME_TYPE));
        assert!(request.response_schema.is_some());
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(GenerateResponse::text("{}").non_empty_text(), Some("{}"));
        assert!(GenerateResponse::text("  \n").non_empty_text().is_none());
        assert!(GenerateResponse::empty().non_empty_text().is_none());
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
