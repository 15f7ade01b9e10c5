//! LLM provider trait definition

use crate::{Credential, GenerateRequest, GenerateResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// The credential travels with each call instead of living in the provider,
/// so one provider instance serves whatever key the user enters.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Run a single generation
    ///
    /// # Arguments
    ///
    /// * `request` - Model, prompt and response constraints
    /// * `credential` - API key used for this call only
    async fn generate(
        &self,
        request: GenerateRequest,
        credential: &Credential,
    ) -> Result<GenerateResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
