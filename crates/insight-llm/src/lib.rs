//! LLM provider abstraction for structured generation
//!
//! This crate provides provider-agnostic types for asking a model to produce
//! JSON that matches a declared schema. It includes:
//!
//! - Generation request/response types
//! - A response-schema model (OpenAPI subset understood by Gemini)
//! - An in-memory credential type that never prints its secret
//! - The [`LLMProvider`] trait that callers inject
//! - Concrete provider implementations (behind feature flags)

pub mod credential;
pub mod error;
pub mod generation;
pub mod provider;
pub mod schema;

// Re-export main types
pub use credential::Credential;
pub use error::{LLMError, Result};
pub use generation::{FinishReason, GenerateRequest, GenerateResponse, TokenUsage};
pub use provider::LLMProvider;
pub use schema::{ResponseSchema, SchemaType};

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
