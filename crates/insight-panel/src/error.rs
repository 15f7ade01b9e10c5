//! Error types for panel and analysis operations

use crate::language::Language;
use insight_llm::LLMError;
use thiserror::Error;

/// Panel and analysis errors
#[derive(Debug, Error)]
pub enum PanelError {
    /// No credential was entered; checked before any request
    #[error("API credential is missing")]
    CredentialMissing,

    /// Transport, authentication or provider-side failure
    #[error("Upstream error: {0}")]
    Upstream(#[from] LLMError),

    /// The provider answered without a payload
    #[error("Provider returned no content")]
    EmptyResponse,

    /// The payload is not a valid analysis object
    #[error("Malformed analysis payload: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// Prompt template could not be loaded or rendered
    #[error("Prompt template error: {0}")]
    Prompt(String),

    /// Analysis requested while the panel is hidden
    #[error("No company record is selected")]
    NoRecordSelected,

    /// Analysis requested while another one is loading
    #[error("An analysis is already in progress")]
    AnalysisInFlight,

    /// Lookup by stock code failed
    #[error("No company with stock code {0}")]
    RecordNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data file parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for panel operations
pub type Result<T> = std::result::Result<T, PanelError>;

impl PanelError {
    /// True for failures of the analysis call itself
    pub fn is_analysis_failure(&self) -> bool {
        matches!(
            self,
            PanelError::CredentialMissing
                | PanelError::Upstream(_)
                | PanelError::EmptyResponse
                | PanelError::MalformedResponse(_)
                | PanelError::Prompt(_)
        )
    }

    /// The single localized message shown in the panel
    ///
    /// Every analysis failure other than a missing credential collapses into
    /// the same message; the typed variant is kept for logs.
    pub fn user_message(&self, language: Language) -> String {
        let labels = language.labels();
        match self {
            PanelError::CredentialMissing => labels.credential_missing.to_string(),
            err if err.is_analysis_failure() => labels.analysis_failed.to_string(),
            other => other.to_string(),
        }
    }
}
