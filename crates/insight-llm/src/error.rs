//! Errors raised while talking to a generation backend

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Ways a `generateContent` call can fail
///
/// HTTP statuses are folded into the cases callers act on; anything else
/// keeps its status and the message Gemini sent back.
#[derive(Error, Debug)]
pub enum LLMError {
    /// No key was supplied, so nothing was sent
    #[error("Gemini API key is empty")]
    MissingApiKey,

    /// 401/403, or a 400 carrying `API_KEY_INVALID`
    #[error("Gemini rejected the API key")]
    InvalidApiKey,

    /// 429 `RESOURCE_EXHAUSTED`
    #[error("Gemini quota exhausted: {0}")]
    QuotaExceeded(String),

    /// 400 for anything other than the key
    #[error("Gemini rejected the request: {0}")]
    BadRequest(String),

    #[error("Unknown Gemini model: {0}")]
    UnknownModel(String),

    #[error("Gemini returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS or timeout failure before a status was received
    #[cfg(feature = "gemini")]
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body that does not decode as a generation response
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// `promptFeedback.blockReason` was set
    #[error("Prompt blocked: {0}")]
    Blocked(String),
}
