//! Configuration for the panel and its analysis client

use crate::error::{PanelError, Result};
use crate::language::Language;
use crate::prompt::PromptTemplate;
use insight_llm::providers::GeminiConfig;
use insight_utils::{env_duration_secs, env_string};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the panel and analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Model identifier sent with every analysis
    pub model: String,

    /// Base URL of the Gemini API
    pub api_base: String,

    /// Language of labels, messages and the default prompt
    pub language: Language,

    /// Custom prompt template file; the built-in template is used when unset
    pub prompt_path: Option<PathBuf>,

    /// Request timeout; `None` leaves the call unbounded
    pub request_timeout: Option<Duration>,

    /// Sampling temperature forwarded to the model
    pub temperature: Option<f32>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            language: Language::Korean,
            prompt_path: None,
            request_timeout: None,
            temperature: None,
        }
    }
}

impl PanelConfig {
    /// Create a new configuration builder
    pub fn builder() -> PanelConfigBuilder {
        PanelConfigBuilder::default()
    }

    /// Defaults overlaid with environment variables
    ///
    /// Reads `INSIGHT_MODEL`, `GEMINI_API_BASE`, `INSIGHT_LANGUAGE`,
    /// `INSIGHT_PROMPT_PATH` and `INSIGHT_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PanelError::Config("model must not be empty".to_string()));
        }

        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(PanelError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(PanelError::Config(format!(
                    "temperature must be within 0.0..=2.0, got {temperature}"
                )));
            }
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(PanelError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load the prompt template this configuration points at
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        match &self.prompt_path {
            Some(path) => PromptTemplate::from_file(path, self.language),
            None => Ok(PromptTemplate::business_analysis(self.language)),
        }
    }

    /// Provider settings derived from this configuration
    pub fn gemini_config(&self) -> GeminiConfig {
        let config = GeminiConfig::new().with_api_base(self.api_base.clone());
        match self.request_timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

/// Builder for PanelConfig
#[derive(Debug, Default)]
pub struct PanelConfigBuilder {
    model: Option<String>,
    api_base: Option<String>,
    language: Option<Language>,
    prompt_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    temperature: Option<f32>,
    invalid: Vec<String>,
}

impl PanelConfigBuilder {
    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the display language
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Use a prompt template file
    pub fn prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_path = Some(path.into());
        self
    }

    /// Bound each request by `timeout`
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Fill unset fields from the environment
    pub fn with_env(mut self) -> Self {
        if self.model.is_none() {
            self.model = env_string("INSIGHT_MODEL");
        }
        if self.api_base.is_none() {
            self.api_base = env_string("GEMINI_API_BASE");
        }
        if self.language.is_none() {
            if let Some(code) = env_string("INSIGHT_LANGUAGE") {
                match Language::from_code(&code) {
                    Some(language) => self.language = Some(language),
                    None => self.invalid.push(format!("INSIGHT_LANGUAGE: unsupported '{code}'")),
                }
            }
        }
        if self.prompt_path.is_none() {
            self.prompt_path = env_string("INSIGHT_PROMPT_PATH").map(PathBuf::from);
        }
        if self.request_timeout.is_none() {
            self.request_timeout = env_duration_secs("INSIGHT_REQUEST_TIMEOUT_SECS");
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PanelConfig> {
        if !self.invalid.is_empty() {
            return Err(PanelError::Config(self.invalid.join("; ")));
        }

        let defaults = PanelConfig::default();

        let config = PanelConfig {
            model: self.model.unwrap_or(defaults.model),
            api_base: self.api_base.unwrap_or(defaults.api_base),
            language: self.language.unwrap_or(defaults.language),
            prompt_path: self.prompt_path,
            request_timeout: self.request_timeout,
            temperature: self.temperature,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.language, Language::Korean);
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PanelConfig::builder()
            .model("gemini-2.5-pro")
            .language(Language::English)
            .request_timeout(Duration::from_secs(30))
            .temperature(0.4)
            .build()
            .unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.language, Language::English);
        assert_eq!(config.gemini_config().timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validation() {
        assert!(PanelConfig::builder().model(" ").build().is_err());
        assert!(PanelConfig::builder().api_base("ftp://example").build().is_err());
        assert!(PanelConfig::builder().temperature(3.5).build().is_err());
        assert!(PanelConfig::builder().request_timeout(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_prompt_template_defaults_to_builtin() {
        let config = PanelConfig::builder().language(Language::English).build().unwrap();
        let template = config.prompt_template().unwrap();
        assert_eq!(template.language(), Language::English);
        assert_eq!(template.name(), crate::prompt::BUSINESS_ANALYSIS);
    }
}
