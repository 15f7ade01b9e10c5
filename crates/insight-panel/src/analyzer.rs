//! Business analysis client
//!
//! Sends one structured-output request per analysis through an injected
//! [`LLMProvider`] and parses the answer into an [`AnalysisResult`].

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use crate::model::AnalysisResult;
use crate::prompt::PromptTemplate;
use insight_llm::{Credential, GenerateRequest, LLMProvider, ResponseSchema};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Client that turns a business description into an analysis
pub struct BusinessAnalyzer {
    provider: Arc<dyn LLMProvider>,
    template: PromptTemplate,
    model: String,
    temperature: Option<f32>,
}

impl BusinessAnalyzer {
    /// Create an analyzer from configuration
    ///
    /// Loads the prompt template the configuration points at.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &PanelConfig) -> Result<Self> {
        Ok(Self {
            provider,
            template: config.prompt_template()?,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Create an analyzer with an explicit template and model
    pub fn with_template(
        provider: Arc<dyn LLMProvider>,
        template: PromptTemplate,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            template,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Shape the model must answer in
    pub fn response_schema() -> ResponseSchema {
        ResponseSchema::object([
            ("summary", ResponseSchema::string()),
            ("strengths", ResponseSchema::array(ResponseSchema::string())),
            ("risks", ResponseSchema::array(ResponseSchema::string())),
        ])
        .require_all()
    }

    /// Build the request for a description without sending it
    pub fn build_request(&self, description: &str) -> Result<GenerateRequest> {
        let builder = GenerateRequest::builder(&self.model)
            .prompt(self.template.render(description)?)
            .json_schema(Self::response_schema());

        Ok(match self.temperature {
            Some(temperature) => builder.temperature(temperature),
            None => builder,
        }
        .build())
    }

    /// Analyze a business description
    ///
    /// Fails with [`PanelError::CredentialMissing`] before any I/O when the
    /// credential is empty. No retry is attempted.
    #[instrument(skip_all, fields(model = %self.model, template_version = %self.template.version()))]
    pub async fn analyze(
        &self,
        description: &str,
        credential: &Credential,
    ) -> Result<AnalysisResult> {
        if credential.is_empty() {
            return Err(PanelError::CredentialMissing);
        }

        let request = self.build_request(description)?;
        debug!(prompt_chars = request.prompt.chars().count(), "Requesting business analysis");

        let response = self
            .provider
            .generate(request, credential)
            .await
            .map_err(|e| {
                error!(error = %e, "Analysis request failed");
                PanelError::Upstream(e)
            })?;

        let Some(text) = response.non_empty_text() else {
            error!("Analysis response carried no content");
            return Err(PanelError::EmptyResponse);
        };

        let result: AnalysisResult = serde_json::from_str(text).map_err(|e| {
            error!(error = %e, "Analysis payload is not valid JSON for the expected shape");
            PanelError::MalformedResponse(e)
        })?;

        info!(
            strengths = result.strengths.len(),
            risks = result.risks.len(),
            "Business analysis completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::language::Language;
    use async_trait::async_trait;
    use insight_llm::{GenerateResponse, LLMError};
    use mockall::mock;

    mock! {
        pub Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn generate(
                &self,
                request: GenerateRequest,
                credential: &Credential,
            ) -> insight_llm::Result<GenerateResponse>;

            fn name(&self) -> &'static str;
        }
    }

    /// Analyzer backed by a provider that answers every call with `text`
    pub(crate) fn analyzer_answering(text: &'static str) -> BusinessAnalyzer {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(move |_, _| Ok(GenerateResponse::text(text)));
        analyzer_with(provider)
    }

    pub(crate) fn analyzer_with(provider: MockProvider) -> BusinessAnalyzer {
        BusinessAnalyzer::with_template(
            Arc::new(provider),
            PromptTemplate::business_analysis(Language::Korean),
            "gemini-2.5-flash",
        )
    }

    #[tokio::test]
    async fn test_successful_analysis() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .times(1)
            .withf(|request, credential| {
                request.model == "gemini-2.5-flash"
                    && request.prompt.ends_with("\n메모리 반도체")
                    && request.response_mime_type.as_deref() == Some("application/json")
                    && request.response_schema == Some(BusinessAnalyzer::response_schema())
                    && credential.expose() == "key"
            })
            .returning(|_, _| {
                Ok(GenerateResponse::text(
                    r#"{"summary":"S","strengths":["A"],"risks":["B"]}"#,
                ))
            });

        let analyzer = analyzer_with(provider);
        let result = analyzer
            .analyze("메모리 반도체", &Credential::new("key"))
            .await
            .unwrap();

        assert_eq!(result, AnalysisResult::new("S", vec!["A".into()], vec!["B".into()]));
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_provider() {
        let mut provider = MockProvider::new();
        provider.expect_generate().never();

        let analyzer = analyzer_with(provider);
        let result = analyzer.analyze("desc", &Credential::new("  ")).await;

        assert!(matches!(result, Err(PanelError::CredentialMissing)));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(LLMError::InvalidApiKey));

        let result = analyzer_with(provider)
            .analyze("desc", &Credential::new("bad"))
            .await;

        assert!(matches!(
            result,
            Err(PanelError::Upstream(LLMError::InvalidApiKey))
        ));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(|_, _| Ok(GenerateResponse::empty()));

        let result = analyzer_with(provider)
            .analyze("desc", &Credential::new("key"))
            .await;

        assert!(matches!(result, Err(PanelError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let result = analyzer_answering(r#"{"strengths":"not a list"}"#)
            .analyze("desc", &Credential::new("key"))
            .await;

        assert!(matches!(result, Err(PanelError::MalformedResponse(_))));
    }

    #[test]
    fn test_build_request_uses_temperature() {
        let provider = MockProvider::new();
        let config = PanelConfig::builder().temperature(0.3).build().unwrap();
        let analyzer = BusinessAnalyzer::new(Arc::new(provider), &config).unwrap();

        let request = analyzer.build_request("조선업").unwrap();
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.model, config.model);
        assert_eq!(
            request.response_schema.and_then(|s| s.required),
            Some(vec![
                "summary".to_string(),
                "strengths".to_string(),
                "risks".to_string()
            ])
        );
    }
}
