//! Versioned instruction template for business analysis
//!
//! The instruction prefix is data rather than code: a MiniJinja template that
//! receives the raw business description as `description`. Built-in defaults
//! exist per language and a custom body can be loaded from a file.

use crate::error::{PanelError, Result};
use crate::language::Language;
use minijinja::{Environment, context};
use std::path::Path;

/// Name of the business analysis template
pub const BUSINESS_ANALYSIS: &str = "business_analysis";

/// Version of the built-in templates
pub const DEFAULT_VERSION: &str = "2025.1";

const KOREAN_BODY: &str = "\
당신은 한국 상장기업을 분석하는 증권사 애널리스트입니다. \
아래는 어느 상장기업 사업보고서의 '사업의 내용' 원문입니다. \
이 기업의 비즈니스 모델을 2~3문장으로 요약(summary)하고, \
핵심 강점(strengths)과 주요 리스크 요인(risks)을 각각 3개 이내의 짧은 문장으로 정리하세요. \
모든 답변은 한국어로, 지정된 JSON 형식으로만 작성하세요.
{{ description }}";

const ENGLISH_BODY: &str = "\
You are an equity analyst covering listed Korean companies. \
Below is the original 'business description' section of a company's annual report. \
Summarize the business model in two or three sentences (summary), \
then list up to three key strengths (strengths) and up to three major risk factors (risks) as short sentences. \
Answer in English, using only the requested JSON format.
{{ description }}";

/// A named, versioned prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    version: String,
    language: Language,
    body: String,
}

impl PromptTemplate {
    /// Create a template, checking its syntax
    ///
    /// The body must reference `{{ description }}`.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        language: Language,
        body: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let body = body.into();

        Environment::new()
            .template_from_str(&body)
            .map_err(|e| PanelError::Prompt(format!("failed to parse template '{name}': {e}")))?;

        if !body.contains("description") {
            return Err(PanelError::Prompt(format!(
                "template '{name}' must reference {{{{ description }}}}"
            )));
        }

        Ok(Self {
            name,
            version: version.into(),
            language,
            body,
        })
    }

    /// Built-in business analysis template for `language`
    pub fn business_analysis(language: Language) -> Self {
        let body = match language {
            Language::Korean => KOREAN_BODY,
            Language::English => ENGLISH_BODY,
        };

        Self {
            name: BUSINESS_ANALYSIS.to_string(),
            version: DEFAULT_VERSION.to_string(),
            language,
            body: body.to_string(),
        }
    }

    /// Load a custom body from a file
    ///
    /// The version is taken from the file name, e.g. `analysis.v3.j2` gives `v3`.
    pub fn from_file(path: impl AsRef<Path>, language: Language) -> Result<Self> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|e| {
            PanelError::Prompt(format!("failed to read template '{}': {e}", path.display()))
        })?;

        let version = path
            .file_stem()
            .and_then(|stem| Path::new(stem).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or("custom")
            .to_string();

        Self::new(BUSINESS_ANALYSIS, version, language, body)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Raw template body (for inspection)
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render the prompt for a business description
    pub fn render(&self, description: &str) -> Result<String> {
        Environment::new()
            .render_str(&self.body, context! { description => description })
            .map_err(|e| PanelError::Prompt(format!("failed to render '{}': {e}", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_prompt_is_prefix_then_description() {
        let template = PromptTemplate::business_analysis(Language::Korean);
        let prompt = template.render("반도체 메모리 제조").unwrap();

        let (instruction, description) = prompt.rsplit_once('\n').unwrap();
        assert!(instruction.contains("summary"));
        assert!(instruction.contains("strengths"));
        assert!(instruction.contains("risks"));
        assert_eq!(description, "반도체 메모리 제조");
        assert_eq!(template.version(), DEFAULT_VERSION);
    }

    #[test]
    fn test_description_is_not_interpreted() {
        let template = PromptTemplate::business_analysis(Language::English);
        let prompt = template.render("Revenue {{ 1 + 1 }} <b>").unwrap();
        assert!(prompt.ends_with("\nRevenue {{ 1 + 1 }} <b>"));
    }

    #[test]
    fn test_description_trailing_newline_is_kept() {
        let template = PromptTemplate::business_analysis(Language::Korean);
        let prompt = template.render("조선업\n").unwrap();
        assert!(prompt.ends_with("\n조선업\n"));
    }

    #[test]
    fn test_invalid_templates_rejected() {
        assert!(matches!(
            PromptTemplate::new("bad", "1", Language::English, "{% if %}"),
            Err(PanelError::Prompt(_))
        ));
        assert!(matches!(
            PromptTemplate::new("bad", "1", Language::English, "No placeholder"),
            Err(PanelError::Prompt(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.v3.j2");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "Analyze briefly:\n{{{{ description }}}}").unwrap();

        let template = PromptTemplate::from_file(&path, Language::English).unwrap();
        assert_eq!(template.version(), "v3");
        assert_eq!(template.name(), BUSINESS_ANALYSIS);
        assert_eq!(template.render("Shipbuilding").unwrap(), "Analyze briefly:\nShipbuilding");
    }

    #[test]
    fn test_missing_file() {
        let result = PromptTemplate::from_file("/nonexistent/prompt.j2", Language::Korean);
        assert!(matches!(result, Err(PanelError::Prompt(_))));
    }
}
