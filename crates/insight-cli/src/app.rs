//! Interactive front end state

use crate::commands::Command;
use insight_panel::{
    BusinessAnalyzer, CompanyDirectory, Formatter, FormatterFactory, Language, OutputFormat,
    PanelController, PanelError,
};
use tracing::debug;

/// What the REPL should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text
    Output(String),
    /// Read the API key without echo, then hand it to [`App::set_credential`]
    ReadCredential,
    Exit,
}

/// Directory, panel and analyzer wired together
pub struct App {
    directory: CompanyDirectory,
    panel: PanelController,
    analyzer: BusinessAnalyzer,
    formatter: Box<dyn Formatter>,
}

impl App {
    pub fn new(
        directory: CompanyDirectory,
        analyzer: BusinessAnalyzer,
        language: Language,
        format: OutputFormat,
    ) -> Self {
        Self {
            directory,
            panel: PanelController::new(language),
            analyzer,
            formatter: FormatterFactory::create(format),
        }
    }

    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    pub fn set_credential(&mut self, credential: impl Into<insight_panel::Credential>) {
        self.panel.set_credential(credential);
    }

    /// Prompt line showing the selected company
    pub fn prompt(&self) -> String {
        match self.panel.record() {
            Some(record) => format!("{} ({})> ", record.corp_name, record.stock_code),
            None => "insight> ".to_string(),
        }
    }

    /// Current panel, or an error when nothing is selected
    pub fn render(&self) -> String {
        match self.panel.view() {
            Some(view) => self.formatter.format_panel(&view, self.panel.language()),
            None => self
                .formatter
                .format_error(&PanelError::NoRecordSelected.to_string()),
        }
    }

    fn error(&self, err: &PanelError) -> String {
        self.formatter
            .format_error(&err.user_message(self.panel.language()))
    }

    /// Select a record by stock code
    pub fn select(&mut self, code: &str) -> Result<(), PanelError> {
        let record = self.directory.require(code)?.clone();
        self.panel.select(Some(record));
        Ok(())
    }

    /// Run one analysis of the shown record and render the result
    pub async fn analyze(&mut self) -> String {
        match self.panel.request_analysis(&self.analyzer).await {
            Ok(outcome) => {
                debug!(?outcome, "Analysis settled");
                self.render()
            }
            // the panel already shows the credential message
            Err(PanelError::CredentialMissing) => self.render(),
            Err(err) => self.error(&err),
        }
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::List { query } => {
                let records = self.directory.search(&query);
                Reply::Output(self.formatter.format_listing(&records))
            }
            Command::Select { code } => match self.select(&code) {
                Ok(()) => Reply::Output(self.render()),
                Err(err) => Reply::Output(self.error(&err)),
            },
            Command::Key => Reply::ReadCredential,
            Command::ForgetKey => {
                self.panel.clear_credential();
                Reply::Output("API key forgotten.".to_string())
            }
            Command::Analyze => Reply::Output(self.analyze().await),
            Command::Show => Reply::Output(self.render()),
            Command::Close => {
                self.panel.close();
                Reply::Output("Panel closed.".to_string())
            }
            Command::Help => Reply::Output(Command::help().to_string()),
            Command::Exit => Reply::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insight_llm::{Credential, GenerateRequest, GenerateResponse, LLMProvider};
    use insight_panel::PromptTemplate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DATA: &str = r#"[
        {"stock_code": "005930", "corp_name": "삼성전자", "sector": "전기전자", "market": "KOSPI",
         "sales": 3000, "assets": 6000, "equity": 4000, "op_profit": 300,
         "biz_description_raw": "메모리 반도체"}
    ]"#;

    struct FixedProvider {
        answer: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LLMProvider for FixedProvider {
        async fn generate(
            &self,
            _request: GenerateRequest,
            _credential: &Credential,
        ) -> insight_llm::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GenerateResponse::text(self.answer))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn app(calls: Arc<AtomicUsize>) -> App {
        let provider = FixedProvider {
            answer: r#"{"summary":"메모리 1위","strengths":["규모"],"risks":["업황"]}"#,
            calls,
        };
        let analyzer = BusinessAnalyzer::with_template(
            Arc::new(provider),
            PromptTemplate::business_analysis(Language::Korean),
            "gemini-2.5-flash",
        );
        App::new(
            CompanyDirectory::from_json_str(DATA).unwrap(),
            analyzer,
            Language::Korean,
            OutputFormat::Text,
        )
    }

    #[tokio::test]
    async fn test_select_and_analyze() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(calls.clone());

        let Reply::Output(panel) = app.handle(Command::Select { code: "005930".into() }).await else {
            panic!("expected output");
        };
        assert!(panel.contains("삼성전자 (005930)"));
        assert_eq!(app.prompt(), "삼성전자 (005930)> ");

        assert_eq!(app.handle(Command::Key).await, Reply::ReadCredential);
        app.set_credential("key");

        let Reply::Output(panel) = app.handle(Command::Analyze).await else {
            panic!("expected output");
        };
        assert!(panel.contains("메모리 1위"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_without_key_shows_message() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(calls.clone());
        app.select("005930").unwrap();

        let output = app.analyze().await;

        assert!(output.contains("Google Gemini API 키를 입력해주세요."));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_code_and_close() {
        let mut app = app(Arc::new(AtomicUsize::new(0)));

        let reply = app.handle(Command::Select { code: "999999".into() }).await;
        assert_eq!(
            reply,
            Reply::Output("❌ Error: No company with stock code 999999".to_string())
        );

        app.select("005930").unwrap();
        app.handle(Command::Close).await;
        assert!(!app.panel().is_visible());
        assert_eq!(app.handle(Command::Exit).await, Reply::Exit);
    }
}
