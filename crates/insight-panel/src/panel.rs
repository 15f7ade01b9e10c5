//! Panel controller
//!
//! Owns the view state of the detail panel: the selected record, the analysis
//! phase and the credential. The analysis cycle is
//! `Idle → Loading → {Success | Error}`, and any record change returns to
//! `Idle`.
//!
//! Requests are tracked by a generation counter. [`PanelController::begin_analysis`]
//! hands out a ticket stamped with the current generation and record identity;
//! [`PanelController::settle`] only applies an outcome whose ticket still
//! matches. Selecting another record, closing the panel or starting a newer
//! request bumps the generation, so a late answer for an old request is
//! dropped instead of landing in the wrong view.

use crate::analyzer::BusinessAnalyzer;
use crate::error::{PanelError, Result};
use crate::language::Language;
use crate::model::{AnalysisResult, CompanyRecord};
use crate::view::{AnalysisPhase, PanelView};
use insight_llm::Credential;
use tracing::{debug, info, warn};

/// Whether a settled outcome reached the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The outcome now drives the view
    Applied,
    /// The view moved on; the outcome was dropped
    Discarded,
}

/// Snapshot of one in-flight analysis request
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    generation: u64,
    stock_code: String,
    description: String,
    credential: Credential,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Identity of the record the request was made for
    pub fn stock_code(&self) -> &str {
        &self.stock_code
    }

    /// Run the request this ticket describes
    pub async fn execute(&self, analyzer: &BusinessAnalyzer) -> Result<AnalysisResult> {
        analyzer.analyze(&self.description, &self.credential).await
    }
}

/// State holder for the detail panel
#[derive(Debug, Default)]
pub struct PanelController {
    record: Option<CompanyRecord>,
    phase: AnalysisPhase,
    credential: Credential,
    generation: u64,
    language: Language,
}

impl PanelController {
    /// Hidden panel with no credential
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn record(&self) -> Option<&CompanyRecord> {
        self.record.as_ref()
    }

    /// The panel is shown only while a record is selected
    pub fn is_visible(&self) -> bool {
        self.record.is_some()
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.phase.analysis()
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Replace the in-memory credential
    pub fn set_credential(&mut self, credential: impl Into<Credential>) {
        self.credential = credential.into();
    }

    pub fn clear_credential(&mut self) {
        self.credential = Credential::empty();
    }

    /// Whether the credential input and start button should be shown
    pub fn trigger_visible(&self) -> bool {
        self.is_visible() && !self.is_loading() && self.analysis().is_none()
    }

    /// Show `record`, or hide the panel on `None`
    ///
    /// Always returns the analysis cycle to `Idle`, even when the same record
    /// is selected again.
    pub fn select(&mut self, record: Option<CompanyRecord>) {
        match &record {
            Some(r) => debug!(stock_code = %r.stock_code, "Record selected"),
            None => debug!("Record cleared"),
        }
        self.record = record;
        self.reset_analysis();
    }

    /// Hide the panel and drop all derived state
    ///
    /// The credential is kept for the rest of the session.
    pub fn close(&mut self) {
        self.select(None);
    }

    fn reset_analysis(&mut self) {
        if self.phase.is_loading() {
            debug!(generation = self.generation, "Abandoning in-flight analysis");
        }
        self.phase = AnalysisPhase::Idle;
        self.generation += 1;
    }

    /// Start an analysis of the selected record
    ///
    /// With an empty credential the panel switches to its error state and no
    /// request is made.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket> {
        let Some(record) = &self.record else {
            return Err(PanelError::NoRecordSelected);
        };

        if self.phase.is_loading() {
            warn!(stock_code = %record.stock_code, "Analysis already in progress");
            return Err(PanelError::AnalysisInFlight);
        }

        if self.credential.is_empty() {
            let err = PanelError::CredentialMissing;
            self.phase = AnalysisPhase::Error(err.user_message(self.language));
            return Err(err);
        }

        self.generation += 1;
        let ticket = AnalysisTicket {
            generation: self.generation,
            stock_code: record.stock_code.clone(),
            description: record.biz_description_raw.clone(),
            credential: self.credential.clone(),
        };
        self.phase = AnalysisPhase::Loading;

        info!(
            stock_code = %ticket.stock_code,
            generation = ticket.generation,
            "Analysis started"
        );
        Ok(ticket)
    }

    /// Apply the outcome of a request if its ticket is still current
    pub fn settle(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisResult>,
    ) -> SettleOutcome {
        let current = ticket.generation == self.generation
            && self.phase.is_loading()
            && self
                .record
                .as_ref()
                .is_some_and(|r| r.stock_code == ticket.stock_code);

        if !current {
            debug!(
                stock_code = %ticket.stock_code,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "Discarding stale analysis outcome"
            );
            return SettleOutcome::Discarded;
        }

        self.phase = match outcome {
            Ok(result) => {
                info!(stock_code = %ticket.stock_code, "Analysis applied");
                AnalysisPhase::Success(result)
            }
            Err(err) => {
                warn!(stock_code = %ticket.stock_code, error = %err, "Analysis failed");
                AnalysisPhase::Error(err.user_message(self.language))
            }
        };
        SettleOutcome::Applied
    }

    /// Begin, execute and settle one analysis
    ///
    /// Errors are returned only when no request could be started; failures of
    /// the request itself end up in the error state of the panel.
    pub async fn request_analysis(&mut self, analyzer: &BusinessAnalyzer) -> Result<SettleOutcome> {
        let ticket = self.begin_analysis()?;
        let outcome = ticket.execute(analyzer).await;
        Ok(self.settle(ticket, outcome))
    }

    /// Render-ready view, `None` while hidden
    pub fn view(&self) -> Option<PanelView> {
        self.record
            .as_ref()
            .map(|record| PanelView::derive(record, &self.phase, self.language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::{MockProvider, analyzer_answering, analyzer_with};
    use insight_llm::{GenerateResponse, LLMError};

    const ANSWER: &str = r#"{"summary":"S","strengths":["A"],"risks":["B"]}"#;

    fn record(code: &str) -> CompanyRecord {
        CompanyRecord {
            stock_code: code.to_string(),
            corp_name: format!("Company {code}"),
            sector: "전기전자".to_string(),
            market: "KOSPI".to_string(),
            sales: 1_000.0,
            assets: 2_000.0,
            equity: 1_500.0,
            op_profit: 125.0,
            per: Some(10.0),
            roe: Some(7.5),
            biz_description_raw: format!("Business of {code}"),
        }
    }

    fn panel_with(code: &str) -> PanelController {
        let mut panel = PanelController::new(Language::Korean);
        panel.select(Some(record(code)));
        panel.set_credential("key");
        panel
    }

    #[tokio::test]
    async fn test_successful_request() {
        let mut panel = panel_with("005930");
        let analyzer = analyzer_answering(ANSWER);

        let outcome = panel.request_analysis(&analyzer).await.unwrap();

        assert_eq!(outcome, SettleOutcome::Applied);
        let analysis = panel.analysis().unwrap();
        assert_eq!(analysis.summary, "S");
        assert_eq!(analysis.strengths, vec!["A"]);
        assert_eq!(analysis.risks, vec!["B"]);
        assert!(!panel.is_loading());
        assert!(panel.error().is_none());
        assert!(!panel.trigger_visible());
    }

    #[tokio::test]
    async fn test_upstream_failure_sets_message() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(|_, _| {
                Err(LLMError::Status {
                    status: 503,
                    message: "The model is overloaded".into(),
                })
            });
        let analyzer = analyzer_with(provider);
        let mut panel = panel_with("005930");

        let outcome = panel.request_analysis(&analyzer).await.unwrap();

        assert_eq!(outcome, SettleOutcome::Applied);
        assert_eq!(
            panel.error(),
            Some("분석에 실패했습니다. 올바른 API Key인지 확인해주세요.")
        );
        assert!(!panel.is_loading());
        assert!(panel.analysis().is_none());
        assert!(panel.trigger_visible());
    }

    #[tokio::test]
    async fn test_empty_credential_makes_no_call() {
        let mut provider = MockProvider::new();
        provider.expect_generate().never();
        let analyzer = analyzer_with(provider);

        let mut panel = PanelController::new(Language::Korean);
        panel.select(Some(record("005930")));

        let result = panel.request_analysis(&analyzer).await;

        assert!(matches!(result, Err(PanelError::CredentialMissing)));
        assert_eq!(panel.error(), Some("Google Gemini API 키를 입력해주세요."));
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn test_select_clears_previous_analysis() {
        let mut panel = panel_with("005930");
        panel
            .request_analysis(&analyzer_answering(ANSWER))
            .await
            .unwrap();
        assert!(panel.analysis().is_some());

        panel.select(Some(record("000660")));

        assert_eq!(panel.phase(), &AnalysisPhase::Idle);
        assert!(panel.analysis().is_none());
        assert!(panel.error().is_none());
        assert!(panel.trigger_visible());
    }

    #[test]
    fn test_select_clears_error() {
        let mut panel = PanelController::new(Language::English);
        panel.select(Some(record("005930")));
        assert!(panel.begin_analysis().is_err());
        assert!(panel.error().is_some());

        panel.select(Some(record("005930")));
        assert!(panel.error().is_none());
    }

    #[test]
    fn test_second_trigger_while_loading_is_rejected() {
        let mut panel = panel_with("005930");

        let first = panel.begin_analysis().unwrap();
        assert!(panel.is_loading());
        assert!(!panel.trigger_visible());

        assert!(matches!(
            panel.begin_analysis(),
            Err(PanelError::AnalysisInFlight)
        ));
        assert!(panel.is_loading());

        let outcome = panel.settle(first, Ok(AnalysisResult::new("S", vec![], vec![])));
        assert_eq!(outcome, SettleOutcome::Applied);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let analyzer = analyzer_answering(ANSWER);
        let mut panel = panel_with("005930");

        let ticket = panel.begin_analysis().unwrap();
        panel.select(Some(record("000660")));

        let outcome = ticket.execute(&analyzer).await;
        assert!(outcome.is_ok());

        assert_eq!(panel.settle(ticket, outcome), SettleOutcome::Discarded);
        assert_eq!(panel.phase(), &AnalysisPhase::Idle);
        assert_eq!(panel.record().map(|r| r.stock_code.as_str()), Some("000660"));
    }

    #[test]
    fn test_stale_result_after_reselecting_same_record() {
        let mut panel = panel_with("005930");

        let stale = panel.begin_analysis().unwrap();
        panel.select(Some(record("005930")));
        let fresh = panel.begin_analysis().unwrap();

        assert_eq!(
            panel.settle(stale, Ok(AnalysisResult::new("old", vec![], vec![]))),
            SettleOutcome::Discarded
        );
        assert!(panel.is_loading());

        assert_eq!(
            panel.settle(fresh, Ok(AnalysisResult::new("new", vec![], vec![]))),
            SettleOutcome::Applied
        );
        assert_eq!(panel.analysis().map(|a| a.summary.as_str()), Some("new"));
    }

    #[test]
    fn test_close_clears_state_but_keeps_credential() {
        let mut panel = panel_with("005930");
        let ticket = panel.begin_analysis().unwrap();

        panel.close();

        assert!(!panel.is_visible());
        assert!(panel.view().is_none());
        assert_eq!(panel.phase(), &AnalysisPhase::Idle);
        assert!(!panel.credential().is_empty());
        assert_eq!(
            panel.settle(ticket, Err(PanelError::EmptyResponse)),
            SettleOutcome::Discarded
        );
        assert!(matches!(
            panel.begin_analysis(),
            Err(PanelError::NoRecordSelected)
        ));
    }

    #[tokio::test]
    async fn test_retry_after_error() {
        let mut provider = MockProvider::new();
        let mut calls = 0;
        provider.expect_generate().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(GenerateResponse::empty())
            } else {
                Ok(GenerateResponse::text(ANSWER))
            }
        });
        let analyzer = analyzer_with(provider);
        let mut panel = panel_with("005930");

        panel.request_analysis(&analyzer).await.unwrap();
        assert!(panel.error().is_some());

        panel.request_analysis(&analyzer).await.unwrap();
        assert!(panel.error().is_none());
        assert_eq!(panel.analysis().map(|a| a.summary.as_str()), Some("S"));
    }

    #[test]
    fn test_view_derivation() {
        let mut panel = panel_with("005930");
        let view = panel.view().unwrap();

        assert_eq!(view.operating_margin, "12.5");
        assert_eq!(view.per, "10.0");
        assert_eq!(view.roe, "7.5");
        assert_eq!(view.chart.len(), 3);
        assert_eq!(
            view.chart.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![1_000.0, 2_000.0, 1_500.0]
        );
        assert!(view.trigger_visible);

        panel.begin_analysis().unwrap();
        let view = panel.view().unwrap();
        assert_eq!(view.analysis, AnalysisPhase::Loading);
        assert!(!view.trigger_visible);
    }
}
