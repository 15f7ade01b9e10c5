//! Derived, render-ready view of the panel

use crate::language::Language;
use crate::metrics::{self, ChartPoint};
use crate::model::{AnalysisResult, CompanyRecord};
use serde::Serialize;

/// Where the analysis request cycle currently stands
///
/// Holding the result and the error message in one enum means they can never
/// both be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Loading,
    Success(AnalysisResult),
    Error(String),
}

impl AnalysisPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisPhase::Loading)
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisPhase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisPhase::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything a front end needs to draw the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub stock_code: String,
    pub corp_name: String,
    pub sector: String,
    pub market: String,
    /// Operating margin, one decimal, no percent sign
    pub operating_margin: String,
    /// PER with one decimal or `-`
    pub per: String,
    /// ROE with one decimal or `-`
    pub roe: String,
    pub chart: Vec<ChartPoint>,
    pub description: String,
    /// Whether the credential input and the start button are shown
    pub trigger_visible: bool,
    pub analysis: AnalysisPhase,
}

impl PanelView {
    /// Derive the view of `record` in the given analysis phase
    pub fn derive(record: &CompanyRecord, phase: &AnalysisPhase, language: Language) -> Self {
        Self {
            stock_code: record.stock_code.clone(),
            corp_name: record.corp_name.clone(),
            sector: record.sector.clone(),
            market: record.market.clone(),
            operating_margin: metrics::operating_margin_display(record),
            per: metrics::format_optional(record.per),
            roe: metrics::format_optional(record.roe),
            chart: metrics::chart_series(record, language).into(),
            description: record.biz_description_raw.clone(),
            trigger_visible: !phase.is_loading() && phase.analysis().is_none(),
            analysis: phase.clone(),
        }
    }
}
