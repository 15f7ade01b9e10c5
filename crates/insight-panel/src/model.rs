//! Company record and analysis result types

use serde::{Deserialize, Serialize};

/// One company's financial and textual data set
///
/// Amounts are in units of 100M KRW. Field names follow the upstream data
/// export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Exchange ticker, used as the record identity
    pub stock_code: String,
    /// Display name
    pub corp_name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub sales: f64,
    #[serde(default)]
    pub assets: f64,
    #[serde(default)]
    pub equity: f64,
    /// Operating profit
    #[serde(default)]
    pub op_profit: f64,
    /// Price/earnings ratio
    #[serde(default)]
    pub per: Option<f64>,
    /// Return on equity, percent
    #[serde(default)]
    pub roe: Option<f64>,
    /// Raw business description from the annual report
    #[serde(default)]
    pub biz_description_raw: String,
}

/// Summary, strengths and risks produced by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
}

impl AnalysisResult {
    pub fn new(summary: impl Into<String>, strengths: Vec<String>, risks: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            strengths,
            risks,
        }
    }
}
