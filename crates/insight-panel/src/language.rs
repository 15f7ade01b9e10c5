//! Display language and the strings shown to the user

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the panel's labels, messages and default prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Korean,
    English,
}

/// Fixed user-facing strings for one language
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub financials: &'static str,
    pub operating_margin: &'static str,
    pub per: &'static str,
    pub roe: &'static str,
    pub description: &'static str,
    pub analysis_title: &'static str,
    pub start_analysis: &'static str,
    pub loading: &'static str,
    pub strengths: &'static str,
    pub risks: &'static str,
    pub credential_placeholder: &'static str,
    pub credential_hint: &'static str,
    /// Chart labels for sales, assets, equity
    pub chart: [&'static str; 3],
    pub credential_missing: &'static str,
    pub analysis_failed: &'static str,
}

const KOREAN: Labels = Labels {
    financials: "재무 현황 (단위: 억원)",
    operating_margin: "영업이익률",
    per: "PER",
    roe: "ROE",
    description: "사업 내용 (원문)",
    analysis_title: "Gemini 기업 분석",
    start_analysis: "분석 시작",
    loading: "기업 데이터를 분석중입니다...",
    strengths: "주요 강점",
    risks: "리스크 요인",
    credential_placeholder: "Gemini API Key를 입력하세요 (저장되지 않음)",
    credential_hint: "* API Key는 메모리에만 보관되며 어디에도 저장되지 않습니다.",
    chart: ["매출", "자산", "자본"],
    credential_missing: "Google Gemini API 키를 입력해주세요.",
    analysis_failed: "분석에 실패했습니다. 올바른 API Key인지 확인해주세요.",
};

const ENGLISH: Labels = Labels {
    financials: "Financials (unit: 100M KRW)",
    operating_margin: "Operating margin",
    per: "PER",
    roe: "ROE",
    description: "Business description (original)",
    analysis_title: "Gemini business analysis",
    start_analysis: "Start analysis",
    loading: "Analyzing company data...",
    strengths: "Key strengths",
    risks: "Risk factors",
    credential_placeholder: "Enter your Gemini API key (not stored)",
    credential_hint: "* The API key is kept in memory only and never written anywhere.",
    chart: ["Sales", "Assets", "Equity"],
    credential_missing: "Please enter your Google Gemini API key.",
    analysis_failed: "Analysis failed. Please check that the API key is valid.",
};

impl Language {
    /// ISO 639-1 code
    pub fn code(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
        }
    }

    /// Parse an ISO 639-1 code or common name
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" | "한국어" | "ko-kr" => Some(Language::Korean),
            "en" | "english" | "en-us" => Some(Language::English),
            _ => None,
        }
    }

    /// Strings for this language
    pub fn labels(self) -> &'static Labels {
        match self {
            Language::Korean => &KOREAN,
            Language::English => &ENGLISH,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unsupported language '{s}' (expected ko or en)"))
    }
}
