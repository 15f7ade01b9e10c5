//! In-memory directory of company records

use crate::error::{PanelError, Result};
use crate::model::CompanyRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Company records indexed by stock code, in file order
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    records: Vec<CompanyRecord>,
    by_code: HashMap<String, usize>,
}

impl CompanyDirectory {
    /// Build from records; a repeated stock code replaces the earlier entry
    pub fn new(records: impl IntoIterator<Item = CompanyRecord>) -> Self {
        let mut directory = Self::default();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    fn insert(&mut self, record: CompanyRecord) {
        if let Some(&index) = self.by_code.get(&record.stock_code) {
            warn!(stock_code = %record.stock_code, "Duplicate stock code, keeping the later record");
            self.records[index] = record;
        } else {
            self.by_code.insert(record.stock_code.clone(), self.records.len());
            self.records.push(record);
        }
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CompanyRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Load a JSON array of records from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let directory = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), records = directory.len(), "Company data loaded");
        Ok(directory)
    }

    pub fn get(&self, stock_code: &str) -> Option<&CompanyRecord> {
        self.by_code
            .get(stock_code.trim())
            .map(|&index| &self.records[index])
    }

    /// Like [`Self::get`], failing with `RecordNotFound`
    pub fn require(&self, stock_code: &str) -> Result<&CompanyRecord> {
        self.get(stock_code)
            .ok_or_else(|| PanelError::RecordNotFound(stock_code.trim().to_string()))
    }

    /// Records whose name or stock code contains `query`, ignoring case
    ///
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&CompanyRecord> {
        let query = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                query.is_empty()
                    || r.corp_name.to_lowercase().contains(&query)
                    || r.stock_code.contains(&query)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DATA: &str = r#"[
        {"stock_code": "005930", "corp_name": "삼성전자", "sector": "전기전자", "market": "KOSPI",
         "sales": 3008709, "assets": 5145319, "equity": 4023192, "op_profit": 327260,
         "per": 13.2, "roe": 4.1, "biz_description_raw": "메모리 반도체와 스마트폰"},
        {"stock_code": "035720", "corp_name": "Kakao", "sector": "IT", "market": "KOSPI",
         "sales": 75570, "assets": 257000, "equity": 150000, "op_profit": 5019},
        {"stock_code": "005930", "corp_name": "삼성전자", "sales": 1}
    ]"#;

    #[test]
    fn test_load_and_lookup() {
        let directory = CompanyDirectory::from_json_str(DATA).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get(" 035720 ").map(|r| r.corp_name.as_str()), Some("Kakao"));
        // later duplicate wins
        assert_eq!(directory.get("005930").map(|r| r.sales), Some(1.0));
        assert!(matches!(
            directory.require("999999"),
            Err(PanelError::RecordNotFound(code)) if code == "999999"
        ));
    }

    #[test]
    fn test_search() {
        let directory = CompanyDirectory::from_json_str(DATA).unwrap();

        assert_eq!(directory.search("kak").len(), 1);
        assert_eq!(directory.search("삼성").len(), 1);
        assert_eq!(directory.search("0059").len(), 1);
        assert_eq!(directory.search("").len(), 2);
        assert!(directory.search("hyundai").is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATA.as_bytes()).unwrap();

        let directory = CompanyDirectory::from_path(file.path()).unwrap();
        assert_eq!(directory.iter().count(), 2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CompanyDirectory::from_json_str("{\"not\": \"an array\"}"),
            Err(PanelError::Json(_))
        ));
    }
}
