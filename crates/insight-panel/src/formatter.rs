//! Panel rendering for terminal and machine output

use crate::language::Language;
use crate::metrics::format_amount;
use crate::model::CompanyRecord;
use crate::view::{AnalysisPhase, PanelView};
use comfy_table::{Table, presets::UTF8_FULL};

const BAR_WIDTH: usize = 30;

/// Output target of the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait Formatter: Send + Sync {
    fn format(&self) -> OutputFormat;
    fn format_panel(&self, view: &PanelView, language: Language) -> String;
    fn format_listing(&self, records: &[&CompanyRecord]) -> String;
    fn format_error(&self, error: &str) -> String;
}

pub struct TextFormatter;

impl TextFormatter {
    fn chart(view: &PanelView) -> String {
        let max = view
            .chart
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let label_width = view.chart.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);

        let mut output = String::new();
        for point in &view.chart {
            let len = if max > 0.0 && point.value > 0.0 {
                ((point.value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let pad = label_width - point.label.chars().count();
            output.push_str(&format!(
                "  {}{} {} {}\n",
                point.label,
                " ".repeat(pad),
                "█".repeat(len.max(usize::from(point.value > 0.0))),
                format_amount(point.value)
            ));
        }
        output
    }

    fn analysis(view: &PanelView, language: Language) -> String {
        let labels = language.labels();
        let mut output = format!("[{}]\n", labels.analysis_title);

        if view.trigger_visible {
            output.push_str(&format!("  > {} (/analyze)\n", labels.start_analysis));
            output.push_str(&format!("  {} (/key)\n", labels.credential_placeholder));
            output.push_str(&format!("  {}\n", labels.credential_hint));
        }

        match &view.analysis {
            AnalysisPhase::Idle => {}
            AnalysisPhase::Loading => output.push_str(&format!("  {}\n", labels.loading)),
            AnalysisPhase::Error(message) => output.push_str(&format!("  ! {message}\n")),
            AnalysisPhase::Success(result) => {
                output.push_str(&format!("  \"{}\"\n\n", result.summary));
                output.push_str(&format!("  {}\n", labels.strengths));
                for strength in &result.strengths {
                    output.push_str(&format!("   + {strength}\n"));
                }
                output.push_str(&format!("\n  {}\n", labels.risks));
                for risk in &result.risks {
                    output.push_str(&format!("   - {risk}\n"));
                }
            }
        }
        output
    }
}

impl Formatter for TextFormatter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn format_panel(&self, view: &PanelView, language: Language) -> String {
        let labels = language.labels();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![labels.operating_margin, labels.per, labels.roe])
            .add_row(vec![
                format!("{}%", view.operating_margin),
                format!("{}x", view.per),
                format!("{}%", view.roe),
            ]);

        format!(
            "{} ({})\n{} | {}\n\n[{}]\n{}{table}\n\n[{}]\n{}\n\n{}",
            view.corp_name,
            view.stock_code,
            view.sector,
            view.market,
            labels.financials,
            Self::chart(view),
            labels.description,
            view.description,
            Self::analysis(view, language)
        )
    }

    fn format_listing(&self, records: &[&CompanyRecord]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Code", "Name", "Sector", "Market"]);
        for record in records {
            table.add_row(vec![
                record.stock_code.as_str(),
                record.corp_name.as_str(),
                record.sector.as_str(),
                record.market.as_str(),
            ]);
        }
        table.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format_panel(&self, view: &PanelView, _language: Language) -> String {
        serde_json::to_string_pretty(view).unwrap_or_else(|e| self.format_error(&e.to_string()))
    }

    fn format_listing(&self, records: &[&CompanyRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|e| self.format_error(&e.to_string()))
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}
