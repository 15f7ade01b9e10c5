//! Metrics derived from a company record

use crate::language::Language;
use crate::model::CompanyRecord;
use serde::Serialize;

/// One bar of the financial chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Operating profit over sales, in percent; 0 when sales are not positive
pub fn operating_margin(record: &CompanyRecord) -> f64 {
    if record.sales > 0.0 {
        record.op_profit / record.sales * 100.0
    } else {
        0.0
    }
}

/// Operating margin rounded to one decimal, e.g. `"12.5"`
pub fn operating_margin_display(record: &CompanyRecord) -> String {
    format_one_decimal(operating_margin(record))
}

/// `value` with exactly one decimal, exact halves rounded away from zero
///
/// `{:.1}` already rounds on the exact binary value but settles exact ties to
/// even. Only odd multiples of 0.25 are exact ties at one decimal.
pub fn format_one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (value * 10.0).round() / 10.0);
    }
    format!("{value:.1}")
}

/// An optional ratio with one decimal, `-` when absent
pub fn format_optional(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map_or_else(|| "-".to_string(), format_one_decimal)
}

/// Sales, assets and equity, in that order
pub fn chart_series(record: &CompanyRecord, language: Language) -> [ChartPoint; 3] {
    let [sales, assets, equity] = language.labels().chart;
    [
        ChartPoint {
            label: sales.to_string(),
            value: record.sales,
        },
        ChartPoint {
            label: assets.to_string(),
            value: record.assets,
        },
        ChartPoint {
            label: equity.to_string(),
            value: record.equity,
        },
    ]
}

/// Thousands-separated amount with at most three fraction digits
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.3}", value.abs());
    let (integer, fraction) = formatted.split_once('.').unwrap_or((&formatted, ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (grouped != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
