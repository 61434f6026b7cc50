use serde::Serialize;

use crate::core::YearlyRecord;

const HUNDRED_MILLION: f64 = 100_000_000.0;
const TEN_MILLION: f64 = 10_000_000.0;
const TEN_THOUSAND: f64 = 10_000.0;

/// Abbreviates a won amount for the results table: `억` units from one
/// hundred million, `만` units from ten million, plain won below that.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if value >= HUNDRED_MILLION {
        format!("{:.1} 억", value / HUNDRED_MILLION)
    } else if value >= TEN_MILLION {
        format!("{} 만", group_thousands((value / TEN_THOUSAND).round() as i64))
    } else if value >= 1_000.0 {
        format!("{} 원", group_thousands(value.round() as i64))
    } else {
        format!("{} 원", value.trunc() as i64)
    }
}

/// Value-axis label for the chart.
pub fn format_axis_tick(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.1} B", value / 1e9)
    } else if value >= 1e6 {
        format!("{} M", (value / 1e6) as i64)
    } else {
        format!("{}", value as i64)
    }
}

pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A yearly record with its monetary columns formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub year: u32,
    pub monthly_invest_this_year: f64,
    pub cumulative_principal: String,
    pub total_asset: String,
    pub annual_dividend_after_tax: String,
    pub monthly_dividend_after_tax: String,
    pub annual_withdrawal_4pct: String,
    pub monthly_withdrawal_4pct: String,
}

impl From<&YearlyRecord> for DisplayRow {
    fn from(record: &YearlyRecord) -> Self {
        Self {
            year: record.year,
            monthly_invest_this_year: record.monthly_invest_this_year,
            cumulative_principal: format_currency(record.cumulative_principal),
            total_asset: format_currency(record.total_asset),
            annual_dividend_after_tax: format_currency(record.annual_dividend_after_tax),
            monthly_dividend_after_tax: format_currency(record.monthly_dividend_after_tax),
            annual_withdrawal_4pct: format_currency(record.annual_withdrawal_4pct),
            monthly_withdrawal_4pct: format_currency(record.monthly_withdrawal_4pct),
        }
    }
}

pub fn display_rows(records: &[YearlyRecord]) -> Vec<DisplayRow> {
    records.iter().map(DisplayRow::from).collect()
}

const TABLE_HEADERS: [&str; 8] = [
    "Year",
    "Monthly invest",
    "Principal",
    "Total asset",
    "Dividend/yr",
    "Dividend/mo",
    "4% withdrawal/yr",
    "4% withdrawal/mo",
];

/// Renders display rows as a right-aligned plain-text table.
pub fn render_table(rows: &[DisplayRow]) -> String {
    let cells: Vec<[String; 8]> = rows
        .iter()
        .map(|row| {
            [
                row.year.to_string(),
                group_thousands(row.monthly_invest_this_year.round() as i64),
                row.cumulative_principal.clone(),
                row.total_asset.clone(),
                row.annual_dividend_after_tax.clone(),
                row.monthly_dividend_after_tax.clone(),
                row.annual_withdrawal_4pct.clone(),
                row.monthly_withdrawal_4pct.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, TABLE_HEADERS.iter().copied(), &widths);
    let rule_len = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{cell}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&line);
    out.push('\n');
}
