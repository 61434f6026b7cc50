use std::fs;
use std::path::Path;

use serde::Serialize;

use super::export::ExportError;
use super::format::format_axis_tick;
use crate::core::YearlyRecord;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Bar offsets and width in year units.
const BAR_OFFSET: f64 = 0.2;
const BAR_WIDTH: f64 = 0.35;

const ASSET_COLOR: &str = "#1f77b4";
const WITHDRAWAL_COLOR: &str = "#ff7f0e";

pub const ASSET_LABEL: &str = "Total Asset";
pub const WITHDRAWAL_LABEL: &str = "Annual withdrawal of 4%";

/// Two parallel bar series indexed by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub years: Vec<u32>,
    pub total_asset: Vec<f64>,
    pub annual_withdrawal: Vec<f64>,
}

impl ChartData {
    pub fn from_records(records: &[YearlyRecord]) -> Self {
        Self {
            years: records.iter().map(|r| r.year).collect(),
            total_asset: records.iter().map(|r| r.total_asset).collect(),
            annual_withdrawal: records.iter().map(|r| r.annual_withdrawal_4pct).collect(),
        }
    }

    fn max_value(&self) -> f64 {
        self.total_asset
            .iter()
            .chain(self.annual_withdrawal.iter())
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueAxis {
    step: f64,
    top: f64,
}

impl ValueAxis {
    fn for_max(max: f64) -> Self {
        if max <= 0.0 {
            return Self { step: 1.0, top: 1.0 };
        }
        let step = nice_step(max / 5.0);
        Self {
            step,
            top: (max / step).ceil() * step,
        }
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        let count = (self.top / self.step).round() as usize;
        (0..=count).map(move |i| i as f64 * self.step)
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Renders grouped bars (total asset left, 4% withdrawal right) as SVG.
/// Non-finite values are skipped; an empty chart still draws its axes.
pub fn render_svg(data: &ChartData) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let slots = data.years.len().max(1) as f64;
    let axis = ValueAxis::for_max(data.max_value());

    let x_px = |x: f64| MARGIN_LEFT + (x - 0.5) / slots * plot_w;
    let y_px = |v: f64| baseline - v / axis.top * plot_h;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    ));
    svg.push('\n');

    for tick in axis.ticks() {
        let y = y_px(tick);
        svg.push_str(&format!(
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#e0e0e0"/>"##,
            MARGIN_LEFT + plot_w
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_axis_tick(tick)
        ));
        svg.push('\n');
    }

    let bar_px = BAR_WIDTH / slots * plot_w;
    let label_every = if data.years.len() <= 20 { 1 } else { 5 };
    for (idx, &year) in data.years.iter().enumerate() {
        let x = year as f64;
        for (series, offset, color) in [
            (&data.total_asset, -BAR_OFFSET, ASSET_COLOR),
            (&data.annual_withdrawal, BAR_OFFSET, WITHDRAWAL_COLOR),
        ] {
            let Some(&value) = series.get(idx) else {
                continue;
            };
            if !value.is_finite() || value <= 0.0 {
                continue;
            }
            let top = y_px(value);
            svg.push_str(&format!(
                r#"<rect x="{:.2}" y="{top:.2}" width="{bar_px:.2}" height="{:.2}" fill="{color}"/>"#,
                x_px(x + offset) - bar_px / 2.0,
                baseline - top
            ));
        }
        if year == 1 || year % label_every == 0 {
            svg.push_str(&format!(
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{year}</text>"#,
                x_px(x),
                baseline + 16.0
            ));
        }
        svg.push('\n');
    }

    svg.push_str(&format!(
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{:.2}" y2="{baseline}" stroke="black"/>"#,
        MARGIN_LEFT + plot_w
    ));
    svg.push_str(&format!(
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline}" stroke="black"/>"#
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">Year</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 16.0
    ));
    svg.push_str(&format!(
        r#"<text x="20" y="{:.2}" text-anchor="middle" transform="rotate(-90 20 {:.2})">Won</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    ));
    svg.push('\n');

    let legend_x = MARGIN_LEFT + 12.0;
    for (row, (label, color)) in [(ASSET_LABEL, ASSET_COLOR), (WITHDRAWAL_LABEL, WITHDRAWAL_COLOR)]
        .into_iter()
        .enumerate()
    {
        let y = MARGIN_TOP + 8.0 + row as f64 * 18.0;
        svg.push_str(&format!(
            r#"<rect x="{legend_x}" y="{y}" width="12" height="12" fill="{color}"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}">{label}</text>"#,
            legend_x + 18.0,
            y + 10.0
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn write_svg(path: &Path, data: &ChartData) -> Result<(), ExportError> {
    fs::write(path, render_svg(data)).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), bars = data.years.len(), "wrote projection chart");
    Ok(())
}
