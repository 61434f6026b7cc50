//! Presentation of projection results: display formatting, CSV export and
//! the bar chart. Nothing here feeds back into the engine.

mod chart;
mod export;
mod format;

pub use chart::{ASSET_LABEL, ChartData, WITHDRAWAL_LABEL, render_svg, write_svg};
pub use export::{CSV_FILE_NAME, CSV_HEADERS, ExportError, records_to_csv, write_csv};
pub use format::{
    DisplayRow, display_rows, format_axis_tick, format_currency, group_thousands, render_table,
};
