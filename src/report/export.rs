use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::core::YearlyRecord;

/// Suggested file name for downloads.
pub const CSV_FILE_NAME: &str = "retirement_simulation.csv";

/// Spreadsheet tools need the marker to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADERS: [&str; 8] = [
    "year",
    "monthlyInvestThisYear",
    "cumulativePrincipal",
    "totalAsset",
    "annualDividendAfterTax",
    "monthlyDividendAfterTax",
    "annualWithdrawal4pct",
    "monthlyWithdrawal4pct",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Flush(#[from] std::io::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encodes the raw records as a BOM-prefixed CSV document. The header row
/// is written even when there are no records.
pub fn records_to_csv(records: &[YearlyRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        wtr.write_record(CSV_HEADERS)?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

pub fn write_csv(path: &Path, records: &[YearlyRecord]) -> Result<(), ExportError> {
    let bytes = records_to_csv(records)?;
    fs::write(path, &bytes).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        "exported projection CSV"
    );
    Ok(())
}
