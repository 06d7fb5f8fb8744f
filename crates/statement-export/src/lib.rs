//! Spreadsheet and CSV downloads: annual statements filtered to selected
//! fiscal years, and the interest-rate panel.

pub mod rates;
pub mod sheet;
pub mod statement;

use report_core::SourceError;
use thiserror::Error;

pub use rates::{export_rates, rates_sheets};
pub use sheet::{write_csv, write_xlsx, Cell, Sheet};
pub use statement::{
    default_years, export_filename, export_statement, fetch_and_export, parse_years, select_years,
    statement_sheet,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid type")]
    InvalidKind(String),

    #[error("No data available")]
    NoData,

    #[error("Selected years not available in data")]
    NoSelection,

    #[error("Failed to fetch statement: {0}")]
    Source(SourceError),

    #[error("Failed to write file: {0}")]
    Write(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Write(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Write(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// Anything other than `csv` falls back to a workbook.
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Xlsx
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_param() {
        assert_eq!(ExportFormat::from_param("csv"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_param(" CSV "), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_param("xlsx"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_param("pdf"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::default().extension(), "xlsx");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ExportError::InvalidKind("foo".into()).to_string(), "Invalid type");
        assert_eq!(ExportError::NoData.to_string(), "No data available");
        assert_eq!(
            ExportError::NoSelection.to_string(),
            "Selected years not available in data"
        );
    }
}
