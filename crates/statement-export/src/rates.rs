use report_core::RatesPanel;

use crate::sheet::{write_csv, write_xlsx, Sheet};
use crate::{ExportError, ExportFile, ExportFormat};

const RATES_FILE_STEM: &str = "interest_rates";

/// Treasury, central-bank and inflation tables; empty sections are left out.
pub fn rates_sheets(panel: &RatesPanel) -> Vec<Sheet> {
    let mut treasury = Sheet::new("Treasury", &["maturity", "yield", "change"]);
    for t in &panel.treasury_yields {
        treasury.rows.push(vec![
            t.maturity.as_str().into(),
            t.yield_pct.as_str().into(),
            t.change.as_str().into(),
        ]);
    }

    let mut central_banks = Sheet::new("Central Banks", &["country", "bank", "rate", "lastChange"]);
    for cb in &panel.central_bank_rates {
        central_banks.rows.push(vec![
            cb.country.as_str().into(),
            cb.bank.as_str().into(),
            cb.rate.as_str().into(),
            cb.last_change.as_str().into(),
        ]);
    }

    let mut inflation = Sheet::new("Inflation", &["country", "rate", "lastUpdate"]);
    for i in &panel.inflation_rates {
        inflation.rows.push(vec![
            i.country.as_str().into(),
            i.rate.as_str().into(),
            i.last_update.as_str().into(),
        ]);
    }

    [treasury, central_banks, inflation]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect()
}

fn csv_title(sheet: &Sheet) -> &str {
    match sheet.name.as_str() {
        "Treasury" => "Treasury Yields",
        "Central Banks" => "Central Bank Rates",
        "Inflation" => "Inflation Rates",
        other => other,
    }
}

/// Rates panel as a multi-section CSV or one workbook sheet per section.
pub fn export_rates(panel: &RatesPanel, format: ExportFormat) -> Result<ExportFile, ExportError> {
    let sheets = rates_sheets(panel);
    if sheets.is_empty() {
        return Err(ExportError::NoData);
    }

    let bytes = match format {
        ExportFormat::Xlsx => write_xlsx(&sheets)?,
        ExportFormat::Csv => {
            let mut out = Vec::new();
            for sheet in &sheets {
                out.extend_from_slice(csv_title(sheet).as_bytes());
                out.push(b'\n');
                out.extend(write_csv(sheet)?);
                out.push(b'\n');
            }
            out
        }
    };

    Ok(ExportFile {
        filename: format!("{}.{}", RATES_FILE_STEM, format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::{FallbackTables, InflationRate, TreasuryYield};

    #[test]
    fn test_csv_sections() {
        let panel = RatesPanel {
            treasury_yields: vec![TreasuryYield {
                maturity: "10 Year".into(),
                yield_pct: "4.10%".into(),
                change: "n/a".into(),
            }],
            inflation_rates: vec![InflationRate {
                country: "United States".into(),
                rate: "2.9%".into(),
                last_update: "October 2026".into(),
            }],
            ..Default::default()
        };
        let file = export_rates(&panel, ExportFormat::Csv).unwrap();
        assert_eq!(file.filename, "interest_rates.csv");

        let text = String::from_utf8(file.bytes).unwrap();
        assert_eq!(
            text,
            "Treasury Yields\nmaturity,yield,change\n10 Year,4.10%,n/a\n\n\
             Inflation Rates\ncountry,rate,lastUpdate\nUnited States,2.9%,October 2026\n\n"
        );
    }

    #[test]
    fn test_default_tables_export_as_workbook() {
        let tables = FallbackTables::default();
        let panel = RatesPanel {
            treasury_yields: tables.treasury_yields.clone(),
            central_bank_rates: tables.central_bank_rates.clone(),
            inflation_rates: tables.inflation_rates.clone(),
            ..Default::default()
        };
        assert_eq!(rates_sheets(&panel).len(), 3);

        let file = export_rates(&panel, ExportFormat::Xlsx).unwrap();
        assert_eq!(file.filename, "interest_rates.xlsx");
        assert_eq!(&file.bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_panel_is_no_data() {
        assert!(matches!(
            export_rates(&RatesPanel::default(), ExportFormat::Csv),
            Err(ExportError::NoData)
        ));
    }
}
