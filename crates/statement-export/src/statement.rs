use report_core::{MarketDataProvider, StatementKind, StatementPeriod, StatementTable};

use crate::sheet::{write_csv, write_xlsx, Cell, Sheet};
use crate::{ExportError, ExportFile, ExportFormat};

/// Number of fiscal years exported when the caller names none.
const DEFAULT_YEAR_COUNT: i32 = 5;

/// Comma list of fiscal years, blanks dropped.
pub fn parse_years(param: &str) -> Vec<String> {
    param
        .split(',')
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .map(str::to_string)
        .collect()
}

/// The five calendar years before `current_year`, newest first.
pub fn default_years(current_year: i32) -> Vec<String> {
    (1..=DEFAULT_YEAR_COUNT)
        .map(|offset| (current_year - offset).to_string())
        .collect()
}

/// Periods for the requested years that exist in the table, in the order
/// they were requested. Repeated years are exported once.
pub fn select_years<'a>(
    table: &'a StatementTable,
    requested: &[String],
) -> Result<Vec<(String, &'a StatementPeriod)>, ExportError> {
    let mut selected: Vec<(String, &StatementPeriod)> = Vec::new();

    for year in requested {
        if selected.iter().any(|(y, _)| y == year) {
            continue;
        }
        if let Some(period) = table.periods.iter().find(|p| &p.fiscal_year() == year) {
            selected.push((year.clone(), period));
        }
    }

    if selected.is_empty() {
        return Err(ExportError::NoSelection);
    }
    Ok(selected)
}

/// `<TICKER>_<kind>_<min>-<max>.<ext>`, or a single year when only one
/// was selected.
pub fn export_filename(
    ticker: &str,
    kind: StatementKind,
    years: &[String],
    format: ExportFormat,
) -> String {
    let min = years.iter().min().cloned().unwrap_or_default();
    let max = years.iter().max().cloned().unwrap_or_default();
    let range = if min == max {
        min
    } else {
        format!("{}-{}", min, max)
    };
    format!(
        "{}_{}_{}.{}",
        ticker.to_uppercase(),
        kind.as_str(),
        range,
        format.extension()
    )
}

/// One row per fiscal year, one column per line item.
pub fn statement_sheet(kind: StatementKind, line_items: &[String], periods: &[(String, &StatementPeriod)]) -> Sheet {
    let mut header = vec!["Year"];
    header.extend(line_items.iter().map(String::as_str));
    let mut sheet = Sheet::new(kind.sheet_name(), &header);

    for (year, period) in periods {
        let mut row: Vec<Cell> = Vec::with_capacity(line_items.len() + 1);
        row.push(year.as_str().into());
        row.extend(line_items.iter().map(|item| Cell::from(period.get(item))));
        sheet.rows.push(row);
    }

    sheet
}

pub fn export_statement(
    table: &StatementTable,
    ticker: &str,
    years: &[String],
    format: ExportFormat,
) -> Result<ExportFile, ExportError> {
    if table.is_empty() {
        return Err(ExportError::NoData);
    }

    let selected = select_years(table, years)?;
    let sheet = statement_sheet(table.kind, &table.line_items, &selected);
    let bytes = match format {
        ExportFormat::Csv => write_csv(&sheet)?,
        ExportFormat::Xlsx => write_xlsx(std::slice::from_ref(&sheet))?,
    };

    let selected_years: Vec<String> = selected.into_iter().map(|(y, _)| y).collect();
    let filename = export_filename(ticker, table.kind, &selected_years, format);
    tracing::info!(
        "Exported {} {} for {} ({} years)",
        format.extension(),
        table.kind,
        ticker,
        selected_years.len()
    );

    Ok(ExportFile {
        filename,
        content_type: format.content_type(),
        bytes,
    })
}

/// Fetch the annual statement and export the requested years.
pub async fn fetch_and_export(
    market: &dyn MarketDataProvider,
    ticker: &str,
    kind: StatementKind,
    years: &[String],
    format: ExportFormat,
) -> Result<ExportFile, ExportError> {
    let table = match market.annual_statement(ticker, kind).await {
        Ok(table) => table,
        Err(e) if e.is_empty_result() => return Err(ExportError::NoData),
        Err(e) => {
            tracing::warn!("Failed to fetch {} statement for {}: {}", kind, ticker, e);
            return Err(ExportError::Source(e));
        }
    };

    export_statement(&table, ticker, years, format)
}
