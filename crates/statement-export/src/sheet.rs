//! A plain header-plus-rows table and its CSV / XLSX encodings.

use rust_xlsxwriter::Workbook;

use crate::ExportError;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Worksheet name; also the section title in multi-section CSV.
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header line followed by one record per row.
pub fn write_csv(sheet: &Sheet) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&sheet.header)?;
    for row in &sheet.rows {
        wtr.write_record(row.iter().map(Cell::to_field))?;
    }
    wtr.into_inner()
        .map_err(|e| ExportError::Write(format!("failed to flush CSV writer: {}", e)))
}

/// One worksheet per sheet, in order.
pub fn write_xlsx(sheets: &[Sheet]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, title)?;
        }
        for (r, row) in sheet.rows.iter().enumerate() {
            let row_num = r as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(row_num, col as u16, s)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(row_num, col as u16, *n)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
