use std::io::Cursor;

use calamine::Reader;

use crate::error::BomError;
use crate::extraction::GridReader;
use crate::model::Cell;

/// Workbook backend (xlsx, xlsm, xls, ods) reading the first worksheet.
#[derive(Debug, Default)]
pub struct CalamineReader;

impl CalamineReader {
    pub fn new() -> Self {
        CalamineReader
    }
}

impl GridReader for CalamineReader {
    fn read_grid(&self, bytes: &[u8]) -> Result<Vec<Vec<Cell>>, BomError> {
        let cursor = Cursor::new(bytes);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| BomError::Spreadsheet(format!("failed to open workbook: {e}")))?;

        let sheet = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| BomError::Spreadsheet("workbook has no worksheets".into()))?
            .map_err(|e| BomError::Spreadsheet(format!("failed to read first worksheet: {e}")))?;

        let grid: Vec<Vec<Cell>> = sheet
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        tracing::debug!(
            backend = self.backend_name(),
            rows = grid.len(),
            "read worksheet"
        );
        Ok(grid)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

fn cell_from_data(cell: &calamine::Data) -> Cell {
    match cell {
        calamine::Data::String(s) => text_cell(s),
        calamine::Data::Float(f) => Cell::Number(*f),
        calamine::Data::Int(i) => Cell::Number(*i as f64),
        calamine::Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        calamine::Data::Empty | calamine::Data::Error(_) => Cell::Empty,
        _ => text_cell(&format!("{cell}")),
    }
}

fn text_cell(s: &str) -> Cell {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(trimmed.to_string())
    }
}

/// CSV backend. Every field stays text; no numeric coercion is applied.
#[derive(Debug, Default)]
pub struct CsvReader {
    delimiter: Option<u8>,
}

impl CsvReader {
    /// Reader that sniffs `,`, `;` or tab from the first line.
    pub fn new() -> Self {
        CsvReader { delimiter: None }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        CsvReader {
            delimiter: Some(delimiter),
        }
    }
}

impl GridReader for CsvReader {
    fn read_grid(&self, bytes: &[u8]) -> Result<Vec<Vec<Cell>>, BomError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let delimiter = self.delimiter.unwrap_or_else(|| sniff_delimiter(bytes));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(bytes);

        let mut grid = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            grid.push(
                record
                    .iter()
                    .map(|field| text_cell(&String::from_utf8_lossy(field)))
                    .collect(),
            );
        }

        tracing::debug!(
            backend = self.backend_name(),
            rows = grid.len(),
            delimiter = %(delimiter as char),
            "read csv"
        );
        Ok(grid)
    }

    fn backend_name(&self) -> &str {
        "csv"
    }
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| first_line.iter().filter(|b| *b == d).count())
        .filter(|d| first_line.contains(d))
        .unwrap_or(b',')
}
