use serde::{Deserialize, Serialize};

use crate::config::schema::{KeywordConfig, SpreadsheetConfig};
use crate::model::Cell;
use crate::parsing::layout::Row;

/// Case-insensitive substring matcher for header cells.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    code: Vec<String>,
    quantity: Vec<String>,
}

impl KeywordMatcher {
    pub fn new(config: &KeywordConfig) -> Self {
        let prepare = |keywords: &[String]| -> Vec<String> {
            keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        KeywordMatcher {
            code: prepare(&config.code),
            quantity: prepare(&config.quantity),
        }
    }

    pub fn is_code_header(&self, text: &str) -> bool {
        contains_any(text, &self.code)
    }

    pub fn is_quantity_header(&self, text: &str) -> bool {
        contains_any(text, &self.quantity)
    }

    /// True if the text looks like any header cell.
    pub fn is_header(&self, text: &str) -> bool {
        self.is_code_header(text) || self.is_quantity_header(text)
    }

    pub fn code_keywords(&self) -> &[String] {
        &self.code
    }

    pub fn quantity_keywords(&self) -> &[String] {
        &self.quantity
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    let lower = text.trim().to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Column anchors found in a PDF header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfColumns {
    pub code_x: f64,
    pub quantity_x: f64,
    /// Maximum horizontal distance between a cell and its anchor.
    pub tolerance: f64,
    /// Index of the header row in the reconstructed row sequence.
    pub header_row: usize,
}

/// Column indices used to read a spreadsheet grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetColumns {
    pub code_column: usize,
    pub quantity_column: usize,
    /// `None` when the columns were guessed positionally.
    pub header_row: Option<usize>,
    pub data_start_row: usize,
}

/// Find the first row holding both a code header and a quantity header.
///
/// The first fragment matching a code keyword anchors the code column; the
/// first other fragment matching a quantity keyword anchors the quantity column.
pub fn locate_pdf_header(
    rows: &[Row],
    keywords: &KeywordMatcher,
    tolerance: f64,
) -> Option<PdfColumns> {
    for (index, row) in rows.iter().enumerate() {
        let Some(code_idx) = row
            .fragments
            .iter()
            .position(|f| keywords.is_code_header(&f.text))
        else {
            continue;
        };

        let quantity = row
            .fragments
            .iter()
            .enumerate()
            .find(|(i, f)| *i != code_idx && keywords.is_quantity_header(&f.text));

        if let Some((_, quantity_fragment)) = quantity {
            let code_fragment = &row.fragments[code_idx];
            tracing::debug!(
                row = index,
                code_header = %code_fragment.text,
                code_x = code_fragment.x,
                quantity_header = %quantity_fragment.text,
                quantity_x = quantity_fragment.x,
                "located PDF header"
            );
            return Some(PdfColumns {
                code_x: code_fragment.x,
                quantity_x: quantity_fragment.x,
                tolerance,
                header_row: index,
            });
        }
    }

    None
}

/// Scan the first `scan_rows` rows of a grid for a header.
///
/// Both columns must be found within the same row; cells are checked left to
/// right and a cell claimed as the code column is not reused as quantity.
pub fn locate_sheet_header(
    grid: &[Vec<Cell>],
    keywords: &KeywordMatcher,
    scan_rows: usize,
) -> Option<SheetColumns> {
    for (row_idx, row) in grid.iter().take(scan_rows).enumerate() {
        let mut code_column = None;
        let mut quantity_column = None;

        for (col_idx, cell) in row.iter().enumerate() {
            let Some(text) = cell.as_text() else {
                continue;
            };
            if code_column.is_none() && keywords.is_code_header(&text) {
                code_column = Some(col_idx);
            } else if quantity_column.is_none() && keywords.is_quantity_header(&text) {
                quantity_column = Some(col_idx);
            }

            if let (Some(code_column), Some(quantity_column)) = (code_column, quantity_column) {
                tracing::debug!(
                    row = row_idx,
                    code_column,
                    quantity_column,
                    "located spreadsheet header"
                );
                return Some(SheetColumns {
                    code_column,
                    quantity_column,
                    header_row: Some(row_idx),
                    data_start_row: row_idx + 1,
                });
            }
        }
    }

    None
}

/// Positional guess for grids without a recognizable header.
///
/// The code column comes from config. The quantity column is the first
/// preferred column holding a positive number in a sample data row, else the
/// configured default.
pub fn fallback_sheet_columns(grid: &[Vec<Cell>], config: &SpreadsheetConfig) -> SheetColumns {
    let code_column = config.code_column;
    let has_code = |row: &&Vec<Cell>| row.get(code_column).is_some_and(|c| !c.is_empty());

    // Prefer a row that looks like data (some numeric cell besides the code).
    let sample = grid
        .iter()
        .filter(has_code)
        .find(|row| {
            row.iter()
                .enumerate()
                .any(|(i, c)| i != code_column && c.as_quantity().is_some())
        })
        .or_else(|| grid.iter().find(has_code));

    let quantity_column = sample
        .and_then(|row| {
            config
                .quantity_column_preference
                .iter()
                .copied()
                .find(|&col| row.get(col).and_then(Cell::as_quantity).is_some())
        })
        .unwrap_or(config.default_quantity_column);

    tracing::debug!(
        code_column,
        quantity_column,
        "no spreadsheet header, using positional columns"
    );

    SheetColumns {
        code_column,
        quantity_column,
        header_row: None,
        data_start_row: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextFragment;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(&KeywordConfig::default())
    }

    fn row(y: f64, cells: &[(&str, f64)]) -> Row {
        Row {
            y,
            fragments: cells
                .iter()
                .map(|(t, x)| TextFragment::new(*t, *x, y, 20.0))
                .collect(),
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive_substring() {
        let m = matcher();
        assert!(m.is_code_header("Part Code"));
        assert!(m.is_code_header("CODICE ARTICOLO"));
        assert!(m.is_quantity_header("Q.ty"));
        assert!(m.is_quantity_header("Quantità"));
        assert!(!m.is_header("Descrizione"));
        assert!(!m.is_header("514846"));
    }

    #[test]
    fn test_pdf_header_located() {
        let rows = vec![
            row(800.0, &[("Bill of materials", 10.0)]),
            row(780.0, &[("Part Code", 10.0), ("Description", 80.0), ("Q.ty", 200.0)]),
            row(760.0, &[("000514846", 12.0), ("Resistor", 80.0), ("4", 205.0)]),
        ];
        let cols = locate_pdf_header(&rows, &matcher(), 20.0).unwrap();
        assert_eq!(cols.code_x, 10.0);
        assert_eq!(cols.quantity_x, 200.0);
        assert_eq!(cols.header_row, 1);
        assert_eq!(cols.tolerance, 20.0);
    }

    #[test]
    fn test_pdf_header_needs_both_columns_in_one_row() {
        let rows = vec![
            row(800.0, &[("Part Code", 10.0)]),
            row(780.0, &[("Qty", 200.0)]),
        ];
        assert!(locate_pdf_header(&rows, &matcher(), 20.0).is_none());
    }

    #[test]
    fn test_pdf_header_missing() {
        let rows = vec![row(760.0, &[("000514846", 12.0), ("4", 205.0)])];
        assert!(locate_pdf_header(&rows, &matcher(), 20.0).is_none());
        assert!(locate_pdf_header(&[], &matcher(), 20.0).is_none());
    }

    #[test]
    fn test_sheet_header_located_after_noise() {
        let grid = vec![
            vec![text("Distinta base scheda X1")],
            vec![],
            vec![text("Codice"), text("Descrizione"), Cell::Empty, text("Qtà")],
            vec![text("000514846"), text("Resistore"), Cell::Empty, Cell::Number(4.0)],
        ];
        let cols = locate_sheet_header(&grid, &matcher(), 20).unwrap();
        assert_eq!(cols.code_column, 0);
        assert_eq!(cols.quantity_column, 3);
        assert_eq!(cols.header_row, Some(2));
        assert_eq!(cols.data_start_row, 3);
    }

    #[test]
    fn test_sheet_header_beyond_scan_window_ignored() {
        let mut grid: Vec<Vec<Cell>> = (0..5).map(|_| vec![text("noise")]).collect();
        grid.push(vec![text("Code"), text("Qty")]);
        assert!(locate_sheet_header(&grid, &matcher(), 5).is_none());
        assert!(locate_sheet_header(&grid, &matcher(), 6).is_some());
    }

    #[test]
    fn test_fallback_prefers_column_three() {
        let grid = vec![
            vec![text("514846"), text("Resistor 10k"), text("0603"), text("4")],
            vec![text("823301"), text("Cap 100nF"), text("0805"), text("10")],
        ];
        let cols = fallback_sheet_columns(&grid, &SpreadsheetConfig::default());
        assert_eq!(cols.code_column, 0);
        assert_eq!(cols.quantity_column, 3);
        assert_eq!(cols.header_row, None);
        assert_eq!(cols.data_start_row, 0);
    }

    #[test]
    fn test_fallback_then_column_one() {
        let grid = vec![vec![text("514846"), Cell::Number(2.0), text("Resistor")]];
        let cols = fallback_sheet_columns(&grid, &SpreadsheetConfig::default());
        assert_eq!(cols.quantity_column, 1);
    }

    #[test]
    fn test_fallback_default_column() {
        let grid = vec![vec![text("514846"), text("Resistor"), text("n/a"), text("n/a")]];
        let cols = fallback_sheet_columns(&grid, &SpreadsheetConfig::default());
        assert_eq!(cols.quantity_column, 1);
    }

    #[test]
    fn test_fallback_skips_title_row_when_sampling() {
        let grid = vec![
            vec![text("Item"), text("Desc"), text("Pkg"), text("Amount")],
            vec![text("514846"), text("Resistor"), text("0603"), text("4")],
        ];
        let cols = fallback_sheet_columns(&grid, &SpreadsheetConfig::default());
        assert_eq!(cols.quantity_column, 3);
    }
}
