use crate::model::{Cell, TextFragment};
use crate::parsing::header::{KeywordMatcher, PdfColumns, SheetColumns};
use crate::parsing::layout::Row;
use crate::parsing::normalize::{clean_code, parse_quantity};
use crate::parsing::{BomCollector, RowRejection};

/// Read header-anchored PDF rows into the collector.
///
/// Rows with neither cell near an anchor are not data rows and are ignored
/// silently; rows with only one of the two cells are recorded as skipped.
pub fn extract_pdf_rows(
    rows: &[Row],
    columns: &PdfColumns,
    keywords: &KeywordMatcher,
    collector: &mut BomCollector,
) {
    for (index, row) in rows.iter().enumerate() {
        if index == columns.header_row {
            continue;
        }

        let code = nearest_fragment(row, columns.code_x, columns.tolerance, None);
        let quantity = nearest_fragment(
            row,
            columns.quantity_x,
            columns.tolerance,
            code.map(|(i, _)| i),
        );

        let (code, quantity) = match (code, quantity) {
            (Some((_, code)), Some((_, quantity))) => (code, quantity),
            (None, None) => continue,
            _ => {
                collector.scanned();
                collector.skip(index, row.text(), RowRejection::MissingCell);
                continue;
            }
        };
        collector.scanned();

        if keywords.is_header(&code.text) {
            collector.skip(index, row.text(), RowRejection::RepeatedHeader);
            continue;
        }

        let component_code = clean_code(&code.text);
        if component_code.is_empty() {
            collector.skip(index, row.text(), RowRejection::EmptyCode);
            continue;
        }

        match parse_quantity(&quantity.text) {
            Some(q) => collector.accept(index, component_code, q),
            None => collector.skip(index, row.text(), RowRejection::MalformedQuantity),
        }
    }
}

/// The fragment closest to `anchor_x` within `tolerance`, skipping `exclude`.
fn nearest_fragment(
    row: &Row,
    anchor_x: f64,
    tolerance: f64,
    exclude: Option<usize>,
) -> Option<(usize, &TextFragment)> {
    row.fragments
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != exclude)
        .map(|(i, f)| (i, f, (f.x - anchor_x).abs()))
        .filter(|(_, _, distance)| *distance <= tolerance)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(i, f, _)| (i, f))
}

/// Read grid rows from `data_start_row` on into the collector.
///
/// Rows with an empty code cell are ignored; a bad quantity drops the row.
pub fn extract_sheet_rows(grid: &[Vec<Cell>], columns: &SheetColumns, collector: &mut BomCollector) {
    for (index, row) in grid.iter().enumerate().skip(columns.data_start_row) {
        let Some(code_text) = row.get(columns.code_column).and_then(Cell::as_text) else {
            continue;
        };
        collector.scanned();

        let component_code = clean_code(&code_text);
        if component_code.is_empty() {
            collector.skip(index, row_text(row), RowRejection::EmptyCode);
            continue;
        }

        match row.get(columns.quantity_column).and_then(Cell::as_quantity) {
            Some(q) => collector.accept(index, component_code, q),
            None => collector.skip(index, row_text(row), RowRejection::MalformedQuantity),
        }
    }
}

fn row_text(row: &[Cell]) -> String {
    row.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}
