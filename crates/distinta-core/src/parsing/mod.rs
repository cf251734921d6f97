pub mod header;
pub mod layout;
pub mod line_scan;
pub mod normalize;
pub mod rows;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::schema::ExtractionConfig;
use crate::error::BomError;
use crate::extraction::PageFragments;
use crate::model::{BomLine, Cell};
use header::{KeywordMatcher, PdfColumns, SheetColumns};
use layout::Row;
use line_scan::LineScanner;

/// How the caller wants a PDF to be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfStrategy {
    /// Header-anchored columns; fails with `NoHeaderFound` without a header.
    HeaderAnchored,
    /// Keyword/regex scanning of each reconstructed line.
    LineScan,
    /// Header-anchored first, line scanning when no header is found.
    #[default]
    Auto,
}

impl FromStr for PdfStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "header" | "header-anchored" | "header_anchored" => Ok(PdfStrategy::HeaderAnchored),
            "line-scan" | "line_scan" | "scan" => Ok(PdfStrategy::LineScan),
            "auto" => Ok(PdfStrategy::Auto),
            other => Err(format!(
                "unknown strategy '{other}'. Available: auto, header, line-scan"
            )),
        }
    }
}

/// The strategy that actually produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    PdfHeaderAnchored,
    PdfLineScan,
    SpreadsheetHeader,
    SpreadsheetPositional,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::PdfHeaderAnchored => write!(f, "PDF, header-anchored columns"),
            ExtractionStrategy::PdfLineScan => write!(f, "PDF, line scanning"),
            ExtractionStrategy::SpreadsheetHeader => write!(f, "spreadsheet, header columns"),
            ExtractionStrategy::SpreadsheetPositional => {
                write!(f, "spreadsheet, positional columns")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnLocator {
    Pdf(PdfColumns),
    Sheet(SheetColumns),
}

/// Why a candidate data row produced no BOM line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRejection {
    /// Quantity missing, non-numeric, zero or negative.
    MalformedQuantity,
    /// Code empty after normalization.
    EmptyCode,
    /// Only one of the code/quantity cells could be resolved.
    MissingCell,
    /// The code cell holds header text (header repeated on a later page).
    RepeatedHeader,
    /// The code already appeared earlier in the document.
    Duplicate,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowRejection::MalformedQuantity => "malformed quantity",
            RowRejection::EmptyCode => "empty code",
            RowRejection::MissingCell => "missing code or quantity cell",
            RowRejection::RepeatedHeader => "repeated header row",
            RowRejection::Duplicate => "duplicate code",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Row index in the reconstructed row sequence or the cell grid.
    pub row: usize,
    pub text: String,
    pub reason: RowRejection,
}

/// Result of extracting a BOM from one document.
///
/// `lines` is never empty: a document yielding nothing is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedBom {
    pub lines: Vec<BomLine>,
    pub strategy: ExtractionStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnLocator>,
    pub rows_scanned: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
}

/// Accumulates BOM lines, keeping the first occurrence of each code.
#[derive(Debug, Default)]
pub struct BomCollector {
    lines: Vec<BomLine>,
    seen: HashSet<String>,
    skipped: Vec<SkippedRow>,
    rows_scanned: usize,
}

impl BomCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a row as a data-row candidate.
    pub fn scanned(&mut self) {
        self.rows_scanned += 1;
    }

    /// Record a normalized line. Later lines with the same code are skipped.
    pub fn accept(&mut self, row: usize, component_code: String, quantity: Decimal) {
        if self.seen.contains(&component_code) {
            self.skip(row, component_code, RowRejection::Duplicate);
            return;
        }
        self.seen.insert(component_code.clone());
        self.lines.push(BomLine {
            component_code,
            quantity,
        });
    }

    pub fn skip(&mut self, row: usize, text: impl Into<String>, reason: RowRejection) {
        let text = text.into();
        debug!(row, text = %text, %reason, "skipped row");
        self.skipped.push(SkippedRow { row, text, reason });
    }

    pub fn finish(
        self,
        strategy: ExtractionStrategy,
        columns: Option<ColumnLocator>,
    ) -> Result<ExtractedBom, BomError> {
        if self.lines.is_empty() {
            warn!(
                %strategy,
                rows_scanned = self.rows_scanned,
                skipped = self.skipped.len(),
                "no valid BOM lines extracted"
            );
            return Err(BomError::NoDataExtracted);
        }

        info!(
            %strategy,
            lines = self.lines.len(),
            skipped = self.skipped.len(),
            "extracted BOM"
        );

        Ok(ExtractedBom {
            lines: self.lines,
            strategy,
            columns,
            rows_scanned: self.rows_scanned,
            skipped: self.skipped,
        })
    }
}

/// Extract a BOM from the text layer of a PDF.
///
/// All pages must already be decoded: rows are rebuilt from the complete
/// fragment set before any column inference starts.
pub fn extract_bom_from_pdf(
    pages: &[PageFragments],
    config: &ExtractionConfig,
    strategy: PdfStrategy,
) -> Result<ExtractedBom, BomError> {
    let fragments = layout::collect_fragments(pages, config.layout.vertical_tolerance);
    let rows = layout::reconstruct_rows(&fragments, config.layout.vertical_tolerance);
    debug!(
        pages = pages.len(),
        fragments = fragments.len(),
        rows = rows.len(),
        "reconstructed rows"
    );

    match strategy {
        PdfStrategy::HeaderAnchored => extract_header_anchored(&rows, config),
        PdfStrategy::LineScan => extract_line_scan(&rows, config),
        PdfStrategy::Auto => match extract_header_anchored(&rows, config) {
            Err(BomError::NoHeaderFound) => {
                info!("no header row found, falling back to line scanning");
                extract_line_scan(&rows, config)
            }
            other => other,
        },
    }
}

fn extract_header_anchored(
    rows: &[Row],
    config: &ExtractionConfig,
) -> Result<ExtractedBom, BomError> {
    let keywords = KeywordMatcher::new(&config.keywords);
    let columns =
        header::locate_pdf_header(rows, &keywords, config.columns.horizontal_tolerance)
            .ok_or(BomError::NoHeaderFound)?;

    let mut collector = BomCollector::new();
    rows::extract_pdf_rows(rows, &columns, &keywords, &mut collector);
    collector.finish(
        ExtractionStrategy::PdfHeaderAnchored,
        Some(ColumnLocator::Pdf(columns)),
    )
}

fn extract_line_scan(rows: &[Row], config: &ExtractionConfig) -> Result<ExtractedBom, BomError> {
    let scanner = LineScanner::new(config)?;
    let mut collector = BomCollector::new();
    line_scan::extract_scanned_rows(rows, &scanner, &mut collector);
    collector.finish(ExtractionStrategy::PdfLineScan, None)
}

/// Extract a BOM from a row-major spreadsheet grid.
///
/// Without a header row the columns are guessed positionally.
pub fn extract_bom_from_spreadsheet(
    grid: &[Vec<Cell>],
    config: &ExtractionConfig,
) -> Result<ExtractedBom, BomError> {
    let keywords = KeywordMatcher::new(&config.keywords);
    let (columns, strategy) =
        match header::locate_sheet_header(grid, &keywords, config.spreadsheet.header_scan_rows) {
            Some(columns) => (columns, ExtractionStrategy::SpreadsheetHeader),
            None => (
                header::fallback_sheet_columns(grid, &config.spreadsheet),
                ExtractionStrategy::SpreadsheetPositional,
            ),
        };

    let mut collector = BomCollector::new();
    rows::extract_sheet_rows(grid, &columns, &mut collector);
    collector.finish(strategy, Some(ColumnLocator::Sheet(columns)))
}
