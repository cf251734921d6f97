pub mod catalog;
pub mod config;
pub mod error;
pub mod extraction;
pub mod forecast;
pub mod model;
pub mod parsing;
pub mod products;
pub mod quote;

use std::path::Path;

use config::schema::ExtractionConfig;
use error::BomError;
use extraction::pdftotext::PdftotextExtractor;
use extraction::spreadsheet::{CalamineReader, CsvReader};
use extraction::{GridReader, TextLayerExtractor};

pub use forecast::calculate_forecast;
pub use parsing::{
    extract_bom_from_pdf, extract_bom_from_spreadsheet, ExtractedBom, ExtractionStrategy,
    PdfStrategy,
};

/// Extract a BOM from PDF bytes using the given text-layer backend.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn TextLayerExtractor,
    config: &ExtractionConfig,
    strategy: PdfStrategy,
) -> Result<ExtractedBom, BomError> {
    let pages = extractor.extract_fragments(pdf_bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "decoded PDF text layer"
    );
    extract_bom_from_pdf(&pages, config, strategy)
}

/// Extract a BOM from spreadsheet bytes using the given grid backend.
pub fn extract_spreadsheet(
    bytes: &[u8],
    reader: &dyn GridReader,
    config: &ExtractionConfig,
) -> Result<ExtractedBom, BomError> {
    let grid = reader.read_grid(bytes)?;
    tracing::debug!(
        backend = reader.backend_name(),
        rows = grid.len(),
        "read spreadsheet grid"
    );
    extract_bom_from_spreadsheet(&grid, config)
}

/// Kind of document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Workbook,
    Csv,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, BomError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(DocumentKind::Workbook),
            "csv" => Ok(DocumentKind::Csv),
            _ => Err(BomError::UnsupportedFile(path.display().to_string())),
        }
    }

    /// Default grid backend for spreadsheet kinds.
    pub fn grid_reader(self) -> Option<Box<dyn GridReader>> {
        match self {
            DocumentKind::Pdf => None,
            DocumentKind::Workbook => Some(Box::new(CalamineReader::new())),
            DocumentKind::Csv => Some(Box::new(CsvReader::new())),
        }
    }
}

/// Extract a BOM from a file on disk, picking the backend by extension.
pub fn extract_file(
    path: &Path,
    config: &ExtractionConfig,
    strategy: PdfStrategy,
) -> Result<ExtractedBom, BomError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path)?;
    tracing::info!(path = %path.display(), ?kind, bytes = bytes.len(), "extracting BOM");

    match kind.grid_reader() {
        Some(reader) => extract_spreadsheet(&bytes, reader.as_ref(), config),
        None => {
            let extractor = PdftotextExtractor::with_word_gap(config.layout.max_word_gap);
            extract_pdf(&bytes, &extractor, config, strategy)
        }
    }
}

/// Read a spreadsheet file on disk into a cell grid.
pub fn read_grid_file(path: &Path) -> Result<Vec<Vec<model::Cell>>, BomError> {
    let reader = DocumentKind::from_path(path)?
        .grid_reader()
        .ok_or_else(|| BomError::UnsupportedFile(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    reader.read_grid(&bytes)
}
