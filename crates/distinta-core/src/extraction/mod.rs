pub mod pdftotext;
pub mod spreadsheet;

use crate::error::BomError;
use crate::model::{Cell, TextFragment};

/// Text-layer fragments extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageFragments {
    pub page_number: usize,
    pub fragments: Vec<TextFragment>,
}

/// Trait for PDF text-layer backends.
pub trait TextLayerExtractor: Send + Sync {
    /// Extract positioned text from PDF bytes, returning one entry per page
    /// in document order.
    fn extract_fragments(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, BomError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for spreadsheet backends producing a row-major cell grid.
pub trait GridReader: Send + Sync {
    fn read_grid(&self, bytes: &[u8]) -> Result<Vec<Vec<Cell>>, BomError>;

    fn backend_name(&self) -> &str;
}
