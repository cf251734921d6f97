use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BomError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("unsupported file: {0}. Expected a PDF, an Excel/ODS workbook or a CSV file")]
    UnsupportedFile(String),

    #[error("could not detect columns: no header row with both a code and a quantity column")]
    NoHeaderFound,

    #[error("no valid components found in the document")]
    NoDataExtracted,

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to load {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("import failed: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
