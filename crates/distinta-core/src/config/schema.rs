use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tunables for every extraction strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub layout: LayoutConfig,
    pub columns: ColumnConfig,
    pub keywords: KeywordConfig,
    pub spreadsheet: SpreadsheetConfig,
    pub line_scan: LineScanConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum baseline distance for two fragments to share a row.
    pub vertical_tolerance: f64,
    /// Words on the same line closer than this are merged into one fragment
    /// by the pdftotext backend.
    pub max_word_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            vertical_tolerance: 5.0,
            max_word_gap: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Maximum horizontal distance between a cell and its header anchor.
    pub horizontal_tolerance: f64,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            horizontal_tolerance: 20.0,
        }
    }
}

/// Header keywords, matched case-insensitively as substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub code: Vec<String>,
    pub quantity: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        KeywordConfig {
            code: [
                "code",
                "part code",
                "part number",
                "part no",
                "p/n",
                "codice",
                "cod.",
                "articolo",
                "seko",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            quantity: [
                "qty", "q.ty", "q.tà", "quantity", "quantità", "quantita", "qta", "qtà",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    /// How many leading rows are searched for a header.
    pub header_scan_rows: usize,
    /// Code column assumed when no header is found.
    pub code_column: usize,
    /// Columns tried, in order, for a numeric quantity when no header is found.
    pub quantity_column_preference: Vec<usize>,
    /// Quantity column used when none of the preferred columns parse.
    pub default_quantity_column: usize,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        SpreadsheetConfig {
            header_scan_rows: 20,
            code_column: 0,
            quantity_column_preference: vec![3, 1],
            default_quantity_column: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineScanConfig {
    /// Regex a bare token must match to be taken as a component code.
    pub code_pattern: String,
    /// Quantity assigned when a line carries none.
    pub default_quantity: Decimal,
}

impl Default for LineScanConfig {
    fn default() -> Self {
        LineScanConfig {
            code_pattern: r"^\d{5,}$".to_string(),
            default_quantity: Decimal::ONE,
        }
    }
}
