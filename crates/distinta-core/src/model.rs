use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsing::normalize::{clean_code, f64_to_decimal, parse_quantity};

/// A positioned piece of text from a PDF page's text layer.
///
/// Coordinates are in PDF user space: `y` grows upward, so a larger `y` is
/// closer to the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64) -> Self {
        TextFragment {
            text: text.into(),
            x,
            y,
            width,
        }
    }
}

/// A single spreadsheet cell, as handed over by a grid reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed text form of the cell, or `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(format!("{n}")),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    /// Positive quantity held by the cell, if any.
    pub fn as_quantity(&self) -> Option<Decimal> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => {
                if n.is_finite() && *n > 0.0 {
                    Some(f64_to_decimal(*n).normalize()).filter(|d| *d > Decimal::ZERO)
                } else {
                    None
                }
            }
            Cell::Text(s) => parse_quantity(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One line of a bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub component_code: String,
    pub quantity: Decimal,
}

impl BomLine {
    /// Build a line from raw code and quantity text, applying normalization.
    ///
    /// Returns `None` when the code cleans to nothing or the quantity is not
    /// a positive number.
    pub fn from_raw(code: &str, quantity: &str) -> Option<BomLine> {
        let component_code = clean_code(code);
        if component_code.is_empty() {
            return None;
        }
        let quantity = parse_quantity(quantity)?;
        Some(BomLine {
            component_code,
            quantity,
        })
    }
}

impl fmt::Display for BomLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.component_code, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub bom: Vec<BomLine>,
}

impl Product {
    /// Replace the whole BOM. Lines are never merged with the previous ones.
    pub fn replace_bom(&mut self, lines: Vec<BomLine>) {
        self.bom = lines;
    }
}

/// How many units of a product are planned. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlanEntry {
    pub product_id: String,
    pub quantity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cell_as_text() {
        assert_eq!(Cell::Text("  514846 ".into()).as_text().as_deref(), Some("514846"));
        assert_eq!(Cell::Number(514846.0).as_text().as_deref(), Some("514846"));
        assert_eq!(Cell::Text("   ".into()).as_text(), None);
        assert_eq!(Cell::Empty.as_text(), None);
    }

    #[test]
    fn test_cell_as_quantity() {
        assert_eq!(Cell::Number(4.0).as_quantity(), Some(dec!(4)));
        assert_eq!(Cell::Number(0.25).as_quantity(), Some(dec!(0.25)));
        assert_eq!(Cell::Text("4,5".into()).as_quantity(), Some(dec!(4.5)));
        assert_eq!(Cell::Number(0.0).as_quantity(), None);
        assert_eq!(Cell::Number(-2.0).as_quantity(), None);
        assert_eq!(Cell::Empty.as_quantity(), None);
    }

    #[test]
    fn test_bom_line_from_raw() {
        let line = BomLine::from_raw(" 000514846", "4").unwrap();
        assert_eq!(line.component_code, "514846");
        assert_eq!(line.quantity, dec!(4));
        assert!(BomLine::from_raw("0000", "4").is_none());
        assert!(BomLine::from_raw("514846", "0").is_none());
    }

    #[test]
    fn test_replace_bom_discards_previous_lines() {
        let mut product = Product {
            id: "p1".into(),
            code: "P1".into(),
            name: "Board".into(),
            bom: vec![BomLine::from_raw("1", "1").unwrap()],
        };
        product.replace_bom(vec![BomLine::from_raw("2", "3").unwrap()]);
        assert_eq!(product.bom.len(), 1);
        assert_eq!(product.bom[0].component_code, "2");
    }
}
