//! Line-scanning BOM strategy for PDFs without a usable header row.
//!
//! Each reconstructed row is read as one line of text. A component code is
//! taken from a keyword-anchored capture ("Codice: 000514846") or from the
//! first token matching the configured code pattern. The quantity comes from
//! a keyword capture, a multiplier/unit form ("x4", "4 pz"), or the last
//! numeric token after the code, and defaults to the configured quantity
//! when none of these resolve.

use regex::Regex;
use rust_decimal::Decimal;

use crate::config::schema::ExtractionConfig;
use crate::error::BomError;
use crate::parsing::header::KeywordMatcher;
use crate::parsing::layout::Row;
use crate::parsing::normalize::{clean_code, parse_quantity};
use crate::parsing::{BomCollector, RowRejection};

/// A raw hit on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLine {
    pub raw_code: String,
    /// `None` when no quantity could be resolved on the line.
    pub quantity: Option<Decimal>,
}

pub struct LineScanner {
    keywords: KeywordMatcher,
    code_after_keyword: Regex,
    quantity_after_keyword: Regex,
    multiplier: Regex,
    code_token: Regex,
    numeric_token: Regex,
    default_quantity: Decimal,
}

impl LineScanner {
    pub fn new(config: &ExtractionConfig) -> Result<Self, BomError> {
        let keywords = KeywordMatcher::new(&config.keywords);
        let code_alts = alternation(keywords.code_keywords());
        let quantity_alts = alternation(keywords.quantity_keywords());

        Ok(LineScanner {
            code_after_keyword: compile(&format!(
                r"(?i)(?:{code_alts})\s*[:#.]?\s*([A-Za-z0-9][A-Za-z0-9\-_/.]*)"
            ))?,
            quantity_after_keyword: compile(&format!(
                r"(?i)(?:{quantity_alts})\s*[:=.]?\s*(\d+(?:[.,]\d+)?)"
            ))?,
            multiplier: compile(
                r"(?i)(?:^|\s)x\s*(\d+(?:[.,]\d+)?)\b|\b(\d+(?:[.,]\d+)?)\s*(?:pz|pcs|pc|nr)\b",
            )?,
            code_token: compile(&config.line_scan.code_pattern)?,
            numeric_token: compile(r"^\d+(?:[.,]\d+)?$")?,
            keywords,
            default_quantity: config.line_scan.default_quantity,
        })
    }

    pub fn default_quantity(&self) -> Decimal {
        self.default_quantity
    }

    /// Find a code and, if possible, a quantity on one line.
    pub fn scan_line(&self, line: &str) -> Option<ScannedLine> {
        let raw_code = self.code_by_keyword(line).or_else(|| self.code_by_token(line))?;
        let quantity = self
            .quantity_by_keyword(line)
            .or_else(|| self.quantity_by_multiplier(line, &raw_code))
            .or_else(|| self.trailing_quantity(line, &raw_code));
        Some(ScannedLine { raw_code, quantity })
    }

    fn code_by_keyword(&self, line: &str) -> Option<String> {
        self.code_after_keyword
            .captures_iter(line)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim_end_matches('.').to_string())
            .find(|code| code.chars().any(|c| c.is_ascii_digit()) && !self.keywords.is_header(code))
    }

    fn code_by_token(&self, line: &str) -> Option<String> {
        line.split_whitespace()
            .map(|t| t.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '(' | ')')))
            .find(|t| self.code_token.is_match(t))
            .map(String::from)
    }

    fn quantity_by_keyword(&self, line: &str) -> Option<Decimal> {
        self.quantity_after_keyword
            .captures_iter(line)
            .filter_map(|c| c.get(1))
            .find_map(|m| parse_quantity(m.as_str()))
    }

    fn quantity_by_multiplier(&self, line: &str, raw_code: &str) -> Option<Decimal> {
        self.multiplier
            .captures_iter(line)
            .filter_map(|c| c.get(1).or_else(|| c.get(2)))
            .filter(|m| m.as_str() != raw_code)
            .find_map(|m| parse_quantity(m.as_str()))
    }

    fn trailing_quantity(&self, line: &str, raw_code: &str) -> Option<Decimal> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let code_pos = tokens.iter().position(|t| t.contains(raw_code))?;
        tokens[code_pos + 1..]
            .iter()
            .rev()
            .find(|t| self.numeric_token.is_match(t))
            .and_then(|t| parse_quantity(t))
    }
}

fn compile(pattern: &str) -> Result<Regex, BomError> {
    Regex::new(pattern).map_err(|e| BomError::ConfigInvalid(format!("bad line-scan pattern: {e}")))
}

/// Regex alternation of escaped keywords, longest first.
fn alternation(keywords: &[String]) -> String {
    let mut sorted: Vec<&String> = keywords.iter().collect();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
    sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|")
}

/// Scan every row into the collector, defaulting unresolved quantities.
pub fn extract_scanned_rows(rows: &[Row], scanner: &LineScanner, collector: &mut BomCollector) {
    for (index, row) in rows.iter().enumerate() {
        let line = row.text();
        let Some(hit) = scanner.scan_line(&line) else {
            continue;
        };
        collector.scanned();

        let component_code = clean_code(&hit.raw_code);
        if component_code.is_empty() {
            collector.skip(index, line, RowRejection::EmptyCode);
            continue;
        }

        let quantity = hit.quantity.unwrap_or_else(|| {
            tracing::debug!(row = index, code = %component_code, "no quantity on line, using default");
            scanner.default_quantity()
        });
        collector.accept(index, component_code, quantity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scanner() -> LineScanner {
        LineScanner::new(&ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn test_bare_code_with_trailing_quantity() {
        let hit = scanner().scan_line("000514846 Resistor 10k 1% 4").unwrap();
        assert_eq!(hit.raw_code, "000514846");
        assert_eq!(hit.quantity, Some(dec!(4)));
    }

    #[test]
    fn test_keyword_anchored_code_and_quantity() {
        let hit = scanner().scan_line("Codice: 000123 Resistore Qtà: 3").unwrap();
        assert_eq!(hit.raw_code, "000123");
        assert_eq!(hit.quantity, Some(dec!(3)));
    }

    #[test]
    fn test_multiplier_forms() {
        let s = scanner();
        assert_eq!(s.scan_line("514846 Resistor x 12").unwrap().quantity, Some(dec!(12)));
        assert_eq!(s.scan_line("514846 Resistor 6 pz").unwrap().quantity, Some(dec!(6)));
    }

    #[test]
    fn test_missing_quantity_is_none() {
        let hit = scanner().scan_line("514846 Resistor").unwrap();
        assert_eq!(hit.quantity, None);
    }

    #[test]
    fn test_header_line_has_no_code() {
        assert!(scanner().scan_line("Part Code Description Q.ty").is_none());
        assert!(scanner().scan_line("Bill of materials rev. B").is_none());
    }

    #[test]
    fn test_code_pattern_is_configurable() {
        let mut config = ExtractionConfig::default();
        config.line_scan.code_pattern = r"^C-[A-Z0-9]+$".into();
        let s = LineScanner::new(&config).unwrap();
        let hit = s.scan_line("C-RES10K resistor 2").unwrap();
        assert_eq!(hit.raw_code, "C-RES10K");
        assert_eq!(hit.quantity, Some(dec!(2)));
    }

    #[test]
    fn test_extract_scanned_rows_defaults_quantity() {
        use crate::model::TextFragment;
        use crate::parsing::ExtractionStrategy;

        let rows = vec![
            Row {
                y: 700.0,
                fragments: vec![TextFragment::new("Bill of materials", 10.0, 700.0, 80.0)],
            },
            Row {
                y: 680.0,
                fragments: vec![
                    TextFragment::new("000514846", 10.0, 680.0, 40.0),
                    TextFragment::new("Resistor", 80.0, 680.0, 40.0),
                ],
            },
            Row {
                y: 660.0,
                fragments: vec![
                    TextFragment::new("823301", 10.0, 660.0, 40.0),
                    TextFragment::new("2", 200.0, 660.0, 5.0),
                ],
            },
        ];
        let mut collector = BomCollector::new();
        extract_scanned_rows(&rows, &scanner(), &mut collector);
        let bom = collector.finish(ExtractionStrategy::PdfLineScan, None).unwrap();
        assert_eq!(bom.lines.len(), 2);
        assert_eq!(bom.lines[0].component_code, "514846");
        assert_eq!(bom.lines[0].quantity, dec!(1));
        assert_eq!(bom.lines[1].quantity, dec!(2));
        assert_eq!(bom.rows_scanned, 2);
    }

    #[test]
    fn test_alternation_longest_first() {
        let alts = alternation(&["code".to_string(), "part code".to_string()]);
        assert_eq!(alts, r"part code|code");
    }
}
