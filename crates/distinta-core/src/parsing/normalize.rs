use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalize a component code to its canonical lookup key.
///
/// Leading zeros and whitespace are stripped together, so "000514846" and
/// " 0 514846" both become "514846". An all-zero code cleans to "".
pub fn clean_code(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c == '0' || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// Parse a quantity string into a positive decimal.
///
/// Handles formats like:
/// - "4" -> 4
/// - "4,5" -> 4.5 (decimal comma)
/// - "4 pz" / "x4" -> 4 (stray characters dropped)
/// - "-3", "0", "abc", "1.2.3" -> None
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    let first_digit = s.find(|c: char| c.is_ascii_digit())?;
    // A minus sign ahead of the number makes it negative, not "stray".
    if s[..first_digit].contains('-') {
        return None;
    }

    let mut cleaned: String = s
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }
    if cleaned.ends_with('.') {
        cleaned.pop();
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    if value > Decimal::ZERO {
        Some(value.normalize())
    } else {
        None
    }
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...).
pub fn f64_to_decimal(f: f64) -> Decimal {
    let s = format!("{f}");
    s.parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clean_code_strips_leading_zeros() {
        assert_eq!(clean_code("000123"), "123");
        assert_eq!(clean_code("000514846"), "514846");
    }

    #[test]
    fn test_clean_code_noop_on_clean_code() {
        assert_eq!(clean_code("ABC123"), "ABC123");
        assert_eq!(clean_code("514846"), "514846");
    }

    #[test]
    fn test_clean_code_all_zeros() {
        assert_eq!(clean_code("0000000"), "");
        assert_eq!(clean_code("   "), "");
    }

    #[test]
    fn test_clean_code_keeps_inner_zeros() {
        assert_eq!(clean_code("100200"), "100200");
        assert_eq!(clean_code("0A0B"), "A0B");
    }

    #[test]
    fn test_clean_code_interleaved_whitespace() {
        assert_eq!(clean_code(" 0 0 12 "), "12");
        assert_eq!(clean_code(&clean_code(" 0 0 12 ")), "12");
    }

    #[test]
    fn test_parse_quantity_integer() {
        assert_eq!(parse_quantity("4"), Some(dec!(4)));
        assert_eq!(parse_quantity("  12  "), Some(dec!(12)));
    }

    #[test]
    fn test_parse_quantity_decimal_comma() {
        assert_eq!(parse_quantity("4,5"), Some(dec!(4.5)));
        assert_eq!(parse_quantity("0,25"), Some(dec!(0.25)));
    }

    #[test]
    fn test_parse_quantity_stray_characters() {
        assert_eq!(parse_quantity("4 pz"), Some(dec!(4)));
        assert_eq!(parse_quantity("x2"), Some(dec!(2)));
        assert_eq!(parse_quantity(".5"), Some(dec!(0.5)));
        assert_eq!(parse_quantity("3."), Some(dec!(3)));
    }

    #[test]
    fn test_parse_quantity_trailing_zeros_normalized() {
        let q = parse_quantity("2,50").unwrap();
        assert_eq!(q.to_string(), "2.5");
    }

    #[test]
    fn test_parse_quantity_rejects_invalid() {
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("-3"), None);
        assert_eq!(parse_quantity("- 3"), None);
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("0,000"), None);
        assert_eq!(parse_quantity("1.234,5"), None);
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.0035), dec!(0.0035));
        assert_eq!(f64_to_decimal(68.0), dec!(68));
        assert_eq!(f64_to_decimal(1.23), dec!(1.23));
    }
}
