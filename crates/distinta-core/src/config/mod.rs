pub mod schema;

use crate::error::BomError;
use regex::Regex;
use rust_decimal::Decimal;
use schema::ExtractionConfig;
use std::path::Path;

/// Load an extraction config from a TOML file.
pub fn load_config(path: &Path) -> Result<ExtractionConfig, BomError> {
    let content = std::fs::read_to_string(path).map_err(|e| BomError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: ExtractionConfig = toml::from_str(&content).map_err(|e| BomError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    prepare_config(config)
}

/// Parse an extraction config from a TOML string (no file path context).
pub fn parse_config_str(toml_str: &str) -> Result<ExtractionConfig, BomError> {
    let config: ExtractionConfig =
        toml::from_str(toml_str).map_err(|e| BomError::ConfigInvalid(e.to_string()))?;
    prepare_config(config)
}

/// Render a config back to TOML.
pub fn to_toml(config: &ExtractionConfig) -> Result<String, BomError> {
    toml::to_string_pretty(config).map_err(|e| BomError::ConfigInvalid(e.to_string()))
}

fn prepare_config(mut config: ExtractionConfig) -> Result<ExtractionConfig, BomError> {
    config.keywords.code = lowercase_all(&config.keywords.code);
    config.keywords.quantity = lowercase_all(&config.keywords.quantity);
    validate_config(&config)?;
    Ok(config)
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.trim().to_lowercase()).collect()
}

/// Validate that a config is usable.
pub fn validate_config(config: &ExtractionConfig) -> Result<(), BomError> {
    if !(config.layout.vertical_tolerance > 0.0) {
        return Err(BomError::ConfigInvalid(format!(
            "layout.vertical_tolerance must be positive (got {})",
            config.layout.vertical_tolerance
        )));
    }

    if config.layout.max_word_gap < 0.0 || config.layout.max_word_gap.is_nan() {
        return Err(BomError::ConfigInvalid(format!(
            "layout.max_word_gap must not be negative (got {})",
            config.layout.max_word_gap
        )));
    }

    if !(config.columns.horizontal_tolerance > 0.0) {
        return Err(BomError::ConfigInvalid(format!(
            "columns.horizontal_tolerance must be positive (got {})",
            config.columns.horizontal_tolerance
        )));
    }

    for (name, keywords) in [
        ("code", &config.keywords.code),
        ("quantity", &config.keywords.quantity),
    ] {
        if keywords.is_empty() {
            return Err(BomError::ConfigInvalid(format!(
                "keywords.{name} must not be empty"
            )));
        }
        if keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(BomError::ConfigInvalid(format!(
                "keywords.{name} contains an empty keyword"
            )));
        }
    }

    if config.spreadsheet.header_scan_rows == 0 {
        return Err(BomError::ConfigInvalid(
            "spreadsheet.header_scan_rows must be at least 1".into(),
        ));
    }

    if config
        .spreadsheet
        .quantity_column_preference
        .contains(&config.spreadsheet.code_column)
    {
        return Err(BomError::ConfigInvalid(format!(
            "spreadsheet.quantity_column_preference must not include the code column {}",
            config.spreadsheet.code_column
        )));
    }

    Regex::new(&config.line_scan.code_pattern).map_err(|e| {
        BomError::ConfigInvalid(format!("line_scan.code_pattern is not a valid regex: {e}"))
    })?;

    if config.line_scan.default_quantity <= Decimal::ZERO {
        return Err(BomError::ConfigInvalid(
            "line_scan.default_quantity must be positive".into(),
        ));
    }

    Ok(())
}
