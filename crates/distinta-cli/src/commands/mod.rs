pub mod catalog;
pub mod config;
pub mod extract;
pub mod forecast;
pub mod quote;

use distinta_core::config::schema::ExtractionConfig;
use distinta_core::error::BomError;
use std::path::Path;

/// The config at `path`, or the built-in defaults.
fn load_config_or_default(path: Option<&Path>) -> Result<ExtractionConfig, BomError> {
    match path {
        Some(path) => distinta_core::config::load_config(path),
        None => Ok(ExtractionConfig::default()),
    }
}
