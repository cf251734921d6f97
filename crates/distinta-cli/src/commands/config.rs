use distinta_core::config::{load_config, to_toml};
use distinta_core::error::BomError;
use std::path::Path;

pub fn show(config_file: Option<&Path>) -> Result<(), BomError> {
    let config = super::load_config_or_default(config_file)?;
    print!("{}", to_toml(&config)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), BomError> {
    let config = load_config(file)?;
    println!("Config is valid: {}", file.display());
    println!(
        "  {} code keyword(s), {} quantity keyword(s)",
        config.keywords.code.len(),
        config.keywords.quantity.len()
    );
    println!(
        "  vertical tolerance {}, horizontal tolerance {}",
        config.layout.vertical_tolerance, config.columns.horizontal_tolerance
    );
    Ok(())
}
