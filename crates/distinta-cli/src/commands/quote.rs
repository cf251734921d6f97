use distinta_core::catalog::load_catalog;
use distinta_core::error::BomError;
use distinta_core::quote::quote_codes;
use std::io::Read;
use std::path::Path;

use crate::output;

pub fn run(
    catalog_file: &Path,
    codes_file: Option<&Path>,
    output_format: &str,
) -> Result<(), BomError> {
    let catalog = load_catalog(catalog_file)?;
    let input = match codes_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let lines = quote_codes(&input, &catalog);

    match output_format {
        "json" => output::json::print(&lines)?,
        _ => output::table::print_quote(&lines),
    }
    Ok(())
}
