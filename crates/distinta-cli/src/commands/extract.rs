use distinta_core::error::BomError;
use distinta_core::products::{load_products_or_empty, save_products, upsert_bom};
use distinta_core::PdfStrategy;
use std::path::PathBuf;

use crate::output;

/// `save_as` pairs the products file with the product code.
pub fn run(
    input_file: PathBuf,
    strategy: PdfStrategy,
    config_file: Option<PathBuf>,
    output_format: &str,
    save_as: Option<(PathBuf, String)>,
    product_name: &str,
) -> Result<(), BomError> {
    let config = super::load_config_or_default(config_file.as_deref())?;
    tracing::debug!(file = %input_file.display(), ?strategy, "extracting");
    let bom = distinta_core::extract_file(&input_file, &config, strategy)?;

    match output_format {
        "json" => output::json::print(&bom)?,
        _ => output::table::print_bom(&bom),
    }

    if let Some((products_file, product_code)) = save_as {
        let mut products = load_products_or_empty(&products_file)?;
        let index = upsert_bom(&mut products, &product_code, product_name, bom.lines);
        save_products(&products_file, &products)?;
        eprintln!(
            "Saved BOM of {} ({} line(s)) to {}",
            products[index].name,
            products[index].bom.len(),
            products_file.display()
        );
    }

    Ok(())
}
