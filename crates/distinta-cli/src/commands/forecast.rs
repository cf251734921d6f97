use distinta_core::catalog::{load_catalog, Catalog};
use distinta_core::error::BomError;
use distinta_core::model::ProductionPlanEntry;
use distinta_core::products::load_products;
use std::path::Path;

use crate::output;

pub fn run(
    products_file: &Path,
    catalog_file: Option<&Path>,
    plan: &[ProductionPlanEntry],
    output_format: &str,
) -> Result<(), BomError> {
    let products = load_products(products_file)?;
    let catalog = match catalog_file {
        Some(path) => load_catalog(path)?,
        None => Catalog::default(),
    };

    let forecast = distinta_core::calculate_forecast(plan, &products, &catalog);

    match output_format {
        "json" => output::json::print(&forecast)?,
        _ => output::table::print_forecast(&forecast),
    }
    Ok(())
}
