use distinta_core::catalog::import::import_catalog;
use distinta_core::catalog::{load_catalog_or_empty, save_catalog};
use distinta_core::error::BomError;
use std::path::Path;

pub fn import(input_file: &Path, out: &Path) -> Result<(), BomError> {
    let grid = distinta_core::read_grid_file(input_file)?;
    let import = import_catalog(&grid)?;

    let mut catalog = load_catalog_or_empty(out)?;
    let imported = import.catalog.len();
    let added = catalog.append(import.catalog);
    save_catalog(out, &catalog)?;

    eprintln!(
        "Imported {} component(s) with {} supplier(s) into {} ({} new, {} total)",
        imported,
        import.suppliers,
        out.display(),
        added,
        catalog.len()
    );
    if !import.skipped_rows.is_empty() {
        let rows: Vec<String> = import.skipped_rows.iter().map(|r| r.to_string()).collect();
        eprintln!(
            "  {} row(s) skipped for missing required values: {}",
            rows.len(),
            rows.join(", ")
        );
    }
    Ok(())
}
