//! The products file: a JSON array of products with their BOMs.

use std::path::Path;

use crate::error::BomError;
use crate::model::{BomLine, Product};

/// Load products from a JSON file.
pub fn load_products(path: &Path) -> Result<Vec<Product>, BomError> {
    let content = std::fs::read_to_string(path).map_err(|e| BomError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| BomError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load products, treating a missing file as an empty list.
pub fn load_products_or_empty(path: &Path) -> Result<Vec<Product>, BomError> {
    if path.exists() {
        load_products(path)
    } else {
        Ok(Vec::new())
    }
}

pub fn save_products(path: &Path, products: &[Product]) -> Result<(), BomError> {
    let json = serde_json::to_string_pretty(products)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Replace the BOM of the product with `code`, creating it when absent.
///
/// Returns the index of the updated product.
pub fn upsert_bom(products: &mut Vec<Product>, code: &str, name: &str, bom: Vec<BomLine>) -> usize {
    if let Some(index) = products.iter().position(|p| p.code == code) {
        let product = &mut products[index];
        if !name.is_empty() {
            product.name = name.to_string();
        }
        product.replace_bom(bom);
        tracing::info!(code, lines = product.bom.len(), "replaced product BOM");
        return index;
    }

    let name = if name.is_empty() { code } else { name };
    products.push(Product {
        id: format!("p_{code}"),
        code: code.to_string(),
        name: name.to_string(),
        bom,
    });
    tracing::info!(code, "created product");
    products.len() - 1
}
