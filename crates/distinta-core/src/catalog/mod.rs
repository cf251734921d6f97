pub mod import;
pub mod schema;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BomError;
use crate::forecast::ComponentLookup;
use crate::parsing::normalize::clean_code;
use schema::Component;

/// The component catalog, as stored in a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub components: Vec<Component>,
}

impl Catalog {
    pub fn new(components: Vec<Component>) -> Self {
        Catalog { components }
    }

    /// Find a component by SEKO code, ignoring leading zeros and whitespace.
    pub fn find(&self, code: &str) -> Option<&Component> {
        let wanted = clean_code(code);
        if wanted.is_empty() {
            return None;
        }
        self.components
            .iter()
            .find(|c| clean_code(&c.seko_code) == wanted)
    }

    /// Append imported components after the existing ones.
    ///
    /// An imported component whose SEKO code is already present contributes
    /// its suppliers to the existing entry instead of a second component.
    /// Returns the number of components added.
    pub fn append(&mut self, imported: Catalog) -> usize {
        let mut added = 0;
        for component in imported.components {
            let wanted = clean_code(&component.seko_code);
            let existing = self
                .components
                .iter_mut()
                .find(|c| clean_code(&c.seko_code) == wanted);
            match existing {
                Some(existing) => {
                    for mut supplier in component.suppliers {
                        supplier.id =
                            format!("s_{}_{}", existing.seko_code, existing.suppliers.len());
                        existing.suppliers.push(supplier);
                    }
                }
                None => {
                    self.components.push(component);
                    added += 1;
                }
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentLookup for Catalog {
    fn description(&self, component_code: &str) -> Option<String> {
        self.find(component_code).map(|c| c.description.clone())
    }
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, BomError> {
    let content = std::fs::read_to_string(path).map_err(|e| BomError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| BomError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load a catalog, treating a missing file as an empty catalog.
pub fn load_catalog_or_empty(path: &Path) -> Result<Catalog, BomError> {
    if path.exists() {
        load_catalog(path)
    } else {
        Ok(Catalog::default())
    }
}

/// Write a catalog as pretty JSON.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), BomError> {
    let json = serde_json::to_string_pretty(catalog)?;
    std::fs::write(path, json)?;
    Ok(())
}
