//! Bulk catalog import from a spreadsheet whose first row names the fields.

use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::Decimal;

use crate::catalog::schema::{Component, Supplier};
use crate::catalog::Catalog;
use crate::error::BomError;
use crate::model::Cell;
use crate::parsing::normalize::f64_to_decimal;

pub const REQUIRED_HEADERS: [&str; 6] = [
    "sekoCode",
    "description",
    "supplierName",
    "supplierPartNumber",
    "cost",
    "leadTime",
];

pub const OPTIONAL_HEADERS: [&str; 2] = ["aselCode", "packaging"];

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?").expect("valid cost pattern"));

/// Outcome of a catalog import.
#[derive(Debug, Clone)]
pub struct CatalogImport {
    pub catalog: Catalog,
    pub suppliers: usize,
    /// 1-based spreadsheet row numbers that were skipped.
    pub skipped_rows: Vec<usize>,
}

/// Header name -> column index, matched exactly after trimming.
struct HeaderIndex(Vec<(String, usize)>);

impl HeaderIndex {
    fn new(header_row: &[Cell]) -> Self {
        HeaderIndex(
            header_row
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.as_text().map(|t| (t, i)))
                .collect(),
        )
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.0.iter().find(|(h, _)| h == name).map(|(_, i)| *i)
    }

    fn text(&self, row: &[Cell], name: &str) -> Option<String> {
        self.column(name)
            .and_then(|i| row.get(i))
            .and_then(Cell::as_text)
    }
}

/// Build a catalog from a header-first grid.
///
/// Rows sharing a `sekoCode` become one component; every row contributes one
/// supplier. Rows missing any required value are skipped. A grid with no
/// data below the header row is rejected as empty.
pub fn import_catalog(grid: &[Vec<Cell>]) -> Result<CatalogImport, BomError> {
    let Some((header_row, data)) = grid.split_first() else {
        return Err(BomError::Import("file is empty".into()));
    };

    if data.iter().all(|row| row.iter().all(Cell::is_empty)) {
        return Err(BomError::Import("file is empty".into()));
    }

    let headers = HeaderIndex::new(header_row);
    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|h| headers.column(h).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(BomError::Import(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut components: IndexMap<String, Component> = IndexMap::new();
    let mut skipped_rows = Vec::new();
    let mut suppliers = 0;

    for (index, row) in data.iter().enumerate() {
        let sheet_row = index + 2;
        if row.iter().all(Cell::is_empty) {
            continue;
        }

        let value = |name: &str| headers.text(row, name);
        let (
            Some(seko_code),
            Some(description),
            Some(supplier_name),
            Some(part_number),
            Some(_),
            Some(lead_time),
        ) = (
            value("sekoCode"),
            value("description"),
            value("supplierName"),
            value("supplierPartNumber"),
            value("cost"),
            value("leadTime"),
        )
        else {
            tracing::warn!(row = sheet_row, "missing required values, row skipped");
            skipped_rows.push(sheet_row);
            continue;
        };

        let cost = headers
            .column("cost")
            .and_then(|i| row.get(i))
            .map(parse_cost)
            .unwrap_or(Decimal::ZERO);

        let component = components.entry(seko_code.clone()).or_insert_with(|| {
            let mut component = Component::new(&seko_code, &description);
            component.asel_code = headers.text(row, "aselCode");
            component
        });

        let supplier_index = component.suppliers.len();
        component.suppliers.push(Supplier {
            id: format!("s_{seko_code}_{supplier_index}"),
            name: supplier_name,
            part_number,
            cost,
            lead_time,
            packaging: headers.text(row, "packaging"),
        });
        suppliers += 1;
    }

    tracing::info!(
        components = components.len(),
        suppliers,
        skipped = skipped_rows.len(),
        "catalog imported"
    );

    Ok(CatalogImport {
        catalog: Catalog::new(components.into_values().collect()),
        suppliers,
        skipped_rows,
    })
}

/// Unit cost read from the leading number of the cell, with the first comma
/// taken as the decimal separator. Anything without a leading number is zero.
fn parse_cost(cell: &Cell) -> Decimal {
    match cell {
        Cell::Number(n) if n.is_finite() => f64_to_decimal(*n).normalize(),
        Cell::Text(s) => {
            let text = s.trim().replacen(',', ".", 1);
            LEADING_NUMBER
                .find(&text)
                .and_then(|m| Decimal::from_str(m.as_str()).ok())
                .map(|d| d.normalize())
                .unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}
