use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shown when a BOM references a code with no catalog entry.
pub const DESCRIPTION_UNAVAILABLE: &str = "description unavailable";

/// One product's share of a component's total demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContribution {
    pub product_name: String,
    /// Units of the product in the plan.
    pub product_quantity: Decimal,
    /// Component quantity per product unit, from the BOM.
    pub quantity_per_unit: Decimal,
    pub total_for_product: Decimal,
}

/// Aggregated demand for one component code across a production plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLine {
    pub component_code: String,
    /// Catalog description, or [`DESCRIPTION_UNAVAILABLE`].
    pub description: String,
    pub total_quantity: Decimal,
    /// Contributions in plan order.
    pub breakdown: Vec<ProductContribution>,
}

impl ForecastLine {
    pub fn has_description(&self) -> bool {
        self.description != DESCRIPTION_UNAVAILABLE
    }
}
