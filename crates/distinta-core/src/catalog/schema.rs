use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A supplier offer for a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub part_number: String,
    /// Unit cost.
    pub cost: Decimal,
    /// Free-form lead time as written by the supplier ("4 weeks", "stock").
    pub lead_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
}

/// An electronic component keyed by its SEKO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub seko_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asel_code: Option<String>,
    /// Warehouse code, "AS" followed by the SEKO code.
    pub lf_wms_code: String,
    pub description: String,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
}

impl Component {
    pub fn new(seko_code: &str, description: &str) -> Self {
        Component {
            id: format!("c_{seko_code}"),
            seko_code: seko_code.to_string(),
            asel_code: None,
            lf_wms_code: format!("AS{seko_code}"),
            description: description.to_string(),
            suppliers: Vec::new(),
        }
    }
}
