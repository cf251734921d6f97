use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::schema::Supplier;
use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Found,
    NotFound,
}

/// The supplier columns of a quote line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedSupplier {
    pub name: String,
    pub part_number: String,
    pub cost: Decimal,
    pub lead_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
}

impl From<&Supplier> for QuotedSupplier {
    fn from(s: &Supplier) -> Self {
        QuotedSupplier {
            name: s.name.clone(),
            part_number: s.part_number.clone(),
            cost: s.cost,
            lead_time: s.lead_time.clone(),
            packaging: s.packaging.clone(),
        }
    }
}

/// One row of a quotation: a requested code paired with one supplier offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    /// The code as it was requested.
    pub input_code: String,
    pub status: QuoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seko_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asel_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lf_wms_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` for unknown codes and for components with no supplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<QuotedSupplier>,
}

impl QuoteLine {
    fn not_found(input_code: &str) -> Self {
        QuoteLine {
            input_code: input_code.to_string(),
            status: QuoteStatus::NotFound,
            seko_code: None,
            asel_code: None,
            lf_wms_code: None,
            description: None,
            supplier: None,
        }
    }
}

/// Quote a newline-separated list of codes against the catalog.
///
/// A found component yields one line per supplier, or a single line without
/// supplier when it has none. Input order is preserved.
pub fn quote_codes(input: &str, catalog: &Catalog) -> Vec<QuoteLine> {
    let mut lines = Vec::new();

    for code in input.lines().map(str::trim).filter(|c| !c.is_empty()) {
        let Some(component) = catalog.find(code) else {
            tracing::debug!(code, "code not in catalog");
            lines.push(QuoteLine::not_found(code));
            continue;
        };

        let found = |supplier: Option<QuotedSupplier>| QuoteLine {
            input_code: code.to_string(),
            status: QuoteStatus::Found,
            seko_code: Some(component.seko_code.clone()),
            asel_code: component.asel_code.clone(),
            lf_wms_code: Some(component.lf_wms_code.clone()),
            description: Some(component.description.clone()),
            supplier,
        };

        if component.suppliers.is_empty() {
            lines.push(found(None));
        } else {
            lines.extend(component.suppliers.iter().map(|s| found(Some(s.into()))));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::Component;
    use rust_decimal_macros::dec;

    fn supplier(name: &str, cost: Decimal) -> Supplier {
        Supplier {
            id: format!("s_{name}"),
            name: name.into(),
            part_number: "PN-1".into(),
            cost,
            lead_time: "2 weeks".into(),
            packaging: None,
        }
    }

    fn catalog() -> Catalog {
        let mut with_suppliers = Component::new("514846", "Resistor 10k");
        with_suppliers.suppliers = vec![supplier("Mouser", dec!(0.05)), supplier("Digikey", dec!(0.04))];
        Catalog::new(vec![with_suppliers, Component::new("823301", "Capacitor 100nF")])
    }

    #[test]
    fn test_one_line_per_supplier() {
        let lines = quote_codes("000514846\n", &catalog());
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.status == QuoteStatus::Found));
        assert_eq!(lines[0].input_code, "000514846");
        assert_eq!(lines[1].supplier.as_ref().unwrap().name, "Digikey");
    }

    #[test]
    fn test_found_without_suppliers() {
        let lines = quote_codes("823301", &catalog());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].status, QuoteStatus::Found);
        assert!(lines[0].supplier.is_none());
        assert_eq!(lines[0].lf_wms_code.as_deref(), Some("AS823301"));
    }

    #[test]
    fn test_unknown_code_and_order() {
        let lines = quote_codes("  999 \n\n823301\r\n", &catalog());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].status, QuoteStatus::NotFound);
        assert_eq!(lines[0].input_code, "999");
        assert_eq!(lines[1].input_code, "823301");
    }

    #[test]
    fn test_blank_input() {
        assert!(quote_codes(" \n \n", &catalog()).is_empty());
    }
}
