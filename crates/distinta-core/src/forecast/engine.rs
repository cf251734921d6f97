use std::collections::HashMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::forecast::outcome::{ForecastLine, ProductContribution, DESCRIPTION_UNAVAILABLE};
use crate::model::{Product, ProductionPlanEntry};

/// Description lookup used to enrich forecast output.
pub trait ComponentLookup {
    fn description(&self, component_code: &str) -> Option<String>;
}

impl ComponentLookup for HashMap<String, String> {
    fn description(&self, component_code: &str) -> Option<String> {
        self.get(component_code).cloned()
    }
}

struct Accumulator {
    total: Decimal,
    breakdown: Vec<ProductContribution>,
}

/// Aggregate component demand over a production plan.
///
/// Entries with a non-positive quantity or an unknown product id are skipped,
/// as are contributions whose product or running total would overflow.
/// Output lines follow the order in which each code first appears.
pub fn calculate_forecast(
    plan: &[ProductionPlanEntry],
    products: &[Product],
    components: &dyn ComponentLookup,
) -> Vec<ForecastLine> {
    let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut totals: IndexMap<&str, Accumulator> = IndexMap::new();

    for entry in plan {
        if entry.quantity <= Decimal::ZERO {
            tracing::debug!(product_id = %entry.product_id, quantity = %entry.quantity, "skipping non-positive plan entry");
            continue;
        }
        let Some(product) = by_id.get(entry.product_id.as_str()) else {
            tracing::warn!(product_id = %entry.product_id, "plan references unknown product");
            continue;
        };

        for line in &product.bom {
            let Some(needed) = line.quantity.checked_mul(entry.quantity) else {
                tracing::warn!(
                    product_id = %entry.product_id,
                    component = %line.component_code,
                    "component demand overflows, contribution skipped"
                );
                continue;
            };
            let needed = needed.normalize();
            let acc = totals
                .entry(line.component_code.as_str())
                .or_insert_with(|| Accumulator {
                    total: Decimal::ZERO,
                    breakdown: Vec::new(),
                });
            let Some(total) = acc.total.checked_add(needed) else {
                tracing::warn!(
                    product_id = %entry.product_id,
                    component = %line.component_code,
                    "component total overflows, contribution skipped"
                );
                continue;
            };
            acc.total = total;
            acc.breakdown.push(ProductContribution {
                product_name: product.name.clone(),
                product_quantity: entry.quantity,
                quantity_per_unit: line.quantity,
                total_for_product: needed,
            });
        }
    }

    tracing::debug!(components = totals.len(), "forecast aggregated");

    totals
        .into_iter()
        .map(|(code, acc)| ForecastLine {
            component_code: code.to_string(),
            description: components
                .description(code)
                .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string()),
            total_quantity: acc.total.normalize(),
            breakdown: acc.breakdown,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BomLine;
    use rust_decimal_macros::dec;

    fn product(id: &str, name: &str, bom: &[(&str, Decimal)]) -> Product {
        Product {
            id: id.into(),
            code: id.to_uppercase(),
            name: name.into(),
            bom: bom
                .iter()
                .map(|(c, q)| BomLine {
                    component_code: c.to_string(),
                    quantity: *q,
                })
                .collect(),
        }
    }

    fn plan(entries: &[(&str, Decimal)]) -> Vec<ProductionPlanEntry> {
        entries
            .iter()
            .map(|(id, q)| ProductionPlanEntry {
                product_id: id.to_string(),
                quantity: *q,
            })
            .collect()
    }

    fn fixture() -> Vec<Product> {
        vec![
            product("p1", "Board A", &[("X", dec!(2))]),
            product("p2", "Board B", &[("X", dec!(1)), ("Y", dec!(5))]),
        ]
    }

    #[test]
    fn test_totals_and_breakdown() {
        let lookup: HashMap<String, String> =
            [("X".to_string(), "Resistor 10k".to_string())].into_iter().collect();
        let lines = calculate_forecast(
            &plan(&[("p1", dec!(10)), ("p2", dec!(3))]),
            &fixture(),
            &lookup,
        );

        assert_eq!(lines.len(), 2);
        let x = &lines[0];
        assert_eq!(x.component_code, "X");
        assert_eq!(x.total_quantity, dec!(23));
        assert_eq!(x.description, "Resistor 10k");
        assert_eq!(x.breakdown.len(), 2);
        assert_eq!(x.breakdown[0].product_name, "Board A");
        assert_eq!(x.breakdown[0].total_for_product, dec!(20));
        assert_eq!(x.breakdown[1].total_for_product, dec!(3));
        assert_eq!(x.breakdown[1].quantity_per_unit, dec!(1));

        let y = &lines[1];
        assert_eq!(y.total_quantity, dec!(15));
        assert!(!y.has_description());
        assert_eq!(y.description, DESCRIPTION_UNAVAILABLE);
    }

    #[test]
    fn test_insertion_order_not_sorted() {
        let products = vec![product("p1", "A", &[("Z9", dec!(1)), ("A1", dec!(1))])];
        let lines = calculate_forecast(&plan(&[("p1", dec!(1))]), &products, &HashMap::new());
        let codes: Vec<_> = lines.iter().map(|l| l.component_code.as_str()).collect();
        assert_eq!(codes, vec!["Z9", "A1"]);
    }

    #[test]
    fn test_skips_unknown_and_non_positive_entries() {
        let lines = calculate_forecast(
            &plan(&[("missing", dec!(5)), ("p1", dec!(0)), ("p2", dec!(-2))]),
            &fixture(),
            &HashMap::new(),
        );
        assert!(lines.is_empty());
    }

    #[test]
    fn test_empty_plan() {
        assert!(calculate_forecast(&[], &fixture(), &HashMap::new()).is_empty());
    }

    #[test]
    fn test_fractional_quantities() {
        let products = vec![product("p1", "A", &[("W", dec!(0.5))])];
        let lines = calculate_forecast(&plan(&[("p1", dec!(3))]), &products, &HashMap::new());
        assert_eq!(lines[0].total_quantity, dec!(1.5));
    }

    #[test]
    fn test_overflowing_product_is_skipped() {
        let huge = crate::parsing::normalize::parse_quantity("999999999999999").unwrap();
        let products = vec![
            product("p1", "Big", &[("X", huge), ("Y", dec!(2))]),
            product("p2", "Small", &[("X", dec!(1))]),
        ];
        let lines = calculate_forecast(
            &plan(&[("p1", huge), ("p2", dec!(4))]),
            &products,
            &HashMap::new(),
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].component_code, "Y");
        assert_eq!(lines[0].total_quantity, dec!(1999999999999998));
        assert_eq!(lines[1].component_code, "X");
        assert_eq!(lines[1].total_quantity, dec!(4));
        assert_eq!(lines[1].breakdown.len(), 1);
        assert_eq!(lines[1].breakdown[0].product_name, "Small");
    }

    #[test]
    fn test_overflowing_total_keeps_breakdown_consistent() {
        let half = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let products = vec![product("p1", "A", &[("X", half)])];
        let lines = calculate_forecast(
            &plan(&[("p1", dec!(1)), ("p1", dec!(1))]),
            &products,
            &HashMap::new(),
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].total_quantity, half);
        assert_eq!(lines[0].breakdown.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let p = plan(&[("p1", dec!(10)), ("p2", dec!(3))]);
        let products = fixture();
        let first = calculate_forecast(&p, &products, &HashMap::new());
        let second = calculate_forecast(&p, &products, &HashMap::new());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
