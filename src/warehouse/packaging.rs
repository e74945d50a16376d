use serde::Serialize;
use std::collections::HashMap;

use super::WarehouseItem;
use crate::util::round2;

/// Key used when an item has no package
const NO_PACKAGE: &str = "---";

/// Items of one product, unit and package type folded together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedItem {
    /// First item of the group, with `amount` holding the group total
    #[serde(flatten)]
    pub item: WarehouseItem,
    pub items_count: usize,
}

fn group_key(item: &WarehouseItem) -> String {
    let package = item
        .package
        .as_ref()
        .map(|package| package.package_type.as_str())
        .unwrap_or(NO_PACKAGE);
    format!("{}_{}_{}", item.product.code, item.unit_of_measure, package)
}

/// Fold location items by product code, unit of measure and package type.
///
/// Groups keep the order in which they first appear.
pub fn aggregate_packaging(items: &[WarehouseItem]) -> Vec<AggregatedItem> {
    let mut groups: Vec<AggregatedItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = group_key(item);
        match index.get(&key).copied() {
            Some(position) => {
                let group = &mut groups[position];
                group.items_count += 1;
                group.item.amount = round2(group.item.amount + item.amount);
            }
            None => {
                index.insert(key, groups.len());
                groups.push(AggregatedItem {
                    item: item.clone(),
                    items_count: 1,
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{Package, ProductRef};

    fn item(code: &str, product: &str, amount: f64, package: Option<&str>) -> WarehouseItem {
        WarehouseItem {
            code: code.to_string(),
            product: ProductRef {
                code: product.to_string(),
                name: product.to_lowercase(),
            },
            unit_of_measure: "ks".to_string(),
            amount,
            package: package.map(|kind| Package {
                code: format!("{}-{}", kind, code),
                package_type: kind.to_string(),
                description: None,
                amount: 1.0,
                unit: "ks".to_string(),
            }),
        }
    }

    #[test]
    fn test_same_key_is_merged() {
        let items = vec![
            item("W1", "P-1", 3.0, Some("box")),
            item("W2", "P-1", 4.0, Some("box")),
        ];

        let aggregated = aggregate_packaging(&items);

        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].items_count, 2);
        assert_eq!(aggregated[0].item.amount, 7.0);
        assert_eq!(aggregated[0].item.code, "W1");
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let items = vec![
            item("W1", "P-2", 1.0, None),
            item("W2", "P-1", 1.0, Some("box")),
            item("W3", "P-2", 0.1, None),
            item("W4", "P-1", 0.2, Some("pallet")),
            item("W5", "P-2", 0.2, None),
        ];

        let aggregated = aggregate_packaging(&items);

        let codes: Vec<&str> = aggregated.iter().map(|a| a.item.code.as_str()).collect();
        assert_eq!(codes, vec!["W1", "W2", "W4"]);
        assert_eq!(aggregated[0].items_count, 3);
        assert_eq!(aggregated[0].item.amount, 1.3);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_packaging(&[]).is_empty());
    }
}
