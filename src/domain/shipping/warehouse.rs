//! Warehouse partitioning of line items.
//!
//! The warehouse that fulfils an item is encoded in its SKU as
//! `"<sku>||<warehouse_id>"`. Grouping only looks at SKU content, so the same
//! items always produce the same groups regardless of their order.

use std::collections::BTreeMap;

use crate::domain::commerce::LineItem;

/// Separator between the product SKU and the warehouse id.
pub const SKU_DELIMITER: &str = "||";

/// Group for items whose SKU carries no warehouse segment.
pub const DEFAULT_WAREHOUSE: &str = "default";

/// Line items shipped from the same origin.
#[derive(Debug, Clone)]
pub struct WarehouseGroup {
    pub warehouse_id: String,
    pub items: Vec<LineItem>,
}

/// Extracts the warehouse id from a composite SKU.
pub fn warehouse_of_sku(sku: &str) -> &str {
    sku.split(SKU_DELIMITER)
        .nth(1)
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .unwrap_or(DEFAULT_WAREHOUSE)
}

/// Partitions items by warehouse, ordered by warehouse id.
pub fn group_by_warehouse(items: &[LineItem]) -> Vec<WarehouseGroup> {
    let mut groups: BTreeMap<String, Vec<LineItem>> = BTreeMap::new();
    for item in items {
        groups
            .entry(warehouse_of_sku(item.sku()).to_string())
            .or_default()
            .push(item.clone());
    }

    groups
        .into_iter()
        .map(|(warehouse_id, items)| WarehouseGroup {
            warehouse_id,
            items,
        })
        .collect()
}
