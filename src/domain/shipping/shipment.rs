//! Shipments: request construction, item selection and result envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::address::Address;
use super::products::CustomsProduct;
use super::warehouse::warehouse_of_sku;
use crate::domain::commerce::{Fulfillment, LineItem, Order};

/// Workflow status while the carrier is still generating the label.
pub const WORKFLOW_IN_PROGRESS: &str = "in_progress";

/// Workflow status of a shipment whose label was generated.
pub const WORKFLOW_SUCCESS: &str = "success";

/// SAT consignment note code for auto parts.
pub const DEFAULT_CONSIGNMENT_NOTE: &str = "53102400";

/// SAT packaging code for boxes.
pub const DEFAULT_PACKAGE_TYPE: &str = "4G";

/// Label printing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintingFormat {
    Standard,
    Thermal,
}

impl PrintingFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Some(PrintingFormat::Standard),
            "thermal" => Some(PrintingFormat::Thermal),
            _ => None,
        }
    }
}

/// Shipment creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRequest {
    pub quotation_id: String,
    pub rate_id: String,
    pub protected: bool,
    pub declared_value: f64,
    pub printing_format: PrintingFormat,
    pub address_from: Address,
    pub address_to: Address,
    pub consignment_note: String,
    pub package_type: String,
    pub products: Vec<CustomsProduct>,
}

/// Shipment as reported by the carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentResource {
    pub id: String,
    pub workflow_status: Option<String>,
    /// Full carrier payload, passed back to the caller untouched.
    pub payload: Value,
}

impl ShipmentResource {
    pub fn is_in_progress(&self) -> bool {
        self.workflow_status.as_deref() == Some(WORKFLOW_IN_PROGRESS)
    }

    pub fn is_successful(&self) -> bool {
        self.workflow_status.as_deref() == Some(WORKFLOW_SUCCESS)
    }
}

/// Outcome of a shipment creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentResult {
    pub success: bool,
    pub shipment: Option<Value>,
}

impl ShipmentResult {
    pub fn from_resource(resource: ShipmentResource) -> Self {
        Self {
            success: resource.is_successful(),
            shipment: Some(resource.payload),
        }
    }
}

/// Order items that ship from `warehouse_id` and are part of `fulfillment`.
pub fn fulfilled_items_for_warehouse<'a>(
    order: &'a Order,
    fulfillment: &Fulfillment,
    warehouse_id: &str,
) -> Vec<&'a LineItem> {
    order
        .items
        .iter()
        .filter(|item| {
            warehouse_of_sku(item.sku()) == warehouse_id && fulfillment.contains_line_item(&item.id)
        })
        .collect()
}

/// Sum of line totals.
pub fn declared_value<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> f64 {
    items.into_iter().map(LineItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commerce::FulfillmentItem;
    use serde_json::json;

    fn order() -> Order {
        serde_json::from_value(json!({
            "id": "order_1",
            "items": [
                { "id": "li_1", "title": "A", "variant_sku": "A||WH1", "quantity": 2, "unit_price": 100.0 },
                { "id": "li_2", "title": "B", "variant_sku": "B||WH2", "quantity": 1, "unit_price": 50.0 },
                { "id": "li_3", "title": "C", "variant_sku": "C||WH1", "quantity": 1, "unit_price": 25.5 }
            ]
        }))
        .unwrap()
    }

    fn fulfillment(ids: &[&str]) -> Fulfillment {
        Fulfillment {
            id: "ful_1".to_string(),
            items: ids
                .iter()
                .map(|id| FulfillmentItem {
                    line_item_id: id.to_string(),
                    quantity: None,
                })
                .collect(),
        }
    }

    #[test]
    fn selects_items_by_warehouse_and_fulfillment() {
        let order = order();
        let items = fulfilled_items_for_warehouse(&order, &fulfillment(&["li_1", "li_2"]), "WH1");
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["li_1"]);
    }

    #[test]
    fn unfulfilled_warehouse_yields_nothing() {
        let order = order();
        assert!(fulfilled_items_for_warehouse(&order, &fulfillment(&["li_2"]), "WH1").is_empty());
    }

    #[test]
    fn declared_value_sums_line_totals() {
        let order = order();
        let items = fulfilled_items_for_warehouse(&order, &fulfillment(&["li_1", "li_3"]), "WH1");
        assert_eq!(declared_value(items), 225.5);
    }

    #[test]
    fn success_requires_success_status() {
        let resource = |status: Option<&str>| ShipmentResource {
            id: "shp_1".to_string(),
            workflow_status: status.map(str::to_string),
            payload: json!({}),
        };

        assert!(ShipmentResult::from_resource(resource(Some("success"))).success);
        assert!(!ShipmentResult::from_resource(resource(Some("failed"))).success);
        assert!(!ShipmentResult::from_resource(resource(Some("in_progress"))).success);
        assert!(!ShipmentResult::from_resource(resource(None)).success);
    }

    #[test]
    fn printing_format_parses_case_insensitively() {
        assert_eq!(PrintingFormat::parse("Thermal"), Some(PrintingFormat::Thermal));
        assert_eq!(PrintingFormat::parse("standard"), Some(PrintingFormat::Standard));
        assert_eq!(PrintingFormat::parse("a4"), None);
    }
}
