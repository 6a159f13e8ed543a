//! Product manifest lines sent with shipments and cross-border quotations.

use serde::{Deserialize, Serialize};

use crate::domain::commerce::LineItem;

const DEFAULT_HS_CODE: &str = "0000000000";
const DEFAULT_ORIGIN_COUNTRY: &str = "MX";
const PRODUCT_TYPE_CODE: &str = "P";
const PRODUCT_TYPE_NAME: &str = "Producto";

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomsProduct {
    pub name: String,
    pub description_en: String,
    pub quantity: u32,
    pub price: f64,
    pub sku: String,
    pub hs_code: String,
    pub hs_code_description: String,
    pub product_type_code: String,
    pub product_type_name: String,
    pub country_code: String,
}

impl CustomsProduct {
    pub fn from_line_item(item: &LineItem) -> Self {
        let product = item.variant.as_ref().and_then(|v| v.product.as_ref());
        let hs_code = product
            .and_then(|p| p.hs_code.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_HS_CODE);
        let country = product
            .and_then(|p| p.origin_country.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_ORIGIN_COUNTRY);
        let description = item
            .product_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&item.title);

        Self {
            name: item.title.clone(),
            description_en: description.to_string(),
            quantity: item.quantity,
            price: item.unit_price,
            sku: item.sku().to_string(),
            hs_code: hs_code.to_string(),
            hs_code_description: item.title.clone(),
            product_type_code: PRODUCT_TYPE_CODE.to_string(),
            product_type_name: PRODUCT_TYPE_NAME.to_string(),
            country_code: country.to_uppercase(),
        }
    }

    pub fn manifest(items: &[LineItem]) -> Vec<Self> {
        items.iter().map(Self::from_line_item).collect()
    }
}
