use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Cart being checked out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
}

/// Placed order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub shipping_methods: Vec<ShippingMethod>,
}

impl Order {
    /// Shipping method chosen at checkout for the given warehouse.
    pub fn shipping_method_for(&self, warehouse_id: &str) -> Option<&ShippingMethod> {
        self.shipping_methods
            .iter()
            .find(|m| m.metadata.warehouse_id.as_deref() == Some(warehouse_id))
    }
}

/// One line of a cart or order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Composite SKU, `"<sku>||<warehouse_id>"`.
    #[serde(default)]
    pub variant_sku: Option<String>,

    #[serde(default = "default_quantity", deserialize_with = "quantity_or_default")]
    pub quantity: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_price: f64,

    #[serde(default)]
    pub product_description: Option<String>,

    #[serde(default)]
    pub variant: Option<Variant>,
}

impl LineItem {
    /// Line total (`unit_price * quantity`).
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    pub fn sku(&self) -> &str {
        self.variant_sku.as_deref().unwrap_or_default()
    }
}

fn default_quantity() -> u32 {
    1
}

/// Hosts send explicit nulls for absent values; treat them like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn quantity_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_quantity))
}

/// Physical attributes of the purchased variant (kg / cm).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub length: Option<f64>,

    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub height: Option<f64>,

    #[serde(default)]
    pub product: Option<ProductInfo>,
}

/// Customs-relevant product data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default)]
    pub hs_code: Option<String>,

    #[serde(default)]
    pub origin_country: Option<String>,
}

/// Customer shipping address as captured at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub address_1: Option<String>,

    #[serde(default)]
    pub address_2: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub province: Option<String>,

    #[serde(default)]
    pub district: Option<String>,

    #[serde(default)]
    pub postal_code: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

/// Fulfillment created by the host for part of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fulfillment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<FulfillmentItem>,
}

impl Fulfillment {
    pub fn contains_line_item(&self, line_item_id: &str) -> bool {
        self.items.iter().any(|i| i.line_item_id == line_item_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FulfillmentItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_item_id: String,

    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Shipping method stored on the order after checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingMethod {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ShippingMethodMetadata,
}

/// Metadata written by checkout when the customer picked a shipping option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingMethodMetadata {
    #[serde(default)]
    pub warehouse_id: Option<String>,

    #[serde(default)]
    pub quotation_id: Option<String>,

    #[serde(default)]
    pub rate_id: Option<String>,

    /// The shipping option as it was offered, including its rate metadata.
    #[serde(default)]
    pub original_rate: Option<Value>,
}

impl ShippingMethodMetadata {
    /// Rate id picked at checkout: the explicit `rate_id`, else
    /// `original_rate.metadata.id`.
    pub fn selected_rate_id(&self) -> Option<String> {
        non_empty(self.rate_id.as_deref()).or_else(|| {
            self.original_rate
                .as_ref()
                .and_then(|rate| rate.pointer("/metadata/id"))
                .and_then(Value::as_str)
                .and_then(|id| non_empty(Some(id)))
        })
    }

    pub fn quotation_id(&self) -> Option<String> {
        non_empty(self.quotation_id.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
