//! Quotations, rates and the shipping options derived from them.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::package::PackageDetails;
use super::products::CustomsProduct;

/// Prefix of every shipping option id offered to checkout.
pub const CARRIER_ID_PREFIX: &str = "skydropx";

/// Rate statuses starting with this prefix carry a usable price.
pub const PRICE_FOUND_STATUS_PREFIX: &str = "price_found";

/// Rate request for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationRequest {
    pub address_from: Address,
    pub address_to: Address,
    pub parcel: PackageDetails,
    pub requested_carriers: Vec<String>,

    /// Customs manifest, present only for cross-border shipments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<CustomsProduct>>,
}

/// Quotation as reported by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: String,
    pub is_completed: bool,
    pub rates: Vec<Rate>,
}

impl Quotation {
    /// Shipping options for every rate that passed the candidate filter.
    pub fn shipping_options(&self) -> Vec<ShippingOption> {
        self.rates
            .iter()
            .filter(|rate| rate.is_candidate())
            .map(|rate| rate.to_shipping_option(&self.id))
            .collect()
    }
}

/// One carrier service offer inside a quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub id: String,
    pub provider_name: String,
    pub provider_service_code: String,
    pub provider_service_name: String,
    pub status: String,
    pub currency_code: Option<String>,
    pub cost: Option<f64>,
    pub total: Option<f64>,
    pub days: Option<u32>,
    pub zone: Option<String>,
    pub weight: Option<f64>,
    pub success: bool,
}

impl Rate {
    /// A rate is offered only with a positive total, a found price and a
    /// positive transit time.
    pub fn is_candidate(&self) -> bool {
        let priced = matches!(self.total, Some(total) if total.is_finite() && total > 0.0);
        let found = self.status.starts_with(PRICE_FOUND_STATUS_PREFIX);
        let timed = matches!(self.days, Some(days) if days > 0);
        priced && found && timed
    }

    /// Maps the rate onto the checkout's carrier-agnostic option.
    pub fn to_shipping_option(&self, quotation_id: &str) -> ShippingOption {
        let total = self.total.unwrap_or_default();
        ShippingOption {
            id: format!(
                "{}_{}_{}",
                CARRIER_ID_PREFIX, self.provider_name, self.provider_service_code
            ),
            name: self.provider_service_name.clone(),
            price: total,
            data: ShippingOptionData {
                provider_name: self.provider_name.clone(),
                provider_service_code: self.provider_service_code.clone(),
                estimated_days: self.days,
                currency_code: self.currency_code.clone(),
                quotation_id: quotation_id.to_string(),
                rate_id: self.id.clone(),
                status: self.status.clone(),
                cost: self.cost.unwrap_or(total),
                zone: self.zone.clone(),
                weight: self.weight,
                success: self.success,
            },
            metadata: self.clone(),
        }
    }
}

/// Priced offer presented to checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub data: ShippingOptionData,
    pub metadata: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOptionData {
    pub provider_name: String,
    pub provider_service_code: String,
    pub estimated_days: Option<u32>,
    pub currency_code: Option<String>,
    pub quotation_id: String,
    pub rate_id: String,
    pub status: String,
    pub cost: f64,
    pub zone: Option<String>,
    pub weight: Option<f64>,
    pub success: bool,
}

/// Shipping options for one warehouse group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseRates {
    pub warehouse_id: String,
    pub rates: Vec<ShippingOption>,
}

impl WarehouseRates {
    pub fn empty(warehouse_id: impl Into<String>) -> Self {
        Self {
            warehouse_id: warehouse_id.into(),
            rates: Vec::new(),
        }
    }
}
