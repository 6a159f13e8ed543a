//! Origin and destination address derivation.
//!
//! The origin comes from store configuration and always resolves, falling
//! back to the flagship store's address field by field. The destination comes
//! from the customer's shipping address and is never fabricated: no shipping
//! address means no destination.

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::domain::commerce::{Cart, Order, ShippingAddress};
use crate::domain::foundation::digits_only;

/// Name used when the customer left both name fields empty.
pub const CUSTOMER_NAME_PLACEHOLDER: &str = "Cliente";

const DEFAULT_COUNTRY_CODE: &str = "mx";
const UNKNOWN_AREA: &str = "N/A";
const DEFAULT_INTERNAL_NUMBER: &str = "1";
const DEFAULT_CUSTOMER_PHONE: &str = "0";

const STORE_ZIP_CODE: &str = "54030";
const STORE_STATE: &str = "Estado de México";
const STORE_MUNICIPALITY: &str = "Tlalnepantla";
const STORE_SUBURB: &str = "Centro Industrial Tlalnepantla";
const STORE_STREET: &str = "Perif. Blvd. Manuel Ávila Camacho";
const STORE_EXT_NUMBER: &str = "3039";
const STORE_REFERENCE: &str = "Agencia automovil";
const STORE_NAME: &str = "Toyota Satelite";
const STORE_COMPANY: &str = "HCW Store";
const STORE_PHONE: &str = "5555555555";
const STORE_EMAIL: &str = "store@email.com";

/// Carrier address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country_code: String,
    pub postal_code: String,
    pub area_level1: String,
    pub area_level2: String,
    pub area_level3: String,
    pub street1: String,
    #[serde(rename = "apartment_number")]
    pub internal_number: String,
    pub reference: String,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

impl Address {
    /// True when the postal code survived sanitization.
    pub fn has_postal_code(&self) -> bool {
        !self.postal_code.is_empty()
    }

    /// Case-insensitive country comparison.
    pub fn same_country_as(&self, other: &Address) -> bool {
        self.country_code.eq_ignore_ascii_case(&other.country_code)
    }
}

/// Derives carrier addresses from store configuration and customer records.
#[derive(Debug, Clone)]
pub struct AddressNormalizer {
    store: StoreConfig,
}

impl AddressNormalizer {
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }

    /// Store address used as shipment origin.
    pub fn origin_address(&self) -> Address {
        let store = &self.store;
        let zip = digits_only(store.zip_code.as_deref().unwrap_or_default());
        let phone = digits_only(store.phone.as_deref().unwrap_or_default());
        let name = or_default(&store.name, STORE_NAME);

        Address {
            country_code: or_default(&store.country_code, DEFAULT_COUNTRY_CODE).to_lowercase(),
            postal_code: if zip.is_empty() { STORE_ZIP_CODE.to_string() } else { zip },
            area_level1: or_default(&store.state, STORE_STATE),
            area_level2: or_default(&store.municipality, STORE_MUNICIPALITY),
            area_level3: or_default(&store.suburb, STORE_SUBURB),
            street1: or_default(&store.address, STORE_STREET),
            internal_number: or_default(&store.ext_number, STORE_EXT_NUMBER),
            reference: or_default(&store.reference, STORE_REFERENCE),
            company: non_blank(&store.company)
                .or_else(|| non_blank(&store.name))
                .unwrap_or(STORE_COMPANY)
                .to_string(),
            name,
            phone: if phone.is_empty() { STORE_PHONE.to_string() } else { phone },
            email: or_default(&store.email, STORE_EMAIL),
        }
    }

    /// Destination for a cart, or `None` when it has no shipping address.
    pub fn destination_address(&self, cart: &Cart) -> Option<Address> {
        let address = cart.shipping_address.as_ref()?;
        let postal_code = address.postal_code.as_deref().unwrap_or_default();
        Some(self.customer_address(address, postal_code, cart.email.as_deref(), &cart.id))
    }

    /// Destination for an order using an externally resolved postal code.
    pub fn destination_for_order(&self, order: &Order, resolved_zip: &str) -> Option<Address> {
        let address = order.shipping_address.as_ref()?;
        Some(self.customer_address(address, resolved_zip, order.email.as_deref(), &order.id))
    }

    fn customer_address(
        &self,
        address: &ShippingAddress,
        postal_code: &str,
        email: Option<&str>,
        record_id: &str,
    ) -> Address {
        let street = address.address_1.as_deref().map(str::trim).unwrap_or_default();
        let line2 = address.address_2.as_deref().map(str::trim).unwrap_or_default();
        let phone = digits_only(address.phone.as_deref().unwrap_or_default());

        Address {
            country_code: or_default(&address.country_code, DEFAULT_COUNTRY_CODE).to_lowercase(),
            postal_code: digits_only(postal_code),
            area_level1: or_default(&address.province, UNKNOWN_AREA),
            area_level2: or_default(&address.city, UNKNOWN_AREA),
            area_level3: or_default(&address.district, UNKNOWN_AREA),
            street1: or_default(&address.address_1, UNKNOWN_AREA),
            internal_number: or_default(&address.address_2, DEFAULT_INTERNAL_NUMBER),
            reference: format!("{} {}", street, line2).trim().to_string(),
            name: customer_name(address, record_id),
            company: or_default(&address.company, ""),
            phone: if phone.is_empty() { DEFAULT_CUSTOMER_PHONE.to_string() } else { phone },
            email: email.map(str::trim).unwrap_or_default().to_string(),
        }
    }
}

fn customer_name(address: &ShippingAddress, record_id: &str) -> String {
    let first = address.first_name.as_deref().map(str::trim).unwrap_or_default();
    let last = address.last_name.as_deref().map(str::trim).unwrap_or_default();
    let name = format!("{} {}", first, last).trim().to_string();

    if name.is_empty() {
        tracing::warn!(
            record_id = %record_id,
            placeholder = CUSTOMER_NAME_PLACEHOLDER,
            "Shipping address has no customer name, using placeholder"
        );
        return CUSTOMER_NAME_PLACEHOLDER.to_string();
    }
    name
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    non_blank(value).unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> AddressNormalizer {
        AddressNormalizer::new(StoreConfig::default())
    }

    fn shipping_address() -> ShippingAddress {
        ShippingAddress {
            first_name: Some("Ana".to_string()),
            last_name: Some("López".to_string()),
            company: None,
            address_1: Some("Av. Insurgentes Sur 1602".to_string()),
            address_2: Some("Piso 4".to_string()),
            city: Some("Benito Juárez".to_string()),
            province: Some("CDMX".to_string()),
            district: None,
            postal_code: Some("03-940".to_string()),
            country_code: Some("MX".to_string()),
            phone: Some("+52 55 1234 5678".to_string()),
        }
    }

    fn cart_with(address: Option<ShippingAddress>) -> Cart {
        Cart {
            id: "cart_1".to_string(),
            email: Some("ana@example.com".to_string()),
            shipping_address: address,
            items: vec![],
        }
    }

    #[test]
    fn origin_uses_store_fallbacks() {
        let origin = normalizer().origin_address();
        assert_eq!(origin.country_code, "mx");
        assert_eq!(origin.postal_code, "54030");
        assert_eq!(origin.area_level2, "Tlalnepantla");
        assert_eq!(origin.company, "HCW Store");
        assert_eq!(origin.phone, "5555555555");
    }

    #[test]
    fn origin_prefers_configured_values() {
        let normalizer = AddressNormalizer::new(StoreConfig {
            zip_code: Some("C.P. 06600".to_string()),
            name: Some("Tienda Centro".to_string()),
            phone: Some("(55) 8888-0000".to_string()),
            country_code: Some("MX".to_string()),
            ..Default::default()
        });

        let origin = normalizer.origin_address();
        assert_eq!(origin.postal_code, "06600");
        assert_eq!(origin.name, "Tienda Centro");
        assert_eq!(origin.company, "Tienda Centro");
        assert_eq!(origin.phone, "5588880000");
        assert_eq!(origin.country_code, "mx");
    }

    #[test]
    fn destination_is_none_without_shipping_address() {
        assert!(normalizer().destination_address(&cart_with(None)).is_none());
    }

    #[test]
    fn destination_sanitizes_postal_code_and_phone() {
        let destination = normalizer()
            .destination_address(&cart_with(Some(shipping_address())))
            .unwrap();

        assert_eq!(destination.postal_code, "03940");
        assert_eq!(destination.phone, "525512345678");
        assert_eq!(destination.name, "Ana López");
        assert_eq!(destination.reference, "Av. Insurgentes Sur 1602 Piso 4");
        assert_eq!(destination.area_level3, "N/A");
        assert_eq!(destination.email, "ana@example.com");
    }

    #[test]
    fn destination_uses_placeholder_name() {
        let mut address = shipping_address();
        address.first_name = None;
        address.last_name = Some("  ".to_string());

        let destination = normalizer()
            .destination_address(&cart_with(Some(address)))
            .unwrap();
        assert_eq!(destination.name, CUSTOMER_NAME_PLACEHOLDER);
    }

    #[test]
    fn destination_defaults_missing_fields() {
        let destination = normalizer()
            .destination_address(&cart_with(Some(ShippingAddress::default())))
            .unwrap();

        assert_eq!(destination.country_code, "mx");
        assert_eq!(destination.internal_number, "1");
        assert_eq!(destination.phone, "0");
        assert_eq!(destination.street1, "N/A");
        assert!(!destination.has_postal_code());
    }

    #[test]
    fn order_destination_uses_resolved_zip() {
        let order = Order {
            id: "order_1".to_string(),
            email: Some("ana@example.com".to_string()),
            shipping_address: Some(shipping_address()),
            items: vec![],
            shipping_methods: vec![],
        };

        let destination = normalizer().destination_for_order(&order, "11 000").unwrap();
        assert_eq!(destination.postal_code, "11000");
    }

    #[test]
    fn address_serializes_internal_number_as_apartment_number() {
        let json = serde_json::to_value(normalizer().origin_address()).unwrap();
        assert_eq!(json["apartment_number"], "3039");
        assert!(json.get("internal_number").is_none());
    }

    #[test]
    fn country_comparison_ignores_case() {
        let origin = normalizer().origin_address();
        let mut other = origin.clone();
        other.country_code = "MX".to_string();
        assert!(origin.same_country_as(&other));

        other.country_code = "us".to_string();
        assert!(!origin.same_country_as(&other));
    }
}
