//! QuoteShippingRatesHandler - Query handler for checkout shipping options.
//!
//! Splits the cart per warehouse and quotes every warehouse concurrently. A
//! warehouse whose quotation cannot be built, fails upstream or never
//! completes contributes an empty rate list; it never fails the whole quote.

use std::sync::Arc;

use futures::future::join_all;

use crate::application::poller::{PollOutcome, TerminalStatePoller};
use crate::domain::commerce::Cart;
use crate::domain::foundation::ShippingError;
use crate::domain::shipping::{
    group_by_warehouse, Address, AddressNormalizer, CustomsProduct, PackageDetails,
    QuotationRequest, WarehouseGroup, WarehouseRates,
};
use crate::ports::CarrierGateway;

/// Query for the shipping options of a cart.
#[derive(Debug, Clone)]
pub struct QuoteShippingRatesCommand {
    pub cart: Cart,
}

/// Handler for quoting shipping rates.
pub struct QuoteShippingRatesHandler {
    gateway: Arc<dyn CarrierGateway>,
    addresses: Arc<AddressNormalizer>,
    requested_carriers: Vec<String>,
    poller: TerminalStatePoller,
}

impl QuoteShippingRatesHandler {
    pub fn new(
        gateway: Arc<dyn CarrierGateway>,
        addresses: Arc<AddressNormalizer>,
        requested_carriers: Vec<String>,
        poller: TerminalStatePoller,
    ) -> Self {
        Self {
            gateway,
            addresses,
            requested_carriers,
            poller,
        }
    }

    /// One entry per warehouse group, in warehouse id order.
    pub async fn handle(&self, cmd: QuoteShippingRatesCommand) -> Vec<WarehouseRates> {
        let cart = cmd.cart;
        let groups = group_by_warehouse(&cart.items);
        let origin = self.addresses.origin_address();
        let destination = self.addresses.destination_address(&cart);

        if destination.is_none() {
            tracing::warn!(cart_id = %cart.id, "Cart has no shipping address, no rates quoted");
        }

        let mut warehouse_ids = Vec::with_capacity(groups.len());
        let mut tasks = Vec::with_capacity(groups.len());

        for group in groups {
            let request = self.build_request(&group, &origin, destination.as_ref());
            let gateway = Arc::clone(&self.gateway);
            let poller = self.poller;
            let warehouse_id = group.warehouse_id.clone();

            warehouse_ids.push(group.warehouse_id);
            tasks.push(tokio::spawn(async move {
                match request {
                    Some(request) => quote_warehouse(gateway, poller, warehouse_id, request).await,
                    None => WarehouseRates::empty(warehouse_id),
                }
            }));
        }

        join_all(tasks)
            .await
            .into_iter()
            .zip(warehouse_ids)
            .map(|(joined, warehouse_id)| {
                joined.unwrap_or_else(|e| {
                    tracing::error!(
                        warehouse_id = %warehouse_id,
                        error = %e,
                        "Quotation task did not finish"
                    );
                    WarehouseRates::empty(warehouse_id)
                })
            })
            .collect()
    }

    /// Quotation request for one group, or `None` when it cannot be quoted.
    fn build_request(
        &self,
        group: &WarehouseGroup,
        origin: &Address,
        destination: Option<&Address>,
    ) -> Option<QuotationRequest> {
        let destination = destination?;

        if !destination.has_postal_code() || !origin.has_postal_code() {
            tracing::warn!(
                warehouse_id = %group.warehouse_id,
                "Missing postal code, skipping quotation"
            );
            return None;
        }

        let parcel = PackageDetails::aggregate(&group.items);
        if !parcel.is_valid() {
            tracing::warn!(
                warehouse_id = %group.warehouse_id,
                ?parcel,
                "Package outside carrier bounds, skipping quotation"
            );
            return None;
        }

        let products = (!origin.same_country_as(destination))
            .then(|| CustomsProduct::manifest(&group.items));

        Some(QuotationRequest {
            address_from: origin.clone(),
            address_to: destination.clone(),
            parcel,
            requested_carriers: self.requested_carriers.clone(),
            products,
        })
    }
}

async fn quote_warehouse(
    gateway: Arc<dyn CarrierGateway>,
    poller: TerminalStatePoller,
    warehouse_id: String,
    request: QuotationRequest,
) -> WarehouseRates {
    let quotation = match gateway.create_quotation(&request).await {
        Ok(quotation) => quotation,
        Err(e) => {
            tracing::warn!(
                warehouse_id = %warehouse_id,
                code = %e.code,
                upstream = ?e.upstream,
                "Quotation submission failed"
            );
            return WarehouseRates::empty(warehouse_id);
        }
    };

    tracing::info!(
        warehouse_id = %warehouse_id,
        quotation_id = %quotation.id,
        completed = quotation.is_completed,
        international = request.products.is_some(),
        "Quotation submitted"
    );

    let outcome = poller
        .poll(
            quotation,
            |current| {
                let gateway = Arc::clone(&gateway);
                let id = current.id.clone();
                async move { gateway.get_quotation(&id).await }
            },
            |q| q.is_completed,
        )
        .await;

    match outcome {
        PollOutcome::Terminal { value, .. } => {
            let rates = value.shipping_options();
            tracing::info!(
                warehouse_id = %warehouse_id,
                quotation_id = %value.id,
                offered = rates.len(),
                received = value.rates.len(),
                "Quotation completed"
            );
            WarehouseRates {
                warehouse_id,
                rates,
            }
        }
        PollOutcome::Exhausted { value, attempts } => {
            let err = ShippingError::PollTimeoutExceeded {
                resource: "quotation".to_string(),
                id: value.id,
                attempts,
            };
            tracing::warn!(warehouse_id = %warehouse_id, code = %err.code(), "{}", err);
            WarehouseRates::empty(warehouse_id)
        }
        PollOutcome::Aborted { value, error, .. } => {
            tracing::warn!(
                warehouse_id = %warehouse_id,
                quotation_id = %value.id,
                code = %error.code,
                upstream = ?error.upstream,
                "Quotation polling aborted"
            );
            WarehouseRates::empty(warehouse_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::skydropx::wire::parse_quotation;
    use crate::adapters::skydropx::MockCarrierGateway;
    use crate::application::poller::PollPolicy;
    use crate::config::StoreConfig;
    use crate::domain::commerce::{LineItem, ShippingAddress};
    use crate::domain::shipping::{Quotation, Rate};
    use crate::ports::CarrierError;
    use std::time::Duration;

    fn handler(mock: &MockCarrierGateway) -> QuoteShippingRatesHandler {
        QuoteShippingRatesHandler::new(
            Arc::new(mock.clone()),
            Arc::new(AddressNormalizer::new(StoreConfig::default())),
            vec!["fedex".to_string(), "dhl".to_string()],
            TerminalStatePoller::new(
                "quotation",
                PollPolicy::new(5, Duration::from_millis(1000)),
            ),
        )
    }

    fn item(id: &str, sku: &str) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: id.to_string(),
            variant_sku: Some(sku.to_string()),
            quantity: 1,
            unit_price: 100.0,
            product_description: None,
            variant: None,
        }
    }

    fn cart(items: Vec<LineItem>, country: &str) -> Cart {
        Cart {
            id: "cart_1".to_string(),
            email: Some("ana@example.com".to_string()),
            shipping_address: Some(ShippingAddress {
                first_name: Some("Ana".to_string()),
                postal_code: Some("03940".to_string()),
                country_code: Some(country.to_string()),
                ..Default::default()
            }),
            items,
        }
    }

    fn fedex_rate() -> Rate {
        Rate {
            id: "rate_1".to_string(),
            provider_name: "fedex".to_string(),
            provider_service_code: "standard_overnight".to_string(),
            provider_service_name: "Standard Overnight".to_string(),
            status: "price_found_internal".to_string(),
            currency_code: Some("MXN".to_string()),
            cost: Some(103.37),
            total: Some(136.0),
            days: Some(1),
            zone: None,
            weight: Some(1.0),
            success: true,
        }
    }

    fn quotation(id: &str, completed: bool, rates: Vec<Rate>) -> Quotation {
        Quotation {
            id: id.to_string(),
            is_completed: completed,
            rates,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn completed_quotation_needs_no_poll() {
        let mock = MockCarrierGateway::new();
        mock.push_created_quotation(quotation("quo_1", true, vec![fedex_rate()]));

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1")], "MX"),
            })
            .await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].warehouse_id, "WH1");
        assert_eq!(result[0].rates.len(), 1);
        assert_eq!(mock.call_count("get_quotation"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_address_yields_empty_group_without_calls() {
        let mock = MockCarrierGateway::new();
        let mut cart = cart(vec![item("li_1", "A||WH1")], "MX");
        cart.shipping_address = None;

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand { cart })
            .await;

        assert_eq!(result, vec![WarehouseRates::empty("WH1")]);
        assert_eq!(mock.remote_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_postal_code_yields_empty_group() {
        let mock = MockCarrierGateway::new();
        let mut cart = cart(vec![item("li_1", "A||WH1")], "MX");
        if let Some(address) = cart.shipping_address.as_mut() {
            address.postal_code = Some("sin código".to_string());
        }

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand { cart })
            .await;

        assert!(result[0].rates.is_empty());
        assert!(!mock.was_called("create_quotation"));
    }

    #[tokio::test(start_paused = true)]
    async fn submission_failure_is_isolated_to_its_group() {
        let mock = MockCarrierGateway::new();
        mock.set_error(CarrierError::upstream("create_quotation", "Bad Gateway").with_status(502));
        mock.push_created_quotation(quotation("quo_2", true, vec![fedex_rate()]));

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1"), item("li_2", "B||WH2")], "MX"),
            })
            .await;

        assert_eq!(result.len(), 2);
        let offered: usize = result.iter().map(|g| g.rates.len()).sum();
        assert_eq!(offered, 1);
        assert_eq!(mock.call_count("create_quotation"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn incomplete_quotation_after_budget_yields_empty() {
        let mock = MockCarrierGateway::new();
        mock.push_created_quotation(quotation("quo_1", false, vec![]));
        mock.push_quotation_poll("quo_1", quotation("quo_1", false, vec![fedex_rate()]));

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1")], "MX"),
            })
            .await;

        assert!(result[0].rates.is_empty());
        assert_eq!(mock.call_count("get_quotation"), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_quotation_without_rates_is_polled_to_options() {
        let submitted = parse_quotation(
            "create_quotation",
            &serde_json::json!({ "id": "quo_1", "is_completed": false }),
        )
        .unwrap();
        let completed = parse_quotation(
            "get_quotation",
            &serde_json::json!({
                "id": "quo_1",
                "is_completed": true,
                "rates": [{
                    "id": "rate_1",
                    "success": true,
                    "provider_name": "fedex",
                    "provider_service_name": "Standard Overnight",
                    "provider_service_code": "standard_overnight",
                    "status": "price_found_internal",
                    "currency_code": "MXN",
                    "cost": "103.37",
                    "total": "136.0",
                    "days": 1
                }]
            }),
        )
        .unwrap();

        let mock = MockCarrierGateway::new();
        mock.push_created_quotation(submitted);
        mock.push_quotation_poll("quo_1", completed);

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1")], "MX"),
            })
            .await;

        assert_eq!(mock.call_count("get_quotation"), 1);
        assert_eq!(result[0].rates.len(), 1);
        assert_eq!(result[0].rates[0].id, "skydropx_fedex_standard_overnight");
    }

    #[tokio::test(start_paused = true)]
    async fn domestic_quote_has_no_customs_manifest() {
        let mock = MockCarrierGateway::new();

        handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1")], "mx"),
            })
            .await;

        let requests = mock.quotation_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].products.is_none());
        assert_eq!(requests[0].requested_carriers, vec!["fedex", "dhl"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cross_border_quote_attaches_customs_manifest() {
        let mock = MockCarrierGateway::new();

        handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1"), item("li_2", "B||WH1")], "US"),
            })
            .await;

        let requests = mock.quotation_requests();
        let products = requests[0].products.as_ref().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].sku, "A||WH1");
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_yields_empty_group() {
        let mock = MockCarrierGateway::new();
        mock.push_created_quotation(quotation("quo_1", false, vec![]));
        mock.set_method_error(
            "get_quotation",
            CarrierError::upstream("get_quotation", "Service Unavailable").with_status(503),
        );

        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![item("li_1", "A||WH1")], "MX"),
            })
            .await;

        assert!(result[0].rates.is_empty());
        assert_eq!(mock.call_count("get_quotation"), 1);
    }

    #[tokio::test]
    async fn empty_cart_yields_no_groups() {
        let mock = MockCarrierGateway::new();
        let result = handler(&mock)
            .handle(QuoteShippingRatesCommand {
                cart: cart(vec![], "MX"),
            })
            .await;

        assert!(result.is_empty());
    }
}
