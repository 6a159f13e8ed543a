//! Handler wiring.
//!
//! Builds every handler from one `AppConfig` and a shared gateway, so the
//! binary, a host framework and the integration tests all wire the same way.

use std::sync::Arc;

use super::handlers::{
    CarrierAdminHandler, CreateShipmentHandler, PickupLifecycleHandler, QuoteShippingRatesHandler,
};
use super::poller::{PollPolicy, TerminalStatePoller};
use crate::config::AppConfig;
use crate::domain::shipping::{AddressNormalizer, PrintingFormat};
use crate::ports::{CarrierGateway, TokenProvider};

/// All application handlers, sharing one gateway and one store address.
pub struct ShippingServices {
    pub quotes: QuoteShippingRatesHandler,
    pub shipments: CreateShipmentHandler,
    pub pickups: PickupLifecycleHandler,
    pub admin: CarrierAdminHandler,
}

impl ShippingServices {
    pub fn new(
        config: &AppConfig,
        gateway: Arc<dyn CarrierGateway>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let addresses = Arc::new(AddressNormalizer::new(config.store.clone()));
        let polling = &config.polling;
        let printing_format = PrintingFormat::parse(&config.carrier.printing_format)
            .unwrap_or(PrintingFormat::Thermal);

        Self {
            quotes: QuoteShippingRatesHandler::new(
                Arc::clone(&gateway),
                Arc::clone(&addresses),
                config.carrier.requested_carriers_list(),
                TerminalStatePoller::new("quotation", PollPolicy::from(polling.quotation)),
            ),
            shipments: CreateShipmentHandler::new(
                Arc::clone(&gateway),
                addresses,
                printing_format,
                TerminalStatePoller::new("shipment", PollPolicy::from(polling.shipment)),
            ),
            pickups: PickupLifecycleHandler::new(
                Arc::clone(&gateway),
                TerminalStatePoller::new("pickup", PollPolicy::from(polling.pickup)),
            ),
            admin: CarrierAdminHandler::new(gateway, tokens),
        }
    }
}
