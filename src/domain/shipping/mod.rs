//! Shipping domain - warehouse grouping, parcels, addresses and carrier
//! resources (quotations, shipments, pickups).
//!
//! Everything here is pure: no I/O, no clocks. The application layer feeds
//! these types through the carrier gateway and the terminal-state poller.

mod address;
mod package;
mod pickup;
mod products;
mod quotation;
mod shipment;
mod warehouse;

pub use address::{Address, AddressNormalizer, CUSTOMER_NAME_PLACEHOLDER};
pub use package::{
    PackageDetails, DEFAULT_DIMENSION_CM, DEFAULT_ITEM_WEIGHT_KG, MAX_WEIGHT_KG,
    MIN_DIMENSION_CM, MIN_WEIGHT_KG,
};
pub use pickup::{PickupRequest, PickupResource, PICKUP_SCHEDULED, PICKUP_TIME_FORMAT};
pub use products::CustomsProduct;
pub use quotation::{
    Quotation, QuotationRequest, Rate, ShippingOption, ShippingOptionData, WarehouseRates,
    CARRIER_ID_PREFIX, PRICE_FOUND_STATUS_PREFIX,
};
pub use shipment::{
    declared_value, fulfilled_items_for_warehouse, PrintingFormat, ShipmentRequest,
    ShipmentResource, ShipmentResult, DEFAULT_CONSIGNMENT_NOTE, DEFAULT_PACKAGE_TYPE,
    WORKFLOW_IN_PROGRESS, WORKFLOW_SUCCESS,
};
pub use warehouse::{
    group_by_warehouse, warehouse_of_sku, WarehouseGroup, DEFAULT_WAREHOUSE, SKU_DELIMITER,
};
