//! Carrier pickups.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::domain::foundation::ShippingError;

/// Status of a pickup the carrier has confirmed.
pub const PICKUP_SCHEDULED: &str = "scheduled";

/// Wire format of pickup window timestamps.
pub const PICKUP_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pickup window for the packages of a shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupRequest {
    pub reference_shipment_id: String,
    pub packages: u32,
    pub total_weight: f64,
    #[serde(serialize_with = "serialize_pickup_time")]
    pub scheduled_from: NaiveDateTime,
    #[serde(serialize_with = "serialize_pickup_time")]
    pub scheduled_to: NaiveDateTime,
}

impl PickupRequest {
    /// Rejects requests the carrier would refuse.
    pub fn validate(&self) -> Result<(), ShippingError> {
        if self.reference_shipment_id.trim().is_empty() {
            return Err(ShippingError::invalid_request(
                "reference_shipment_id",
                "must not be empty",
            ));
        }
        if self.packages == 0 {
            return Err(ShippingError::invalid_request(
                "packages",
                "must be greater than zero",
            ));
        }
        if !(self.total_weight.is_finite() && self.total_weight > 0.0) {
            return Err(ShippingError::invalid_request(
                "total_weight",
                "must be greater than zero",
            ));
        }
        if self.scheduled_from >= self.scheduled_to {
            return Err(ShippingError::invalid_request(
                "scheduled_to",
                "must be later than scheduled_from",
            ));
        }
        Ok(())
    }
}

fn serialize_pickup_time<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(PICKUP_TIME_FORMAT))
}

/// Pickup as reported by the carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupResource {
    pub id: String,
    pub status: Option<String>,
    pub payload: Value,
}

impl PickupResource {
    pub fn is_scheduled(&self) -> bool {
        self.status.as_deref() == Some(PICKUP_SCHEDULED)
    }
}
