//! Skydropx Pro wire format.
//!
//! Quotations come back flat (`{id, is_completed, rates}`); shipments and
//! pickups use JSON:API envelopes (`{data: {id, attributes: {...}}}`). Numeric
//! rate fields arrive as numbers, numeric strings or null depending on the
//! carrier and on how far the quotation has progressed.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::domain::shipping::{
    PickupRequest, PickupResource, Quotation, QuotationRequest, Rate, ShipmentRequest,
    ShipmentResource,
};
use crate::ports::CarrierError;

pub fn quotation_body(request: &QuotationRequest) -> Value {
    json!({ "quotation": request })
}

pub fn shipment_body(request: &ShipmentRequest) -> Value {
    json!({ "shipment": request })
}

pub fn pickup_body(request: &PickupRequest) -> Value {
    json!({ "pickup": request })
}

/// Parses a quotation, validating that it carries an id and a rate list.
///
/// A quotation still in progress may omit `rates` (or send null); it parses
/// with no rates so it can be polled. A completed one must carry a list.
pub fn parse_quotation(operation: &str, body: &Value) -> Result<Quotation, CarrierError> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| shape_error(operation, "quotation has no id", body))?;
    let is_completed = body
        .get("is_completed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let rates: &[Value] = match body.get("rates") {
        Some(Value::Array(rates)) => rates,
        None | Some(Value::Null) if !is_completed => &[],
        _ => return Err(shape_error(operation, "quotation rates are not a list", body)),
    };

    let rates = rates
        .iter()
        .filter_map(|raw| match WireRate::deserialize(raw) {
            Ok(rate) => Some(rate.into_rate()),
            Err(e) => {
                tracing::warn!(
                    operation,
                    quotation_id = %id,
                    error = %e,
                    "Skipping unreadable rate"
                );
                None
            }
        })
        .collect();

    Ok(Quotation {
        id: id.to_string(),
        is_completed,
        rates,
    })
}

pub fn parse_shipment(operation: &str, body: Value) -> Result<ShipmentResource, CarrierError> {
    let (id, workflow_status) = resource_header(operation, &body, "workflow_status")?;
    Ok(ShipmentResource {
        id,
        workflow_status,
        payload: body,
    })
}

pub fn parse_pickup(operation: &str, body: Value) -> Result<PickupResource, CarrierError> {
    let (id, status) = resource_header(operation, &body, "status")?;
    Ok(PickupResource {
        id,
        status,
        payload: body,
    })
}

fn resource_header(
    operation: &str,
    body: &Value,
    status_field: &str,
) -> Result<(String, Option<String>), CarrierError> {
    let data = body
        .get("data")
        .ok_or_else(|| shape_error(operation, "response has no data object", body))?;
    let id = match data.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(shape_error(operation, "resource has no id", body)),
    };
    let status = data
        .get("attributes")
        .and_then(|attributes| attributes.get(status_field))
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok((id, status))
}

fn shape_error(operation: &str, message: &str, body: &Value) -> CarrierError {
    CarrierError::response_shape(operation, message).with_upstream(body.clone())
}

/// Rate as sent by the carrier.
#[derive(Debug, Deserialize)]
struct WireRate {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default)]
    provider_name: Option<String>,
    #[serde(default)]
    provider_service_code: Option<String>,
    #[serde(default)]
    provider_service_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    currency_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    days: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    zone: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    weight: Option<f64>,
    #[serde(default)]
    success: Option<bool>,
}

impl WireRate {
    fn into_rate(self) -> Rate {
        Rate {
            id: self.id.unwrap_or_default(),
            provider_name: self.provider_name.unwrap_or_default(),
            provider_service_code: self.provider_service_code.unwrap_or_default(),
            provider_service_name: self.provider_service_name.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            currency_code: self.currency_code,
            cost: self.cost,
            total: self.total,
            days: self.days,
            zone: self.zone,
            weight: self.weight,
            success: self.success.unwrap_or(false),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Lenient {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Lenient::Number(n) => Some(*n),
            Lenient::Text(s) => s.trim().parse().ok(),
            Lenient::Other(_) => None,
        }
        .filter(|n: &f64| n.is_finite())
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_f64()))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| v.as_f64())
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| match v {
        Lenient::Number(n) if n.fract() == 0.0 => Some(format!("{}", n as i64)),
        Lenient::Number(n) => Some(n.to_string()),
        Lenient::Text(s) => Some(s),
        Lenient::Other(_) => None,
    }))
}
