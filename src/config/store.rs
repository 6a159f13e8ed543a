//! Store (shipment origin) configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Store address used as the origin of every quotation and shipment.
///
/// Every field is optional; the address normalizer fills in fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// ISO country code of the store
    pub country_code: Option<String>,

    /// Postal code
    pub zip_code: Option<String>,

    /// State (area level 1)
    pub state: Option<String>,

    /// Municipality (area level 2)
    pub municipality: Option<String>,

    /// Suburb / neighbourhood (area level 3)
    pub suburb: Option<String>,

    /// Street and name
    pub address: Option<String>,

    /// Exterior number
    pub ext_number: Option<String>,

    /// Free-form reference for the driver
    pub reference: Option<String>,

    /// Contact name
    pub name: Option<String>,

    /// Company name
    pub company: Option<String>,

    /// Contact phone
    pub phone: Option<String>,

    /// Contact email
    pub email: Option<String>,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(zip) = &self.zip_code {
            if !zip.chars().any(|c| c.is_ascii_digit()) {
                return Err(ValidationError::InvalidStoreZipCode);
            }
        }
        Ok(())
    }
}
