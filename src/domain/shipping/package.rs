//! Package aggregation.
//!
//! A warehouse group ships as a single parcel: weights add up, dimensions
//! take the largest item per axis. Results are clamped rather than rejected so
//! that unusually small or heavy orders still get a quotation.

use serde::{Deserialize, Serialize};

use crate::domain::commerce::LineItem;
use crate::domain::foundation::positive_or;

/// Lower weight bound in kilograms.
pub const MIN_WEIGHT_KG: f64 = 0.5;

/// Upper weight bound in kilograms.
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Smallest dimension sent to the carrier, in centimetres.
pub const MIN_DIMENSION_CM: f64 = 1.0;

/// Dimension assumed for items without data, in centimetres.
pub const DEFAULT_DIMENSION_CM: f64 = 10.0;

/// Weight assumed for items without data, in kilograms.
pub const DEFAULT_ITEM_WEIGHT_KG: f64 = 1.0;

/// Parcel dimensions (cm) and weight (kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

impl Default for PackageDetails {
    fn default() -> Self {
        Self {
            length: DEFAULT_DIMENSION_CM,
            width: DEFAULT_DIMENSION_CM,
            height: DEFAULT_DIMENSION_CM,
            weight: DEFAULT_ITEM_WEIGHT_KG,
        }
    }
}

impl PackageDetails {
    /// Aggregates line items into one bounded parcel.
    pub fn aggregate(items: &[LineItem]) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let mut weight = 0.0;
        let mut length: f64 = 0.0;
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;

        for item in items {
            let variant = item.variant.clone().unwrap_or_default();
            weight +=
                positive_or(variant.weight, DEFAULT_ITEM_WEIGHT_KG) * f64::from(item.quantity);
            length = length.max(positive_or(variant.length, DEFAULT_DIMENSION_CM));
            width = width.max(positive_or(variant.width, DEFAULT_DIMENSION_CM));
            height = height.max(positive_or(variant.height, DEFAULT_DIMENSION_CM));
        }

        Self {
            length,
            width,
            height,
            weight,
        }
        .clamped()
    }

    /// Applies the carrier bounds.
    pub fn clamped(self) -> Self {
        let dimension = |v: f64| {
            if v.is_finite() {
                v.max(MIN_DIMENSION_CM)
            } else {
                DEFAULT_DIMENSION_CM
            }
        };
        let weight = if self.weight.is_finite() {
            self.weight.clamp(MIN_WEIGHT_KG, MAX_WEIGHT_KG)
        } else {
            MIN_WEIGHT_KG
        };

        Self {
            length: dimension(self.length),
            width: dimension(self.width),
            height: dimension(self.height),
            weight,
        }
    }

    /// True when every value is inside the carrier bounds.
    pub fn is_valid(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|d| d.is_finite() && *d >= MIN_DIMENSION_CM)
            && (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commerce::Variant;
    use proptest::prelude::*;

    fn item(quantity: u32, variant: Option<Variant>) -> LineItem {
        LineItem {
            id: "li".to_string(),
            title: "item".to_string(),
            variant_sku: Some("sku||WH1".to_string()),
            quantity,
            unit_price: 1.0,
            product_description: None,
            variant,
        }
    }

    fn variant(weight: f64, length: f64, width: f64, height: f64) -> Variant {
        Variant {
            weight: Some(weight),
            length: Some(length),
            width: Some(width),
            height: Some(height),
            product: None,
        }
    }

    #[test]
    fn empty_items_return_default_package() {
        assert_eq!(
            PackageDetails::aggregate(&[]),
            PackageDetails {
                length: 10.0,
                width: 10.0,
                height: 10.0,
                weight: 1.0
            }
        );
    }

    #[test]
    fn weights_add_and_dimensions_take_maximum() {
        let items = vec![
            item(2, Some(variant(1.5, 30.0, 5.0, 8.0))),
            item(1, Some(variant(4.0, 12.0, 25.0, 3.0))),
        ];

        let package = PackageDetails::aggregate(&items);
        assert_eq!(package.weight, 7.0);
        assert_eq!(package.length, 30.0);
        assert_eq!(package.width, 25.0);
        assert_eq!(package.height, 8.0);
    }

    #[test]
    fn missing_variant_data_uses_defaults() {
        let package = PackageDetails::aggregate(&[item(3, None)]);
        assert_eq!(package.weight, 3.0);
        assert_eq!(package.length, 10.0);
    }

    #[test]
    fn light_packages_are_raised_to_minimum() {
        let package = PackageDetails::aggregate(&[item(1, Some(variant(0.1, 2.0, 2.0, 2.0)))]);
        assert_eq!(package.weight, MIN_WEIGHT_KG);
    }

    #[test]
    fn heavy_packages_are_capped() {
        let package = PackageDetails::aggregate(&[item(40, Some(variant(25.0, 50.0, 50.0, 50.0)))]);
        assert_eq!(package.weight, MAX_WEIGHT_KG);
    }

    #[test]
    fn zero_quantity_items_still_produce_valid_package() {
        let package = PackageDetails::aggregate(&[item(0, None)]);
        assert!(package.is_valid());
        assert_eq!(package.weight, MIN_WEIGHT_KG);
    }

    #[test]
    fn negative_or_nan_dimensions_fall_back() {
        let broken = variant(f64::NAN, -4.0, 0.0, f64::INFINITY);
        let package = PackageDetails::aggregate(&[item(1, Some(broken))]);
        assert!(package.is_valid());
        assert_eq!(package.length, DEFAULT_DIMENSION_CM);
    }

    fn arb_option_f64() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            Just(None),
            Just(Some(f64::NAN)),
            Just(Some(f64::INFINITY)),
            (-1.0e6f64..1.0e6f64).prop_map(Some),
        ]
    }

    fn arb_item() -> impl Strategy<Value = LineItem> {
        (
            0u32..10_000,
            proptest::option::of((
                arb_option_f64(),
                arb_option_f64(),
                arb_option_f64(),
                arb_option_f64(),
            )),
        )
            .prop_map(|(quantity, dims)| {
                let variant = dims.map(|(weight, length, width, height)| Variant {
                    weight,
                    length,
                    width,
                    height,
                    product: None,
                });
                item(quantity, variant)
            })
    }

    proptest! {
        #[test]
        fn aggregate_always_within_bounds(items in proptest::collection::vec(arb_item(), 0..20)) {
            let package = PackageDetails::aggregate(&items);
            prop_assert!(package.weight >= MIN_WEIGHT_KG && package.weight <= MAX_WEIGHT_KG);
            prop_assert!(package.length >= MIN_DIMENSION_CM);
            prop_assert!(package.width >= MIN_DIMENSION_CM);
            prop_assert!(package.height >= MIN_DIMENSION_CM);
            prop_assert!(package.is_valid());
        }
    }
}
