//! Pricing strategy resolver.
//!
//! All entry points are total: bad input never panics or errors, it
//! comes back as a zero price with a blocking `warning`. Informational
//! bracket/area notes travel separately and never block.

mod area;
mod extras;
mod grid;

pub use extras::{calculate_extra_price, select_extra};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::price_group::PriceGroup;
use crate::domain::product::{
    PricingSpec, Product, CATEGORY_CURTAINS, CATEGORY_EXTERNAL_BLINDS,
};

/// Curtain fullness factor, part of the curtain grid key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fullness {
    #[default]
    #[serde(rename = "100")]
    Hundred,
    #[serde(rename = "160")]
    HundredSixty,
}

impl Fullness {
    pub fn key(self) -> &'static str {
        match self {
            Fullness::Hundred => "100",
            Fullness::HundredSixty => "160",
        }
    }
}

impl std::str::FromStr for Fullness {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "100" => Ok(Fullness::Hundred),
            "160" => Ok(Fullness::HundredSixty),
            other => Err(format!("unsupported fullness: {other} (expected 100 or 160)")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PricingOptions<'a> {
    pub price_group: Option<&'a PriceGroup>,
    pub fullness: Fullness,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingOutcome {
    pub price: Decimal,
    /// Blocking condition. A quote line must not be added while set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Advisory detail: matched bracket or computed area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PricingOutcome {
    pub fn priced(price: Decimal) -> Self {
        Self { price, warning: None, note: None }
    }

    pub fn priced_with_note(price: Decimal, note: impl Into<String>) -> Self {
        Self { price, warning: None, note: Some(note.into()) }
    }

    pub fn blocked(warning: impl Into<String>) -> Self {
        Self { price: Decimal::ZERO, warning: Some(warning.into()), note: None }
    }

    pub fn is_blocked(&self) -> bool {
        self.warning.is_some()
    }
}

/// Resolve the pricing strategy for a product and run it.
///
/// Grid-typed products dispatch further on category because supplier
/// catalogs publish their tables in different orientations; the
/// orientation is matched per category, never inferred, since a silent
/// transpose would misprice without any error signal.
pub fn calculate_price(
    product: &Product,
    width: u32,
    drop: u32,
    options: &PricingOptions<'_>,
) -> PricingOutcome {
    match &product.pricing {
        PricingSpec::Sqm(data) => area::sqm_price(data, width, drop, options.price_group),
        // Unit pricing has no algorithm yet; zero with no warning.
        PricingSpec::Unit(_) => PricingOutcome::priced(Decimal::ZERO),
        PricingSpec::Grid(data) => match product.category.as_str() {
            CATEGORY_CURTAINS => {
                grid::curtain_price(data, width, drop, options.price_group, options.fullness)
            }
            CATEGORY_EXTERNAL_BLINDS => {
                grid::external_blind_price(data, width, drop, options.price_group)
            }
            _ => grid::standard_grid_price(data, width, drop, options.price_group),
        },
        PricingSpec::Unknown => PricingOutcome::priced(Decimal::ZERO),
    }
}

pub(crate) fn group_multiplier(price_group: Option<&PriceGroup>) -> Decimal {
    price_group.map(|group| group.multiplier).unwrap_or(Decimal::ONE)
}

pub(crate) fn group_code(price_group: Option<&PriceGroup>) -> String {
    price_group.map(|group| group.group_code.clone()).unwrap_or_else(|| "1".to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use super::{calculate_price, Fullness, PricingOptions};
    use crate::domain::product::{
        GridPricingData, PricingSpec, Product, ProductId, UnitPricingData,
    };

    fn product(category: &str, pricing: PricingSpec) -> Product {
        Product {
            id: ProductId("p-1".to_string()),
            supplier: "Creative".to_string(),
            category: category.to_string(),
            name: "Test".to_string(),
            pricing,
            quote_config: None,
            is_active: true,
        }
    }

    #[test]
    fn unit_products_price_to_zero_without_warning() {
        let subject = product(
            "Plantation Shutters",
            PricingSpec::Unit(UnitPricingData { sizes: BTreeMap::new() }),
        );
        let outcome = calculate_price(&subject, 1200, 1500, &PricingOptions::default());
        assert_eq!(outcome.price, Decimal::ZERO);
        assert!(!outcome.is_blocked());
    }

    #[test]
    fn unknown_pricing_tags_price_to_zero_without_warning() {
        let subject = product("Security Doors", PricingSpec::Unknown);
        let outcome = calculate_price(&subject, 1200, 1500, &PricingOptions::default());
        assert_eq!(outcome.price, Decimal::ZERO);
        assert!(!outcome.is_blocked());
    }

    #[test]
    fn grid_products_route_by_category() {
        let mut grids = BTreeMap::new();
        // Drop-major table: one drop row, two width columns.
        grids.insert("1_100".to_string(), vec![vec![Decimal::from(300), Decimal::from(340)]]);
        let curtains = product(
            "Curtains",
            PricingSpec::Grid(GridPricingData {
                width_steps: vec![1200, 1800],
                drop_steps: vec![2400],
                grid: None,
                grids: Some(grids),
                notes: None,
            }),
        );

        let outcome =
            calculate_price(&curtains, 1500, 2100, &PricingOptions { price_group: None, fullness: Fullness::Hundred });
        assert_eq!(outcome.price, Decimal::from(340));
    }

    #[test]
    fn fullness_parses_only_known_factors() {
        assert_eq!("160".parse::<Fullness>(), Ok(Fullness::HundredSixty));
        assert!("130".parse::<Fullness>().is_err());
    }
}
