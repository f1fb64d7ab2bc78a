//! Area-rate pricing: dimensions in millimetres, rate per square
//! metre. `min_charge` exists in the data shape but is not applied.

use rust_decimal::Decimal;

use super::{group_multiplier, PricingOutcome};
use crate::domain::price_group::PriceGroup;
use crate::domain::product::SqmPricingData;

fn millimetres_to_metres(value: u32) -> Decimal {
    Decimal::new(i64::from(value), 3)
}

pub(super) fn sqm_price(
    data: &SqmPricingData,
    width: u32,
    drop: u32,
    price_group: Option<&PriceGroup>,
) -> PricingOutcome {
    let sqm = millimetres_to_metres(width) * millimetres_to_metres(drop);
    let price = sqm * data.price_per_sqm * group_multiplier(price_group);

    PricingOutcome::priced_with_note(price, format!("Area: {sqm:.2} sqm"))
}
