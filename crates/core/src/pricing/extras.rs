//! Extra-price calculation. Pure and total: an unrecognized price
//! type falls back to treating `price` as a flat fixed amount.

use rust_decimal::Decimal;

use crate::domain::extra::{ExtraPriceType, ProductExtra, SelectedExtra};

fn millimetres_to_metres(value: u32) -> Decimal {
    Decimal::new(i64::from(value), 3)
}

/// Monetary amount an extra adds to one unit of the line.
///
/// `base_price` is the base line price before extras (the grid/sqm
/// result for the current product and dimensions), so percentage
/// extras re-price automatically when dimensions or group change.
pub fn calculate_extra_price(
    extra: &ProductExtra,
    base_price: Decimal,
    width: u32,
    drop: u32,
) -> Decimal {
    match extra.price_type {
        ExtraPriceType::Fixed | ExtraPriceType::Unrecognized => extra.price,
        ExtraPriceType::PerMetreWidth => extra.price * millimetres_to_metres(width),
        ExtraPriceType::PerSqm => {
            extra.price * millimetres_to_metres(width) * millimetres_to_metres(drop)
        }
        ExtraPriceType::Percentage => base_price * extra.price / Decimal::ONE_HUNDRED,
    }
}

/// Freeze an extra into the shape carried on a line item.
pub fn select_extra(
    extra: &ProductExtra,
    base_price: Decimal,
    width: u32,
    drop: u32,
) -> SelectedExtra {
    SelectedExtra {
        id: extra.id.clone(),
        name: extra.name.clone(),
        price: extra.price,
        price_type: extra.price_type,
        calculated_price: calculate_extra_price(extra, base_price, width, drop),
    }
}
