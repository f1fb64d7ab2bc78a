//! Markup-on-cost margin math: `sell = cost * (1 + margin% / 100)`.
//! Not margin-on-sell; a 30% margin on a $100 cost sells at $130.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::QuoteTotals;

/// Flat 10% GST applied to the margin-inclusive subtotal.
pub fn gst_rate() -> Decimal {
    Decimal::new(10, 2)
}

pub fn apply_single_margin(cost: Decimal, margin_percent: Decimal) -> Decimal {
    cost * (Decimal::ONE + margin_percent / Decimal::ONE_HUNDRED)
}

/// Inverse of [`apply_single_margin`]. Zero when cost is zero.
pub fn margin_percent_of(cost: Decimal, sell: Decimal) -> Decimal {
    if cost.is_zero() {
        return Decimal::ZERO;
    }
    (sell - cost) / cost * Decimal::ONE_HUNDRED
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginBreakdown {
    pub cost: Decimal,
    pub margin_percent: Decimal,
    pub margin_amount: Decimal,
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
}

pub fn margin_breakdown(cost: Decimal, margin_percent: Decimal) -> MarginBreakdown {
    let margin_amount = cost * margin_percent / Decimal::ONE_HUNDRED;
    let subtotal = cost + margin_amount;
    let gst = subtotal * gst_rate();

    MarginBreakdown {
        cost,
        margin_percent,
        margin_amount,
        subtotal,
        gst,
        total: subtotal + gst,
    }
}

/// The margin-relevant slice of a line item. Category-level overrides
/// are resolved by the caller before this point; `margin_percent` here
/// is item-or-category, with `None` inheriting `overall_margin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemPricing {
    pub quantity: u32,
    pub cost_price: Decimal,
    pub margin_percent: Option<Decimal>,
}

pub fn quote_totals(items: &[ItemPricing], overall_margin: Decimal) -> QuoteTotals {
    let mut total_cost = Decimal::ZERO;
    let mut total_sell = Decimal::ZERO;

    for item in items {
        let quantity = if item.quantity == 0 { 1 } else { item.quantity };
        let cost = item.cost_price * Decimal::from(quantity);
        let effective_margin = item.margin_percent.unwrap_or(overall_margin);

        total_cost += cost;
        total_sell += apply_single_margin(cost, effective_margin);
    }

    let total_margin = total_sell - total_cost;
    let gst = total_sell * gst_rate();
    let average_margin_percent = if total_cost.is_zero() {
        Decimal::ZERO
    } else {
        total_margin / total_cost * Decimal::ONE_HUNDRED
    };

    QuoteTotals {
        total_cost,
        total_sell,
        total_margin,
        average_margin_percent,
        gst,
        total_inc_gst: total_sell + gst,
    }
}
